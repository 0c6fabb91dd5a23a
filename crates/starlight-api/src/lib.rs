//! HTTP client for the site's JSON endpoints.

pub mod client;
pub mod error;

pub use client::StarlightClient;
pub use error::ApiError;
