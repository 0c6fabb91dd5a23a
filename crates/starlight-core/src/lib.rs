//! Behavior layer for the Starlight anime site.
//!
//! Everything here is target-independent: DOM access, persistence and the
//! network sit behind the small traits in [`view`], [`store`] and [`api`],
//! so the same logic drives the browser binding and the test fakes.

pub mod api;
pub mod bookmarks;
pub mod config;
pub mod continue_watching;
pub mod downloads;
pub mod error;
pub mod modal;
pub mod models;
pub mod navbar;
pub mod routes;
pub mod store;
pub mod view;
pub mod watched;

#[cfg(test)]
pub(crate) mod testing;
