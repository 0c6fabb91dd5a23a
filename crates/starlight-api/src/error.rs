use thiserror::Error;

/// Errors from the site backend client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body carried an `error` field.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("parse error: {0}")]
    Parse(String),
}
