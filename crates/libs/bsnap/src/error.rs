//! Snapshot error types.

/// Snapshot errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The host could not answer a query about a build.
    #[error("Host Error {0}")]
    Host(String),

    /// A date format pattern contains an unknown specifier.
    #[error("Invalid date format {0:?}")]
    InvalidDateFormat(String),

    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
