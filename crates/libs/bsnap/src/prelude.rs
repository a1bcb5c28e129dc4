//! Common types and utilities.

/// Snapshot error type.
pub use crate::error::Error;

/// Snapshot result type.
pub type Result<T> = core::result::Result<T, Error>;
