//! Thumbnail store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or writing cached thumbnails.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// I/O error during a cache operation.
    #[error("IO error: {0}")]
    IoError(String),
    /// Cache directory could not be determined.
    #[error("cache directory unavailable")]
    DirectoryUnavailable,
}
