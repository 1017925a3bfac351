//! Thumbnail resolution error types.

use thiserror::Error;

use super::{ExportError, RepositoryError};

/// Result type for thumbnail resolution.
pub type ThumbnailResult<T> = std::result::Result<T, ThumbnailError>;

/// Terminal errors of a thumbnail resolution.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum ThumbnailError {
    #[error("no thumbnail source available for media {id}")]
    NotFound { id: String },

    #[error("failed to decode image: {message}")]
    Decode { message: String },

    #[error("thumbnail export failed: {0}")]
    Export(#[from] ExportError),

    #[error("network error: {message}")]
    Network { message: String },

    #[error("thumbnail request returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("thumbnail request was cancelled")]
    Cancelled,
}

impl ThumbnailError {
    /// Creates not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Returns whether error belongs to the network family (transport, status, cancellation).
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Cancelled
        )
    }

    /// Returns whether error came from a cancellation request.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns whether a later attempt may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Cancelled => true,
            Self::HttpStatus { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if this error says more about the failure than `NotFound`.
    #[must_use]
    pub const fn is_specific(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}

impl From<RepositoryError> for ThumbnailError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::MediaNotFound { media_id } => Self::not_found(media_id.to_string()),
            RepositoryError::Network { message } => Self::Network { message },
            other => Self::network(other.to_string()),
        }
    }
}
