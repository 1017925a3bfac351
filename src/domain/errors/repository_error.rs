//! Media repository error types.

use thiserror::Error;

/// Errors returned when fetching media records from the server.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum RepositoryError {
    #[error("media {media_id} not found on the server")]
    MediaNotFound { media_id: u64 },

    #[error("remote API unavailable for this site")]
    RemoteApiUnavailable,

    #[error("network error while fetching media: {message}")]
    Network { message: String },

    #[error("unexpected media response: {message}")]
    InvalidResponse { message: String },
}

impl RepositoryError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}
