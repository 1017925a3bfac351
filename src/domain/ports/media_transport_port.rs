//! Port definition for fetching remote media.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::SiteRef;
use crate::domain::errors::ThumbnailError;

/// Raw response of a media request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub bytes: Bytes,
}

impl TransportResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, bytes: impl Into<Bytes>) -> Self {
        Self {
            status,
            bytes: bytes.into(),
        }
    }

    /// Returns true for statuses in `200..400`.
    #[must_use]
    pub const fn is_acceptable(&self) -> bool {
        self.status >= 200 && self.status < 400
    }
}

/// Authenticated HTTP GET for site media.
#[async_trait]
pub trait MediaTransportPort: Send + Sync {
    /// Fetches `url` using the credentials of `site`.
    async fn get(&self, url: &str, site: &SiteRef) -> Result<TransportResponse, ThumbnailError>;
}
