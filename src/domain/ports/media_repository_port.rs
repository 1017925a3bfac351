//! Port definition for fetching media records.

use async_trait::async_trait;

use crate::domain::entities::{RemoteMedia, SiteRef};
use crate::domain::errors::RepositoryError;

/// Fetches full media records for stub items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepositoryPort: Send + Sync {
    /// Fetches the media with server ID `media_id` from `site`.
    async fn get_media(&self, media_id: u64, site: &SiteRef)
    -> Result<RemoteMedia, RepositoryError>;
}
