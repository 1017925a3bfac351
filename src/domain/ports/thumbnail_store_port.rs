//! Port definitions for thumbnail caching.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::entities::{CacheKey, ThumbnailImage};
use crate::domain::errors::StoreResult;

/// Persistent key/value store for encoded thumbnails.
/// Implementations must be thread-safe.
#[async_trait]
pub trait ThumbnailStorePort: Send + Sync {
    /// Reads the bytes stored under `key`, if any.
    async fn read(&self, key: &CacheKey) -> Option<Vec<u8>>;

    /// Stores `bytes` under `key`, replacing any previous entry.
    async fn write(&self, key: &CacheKey, bytes: &[u8]) -> StoreResult<()>;

    /// Moves an exported file into the store under `key`.
    /// The source file no longer exists afterwards.
    async fn move_into(&self, key: &CacheKey, source: &Path) -> StoreResult<()>;

    /// Removes the entry stored under `key`.
    async fn remove(&self, key: &CacheKey);
}

/// Fast in-memory layer for decoded thumbnails.
#[async_trait]
pub trait ThumbnailMemoryPort: Send + Sync {
    /// Attempts to get a decoded thumbnail.
    async fn get(&self, key: &CacheKey) -> Option<ThumbnailImage>;

    /// Stores a decoded thumbnail.
    async fn put(&self, key: CacheKey, image: ThumbnailImage);

    /// Removes a thumbnail.
    async fn evict(&self, key: &CacheKey);

    /// Returns the current number of cached thumbnails.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all thumbnails.
    async fn clear(&self);
}
