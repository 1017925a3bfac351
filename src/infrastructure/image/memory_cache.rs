//! In-memory LRU cache of decoded thumbnails.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::domain::entities::{CacheKey, ThumbnailImage};
use crate::domain::ports::ThumbnailMemoryPort;

/// Default maximum number of thumbnails kept in memory.
pub const DEFAULT_CACHE_SIZE: usize = 200;

/// In-memory LRU cache for decoded thumbnails.
pub struct MemoryThumbnailCache {
    cache: RwLock<LruCache<CacheKey, ThumbnailImage>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryThumbnailCache {
    /// Creates a new cache with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Looks up a thumbnail without promoting it in the LRU.
    pub async fn peek(&self, key: &CacheKey) -> Option<ThumbnailImage> {
        self.cache.read().await.peek(key).cloned()
    }
}

impl Default for MemoryThumbnailCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached thumbnails.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} thumbnails, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[async_trait::async_trait]
impl ThumbnailMemoryPort for MemoryThumbnailCache {
    async fn get(&self, key: &CacheKey) -> Option<ThumbnailImage> {
        let mut cache = self.cache.write().await;
        if let Some(image) = cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
            Some(image.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    async fn put(&self, key: CacheKey, image: ThumbnailImage) {
        trace!(key = %key, animated = image.is_animated(), "Storing thumbnail in memory cache");
        self.cache.write().await.put(key, image);
    }

    async fn evict(&self, key: &CacheKey) {
        if self.cache.write().await.pop(key).is_some() {
            debug!(key = %key, "Evicted thumbnail from memory cache");
        }
    }

    fn len(&self) -> usize {
        // Best effort while a writer holds the lock.
        self.cache.try_read().map(|c| c.len()).unwrap_or(0)
    }

    async fn clear(&self) {
        self.cache.write().await.clear();
        debug!("Cleared memory thumbnail cache");
    }
}
