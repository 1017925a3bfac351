//! Disk-based thumbnail store persisting encoded bytes across sessions.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::CacheKey;
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::ports::ThumbnailStorePort;

/// Layout version of the cache directory. Bumping it wipes existing caches.
pub const CACHE_VERSION: u32 = 2;

const VERSION_MARKER: &str = ".version";
const TMP_DIR: &str = "tmp";

/// Disk-based store that keeps one extension-less file per cache key.
///
/// Sizes are tracked in memory; no eviction happens here.
pub struct DiskThumbnailStore {
    cache_dir: PathBuf,
    current_size: AtomicU64,
    item_count: AtomicUsize,
}

impl DiskThumbnailStore {
    /// Creates a store in the specified directory.
    ///
    /// # Errors
    /// Returns error if the cache directory cannot be created or read.
    pub async fn new(cache_dir: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(cache_dir.join(TMP_DIR))
            .await
            .map_err(|e| StoreError::IoError(format!("Failed to create cache dir: {e}")))?;

        let mut total_size = 0u64;
        let mut count = 0usize;

        let mut entries = fs::read_dir(&cache_dir)
            .await
            .map_err(|e| StoreError::IoError(format!("Failed to read cache dir: {e}")))?;

        while let Ok(Some(entry)) = entries.next_entry().await {
            if is_entry_path(&entry.path())
                && let Ok(meta) = entry.metadata().await
                && meta.is_file()
            {
                total_size += meta.len();
                count += 1;
            }
        }

        debug!(
            path = %cache_dir.display(),
            entries = count,
            bytes = total_size,
            "Opened thumbnail cache"
        );

        Ok(Self {
            cache_dir,
            current_size: AtomicU64::new(total_size),
            item_count: AtomicUsize::new(count),
        })
    }

    /// Creates a store in the default location (~/.cache/thumbcache/thumbnails/).
    ///
    /// # Errors
    /// Returns error if no cache directory exists for this platform or it
    /// cannot be created.
    pub async fn default_location() -> StoreResult<Self> {
        let cache_dir = default_cache_dir().ok_or(StoreError::DirectoryUnavailable)?;
        Self::new(cache_dir).await
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the scratch directory exporters write temporary files into.
    ///
    /// It lives on the same filesystem as the entries so moves are renames.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.cache_dir.join(TMP_DIR)
    }

    fn cache_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.as_str())
    }

    /// Reads the bytes stored under `key`.
    pub async fn get_bytes(&self, key: &CacheKey) -> Option<Vec<u8>> {
        let path = self.cache_path(key);
        match fs::read(&path).await {
            Ok(bytes) => {
                trace!(key = %key, path = %path.display(), "Disk cache hit");
                Some(bytes)
            }
            Err(_) => {
                trace!(key = %key, "Disk cache miss");
                None
            }
        }
    }

    /// Stores `bytes` under `key`.
    ///
    /// The bytes are staged in the scratch directory and renamed into place so
    /// readers never observe a partial file.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or written.
    pub async fn put_bytes(&self, key: &CacheKey, bytes: &[u8]) -> StoreResult<()> {
        let path = self.cache_path(key);
        let staged = self.export_dir().join(format!("{}.partial", key.as_str()));

        let mut file = fs::File::create(&staged)
            .await
            .map_err(|e| StoreError::IoError(format!("Failed to create cache file: {e}")))?;
        file.write_all(bytes)
            .await
            .map_err(|e| StoreError::IoError(format!("Failed to write cache file: {e}")))?;
        file.flush()
            .await
            .map_err(|e| StoreError::IoError(format!("Failed to flush cache file: {e}")))?;
        drop(file);

        let old_size = file_size(&path).await;
        if let Err(e) = fs::rename(&staged, &path).await {
            let _ = fs::remove_file(&staged).await;
            return Err(StoreError::IoError(format!("Failed to commit cache file: {e}")));
        }
        self.account_replace(old_size, bytes.len() as u64);

        debug!(key = %key, size = bytes.len(), "Stored thumbnail in disk cache");
        Ok(())
    }

    /// Moves `source` into the cache under `key`.
    ///
    /// Falls back to copy and delete when the rename crosses filesystems.
    ///
    /// # Errors
    /// Returns error if the file can be neither renamed nor copied.
    pub async fn move_file(&self, key: &CacheKey, source: &Path) -> StoreResult<()> {
        let path = self.cache_path(key);
        let old_size = file_size(&path).await;

        if fs::rename(source, &path).await.is_err() {
            fs::copy(source, &path)
                .await
                .map_err(|e| StoreError::IoError(format!("Failed to copy into cache: {e}")))?;
            if let Err(e) = fs::remove_file(source).await {
                warn!(path = %source.display(), error = %e, "Failed to remove exported file");
            }
        }

        let new_size = file_size(&path).await.unwrap_or(0);
        self.account_replace(old_size, new_size);

        debug!(key = %key, size = new_size, "Moved thumbnail into disk cache");
        Ok(())
    }

    /// Removes a thumbnail from the disk cache.
    pub async fn evict(&self, key: &CacheKey) {
        let path = self.cache_path(key);
        let size = file_size(&path).await;
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(key = %key, error = %e, "Failed to evict from disk cache");
            }
        } else if let Some(s) = size {
            self.current_size.fetch_sub(s, Ordering::Relaxed);
            self.item_count.fetch_sub(1, Ordering::Relaxed);
            debug!(key = %key, "Evicted from disk cache");
        }
    }

    /// Removes every cached thumbnail.
    ///
    /// # Errors
    /// Returns error if the cache directory cannot be read.
    pub async fn clear(&self) -> StoreResult<()> {
        let mut entries = fs::read_dir(&self.cache_dir)
            .await
            .map_err(|e| StoreError::IoError(format!("Failed to read cache dir: {e}")))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::IoError(format!("Failed to read entry: {e}")))?
        {
            let path = entry.path();
            if !is_entry_path(&path) || path.is_dir() {
                continue;
            }
            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "Failed to remove cache file");
            }
        }
        self.current_size.store(0, Ordering::Relaxed);
        self.item_count.store(0, Ordering::Relaxed);
        debug!("Cleared disk cache");
        Ok(())
    }

    /// Wipes the cache once if it was written by an older layout version.
    ///
    /// Returns true if a wipe happened.
    ///
    /// # Errors
    /// Returns error if the cache cannot be cleared or the marker written.
    pub async fn migrate_if_needed(&self) -> StoreResult<bool> {
        let marker = self.cache_dir.join(VERSION_MARKER);
        let current = fs::read_to_string(&marker)
            .await
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok());

        if current == Some(CACHE_VERSION) {
            return Ok(false);
        }

        info!(
            from = ?current,
            to = CACHE_VERSION,
            "Migrating thumbnail cache"
        );
        self.clear().await?;
        fs::write(&marker, CACHE_VERSION.to_string())
            .await
            .map_err(|e| StoreError::IoError(format!("Failed to write version marker: {e}")))?;
        Ok(true)
    }

    /// Returns the current cache size in bytes.
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size.load(Ordering::Relaxed)
    }

    /// Returns the number of cached files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.item_count.load(Ordering::Relaxed)
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if a thumbnail is cached.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        fs::try_exists(self.cache_path(key)).await.unwrap_or(false)
    }

    fn account_replace(&self, old_size: Option<u64>, new_size: u64) {
        if let Some(old) = old_size {
            if new_size > old {
                self.current_size.fetch_add(new_size - old, Ordering::Relaxed);
            } else {
                self.current_size.fetch_sub(old - new_size, Ordering::Relaxed);
            }
        } else {
            self.current_size.fetch_add(new_size, Ordering::Relaxed);
            self.item_count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl ThumbnailStorePort for DiskThumbnailStore {
    async fn read(&self, key: &CacheKey) -> Option<Vec<u8>> {
        self.get_bytes(key).await
    }

    async fn write(&self, key: &CacheKey, bytes: &[u8]) -> StoreResult<()> {
        self.put_bytes(key, bytes).await
    }

    async fn move_into(&self, key: &CacheKey, source: &Path) -> StoreResult<()> {
        self.move_file(key, source).await
    }

    async fn remove(&self, key: &CacheKey) {
        self.evict(key).await;
    }
}

/// Returns the default cache directory path.
#[must_use]
pub fn default_cache_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "thumbcache", "thumbcache")
        .map(|dirs| dirs.cache_dir().join("thumbnails"))
}

// Dot files (the version marker) and the scratch directory are not entries.
fn is_entry_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| !name.starts_with('.') && name != TMP_DIR)
}

async fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).await.map(|m| m.len()).ok()
}
