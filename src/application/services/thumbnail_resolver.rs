//! Thumbnail resolution pipeline.
//!
//! Implements a strict fallback chain: Memory -> Disk -> Local export -> Network.
//! Every successful generation is written back to the disk cache in the
//! background.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::domain::entities::{
    CacheKey, CancellationFlag, DisplayMetrics, LoadedThumbnail, MediaAsset, MediaKind,
    PixelSize, RemoteStatus, ThumbnailImage, ThumbnailSize, ThumbnailSource,
};
use crate::domain::errors::{ExportError, ThumbnailError, ThumbnailResult};
use crate::domain::ports::{
    MediaRepositoryPort, MediaTransportPort, ThumbnailExporterPort, ThumbnailMemoryPort,
    ThumbnailStorePort,
};
use crate::domain::services::{remote_thumbnail_url, target_pixel_size};

use super::cache_writer::CacheWriter;
use super::image_decoder::{decode_bytes, decode_file};

/// Resolves display-ready thumbnails for media assets.
pub struct ThumbnailResolver {
    store: Arc<dyn ThumbnailStorePort>,
    exporter: Arc<dyn ThumbnailExporterPort>,
    transport: Arc<dyn MediaTransportPort>,
    repository: Option<Arc<dyn MediaRepositoryPort>>,
    memory_cache: Option<Arc<dyn ThumbnailMemoryPort>>,
    writer: CacheWriter,
    display: DisplayMetrics,
}

impl std::fmt::Debug for ThumbnailResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailResolver")
            .field("display", &self.display)
            .field("memory_cache", &self.memory_cache.is_some())
            .field("repository", &self.repository.is_some())
            .finish_non_exhaustive()
    }
}

impl ThumbnailResolver {
    /// Creates a resolver over the given collaborators.
    ///
    /// Must be called from within a Tokio runtime: the cache writer task is
    /// spawned here.
    #[must_use]
    pub fn new(
        store: Arc<dyn ThumbnailStorePort>,
        exporter: Arc<dyn ThumbnailExporterPort>,
        transport: Arc<dyn MediaTransportPort>,
        display: DisplayMetrics,
    ) -> Self {
        let writer = CacheWriter::spawn(store.clone());
        Self {
            store,
            exporter,
            transport,
            repository: None,
            memory_cache: None,
            writer,
            display,
        }
    }

    /// Adds an in-memory layer in front of the disk cache.
    #[must_use]
    pub fn with_memory_cache(mut self, cache: Arc<dyn ThumbnailMemoryPort>) -> Self {
        self.memory_cache = Some(cache);
        self
    }

    /// Adds a repository used to hydrate stub media.
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn MediaRepositoryPort>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Returns the display metrics thumbnails are sized for.
    #[must_use]
    pub const fn display(&self) -> &DisplayMetrics {
        &self.display
    }

    /// Returns the optimal pixel size of a `size` thumbnail for `asset`.
    #[must_use]
    pub fn target_size(&self, asset: &MediaAsset, size: ThumbnailSize) -> PixelSize {
        target_pixel_size(asset.intrinsic_size(), self.display.preferred_box(size))
    }

    /// Returns a decoded thumbnail for `asset`.
    ///
    /// # Errors
    /// Returns the most specific error encountered if no source yields an image.
    pub async fn resolve(
        &self,
        asset: &MediaAsset,
        size: ThumbnailSize,
    ) -> ThumbnailResult<LoadedThumbnail> {
        self.resolve_cancellable(asset, size, &CancellationFlag::new())
            .await
    }

    /// Returns a decoded thumbnail for `asset`, honouring `cancel` before any
    /// network request is issued.
    ///
    /// # Errors
    /// Returns `ThumbnailError::Cancelled` if `cancel` was set before the
    /// download started, otherwise the most specific error encountered.
    pub async fn resolve_cancellable(
        &self,
        asset: &MediaAsset,
        size: ThumbnailSize,
        cancel: &CancellationFlag,
    ) -> ThumbnailResult<LoadedThumbnail> {
        let asset = if asset.remote_status == RemoteStatus::Stub {
            Cow::Owned(self.hydrate_stub(asset).await?)
        } else {
            Cow::Borrowed(asset)
        };
        let asset = asset.as_ref();
        let key = CacheKey::new(&asset.id, size);

        if let Some(memory) = &self.memory_cache
            && let Some(image) = memory.get(&key).await
        {
            trace!(key = %key, "Memory cache hit");
            return Ok(LoadedThumbnail {
                key,
                image,
                source: ThumbnailSource::MemoryCache,
            });
        }

        if let Some(image) = self.cached_thumbnail(&key).await {
            return Ok(self.remember(key, image, ThumbnailSource::DiskCache).await);
        }

        let target = self.target_size(asset, size);
        let local_error = match self.local_thumbnail(asset, &key, target).await {
            Ok(Some(image)) => {
                return Ok(self.remember(key, image, ThumbnailSource::LocalExport).await);
            }
            Ok(None) => None,
            Err(e) => {
                debug!(key = %key, error = %e, "Local thumbnail failed, trying remote");
                Some(e)
            }
        };

        match self.remote_thumbnail(asset, &key, target, cancel).await {
            Ok((image, source)) => Ok(self.remember(key, image, source).await),
            Err(remote_error) => {
                let error = match local_error {
                    Some(local) if !remote_error.is_specific() => local,
                    _ => remote_error,
                };
                debug!(key = %key, error = %error, "Thumbnail resolution failed");
                Err(error)
            }
        }
    }

    /// Waits until every cache write queued so far has completed.
    ///
    /// Intended for tests and shutdown.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    async fn remember(
        &self,
        key: CacheKey,
        image: ThumbnailImage,
        source: ThumbnailSource,
    ) -> LoadedThumbnail {
        if let Some(memory) = &self.memory_cache {
            memory.put(key.clone(), image.clone()).await;
        }
        debug!(key = %key, source = %source, size = %image.size(), "Thumbnail resolved");
        LoadedThumbnail { key, image, source }
    }

    async fn hydrate_stub(&self, asset: &MediaAsset) -> ThumbnailResult<MediaAsset> {
        let media_id = asset.remote_media_id.ok_or(ExportError::MissingRemoteId)?;
        let Some(repository) = &self.repository else {
            return Err(ThumbnailError::not_found(asset.id.as_str()));
        };

        debug!(id = %asset.id, media_id, "Fetching stub media");
        let remote = repository.get_media(media_id, &asset.site).await?;
        let mut hydrated = asset.clone();
        hydrated.apply_remote(remote);
        Ok(hydrated)
    }

    /// Reads and decodes a cached thumbnail. Corrupt entries count as misses.
    async fn cached_thumbnail(&self, key: &CacheKey) -> Option<ThumbnailImage> {
        let Some(bytes) = self.store.read(key).await else {
            trace!(key = %key, "Disk cache miss");
            return None;
        };
        match decode_bytes(bytes).await {
            Ok(image) => {
                trace!(key = %key, "Disk cache hit");
                Some(image)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to decode cached thumbnail");
                None
            }
        }
    }

    /// Generates a thumbnail from a local source, if one is usable.
    async fn local_thumbnail(
        &self,
        asset: &MediaAsset,
        key: &CacheKey,
        target: PixelSize,
    ) -> ThumbnailResult<Option<ThumbnailImage>> {
        let Some(source) = asset.local_path.as_deref() else {
            return Ok(None);
        };
        if !self.exporter.supports_file(source) {
            trace!(key = %key, path = %source.display(), "Local source not supported");
            return Ok(None);
        }

        debug!(key = %key, path = %source.display(), target = %target, "Exporting local thumbnail");
        let export = self.exporter.export_from_file(source, target).await?;
        // Decode before queuing the move so the export file still exists.
        let image = match decode_file(export.path.clone()).await {
            Ok(image) => image,
            Err(e) => {
                let _ = tokio::fs::remove_file(&export.path).await;
                return Err(e);
            }
        };
        self.writer.move_file(key.clone(), export.path);
        Ok(Some(image))
    }

    /// Downloads a thumbnail, or exports a frame of a remote video.
    async fn remote_thumbnail(
        &self,
        asset: &MediaAsset,
        key: &CacheKey,
        target: PixelSize,
        cancel: &CancellationFlag,
    ) -> ThumbnailResult<(ThumbnailImage, ThumbnailSource)> {
        let scale = self.display.effective_scale();
        let Some(url) = remote_thumbnail_url(asset, target, scale) else {
            // Self-hosted sites have no server-side video thumbnails.
            if asset.kind == MediaKind::Video {
                let image = self.video_thumbnail(asset, key, target, cancel).await?;
                return Ok((image, ThumbnailSource::VideoExport));
            }
            return Err(ThumbnailError::not_found(asset.id.as_str()));
        };

        if cancel.is_cancelled() {
            debug!(key = %key, "Thumbnail download cancelled");
            return Err(ThumbnailError::Cancelled);
        }

        debug!(key = %key, url = %url, "Downloading thumbnail");
        let response = self.transport.get(&url, &asset.site).await?;
        if !response.is_acceptable() {
            return Err(ThumbnailError::HttpStatus {
                status: response.status,
            });
        }

        let image = decode_bytes(response.bytes.clone()).await?;
        self.writer.write_bytes(key.clone(), response.bytes);
        Ok((image, ThumbnailSource::Network))
    }

    async fn video_thumbnail(
        &self,
        asset: &MediaAsset,
        key: &CacheKey,
        target: PixelSize,
        cancel: &CancellationFlag,
    ) -> ThumbnailResult<ThumbnailImage> {
        let Some(video_url) = asset.remote_url.as_deref().filter(|u| !u.is_empty()) else {
            return Err(ThumbnailError::not_found(asset.id.as_str()));
        };
        if cancel.is_cancelled() {
            return Err(ThumbnailError::Cancelled);
        }

        debug!(key = %key, url = %video_url, "Exporting video frame");
        let export = self.exporter.export_from_video_url(video_url, target).await?;
        let image = match decode_file(export.path.clone()).await {
            Ok(image) => image,
            Err(e) => {
                let _ = tokio::fs::remove_file(&export.path).await;
                return Err(e);
            }
        };
        self.writer.move_file(key.clone(), export.path);
        Ok(image)
    }
}
