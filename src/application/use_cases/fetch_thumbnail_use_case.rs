//! Fetch thumbnail use case implementation.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::codecs::gif::{GifEncoder, Repeat};
use tracing::{debug, info, warn};

use crate::application::dto::{ThumbnailRequest, ThumbnailResponse};
use crate::application::services::ThumbnailResolver;
use crate::domain::entities::ThumbnailImage;
use crate::domain::errors::{ExportError, ThumbnailError, ThumbnailResult};

/// Resolves a thumbnail and optionally writes it to disk.
#[derive(Clone)]
pub struct FetchThumbnailUseCase {
    resolver: Arc<ThumbnailResolver>,
}

impl FetchThumbnailUseCase {
    /// Creates new fetch thumbnail use case.
    #[must_use]
    pub const fn new(resolver: Arc<ThumbnailResolver>) -> Self {
        Self { resolver }
    }

    /// Executes the request.
    ///
    /// # Errors
    /// Returns error if the thumbnail cannot be resolved or written.
    pub async fn execute(&self, request: ThumbnailRequest) -> ThumbnailResult<ThumbnailResponse> {
        debug!(id = %request.asset.id, size = %request.size, "Fetching thumbnail");

        let loaded = self
            .resolver
            .resolve(&request.asset, request.size)
            .await
            .inspect_err(|e| warn!(id = %request.asset.id, error = %e, "Thumbnail unavailable"))?;

        let output = match request.output {
            Some(path) => Some(save_image(loaded.image.clone(), path).await),
            None => None,
        };

        // Drain the background write so short-lived callers do not lose it.
        self.resolver.flush().await;
        let output = output.transpose()?;

        info!(
            id = %request.asset.id,
            source = %loaded.source,
            size = %loaded.image.size(),
            "Thumbnail ready"
        );

        Ok(ThumbnailResponse {
            source: loaded.source,
            size: loaded.image.size(),
            animated: loaded.image.is_animated(),
            output,
        })
    }
}

async fn save_image(image: ThumbnailImage, path: PathBuf) -> ThumbnailResult<PathBuf> {
    tokio::task::spawn_blocking(move || {
        write_image(&image, &path)?;
        Ok(path)
    })
    .await
    .map_err(|e| ExportError::failed(format!("Save task panicked: {e}")))?
}

fn write_image(image: &ThumbnailImage, path: &Path) -> ThumbnailResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ExportError::failed(e.to_string()))?;
    }

    match image {
        ThumbnailImage::Static(bitmap) => bitmap
            .save(path)
            .map_err(|e| ThumbnailError::from(ExportError::failed(e.to_string()))),
        ThumbnailImage::Animated(animation) => {
            let file = File::create(path).map_err(|e| ExportError::failed(e.to_string()))?;
            let mut encoder = GifEncoder::new(BufWriter::new(file));
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| ExportError::failed(e.to_string()))?;
            encoder
                .encode_frames(animation.frames().iter().cloned())
                .map_err(|e| ExportError::failed(e.to_string()))?;
            Ok(())
        }
    }
}
