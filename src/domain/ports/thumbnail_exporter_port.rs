//! Port definition for thumbnail export.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::entities::PixelSize;
use crate::domain::errors::ExportError;

/// A thumbnail written to a temporary file by an exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedThumbnail {
    /// Temporary file holding the encoded thumbnail. Ownership passes to the caller.
    pub path: PathBuf,
    /// Pixel size of the exported image.
    pub size: PixelSize,
}

/// Converts local files and remote videos into thumbnail files.
#[async_trait]
pub trait ThumbnailExporterPort: Send + Sync {
    /// Returns whether the exporter can handle the given local file.
    fn supports_file(&self, path: &Path) -> bool;

    /// Exports a thumbnail of a local file at roughly `target` pixels.
    async fn export_from_file(
        &self,
        path: &Path,
        target: PixelSize,
    ) -> Result<ExportedThumbnail, ExportError>;

    /// Exports a frame of a remote video at roughly `target` pixels.
    async fn export_from_video_url(
        &self,
        url: &str,
        target: PixelSize,
    ) -> Result<ExportedThumbnail, ExportError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    /// Exporter that writes canned bytes into a directory and counts calls.
    pub struct MockThumbnailExporter {
        output_dir: PathBuf,
        output: Mutex<Result<Vec<u8>, ExportError>>,
        supported: bool,
        file_exports: AtomicUsize,
        video_exports: AtomicUsize,
        targets: Mutex<Vec<PixelSize>>,
    }

    impl MockThumbnailExporter {
        /// Creates an exporter that writes `bytes` for every export.
        pub fn new(output_dir: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
            Self {
                output_dir: output_dir.into(),
                output: Mutex::new(Ok(bytes)),
                supported: true,
                file_exports: AtomicUsize::new(0),
                video_exports: AtomicUsize::new(0),
                targets: Mutex::new(Vec::new()),
            }
        }

        /// Creates an exporter whose exports always fail.
        pub fn failing(output_dir: impl Into<PathBuf>, error: ExportError) -> Self {
            let exporter = Self::new(output_dir, Vec::new());
            *exporter.output.lock() = Err(error);
            exporter
        }

        /// Makes `supports_file` return false.
        #[must_use]
        pub fn unsupported(mut self) -> Self {
            self.supported = false;
            self
        }

        /// Number of local file exports.
        pub fn file_export_count(&self) -> usize {
            self.file_exports.load(Ordering::SeqCst)
        }

        /// Number of remote video exports.
        pub fn video_export_count(&self) -> usize {
            self.video_exports.load(Ordering::SeqCst)
        }

        /// Targets requested so far.
        pub fn targets(&self) -> Vec<PixelSize> {
            self.targets.lock().clone()
        }

        fn produce(&self, target: PixelSize) -> Result<ExportedThumbnail, ExportError> {
            self.targets.lock().push(target);
            let bytes = self.output.lock().clone()?;
            std::fs::create_dir_all(&self.output_dir)
                .map_err(|e| ExportError::failed(e.to_string()))?;
            let file = tempfile::Builder::new()
                .prefix("export-")
                .tempfile_in(&self.output_dir)
                .map_err(|e| ExportError::failed(e.to_string()))?;
            std::fs::write(file.path(), &bytes).map_err(|e| ExportError::failed(e.to_string()))?;
            let (_, path) = file.keep().map_err(|e| ExportError::failed(e.to_string()))?;
            Ok(ExportedThumbnail { path, size: target })
        }
    }

    #[async_trait]
    impl ThumbnailExporterPort for MockThumbnailExporter {
        fn supports_file(&self, _path: &Path) -> bool {
            self.supported
        }

        async fn export_from_file(
            &self,
            _path: &Path,
            target: PixelSize,
        ) -> Result<ExportedThumbnail, ExportError> {
            self.file_exports.fetch_add(1, Ordering::SeqCst);
            self.produce(target)
        }

        async fn export_from_video_url(
            &self,
            _url: &str,
            target: PixelSize,
        ) -> Result<ExportedThumbnail, ExportError> {
            self.video_exports.fetch_add(1, Ordering::SeqCst);
            self.produce(target)
        }
    }
}
