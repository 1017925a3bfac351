//! Local thumbnail exporter backed by the `image` crate.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::domain::entities::PixelSize;
use crate::domain::errors::ExportError;
use crate::domain::ports::{ExportedThumbnail, ThumbnailExporterPort};

const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Program run to grab video frames.
#[cfg(feature = "ffmpeg")]
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Exports downscaled thumbnails of local image files into a scratch directory.
///
/// GIFs are copied unchanged so their animation survives. Frames of remote
/// videos are grabbed with an external `ffmpeg` when the `ffmpeg` feature is
/// enabled; without it video export fails with `UnsupportedSource`.
#[derive(Debug, Clone)]
pub struct ImageThumbnailExporter {
    export_dir: PathBuf,
    #[cfg(feature = "ffmpeg")]
    ffmpeg: PathBuf,
}

impl ImageThumbnailExporter {
    /// Creates an exporter writing temporary files into `export_dir`.
    #[must_use]
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            #[cfg(feature = "ffmpeg")]
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
        }
    }

    /// Uses `program` instead of the `ffmpeg` found on `PATH`.
    #[cfg(feature = "ffmpeg")]
    #[must_use]
    pub fn with_ffmpeg(mut self, program: impl Into<PathBuf>) -> Self {
        self.ffmpeg = program.into();
        self
    }

    /// Returns the scratch directory.
    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    #[cfg(feature = "ffmpeg")]
    async fn video_frame(
        &self,
        url: &str,
        target: PixelSize,
    ) -> Result<ExportedThumbnail, ExportError> {
        video::extract_frame(&self.ffmpeg, url, target, &self.export_dir).await
    }

    #[cfg(not(feature = "ffmpeg"))]
    #[allow(clippy::unused_async)]
    async fn video_frame(
        &self,
        url: &str,
        _target: PixelSize,
    ) -> Result<ExportedThumbnail, ExportError> {
        Err(ExportError::unsupported(format!(
            "video frame extraction requires the `ffmpeg` feature ({url})"
        )))
    }
}

#[async_trait]
impl ThumbnailExporterPort for ImageThumbnailExporter {
    fn supports_file(&self, path: &Path) -> bool {
        ImageFormat::from_path(path).is_ok_and(|f| SUPPORTED_FORMATS.contains(&f))
    }

    async fn export_from_file(
        &self,
        path: &Path,
        target: PixelSize,
    ) -> Result<ExportedThumbnail, ExportError> {
        let format = ImageFormat::from_path(path)
            .ok()
            .filter(|f| SUPPORTED_FORMATS.contains(f))
            .ok_or_else(|| ExportError::unsupported(format!("{}", path.display())))?;

        let source = path.to_path_buf();
        let export_dir = self.export_dir.clone();
        let exported = tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&export_dir)
                .map_err(|e| ExportError::failed(format!("Failed to create export dir: {e}")))?;
            if format == ImageFormat::Gif {
                copy_animation(&source, &export_dir)
            } else {
                export_bitmap(&source, &export_dir, target)
            }
        })
        .await
        .map_err(|e| ExportError::failed(format!("Export task panicked: {e}")))??;

        debug!(
            source = %path.display(),
            output = %exported.path.display(),
            size = %exported.size,
            "Exported local thumbnail"
        );
        Ok(exported)
    }

    async fn export_from_video_url(
        &self,
        url: &str,
        target: PixelSize,
    ) -> Result<ExportedThumbnail, ExportError> {
        self.video_frame(url, target).await
    }
}

#[cfg(feature = "ffmpeg")]
mod video {
    use std::ffi::OsString;
    use std::path::Path;
    use std::process::Stdio;

    use tokio::process::Command;
    use tracing::debug;

    use super::temp_path;
    use crate::domain::entities::PixelSize;
    use crate::domain::errors::ExportError;
    use crate::domain::ports::ExportedThumbnail;

    /// Writes the first frame of `url`, scaled to fit `target`, as a JPEG.
    pub(super) async fn extract_frame(
        ffmpeg: &Path,
        url: &str,
        target: PixelSize,
        export_dir: &Path,
    ) -> Result<ExportedThumbnail, ExportError> {
        tokio::fs::create_dir_all(export_dir)
            .await
            .map_err(|e| ExportError::failed(format!("Failed to create export dir: {e}")))?;
        let output = temp_path(export_dir, ".jpg")?;

        let result = run(ffmpeg, &frame_args(url, target, &output))
            .await
            .and_then(|()| {
                image::image_dimensions(&output).map_err(|e| {
                    ExportError::failed(format!("ffmpeg wrote an unreadable frame: {e}"))
                })
            });
        let (width, height) = match result {
            Ok(dimensions) => dimensions,
            Err(e) => {
                let _ = tokio::fs::remove_file(&output).await;
                return Err(e);
            }
        };

        debug!(url, output = %output.display(), width, height, "Exported video frame");
        Ok(ExportedThumbnail {
            path: output,
            size: PixelSize::new(width, height),
        })
    }

    async fn run(ffmpeg: &Path, args: &[OsString]) -> Result<(), ExportError> {
        let output = Command::new(ffmpeg)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExportError::failed(format!("Failed to run {}: {e}", ffmpeg.display())))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ExportError::failed(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    pub(super) fn frame_args(url: &str, target: PixelSize, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-ss", "0", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(url.into());
        args.extend(["-frames:v", "1"].into_iter().map(OsString::from));
        if !target.is_empty() {
            args.push("-vf".into());
            args.push(
                format!(
                    "scale={}:{}:force_original_aspect_ratio=decrease",
                    target.width, target.height
                )
                .into(),
            );
        }
        args.push(output.as_os_str().to_owned());
        args
    }
}

fn copy_animation(source: &Path, export_dir: &Path) -> Result<ExportedThumbnail, ExportError> {
    let (width, height) = image::image_dimensions(source)
        .map_err(|e| ExportError::failed(format!("Failed to read {}: {e}", source.display())))?;

    let output = temp_path(export_dir, ".gif")?;
    std::fs::copy(source, &output).map_err(|e| {
        let _ = std::fs::remove_file(&output);
        ExportError::failed(format!("Failed to copy {}: {e}", source.display()))
    })?;

    Ok(ExportedThumbnail {
        path: output,
        size: PixelSize::new(width, height),
    })
}

fn export_bitmap(
    source: &Path,
    export_dir: &Path,
    target: PixelSize,
) -> Result<ExportedThumbnail, ExportError> {
    let image = image::open(source)
        .map_err(|e| ExportError::failed(format!("Failed to decode {}: {e}", source.display())))?;

    let image = if !target.is_empty()
        && (image.width() > target.width || image.height() > target.height)
    {
        image.resize(target.width, target.height, FilterType::Triangle)
    } else {
        image
    };

    let (encoded, format, suffix) = if image.color().has_alpha() {
        (image, ImageFormat::Png, ".png")
    } else {
        (DynamicImage::ImageRgb8(image.into_rgb8()), ImageFormat::Jpeg, ".jpg")
    };

    let output = temp_path(export_dir, suffix)?;
    let written = File::create(&output)
        .map_err(|e| ExportError::failed(e.to_string()))
        .and_then(|file| {
            encoded
                .write_to(&mut BufWriter::new(file), format)
                .map_err(|e| ExportError::failed(e.to_string()))
        });
    if let Err(e) = written {
        let _ = std::fs::remove_file(&output);
        return Err(e);
    }

    Ok(ExportedThumbnail {
        path: output,
        size: PixelSize::new(encoded.width(), encoded.height()),
    })
}

// Reserves a unique file name that outlives the handle.
fn temp_path(export_dir: &Path, suffix: &str) -> Result<PathBuf, ExportError> {
    tempfile::Builder::new()
        .prefix("export-")
        .suffix(suffix)
        .tempfile_in(export_dir)
        .map_err(|e| ExportError::failed(format!("Failed to create temp file: {e}")))?
        .into_temp_path()
        .keep()
        .map_err(|e| ExportError::failed(format!("Failed to keep temp file: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::image_decoder::fixtures::animated_gif;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_jpeg(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("photo.jpg");
        DynamicImage::new_rgb8(width, height).save(&path).unwrap();
        path
    }

    #[test]
    fn test_supports_file() {
        let exporter = ImageThumbnailExporter::new("/tmp");
        assert!(exporter.supports_file(Path::new("a.JPG")));
        assert!(exporter.supports_file(Path::new("a.png")));
        assert!(exporter.supports_file(Path::new("a.gif")));
        assert!(exporter.supports_file(Path::new("a.webp")));
        assert!(!exporter.supports_file(Path::new("a.mov")));
        assert!(!exporter.supports_file(Path::new("README")));
    }

    #[tokio::test]
    async fn test_large_jpeg_is_downscaled() {
        let temp = TempDir::new().unwrap();
        let source = write_jpeg(temp.path(), 400, 200);
        let exporter = ImageThumbnailExporter::new(temp.path().join("tmp"));

        let exported = exporter
            .export_from_file(&source, PixelSize::new(100, 50))
            .await
            .unwrap();

        assert_eq!(exported.size, PixelSize::new(100, 50));
        assert!(exported.path.starts_with(exporter.export_dir()));
        let written = image::open(&exported.path).unwrap();
        assert_eq!((written.width(), written.height()), (100, 50));
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_small_image_is_not_upscaled() {
        let temp = TempDir::new().unwrap();
        let source = write_jpeg(temp.path(), 40, 30);
        let exporter = ImageThumbnailExporter::new(temp.path());

        let exported = exporter
            .export_from_file(&source, PixelSize::new(400, 300))
            .await
            .unwrap();

        assert_eq!(exported.size, PixelSize::new(40, 30));
    }

    #[tokio::test]
    async fn test_alpha_is_kept_as_png() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("icon.png");
        RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0]))
            .save(&source)
            .unwrap();
        let exporter = ImageThumbnailExporter::new(temp.path());

        let exported = exporter
            .export_from_file(&source, PixelSize::new(4, 4))
            .await
            .unwrap();

        assert_eq!(exported.path.extension().unwrap(), "png");
        let bytes = std::fs::read(&exported.path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn test_gif_is_copied_unchanged() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("anim.gif");
        let gif = animated_gif(20, 10, 3);
        std::fs::write(&source, &gif).unwrap();
        let exporter = ImageThumbnailExporter::new(temp.path());

        let exported = exporter
            .export_from_file(&source, PixelSize::new(5, 5))
            .await
            .unwrap();

        assert_eq!(exported.size, PixelSize::new(20, 10));
        assert_eq!(std::fs::read(&exported.path).unwrap(), gif);
    }

    #[tokio::test]
    async fn test_unsupported_file() {
        let exporter = ImageThumbnailExporter::new("/tmp");
        let result = exporter
            .export_from_file(Path::new("clip.mov"), PixelSize::new(10, 10))
            .await;
        assert!(matches!(result, Err(ExportError::UnsupportedSource { .. })));
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let exporter = ImageThumbnailExporter::new(temp.path());
        let result = exporter
            .export_from_file(&temp.path().join("gone.jpg"), PixelSize::new(10, 10))
            .await;
        assert!(matches!(
            result,
            Err(ExportError::FailedToGenerateOutput { .. })
        ));
    }

    #[cfg(not(feature = "ffmpeg"))]
    #[tokio::test]
    async fn test_video_export_is_unsupported() {
        let exporter = ImageThumbnailExporter::new("/tmp");
        let result = exporter
            .export_from_video_url("https://example.com/clip.mp4", PixelSize::new(10, 10))
            .await;
        assert!(matches!(result, Err(ExportError::UnsupportedSource { .. })));
    }

    #[cfg(feature = "ffmpeg")]
    #[test]
    fn test_frame_args_scale_to_target() {
        let args = video::frame_args(
            "https://example.com/clip.mp4",
            PixelSize::new(320, 180),
            Path::new("/tmp/frame.jpg"),
        );
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        let input = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input + 1], "https://example.com/clip.mp4");
        assert!(args.windows(2).any(|w| w == ["-frames:v", "1"]));
        assert!(args.contains(&"scale=320:180:force_original_aspect_ratio=decrease".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/frame.jpg"));
    }

    #[cfg(feature = "ffmpeg")]
    #[test]
    fn test_frame_args_without_target_keep_source_size() {
        let args = video::frame_args("clip.mp4", PixelSize::default(), Path::new("out.jpg"));
        assert!(!args.iter().any(|a| a == "-vf"));
    }

    #[cfg(feature = "ffmpeg")]
    #[tokio::test]
    async fn test_missing_ffmpeg_fails_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let exporter = ImageThumbnailExporter::new(temp.path().join("tmp"))
            .with_ffmpeg(temp.path().join("no-such-ffmpeg"));

        let result = exporter
            .export_from_video_url("https://example.com/clip.mp4", PixelSize::new(10, 10))
            .await;

        assert!(matches!(
            result,
            Err(ExportError::FailedToGenerateOutput { .. })
        ));
        let leftovers = std::fs::read_dir(exporter.export_dir()).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
