//! Eager image decoding.
//!
//! Every thumbnail leaves this module fully decoded so the first draw costs no
//! further CPU work. Decoding large JPEGs takes tens of milliseconds, so the
//! async helpers run it on the blocking pool.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, ImageDecoder};
use tracing::trace;

use crate::domain::entities::{AnimatedImage, ThumbnailImage};
use crate::domain::errors::{ThumbnailError, ThumbnailResult};

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const GIF_MAGIC: [u8; 3] = [0x47, 0x49, 0x46];

/// Container format detected from magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedFormat {
    /// GIF, possibly animated.
    Gif,
    /// JPEG.
    Jpeg,
    /// Anything else; left to the decoder's own detection.
    Other,
}

/// Detects the format of `bytes` by inspecting the leading magic numbers.
#[must_use]
pub fn sniff_format(bytes: &[u8]) -> SniffedFormat {
    if bytes.starts_with(&GIF_MAGIC) {
        SniffedFormat::Gif
    } else if bytes.starts_with(&JPEG_MAGIC) {
        SniffedFormat::Jpeg
    } else {
        SniffedFormat::Other
    }
}

/// Decodes `bytes` into a display-ready thumbnail.
///
/// GIFs become an [`AnimatedImage`] with every frame decoded; everything else
/// becomes an RGBA8 bitmap.
///
/// # Errors
/// Returns `ThumbnailError::Decode` if the bytes are not a supported image.
pub fn decode_thumbnail(bytes: &[u8]) -> ThumbnailResult<ThumbnailImage> {
    let format = sniff_format(bytes);
    if format == SniffedFormat::Gif
        && let Some(animation) = decode_animation(bytes)
    {
        trace!(frames = animation.frame_count(), "Decoded animated image");
        return Ok(ThumbnailImage::Animated(Arc::new(animation)));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| ThumbnailError::decode(format!("{format:?}: {e}")))?;
    let bitmap = DynamicImage::ImageRgba8(image.into_rgba8());
    Ok(ThumbnailImage::Static(Arc::new(bitmap)))
}

fn decode_animation(bytes: &[u8]) -> Option<AnimatedImage> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).ok()?;
    let (width, height) = decoder.dimensions();
    let frames = decoder.into_frames().collect_frames().ok()?;
    if frames.is_empty() {
        return None;
    }
    Some(AnimatedImage::new(frames, width, height))
}

/// Decodes `bytes` on the blocking pool.
///
/// # Errors
/// Returns `ThumbnailError::Decode` if decoding fails or the task panics.
pub async fn decode_bytes(bytes: impl AsRef<[u8]> + Send + 'static) -> ThumbnailResult<ThumbnailImage> {
    tokio::task::spawn_blocking(move || decode_thumbnail(bytes.as_ref()))
        .await
        .map_err(|e| ThumbnailError::decode(format!("Decode task panicked: {e}")))?
}

/// Reads and decodes a file on the blocking pool.
///
/// # Errors
/// Returns `ThumbnailError::Decode` if the file cannot be read or decoded.
pub async fn decode_file(path: PathBuf) -> ThumbnailResult<ThumbnailImage> {
    tokio::task::spawn_blocking(move || {
        let bytes = std::fs::read(&path).map_err(|e| {
            ThumbnailError::decode(format!("Failed to read {}: {e}", path.display()))
        })?;
        decode_thumbnail(&bytes)
    })
    .await
    .map_err(|e| ThumbnailError::decode(format!("Decode task panicked: {e}")))?
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    use image::codecs::gif::GifEncoder;
    use image::{DynamicImage, Frame, ImageFormat, Rgba, RgbaImage};

    /// Encodes a solid image in `format`.
    pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let image = DynamicImage::new_rgb8(width, height);
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, format).unwrap();
        cursor.into_inner()
    }

    /// Encodes a GIF with `frames` frames of alternating colors.
    pub fn animated_gif(width: u32, height: u32, frames: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            let frames = (0..frames).map(|i| {
                let shade = if i % 2 == 0 { 0 } else { 255 };
                Frame::new(RgbaImage::from_pixel(width, height, Rgba([shade, 0, 0, 255])))
            });
            encoder.encode_frames(frames).unwrap();
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{animated_gif, encoded_image};
    use super::*;
    use image::ImageFormat;

    #[test]
    fn test_sniff_format() {
        assert_eq!(sniff_format(b"GIF89a..."), SniffedFormat::Gif);
        assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0]), SniffedFormat::Jpeg);
        assert_eq!(sniff_format(b"\x89PNG"), SniffedFormat::Other);
        assert_eq!(sniff_format(&[0xFF]), SniffedFormat::Other);
    }

    #[test]
    fn test_jpeg_is_bitmapped() {
        let bytes = encoded_image(16, 8, ImageFormat::Jpeg);
        let image = decode_thumbnail(&bytes).unwrap();

        match image {
            ThumbnailImage::Static(bitmap) => {
                assert!(matches!(*bitmap, DynamicImage::ImageRgba8(_)));
                assert_eq!((bitmap.width(), bitmap.height()), (16, 8));
            }
            ThumbnailImage::Animated(_) => panic!("expected a static bitmap"),
        }
    }

    #[test]
    fn test_png_is_bitmapped() {
        let bytes = encoded_image(4, 4, ImageFormat::Png);
        let image = decode_thumbnail(&bytes).unwrap();
        assert!(!image.is_animated());
    }

    #[test]
    fn test_gif_is_wrapped_for_animation() {
        let bytes = animated_gif(6, 4, 3);
        let image = decode_thumbnail(&bytes).unwrap();

        match image {
            ThumbnailImage::Animated(animation) => {
                assert_eq!(animation.frame_count(), 3);
                assert_eq!((animation.width(), animation.height()), (6, 4));
            }
            ThumbnailImage::Static(_) => panic!("expected an animation"),
        }
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let result = decode_thumbnail(b"definitely not an image");
        assert!(matches!(result, Err(ThumbnailError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_decode_bytes_off_thread() {
        let bytes = encoded_image(3, 3, ImageFormat::Png);
        let image = decode_bytes(bytes).await.unwrap();
        assert_eq!(image.size().width, 3);
    }

    #[tokio::test]
    async fn test_decode_missing_file() {
        let result = decode_file(PathBuf::from("/nonexistent/thumbnail")).await;
        assert!(matches!(result, Err(ThumbnailError::Decode { .. })));
    }
}
