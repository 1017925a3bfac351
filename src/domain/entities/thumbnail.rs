//! Domain types for thumbnails.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::media::MediaId;

/// Requested thumbnail size class.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailSize {
    /// Grid cell sized thumbnail.
    #[default]
    Small,
    /// Roughly screen-sized thumbnail.
    Medium,
}

impl ThumbnailSize {
    /// Returns the name used in cache keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
        }
    }
}

impl fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Scales both dimensions and rounds to the nearest pixel.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn scaled(self, factor: f64) -> Self {
        let scale = |value: u32| (f64::from(value) * factor).round().max(0.0) as u32;
        Self {
            width: scale(self.width),
            height: scale(self.height),
        }
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Longest media ID kept verbatim in a cache file name.
pub const MAX_RAW_KEY_LEN: usize = 200;

/// Filesystem-safe cache key for a `(media, size)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for the given media and size class.
    ///
    /// Short identifiers made of `[A-Za-z0-9._-]` are used verbatim; anything
    /// else, including IDs longer than [`MAX_RAW_KEY_LEN`] bytes, is replaced by
    /// a hex digest so distinct IDs can never map to the same file.
    #[must_use]
    pub fn new(id: &MediaId, size: ThumbnailSize) -> Self {
        let raw = id.as_str();
        let component = if is_filename_safe(raw) {
            raw.to_string()
        } else {
            use sha2::{Digest, Sha256};
            let digest = Sha256::digest(raw.as_bytes());
            format!("h{}", hex::encode(&digest[..16]))
        };
        Self(format!("{component}-{size}-thumbnail"))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_filename_safe(value: &str) -> bool {
    // A leading 'h' followed by 32 hex chars is the hashed form; keeping such
    // raw IDs verbatim could collide with a digest, so they get hashed too.
    let looks_hashed = value.len() == 33
        && value.starts_with('h')
        && value[1..].bytes().all(|b| b.is_ascii_hexdigit());

    !value.is_empty()
        && value.len() <= MAX_RAW_KEY_LEN
        && !looks_hashed
        && !value.starts_with('.')
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}

/// Fully decoded animation frames.
#[derive(Clone)]
pub struct AnimatedImage {
    frames: Vec<image::Frame>,
    width: u32,
    height: u32,
}

impl AnimatedImage {
    /// Wraps decoded frames with the logical canvas size.
    #[must_use]
    pub const fn new(frames: Vec<image::Frame>, width: u32, height: u32) -> Self {
        Self {
            frames,
            width,
            height,
        }
    }

    /// Returns the decoded frames in playback order.
    #[must_use]
    pub fn frames(&self) -> &[image::Frame] {
        &self.frames
    }

    /// Returns the number of frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Returns the canvas width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the canvas height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Debug for AnimatedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedImage")
            .field("frames", &self.frame_count())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Display-ready thumbnail.
#[derive(Debug, Clone)]
pub enum ThumbnailImage {
    /// Eagerly decoded RGBA bitmap.
    Static(Arc<image::DynamicImage>),
    /// Animation container with every frame decoded.
    Animated(Arc<AnimatedImage>),
}

impl ThumbnailImage {
    /// Returns the pixel dimensions.
    #[must_use]
    pub fn size(&self) -> PixelSize {
        match self {
            Self::Static(image) => PixelSize::new(image.width(), image.height()),
            Self::Animated(animation) => PixelSize::new(animation.width(), animation.height()),
        }
    }

    /// Returns true for animation containers.
    #[must_use]
    pub const fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }
}

/// Where a thumbnail was obtained from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSource {
    /// In-memory LRU layer.
    MemoryCache,
    /// On-disk thumbnail cache.
    DiskCache,
    /// Generated from a local source file.
    LocalExport,
    /// Downloaded thumbnail.
    Network,
    /// Frame exported from a remote video.
    VideoExport,
}

impl fmt::Display for ThumbnailSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::DiskCache => write!(f, "disk"),
            Self::LocalExport => write!(f, "local"),
            Self::Network => write!(f, "network"),
            Self::VideoExport => write!(f, "video"),
        }
    }
}

/// A resolved thumbnail with provenance.
#[derive(Debug, Clone)]
pub struct LoadedThumbnail {
    /// Cache key the thumbnail is stored under.
    pub key: CacheKey,
    /// The decoded image.
    pub image: ThumbnailImage,
    /// Where it came from.
    pub source: ThumbnailSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        let key = CacheKey::new(&MediaId::new("123"), ThumbnailSize::Small);
        assert_eq!(key.as_str(), "123-small-thumbnail");

        let key = CacheKey::new(&MediaId::new("123"), ThumbnailSize::Medium);
        assert_eq!(key.as_str(), "123-medium-thumbnail");
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        let id = MediaId::new("x-coredata://ABC/Media/p12");
        let first = CacheKey::new(&id, ThumbnailSize::Small);
        let second = CacheKey::new(&id, ThumbnailSize::Small);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_key_hashes_unsafe_ids() {
        let key = CacheKey::new(&MediaId::new("../etc/passwd"), ThumbnailSize::Small);
        assert!(!key.as_str().contains('/'));
        assert!(key.as_str().starts_with('h'));
        assert!(key.as_str().ends_with("-small-thumbnail"));
    }

    #[test]
    fn test_cache_key_no_collision_between_raw_and_hashed() {
        let unsafe_id = MediaId::new("a/b");
        let hashed = CacheKey::new(&unsafe_id, ThumbnailSize::Small);
        let component = hashed.as_str().trim_end_matches("-small-thumbnail");

        let lookalike = CacheKey::new(&MediaId::new(component), ThumbnailSize::Small);
        assert_ne!(hashed, lookalike);
    }

    #[test]
    fn test_cache_key_hashes_long_ids() {
        let at_limit = "a".repeat(MAX_RAW_KEY_LEN);
        let key = CacheKey::new(&MediaId::new(at_limit.clone()), ThumbnailSize::Small);
        assert_eq!(key.as_str(), format!("{at_limit}-small-thumbnail"));

        let long = MediaId::new("a".repeat(250));
        let key = CacheKey::new(&long, ThumbnailSize::Medium);
        assert!(key.as_str().starts_with('h'));
        assert!(key.as_str().len() < 64);
        assert_ne!(key, CacheKey::new(&MediaId::new("a".repeat(251)), ThumbnailSize::Medium));
    }

    #[test]
    fn test_animated_image_debug_summarizes_frames() {
        let frame = image::Frame::new(image::RgbaImage::new(2, 2));
        let animation = AnimatedImage::new(vec![frame.clone(), frame], 2, 2);
        let thumbnail = ThumbnailImage::Animated(Arc::new(animation));

        let printed = format!("{thumbnail:?}");
        assert!(printed.contains("frames: 2"));
        assert!(printed.contains("width: 2"));
    }

    #[test]
    fn test_pixel_size_scaled_rounds() {
        assert_eq!(PixelSize::new(2000, 3000).scaled(0.1), PixelSize::new(200, 300));
        assert_eq!(PixelSize::new(3, 5).scaled(0.5), PixelSize::new(2, 3));
    }

    #[test]
    fn test_pixel_size_is_empty() {
        assert!(PixelSize::new(0, 10).is_empty());
        assert!(PixelSize::new(10, 0).is_empty());
        assert!(!PixelSize::new(1, 1).is_empty());
    }
}
