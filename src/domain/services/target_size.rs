//! Thumbnail target size calculation.
//!
//! Neither the resize proxy nor the local exporter support an "aspect-fill"
//! mode, so the target is computed here: the media is scaled down until it
//! just covers the requested box, never scaled up.

use crate::domain::entities::PixelSize;

/// Maximum ratio between a target dimension and the requested box.
pub const OVERSIZE_THRESHOLD: u32 = 4;

/// Returns the pixel size to request for media of `media_size` shown in `box_size`.
///
/// Example: media of 2000x3000 px in a 200x200 px box yields 200x300 px.
/// Ultra-wide panoramas are clamped to four times the box in the
/// overflowing dimension.
#[must_use]
pub fn target_pixel_size(media_size: PixelSize, box_size: PixelSize) -> PixelSize {
    if media_size.is_empty() {
        return box_size;
    }

    let scale = f64::min(
        1.0,
        f64::max(
            f64::from(box_size.width) / f64::from(media_size.width),
            f64::from(box_size.height) / f64::from(media_size.height),
        ),
    );
    let target = media_size.scaled(scale);

    let max_width = box_size.width.saturating_mul(OVERSIZE_THRESHOLD);
    let max_height = box_size.height.saturating_mul(OVERSIZE_THRESHOLD);
    if target.width > max_width || target.height > max_height {
        return PixelSize::new(target.width.min(max_width), target.height.min(max_height));
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0 ; "zero_size")]
    #[test_case(0, 300 ; "zero_width")]
    #[test_case(300, 0 ; "zero_height")]
    fn test_unknown_media_size_returns_box(width: u32, height: u32) {
        let target = target_pixel_size(PixelSize::new(width, height), PixelSize::new(200, 150));
        assert_eq!(target, PixelSize::new(200, 150));
    }

    #[test_case((2000, 3000), (200, 200), (200, 300) ; "portrait_fills_box")]
    #[test_case((3000, 2000), (200, 200), (300, 200) ; "landscape_fills_box")]
    #[test_case((1000, 1000), (200, 200), (200, 200) ; "square")]
    #[test_case((100, 150), (200, 200), (100, 150) ; "never_upscales")]
    #[test_case((150, 400), (200, 200), (150, 400) ; "partially_smaller_not_upscaled")]
    #[test_case((1001, 1999), (100, 100), (100, 200) ; "rounds_to_nearest_pixel")]
    fn test_aspect_fill(media: (u32, u32), bbox: (u32, u32), expected: (u32, u32)) {
        let target = target_pixel_size(
            PixelSize::new(media.0, media.1),
            PixelSize::new(bbox.0, bbox.1),
        );
        assert_eq!(target, PixelSize::new(expected.0, expected.1));
    }

    #[test]
    fn test_panorama_is_clamped() {
        // scale = min(1, max(200/6000, 200/100)) = 1, width 6000 > 800
        let target = target_pixel_size(PixelSize::new(6000, 100), PixelSize::new(200, 200));
        assert_eq!(target, PixelSize::new(800, 100));
    }

    #[test]
    fn test_wide_panorama_scaled_then_clamped() {
        // scale = max(200/20000, 200/1000) = 0.2 -> 4000x200, clamped to 800x200
        let target = target_pixel_size(PixelSize::new(20000, 1000), PixelSize::new(200, 200));
        assert_eq!(target, PixelSize::new(800, 200));
    }

    #[test]
    fn test_tall_panorama_is_clamped() {
        let target = target_pixel_size(PixelSize::new(100, 6000), PixelSize::new(200, 200));
        assert_eq!(target, PixelSize::new(100, 800));
    }

    #[test]
    fn test_clamp_boundary_is_exclusive() {
        let at_threshold = target_pixel_size(PixelSize::new(800, 100), PixelSize::new(200, 200));
        assert_eq!(at_threshold, PixelSize::new(800, 100));

        let over_threshold = target_pixel_size(PixelSize::new(801, 100), PixelSize::new(200, 200));
        assert_eq!(over_threshold, PixelSize::new(800, 100));
    }
}
