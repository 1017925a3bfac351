//! Display metrics used to size thumbnails.

use serde::{Deserialize, Serialize};

use super::thumbnail::{PixelSize, ThumbnailSize};

/// Spacing between grid cells in points.
pub const GRID_SPACING: f64 = 2.0;

/// Upper bound for the medium thumbnail side in pixels.
pub const MEDIUM_MAX_SIDE: f64 = 1024.0;

/// Metrics of the display thumbnails are rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    /// Shorter screen side in points.
    #[serde(default = "default_min_screen_side")]
    pub min_screen_side: f64,
    /// Pixels per point.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Tablet layout shows more grid columns.
    #[serde(default)]
    pub is_tablet: bool,
}

fn default_min_screen_side() -> f64 {
    390.0
}

fn default_scale() -> f64 {
    3.0
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            min_screen_side: default_min_screen_side(),
            scale: default_scale(),
            is_tablet: false,
        }
    }
}

impl DisplayMetrics {
    /// Returns the pixel box a thumbnail of the given class should cover.
    ///
    /// The result only depends on the shorter screen side, so the same
    /// thumbnail is reused across orientations and presentation modes.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn preferred_box(&self, size: ThumbnailSize) -> PixelSize {
        let side = self.min_screen_side.max(0.0);
        let scale = self.effective_scale();
        match size {
            ThumbnailSize::Small => {
                let items_per_row: u32 = if self.is_tablet { 5 } else { 4 };
                let available = side - GRID_SPACING * f64::from(items_per_row - 1);
                let cell = (available / f64::from(items_per_row)).floor().max(1.0);
                let pixels = (cell * scale).round() as u32;
                PixelSize::new(pixels, pixels)
            }
            ThumbnailSize::Medium => {
                let pixels = MEDIUM_MAX_SIDE.min(side * scale).round().max(1.0) as u32;
                PixelSize::new(pixels, pixels)
            }
        }
    }

    /// Returns the scale, falling back to 1 for nonsensical values.
    #[must_use]
    pub fn effective_scale(&self) -> f64 {
        if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        }
    }
}
