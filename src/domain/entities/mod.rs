//! Domain entity definitions.

mod cancellation;
mod display;
mod media;
mod thumbnail;

pub use cancellation::CancellationFlag;
pub use display::{DisplayMetrics, GRID_SPACING, MEDIUM_MAX_SIDE};
pub use media::{MediaAsset, MediaId, MediaKind, RemoteMedia, RemoteStatus, SiteAuth, SiteRef};
pub use thumbnail::{
    AnimatedImage, CacheKey, LoadedThumbnail, PixelSize, ThumbnailImage, ThumbnailSize,
    ThumbnailSource,
};
