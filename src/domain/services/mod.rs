//! Pure domain services.

pub mod image_cdn;
pub mod remote_url;
pub mod target_size;

pub use image_cdn::{image_url_with_size, is_gif_url, is_photon_host, photon_url};
pub use remote_url::{gif_target_size, remote_thumbnail_url};
pub use target_size::{OVERSIZE_THRESHOLD, target_pixel_size};
