//! Application services.

pub mod cache_writer;
pub mod image_decoder;
pub mod thumbnail_resolver;

pub use cache_writer::CacheWriter;
pub use image_decoder::{SniffedFormat, decode_thumbnail, sniff_format};
pub use thumbnail_resolver::ThumbnailResolver;
