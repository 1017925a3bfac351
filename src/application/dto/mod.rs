//! Data transfer objects for the application layer.

mod thumbnail_dto;

pub use thumbnail_dto::{ThumbnailRequest, ThumbnailResponse};
