//! Use case implementations.

mod fetch_thumbnail_use_case;

pub use fetch_thumbnail_use_case::FetchThumbnailUseCase;
