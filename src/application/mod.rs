//! Application layer with the resolver, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Thumbnail resolution services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{ThumbnailRequest, ThumbnailResponse};
pub use services::ThumbnailResolver;
pub use use_cases::FetchThumbnailUseCase;
