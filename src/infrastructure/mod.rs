//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// HTTP transport and credentials.
pub mod http;
/// Thumbnail caching and export.
pub mod image;
/// WordPress.com REST API client.
pub mod wordpress;

pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use http::HttpMediaTransport;
pub use image::{
    CacheStats, DiskThumbnailStore, ImageThumbnailExporter, MemoryThumbnailCache,
};
pub use wordpress::WpComMediaRepository;
