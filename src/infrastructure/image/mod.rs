//! Thumbnail storage and export infrastructure.
//!
//! This module provides:
//! - Memory caching of decoded thumbnails with LRU eviction
//! - Disk caching of encoded thumbnails for persistence
//! - Local export of downscaled thumbnails

pub mod disk_store;
pub mod exporter;
pub mod memory_cache;

pub use disk_store::{CACHE_VERSION, DiskThumbnailStore, default_cache_dir};
pub use exporter::ImageThumbnailExporter;
pub use memory_cache::{CacheStats, DEFAULT_CACHE_SIZE, MemoryThumbnailCache};
