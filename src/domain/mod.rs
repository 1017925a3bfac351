//! Domain layer with core entities, errors, ports and pure services.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Pure sizing and URL services.
pub mod services;

pub use entities::{CacheKey, MediaAsset, MediaId, MediaKind, ThumbnailSize};
pub use errors::{ThumbnailError, ThumbnailResult};
pub use ports::{MediaTransportPort, ThumbnailExporterPort, ThumbnailStorePort};
