mod media_repository_port;
mod media_transport_port;
mod thumbnail_exporter_port;
mod thumbnail_store_port;

pub use media_repository_port::MediaRepositoryPort;
pub use media_transport_port::{MediaTransportPort, TransportResponse};
pub use thumbnail_exporter_port::{ExportedThumbnail, ThumbnailExporterPort};
pub use thumbnail_store_port::{ThumbnailMemoryPort, ThumbnailStorePort};

#[cfg(test)]
pub mod mocks {
    pub use super::media_repository_port::MockMediaRepositoryPort;
    pub use super::media_transport_port::mock::MockMediaTransport;
    pub use super::thumbnail_exporter_port::mock::MockThumbnailExporter;
    pub use super::thumbnail_store_port::mock::MockThumbnailStore;
}
