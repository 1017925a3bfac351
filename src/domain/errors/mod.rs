//! Domain error types.

mod export_error;
mod repository_error;
mod store_error;
mod thumbnail_error;

pub use export_error::ExportError;
pub use repository_error::RepositoryError;
pub use store_error::{StoreError, StoreResult};
pub use thumbnail_error::{ThumbnailError, ThumbnailResult};
