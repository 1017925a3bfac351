//! Thumbcache - thumbnail resolution for media libraries.
//!
//! This crate resolves display-ready thumbnails for media items through a
//! disk cache, local export and size-aware remote downloads, writing every
//! generated thumbnail back to the cache in the background.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the resolver, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, ports and pure services.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "thumbcache";
