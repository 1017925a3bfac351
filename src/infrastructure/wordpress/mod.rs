//! WordPress.com REST API adapter.

mod dto;
mod media_repository;

pub use media_repository::{DEFAULT_API_BASE, WpComMediaRepository};
