//! HTTP plumbing shared by the media adapters.

mod auth;
mod transport;

#[cfg(test)]
pub(crate) mod test_server;

pub use auth::{authorize, is_wpcom_host};
pub use transport::{HttpMediaTransport, build_client};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("thumbcache/", env!("CARGO_PKG_VERSION"));
