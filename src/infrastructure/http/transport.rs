//! Authenticated HTTP GET for thumbnail downloads.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use super::USER_AGENT;
use super::auth::authorize;
use crate::domain::entities::SiteRef;
use crate::domain::errors::ThumbnailError;
use crate::domain::ports::{MediaTransportPort, TransportResponse};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the shared HTTP client.
///
/// # Errors
/// Returns error if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// `reqwest` implementation of the media transport.
///
/// Non-success statuses are returned as responses; only failures to complete
/// the exchange are errors.
#[derive(Debug, Clone)]
pub struct HttpMediaTransport {
    client: Client,
}

impl HttpMediaTransport {
    /// Creates a transport with the given request timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout: Duration) -> Result<Self, ThumbnailError> {
        let client = build_client(timeout)
            .map_err(|e| ThumbnailError::network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Creates a transport sharing an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaTransportPort for HttpMediaTransport {
    async fn get(&self, url: &str, site: &SiteRef) -> Result<TransportResponse, ThumbnailError> {
        let parsed = Url::parse(url)
            .map_err(|e| ThumbnailError::network(format!("invalid URL {url}: {e}")))?;

        debug!(url = %url, "Downloading thumbnail");

        let response = authorize(self.client.get(parsed.clone()), &parsed, site)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Thumbnail request failed");
                if e.is_timeout() {
                    ThumbnailError::network("request timed out")
                } else if e.is_connect() {
                    let host = parsed.host_str().unwrap_or(url);
                    ThumbnailError::network(format!("failed to connect to {host}"))
                } else {
                    ThumbnailError::network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ThumbnailError::network(format!("failed to read body: {e}")))?;

        debug!(url = %url, status, size = bytes.len(), "Thumbnail response received");
        Ok(TransportResponse::new(status, bytes))
    }
}
