//! Media records from the WordPress.com REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use super::dto::{ErrorResponse, MediaResponse};
use crate::domain::entities::{RemoteMedia, SiteRef};
use crate::domain::errors::RepositoryError;
use crate::domain::ports::MediaRepositoryPort;
use crate::infrastructure::http::{authorize, build_client};

/// Public REST API host.
pub const DEFAULT_API_BASE: &str = "https://public-api.wordpress.com";

/// Fetches media records through `/rest/v1.1/sites/{site}/media/{id}`.
#[derive(Debug, Clone)]
pub struct WpComMediaRepository {
    client: Client,
    api_base: String,
}

impl WpComMediaRepository {
    /// Creates a repository talking to `api_base`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, RepositoryError> {
        let client = build_client(timeout)
            .map_err(|e| RepositoryError::network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, api_base))
    }

    /// Creates a repository sharing an existing client.
    #[must_use]
    pub fn with_client(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn media_url(&self, site_id: u64, media_id: u64) -> Result<Url, RepositoryError> {
        let url = format!("{}/rest/v1.1/sites/{site_id}/media/{media_id}", self.api_base);
        Url::parse(&url).map_err(|e| RepositoryError::invalid_response(format!("bad URL {url}: {e}")))
    }

    async fn handle_error_response(
        media_id: u64,
        status: StatusCode,
        response: reqwest::Response,
    ) -> RepositoryError {
        let error_message = match response.json::<ErrorResponse>().await {
            Ok(error) => format!("{}: {}", error.error, error.message),
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::NOT_FOUND => RepositoryError::MediaNotFound { media_id },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                RepositoryError::network(format!("access denied: {error_message}"))
            }
            _ if status.is_server_error() => RepositoryError::network(error_message),
            _ => RepositoryError::invalid_response(error_message),
        }
    }
}

#[async_trait]
impl MediaRepositoryPort for WpComMediaRepository {
    async fn get_media(
        &self,
        media_id: u64,
        site: &SiteRef,
    ) -> Result<RemoteMedia, RepositoryError> {
        let site_id = site.site_id.ok_or(RepositoryError::RemoteApiUnavailable)?;
        let url = self.media_url(site_id, media_id)?;

        debug!(site_id, media_id, "Fetching media record");

        let response = authorize(self.client.get(url.clone()), &url, site)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach media API");
                if e.is_timeout() {
                    RepositoryError::network("request timed out")
                } else {
                    RepositoryError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(media_id, status, response).await);
        }

        let media: MediaResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse media response");
            RepositoryError::invalid_response(format!("failed to parse response: {e}"))
        })?;

        debug!(media_id = media.id, mime_type = %media.mime_type, "Media record fetched");
        Ok(media.into_remote_media())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MediaKind;
    use crate::infrastructure::http::test_server::TestServer;

    fn site(site_id: Option<u64>) -> SiteRef {
        SiteRef {
            site_id,
            ..SiteRef::default()
        }
    }

    fn repository(base: &str) -> WpComMediaRepository {
        WpComMediaRepository::new(base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_media() {
        let body = br#"{"ID": 9, "URL": "https://example.com/a.png", "mime_type": "image/png", "width": 10, "height": 20}"#;
        let server = TestServer::respond(200, "application/json", body.to_vec()).await;

        let media = repository(&format!("{}/", server.base_url))
            .get_media(9, &site(Some(123)))
            .await
            .unwrap();

        assert_eq!(media.media_id, 9);
        assert_eq!(media.kind, MediaKind::Image);
        assert_eq!(media.remote_url.as_deref(), Some("https://example.com/a.png"));
        let request = server.request().await;
        assert!(request.starts_with("GET /rest/v1.1/sites/123/media/9 "));
    }

    #[tokio::test]
    async fn test_not_found() {
        let body = br#"{"error": "unknown_media", "message": "Unknown media"}"#;
        let server = TestServer::respond(404, "application/json", body.to_vec()).await;

        let result = repository(&server.base_url)
            .get_media(5, &site(Some(1)))
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::MediaNotFound { media_id: 5 })
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_network() {
        let server = TestServer::respond(503, "text/plain", b"down".to_vec()).await;

        let result = repository(&server.base_url)
            .get_media(5, &site(Some(1)))
            .await;

        assert!(matches!(result, Err(RepositoryError::Network { .. })));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = TestServer::respond(200, "application/json", b"{\"nope\": 1}".to_vec()).await;

        let result = repository(&server.base_url)
            .get_media(5, &site(Some(1)))
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_site_without_api_access() {
        let result = repository(DEFAULT_API_BASE).get_media(5, &site(None)).await;
        assert!(matches!(result, Err(RepositoryError::RemoteApiUnavailable)));
    }
}
