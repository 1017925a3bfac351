//! Request credentials for site media.

use reqwest::{RequestBuilder, Url};

use crate::domain::entities::{SiteAuth, SiteRef};

const WPCOM_HOSTS: [&str; 2] = ["wordpress.com", "wp.com"];

/// Returns true for WordPress.com hosts and their subdomains.
#[must_use]
pub fn is_wpcom_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    WPCOM_HOSTS
        .iter()
        .any(|root| host == *root || host.ends_with(&format!(".{root}")))
}

/// Attaches the credentials of `site` to a request for `url`.
///
/// Bearer tokens are only ever sent to WordPress.com hosts; basic auth goes to
/// the self-hosted site it was stored for.
#[must_use]
pub fn authorize(request: RequestBuilder, url: &Url, site: &SiteRef) -> RequestBuilder {
    match &site.auth {
        SiteAuth::Anonymous => request,
        SiteAuth::Bearer(token) => {
            if url.host_str().is_some_and(is_wpcom_host) {
                request.bearer_auth(token.as_str())
            } else {
                request
            }
        }
        SiteAuth::Basic { username, password } => {
            request.basic_auth(username, Some(password.as_str()))
        }
    }
}
