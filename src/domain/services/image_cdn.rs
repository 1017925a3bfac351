//! Size-aware image URL transforms.
//!
//! Two flavours are supported: the Photon resize proxy (`i0.wp.com`) for
//! publicly reachable images, and plain `w`/`h` query parameters understood by
//! WordPress file hosts for everything else.

use reqwest::Url;

use crate::domain::entities::PixelSize;

/// Host used for proxied images.
pub const PHOTON_HOST: &str = "i0.wp.com";

/// JPEG quality requested from the proxy.
pub const PHOTON_QUALITY: u8 = 80;

const PHOTON_PARAMS: [&str; 7] = ["w", "h", "resize", "fit", "quality", "ssl", "strip"];
const SIZE_PARAMS: [&str; 2] = ["w", "h"];

/// Rewrites `url` to fetch a `size` variant through the Photon proxy.
///
/// URLs that already point at a Photon host keep their host and only get the
/// size parameters replaced. Gravatar and non-HTTP URLs are returned unchanged.
/// The proxy can only reach plain `host/path` origins, so URLs carrying
/// credentials or a non-default port get [`image_url_with_size`] instead.
#[must_use]
pub fn photon_url(size: PixelSize, url: &str) -> String {
    let Some(mut parsed) = parse_http_url(url) else {
        return url.to_string();
    };
    let Some(host) = parsed.host_str().map(str::to_owned) else {
        return url.to_string();
    };
    if size.is_empty() || host.contains("gravatar.com") {
        return url.to_string();
    }
    if has_credentials(&parsed) || parsed.port().is_some() {
        return image_url_with_size(size, url);
    }

    let mut params = vec![
        format!("quality={PHOTON_QUALITY}"),
        format!("resize={},{}", size.width, size.height),
    ];
    if parsed.scheme() == "https" {
        params.push("ssl=1".to_string());
    }
    let query = merge_query(parsed.query(), &PHOTON_PARAMS, params);

    if is_photon_host(&host) {
        parsed.set_query(Some(&query));
        parsed.set_fragment(None);
        parsed.into()
    } else {
        format!("https://{PHOTON_HOST}/{host}{}?{query}", parsed.path())
    }
}

/// Adds `w`/`h` query parameters for `size`, preserving other parameters.
/// A zero dimension is left out.
#[must_use]
pub fn image_url_with_size(size: PixelSize, url: &str) -> String {
    let Some(mut parsed) = parse_http_url(url) else {
        return url.to_string();
    };

    let mut params = Vec::with_capacity(2);
    if size.width > 0 {
        params.push(format!("w={}", size.width));
    }
    if size.height > 0 {
        params.push(format!("h={}", size.height));
    }
    let query = merge_query(parsed.query(), &SIZE_PARAMS, params);

    parsed.set_query((!query.is_empty()).then_some(query.as_str()));
    parsed.set_fragment(None);
    parsed.into()
}

/// Returns true if the URL path has a `.gif` extension.
#[must_use]
pub fn is_gif_url(url: &str) -> bool {
    let path = Url::parse(url).map_or_else(
        |_| {
            url.split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_string()
        },
        |parsed| parsed.path().to_string(),
    );
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("gif"))
}

/// Checks if a host is one of the `iN.wp.com` proxy hosts.
#[must_use]
pub fn is_photon_host(host: &str) -> bool {
    host.strip_suffix(".wp.com")
        .and_then(|prefix| prefix.strip_prefix('i'))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_http_url(url: &str) -> Option<Url> {
    Url::parse(url)
        .ok()
        .filter(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
}

fn has_credentials(url: &Url) -> bool {
    !url.username().is_empty() || url.password().is_some()
}

/// Builds a query string from `params` followed by existing parameters not in `overridden`.
fn merge_query(existing: Option<&str>, overridden: &[&str], mut params: Vec<String>) -> String {
    if let Some(existing) = existing {
        for param in existing.split('&').filter(|p| !p.is_empty()) {
            let key = param.split('=').next().unwrap_or("");
            if !overridden.contains(&key) {
                params.push(param.to_string());
            }
        }
    }
    params.join("&")
}
