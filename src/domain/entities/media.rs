//! Media asset descriptors consumed by the thumbnail resolver.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::thumbnail::PixelSize;

/// Opaque, stable identifier of a media item.
///
/// The caller chooses the representation (database row ID, server ID, UUID);
/// the resolver only relies on it being stable for the lifetime of the item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaId(String);

impl MediaId {
    /// Creates a new `MediaId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MediaId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MediaId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<u64> for MediaId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Kind of media item.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still or animated image.
    #[default]
    Image,
    /// Video file.
    Video,
    /// Anything else (documents, audio).
    Other,
}

impl MediaKind {
    /// Classifies a MIME type such as `image/jpeg` or `video/mp4`.
    #[must_use]
    pub fn from_mime_type(mime_type: &str) -> Self {
        let top_level = mime_type.split('/').next().unwrap_or_default();
        match top_level.trim().to_ascii_lowercase().as_str() {
            "image" => Self::Image,
            "video" => Self::Video,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Synchronisation state of the local media record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemoteStatus {
    /// Record is fully populated from the server.
    #[default]
    Synced,
    /// Placeholder that only knows its server-side ID.
    Stub,
    /// Created locally and not uploaded yet.
    Local,
}

/// Credentials attached to requests for a site's media.
#[derive(Clone, Default)]
pub enum SiteAuth {
    /// No credentials.
    #[default]
    Anonymous,
    /// OAuth bearer token (WordPress.com).
    Bearer(Zeroizing<String>),
    /// HTTP basic auth stored for a self-hosted site.
    Basic {
        /// Basic auth username.
        username: String,
        /// Basic auth password.
        password: Zeroizing<String>,
    },
}

impl SiteAuth {
    /// Creates a bearer token credential.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(Zeroizing::new(token.into()))
    }

    /// Creates a basic auth credential.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl fmt::Debug for SiteAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Bearer(_) => write!(f, "Bearer(***)"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Site that owns a media item: hosting attributes and auth context.
#[derive(Debug, Clone, Default)]
pub struct SiteRef {
    /// Server-side site ID, when the site is reachable through the REST API.
    pub site_id: Option<u64>,
    /// Site is hosted on WordPress.com.
    pub is_hosted_at_wpcom: bool,
    /// Site is a private WordPress.com site.
    pub is_private_at_wpcom: bool,
    /// Credentials for authenticated media requests.
    pub auth: SiteAuth,
}

impl SiteRef {
    /// Returns true if basic auth credentials are stored for the site.
    #[must_use]
    pub const fn has_basic_auth(&self) -> bool {
        matches!(self.auth, SiteAuth::Basic { .. })
    }

    /// Returns whether media of this site may go through the Photon resize proxy.
    ///
    /// Private WordPress.com sites and self-hosted sites behind basic auth are
    /// not reachable by the proxy.
    #[must_use]
    pub const fn is_eligible_for_photon(&self) -> bool {
        !(self.is_private_at_wpcom || (!self.is_hosted_at_wpcom && self.has_basic_auth()))
    }
}

/// Server-side media record used to hydrate stubs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMedia {
    /// Server media ID.
    pub media_id: u64,
    /// Media kind derived from the MIME type.
    pub kind: MediaKind,
    /// Original width in pixels.
    pub width: Option<u32>,
    /// Original height in pixels.
    pub height: Option<u32>,
    /// Full-size file URL.
    pub remote_url: Option<String>,
    /// Server-computed thumbnail URL.
    pub remote_thumbnail_url: Option<String>,
}

/// Descriptor of a single media item.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    /// Stable identifier, used for cache keys.
    pub id: MediaId,
    /// Media kind.
    pub kind: MediaKind,
    /// Intrinsic width in pixels, if known.
    pub width: Option<u32>,
    /// Intrinsic height in pixels, if known.
    pub height: Option<u32>,
    /// Path to a locally available original.
    pub local_path: Option<PathBuf>,
    /// URL of the original on the server.
    pub remote_url: Option<String>,
    /// Thumbnail URL computed by the server (videos, documents).
    pub remote_thumbnail_url: Option<String>,
    /// Owning site.
    pub site: SiteRef,
    /// Synchronisation state.
    pub remote_status: RemoteStatus,
    /// Server media ID, required to hydrate stubs.
    pub remote_media_id: Option<u64>,
}

impl MediaAsset {
    /// Creates an asset with no sources attached.
    #[must_use]
    pub fn new(id: impl Into<MediaId>, kind: MediaKind, site: SiteRef) -> Self {
        Self {
            id: id.into(),
            kind,
            width: None,
            height: None,
            local_path: None,
            remote_url: None,
            remote_thumbnail_url: None,
            site,
            remote_status: RemoteStatus::Synced,
            remote_media_id: None,
        }
    }

    /// Sets the intrinsic dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the local source file.
    #[must_use]
    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    /// Sets the remote original URL.
    #[must_use]
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// Sets the server-computed thumbnail URL.
    #[must_use]
    pub fn with_remote_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.remote_thumbnail_url = Some(url.into());
        self
    }

    /// Marks the asset as a stub that must be fetched before use.
    #[must_use]
    pub const fn as_stub(mut self, remote_media_id: Option<u64>) -> Self {
        self.remote_status = RemoteStatus::Stub;
        self.remote_media_id = remote_media_id;
        self
    }

    /// Returns the intrinsic size, zero when unknown.
    #[must_use]
    pub fn intrinsic_size(&self) -> PixelSize {
        PixelSize::new(self.width.unwrap_or(0), self.height.unwrap_or(0))
    }

    /// Overwrites remote attributes with a server record, keeping the local identity.
    pub fn apply_remote(&mut self, remote: RemoteMedia) {
        self.kind = remote.kind;
        self.width = remote.width.or(self.width);
        self.height = remote.height.or(self.height);
        self.remote_url = remote.remote_url;
        self.remote_thumbnail_url = remote.remote_thumbnail_url;
        self.remote_media_id = Some(remote.media_id);
        self.remote_status = RemoteStatus::Synced;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_from_mime_type() {
        assert_eq!(MediaKind::from_mime_type("image/jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime_type("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime_type("application/pdf"), MediaKind::Other);
        assert_eq!(MediaKind::from_mime_type(""), MediaKind::Other);
    }

    #[test]
    fn test_photon_eligibility() {
        let public_wpcom = SiteRef {
            is_hosted_at_wpcom: true,
            ..SiteRef::default()
        };
        assert!(public_wpcom.is_eligible_for_photon());

        let private_wpcom = SiteRef {
            is_hosted_at_wpcom: true,
            is_private_at_wpcom: true,
            ..SiteRef::default()
        };
        assert!(!private_wpcom.is_eligible_for_photon());

        let self_hosted_basic = SiteRef {
            auth: SiteAuth::basic("admin", "secret"),
            ..SiteRef::default()
        };
        assert!(!self_hosted_basic.is_eligible_for_photon());

        let self_hosted = SiteRef::default();
        assert!(self_hosted.is_eligible_for_photon());
    }

    #[test]
    fn test_site_auth_debug_is_masked() {
        let auth = SiteAuth::basic("admin", "hunter2");
        let debug = format!("{auth:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));

        let bearer = SiteAuth::bearer("token-value");
        assert!(!format!("{bearer:?}").contains("token-value"));
    }

    #[test]
    fn test_apply_remote_keeps_identity() {
        let mut asset = MediaAsset::new("local-7", MediaKind::Other, SiteRef::default())
            .as_stub(Some(42));

        asset.apply_remote(RemoteMedia {
            media_id: 42,
            kind: MediaKind::Image,
            width: Some(640),
            height: Some(480),
            remote_url: Some("https://example.com/a.jpg".to_string()),
            remote_thumbnail_url: None,
        });

        assert_eq!(asset.id.as_str(), "local-7");
        assert_eq!(asset.kind, MediaKind::Image);
        assert_eq!(asset.remote_status, RemoteStatus::Synced);
        assert_eq!(asset.intrinsic_size(), PixelSize::new(640, 480));
    }
}
