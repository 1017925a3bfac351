use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::entities::{MediaKind, RemoteMedia};

/// Sizes preferred for the server thumbnail, largest first.
const THUMBNAIL_KEYS: [&str; 3] = ["large", "medium", "thumbnail"];

/// REST API media response structure.
#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    /// Server media ID.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Full-size file URL.
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    /// MIME type of the file.
    #[serde(default)]
    pub mime_type: String,
    /// Width; the API sends numbers or numeric strings.
    #[serde(default)]
    pub width: Value,
    /// Height; the API sends numbers or numeric strings.
    #[serde(default)]
    pub height: Value,
    /// Named thumbnail URLs.
    #[serde(default)]
    pub thumbnails: HashMap<String, Value>,
}

/// REST API error response structure.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Machine readable error code.
    pub error: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
}

impl MediaResponse {
    /// Converts the response into a domain record.
    #[must_use]
    pub fn into_remote_media(self) -> RemoteMedia {
        let remote_thumbnail_url = THUMBNAIL_KEYS
            .iter()
            .find_map(|k| self.thumbnails.get(*k).and_then(Value::as_str))
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        RemoteMedia {
            media_id: self.id,
            kind: MediaKind::from_mime_type(&self.mime_type),
            width: dimension(&self.width),
            height: dimension(&self.height),
            remote_url: self.url.filter(|u| !u.is_empty()),
            remote_thumbnail_url,
        }
    }
}

fn dimension(value: &Value) -> Option<u32> {
    let dimension = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    dimension.filter(|&d| d > 0)
}
