//! Thumbnail request and response DTOs.

use std::path::PathBuf;

use crate::domain::entities::{MediaAsset, PixelSize, ThumbnailSize, ThumbnailSource};

/// Request to resolve a thumbnail and optionally save it to a file.
#[derive(Debug, Clone)]
pub struct ThumbnailRequest {
    /// Media to resolve.
    pub asset: MediaAsset,
    /// Requested size class.
    pub size: ThumbnailSize,
    /// Where to write the decoded thumbnail, if anywhere.
    pub output: Option<PathBuf>,
}

impl ThumbnailRequest {
    /// Creates new request that does not write an output file.
    #[must_use]
    pub const fn new(asset: MediaAsset, size: ThumbnailSize) -> Self {
        Self {
            asset,
            size,
            output: None,
        }
    }

    /// Writes the result to `path`.
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
}

/// Outcome of a thumbnail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailResponse {
    /// Where the thumbnail came from.
    pub source: ThumbnailSource,
    /// Decoded pixel size.
    pub size: PixelSize,
    /// Whether the thumbnail is an animation.
    pub animated: bool,
    /// File written, if an output was requested.
    pub output: Option<PathBuf>,
}

impl std::fmt::Display for ThumbnailResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.source, self.size)?;
        if self.animated {
            write!(f, " animated")?;
        }
        if let Some(output) = &self.output {
            write!(f, " -> {}", output.display())?;
        }
        Ok(())
    }
}
