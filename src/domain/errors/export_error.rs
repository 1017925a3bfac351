//! Thumbnail export error types.

use thiserror::Error;

/// Failures of the export/decode utility.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum ExportError {
    #[error("unsupported export source: {reason}")]
    UnsupportedSource { reason: String },

    #[error("failed to generate thumbnail output: {reason}")]
    FailedToGenerateOutput { reason: String },

    #[error("stub media has no remote ID to fetch it with")]
    MissingRemoteId,
}

impl ExportError {
    /// Creates unsupported source error.
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedSource {
            reason: reason.into(),
        }
    }

    /// Creates output generation error.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::FailedToGenerateOutput {
            reason: reason.into(),
        }
    }
}
