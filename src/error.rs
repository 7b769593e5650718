//! Error types surfaced by the download pipeline.
//!
//! Every variant names the stage that failed and keeps the underlying error
//! as its `source`, so print the chain (`{:#}` with anyhow) to see both.
//! Any error aborts the whole download: there is no partial-success mode
//! and nothing is retried.
use thiserror::Error;

/// The underlying reason a single ranged GET failed.
#[derive(Error, Debug)]
pub enum FetchCause {
    #[error("network request failed")]
    Network(#[from] reqwest::Error),
    #[error("server returned unsuccessful status code {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("invalid URL `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot derive an output filename from `{url}`")]
    NoOutputFilename { url: String },

    #[error("metadata probe failed: {reason}")]
    MetadataProbeFailed { reason: String },

    #[error("segment {index} failed")]
    SegmentFetchFailed {
        index: usize,
        #[source]
        cause: FetchCause,
    },

    #[error("failed to write {path}")]
    AssemblyWriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("download cancelled")]
    Cancelled,

    #[error("fetch task panicked: {0}")]
    TaskPanicked(String),
}

impl DownloadError {
    pub(crate) fn probe(reason: impl Into<String>) -> Self {
        Self::MetadataProbeFailed {
            reason: reason.into(),
        }
    }

    pub(crate) fn segment(index: usize, cause: impl Into<FetchCause>) -> Self {
        Self::SegmentFetchFailed {
            index,
            cause: cause.into(),
        }
    }

    /// Whether this error came from cancellation rather than a real failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T, E = DownloadError> = std::result::Result<T, E>;
