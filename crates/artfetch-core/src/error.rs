//! Error taxonomy for listing and downloading artifacts.
//!
//! Every failure is fatal to the run; nothing here is retried. Messages are
//! written to read well in a cause chain (`{:#}`), so variants that wrap a
//! source do not repeat it in their own message.

use std::path::PathBuf;

use crate::http::TransportError;
use crate::job::ParseError;

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// Response bodies kept for diagnostics are cut to this many bytes.
pub(crate) const MAX_ERROR_BODY: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Missing or malformed invocation input.
    #[error("{0}")]
    Argument(String),

    /// The job URL does not have the expected shape.
    #[error("could not parse url")]
    Parse(#[from] ParseError),

    /// Transport-level failure (connect, TLS, broken transfer).
    #[error("{step}")]
    Request {
        step: &'static str,
        #[source]
        source: TransportError,
    },

    /// Non-2xx status; `body` is the (possibly truncated) response text.
    #[error("bad response {status}: {body}")]
    Response { status: u32, body: String },

    #[error("parsing artifacts JSON")]
    Decode(#[from] serde_json::Error),

    #[error("{step} {}", .path.display())]
    Io {
        step: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact path escapes the output root or names no file.
    #[error("unsafe artifact path '{0}'")]
    UnsafePath(String),

    /// Work skipped or stopped because another artifact already failed.
    #[error("download cancelled")]
    Cancelled,

    #[error("artifact '{path}'")]
    Artifact {
        path: String,
        #[source]
        source: Box<FetchError>,
    },

    #[error("download task failed")]
    Join(#[from] tokio::task::JoinError),
}

impl FetchError {
    pub(crate) fn response(status: u32, body: &[u8]) -> Self {
        let end = body.len().min(MAX_ERROR_BODY);
        FetchError::Response {
            status,
            body: String::from_utf8_lossy(&body[..end]).trim().to_string(),
        }
    }

    pub(crate) fn io(step: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            step,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn artifact(path: &str, source: FetchError) -> Self {
        FetchError::Artifact {
            path: path.to_string(),
            source: Box::new(source),
        }
    }

    /// True for the secondary failures produced after the run already decided to stop.
    pub fn is_cancelled(&self) -> bool {
        match self {
            FetchError::Cancelled => true,
            FetchError::Artifact { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}
