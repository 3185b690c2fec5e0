//! HTTP transport seam.
//!
//! The locator and the downloader only see the [`Transport`] trait: a blocking
//! GET that streams the body into a [`ResponseSink`] and returns the final
//! status code. [`CurlTransport`] is the libcurl implementation; tests plug in
//! their own.

mod easy;
mod status;

pub use easy::CurlTransport;
pub use status::{is_success, parse_status_line};

use std::sync::Arc;

use crate::cancel::CancelFlag;

/// Header carrying the access token on every request.
pub const TOKEN_HEADER: &str = "Circle-Token";

/// One authenticated GET.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub url: &'a str,
    pub token: &'a str,
    /// When set, the transfer stops as soon as the flag is raised.
    pub cancel: Option<&'a CancelFlag>,
}

impl<'a> Request<'a> {
    pub fn get(url: &'a str, token: &'a str) -> Self {
        Self {
            url,
            token,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: &'a CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Receives response body chunks.
///
/// Each chunk is tagged with the status of the response it belongs to, so a
/// sink can tell redirect or error bodies apart from the payload before the
/// transfer has finished.
pub trait ResponseSink {
    fn write(&mut self, status: u32, data: &[u8]) -> std::io::Result<()>;
}

impl ResponseSink for Vec<u8> {
    fn write(&mut self, _status: u32, data: &[u8]) -> std::io::Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Curl(#[from] curl::Error),

    /// The sink refused a chunk; the sink itself knows why.
    #[error("response body rejected")]
    Sink(#[source] std::io::Error),

    #[error("transfer cancelled")]
    Cancelled,
}

/// Blocking HTTP GET. Called from `spawn_blocking` when used from async code.
pub trait Transport: Send + Sync {
    /// Performs the request, streaming the body into `sink`, and returns the
    /// final HTTP status code. A non-2xx status is not an error at this level.
    fn get(&self, request: &Request<'_>, sink: &mut dyn ResponseSink) -> Result<u32, TransportError>;
}

pub type SharedTransport = Arc<dyn Transport>;
