//! libcurl-backed transport.
//!
//! One `Easy` handle per request; redirects are followed and the token header
//! is attached to every request. Runs in the current thread.

use std::cell::Cell;
use std::time::Duration;

use curl::easy::{Easy, List};

use super::{parse_status_line, Request, ResponseSink, Transport, TransportError, TOKEN_HEADER};

const USER_AGENT: &str = concat!("artfetch/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    fn configure(&self, easy: &mut Easy, request: &Request<'_>) -> Result<(), curl::Error> {
        easy.url(request.url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.useragent(USER_AGENT)?;
        // The progress callback is only installed when there is something to watch.
        easy.progress(request.cancel.is_some())?;

        let mut list = List::new();
        list.append(&format!("{}: {}", TOKEN_HEADER, request.token))?;
        easy.http_headers(list)?;
        Ok(())
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Transport for CurlTransport {
    fn get(&self, request: &Request<'_>, sink: &mut dyn ResponseSink) -> Result<u32, TransportError> {
        let mut easy = Easy::new();
        self.configure(&mut easy, request)?;

        // Latest status line seen; with redirects there is one per hop.
        let status = Cell::new(0u32);
        let mut sink_error: Option<std::io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|line| {
                if let Some(code) = parse_status_line(line) {
                    status.set(code);
                }
                true
            })?;
            transfer.write_function(|data| match sink.write(status.get(), data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    sink_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            if let Some(cancel) = request.cancel {
                transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
            }
            transfer.perform()
        };

        if let Err(e) = performed {
            if let Some(io_err) = sink_error.take() {
                return Err(TransportError::Sink(io_err));
            }
            if e.is_aborted_by_callback() && request.cancel.is_some_and(|c| c.is_cancelled()) {
                return Err(TransportError::Cancelled);
            }
            return Err(TransportError::Curl(e));
        }

        Ok(easy.response_code()?)
    }
}
