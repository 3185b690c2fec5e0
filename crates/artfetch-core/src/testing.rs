//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::http::{Request, ResponseSink, Transport, TransportError};

/// Serves canned responses by URL (404 for anything unknown), records every
/// request and tracks how many requests were in flight at the same time.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: HashMap<String, (u32, Vec<u8>)>,
    unreachable: Vec<String>,
    delay: Duration,
    response_delays: HashMap<String, Duration>,
    lingers: HashMap<String, Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(mut self, url: &str, status: u32, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(url.to_string(), (status, body.into()));
        self
    }

    pub(crate) fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.to_string());
        self
    }

    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Wait `delay` before answering `url` (overrides the global delay).
    pub(crate) fn delay_response(mut self, url: &str, delay: Duration) -> Self {
        self.response_delays.insert(url.to_string(), delay);
        self
    }

    /// Keep the transfer of `url` open for `delay` after its body was delivered.
    pub(crate) fn linger(mut self, url: &str, delay: Duration) -> Self {
        self.lingers.insert(url.to_string(), delay);
        self
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }

    pub(crate) fn tokens(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    fn respond(&self, url: &str, sink: &mut dyn ResponseSink) -> Result<u32, TransportError> {
        if self.unreachable.iter().any(|u| u == url) {
            return Err(TransportError::Curl(curl::Error::new(7)));
        }
        let (status, body) = self
            .routes
            .get(url)
            .map(|(s, b)| (*s, b.as_slice()))
            .unwrap_or((404, b"no such artifact".as_slice()));
        if !body.is_empty() {
            sink.write(status, body).map_err(TransportError::Sink)?;
        }
        Ok(status)
    }
}

impl Transport for FakeTransport {
    fn get(&self, request: &Request<'_>, sink: &mut dyn ResponseSink) -> Result<u32, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.url.to_string(), request.token.to_string()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = self.response_delays.get(request.url).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let result = self.respond(request.url, sink);
        if let Some(linger) = self.lingers.get(request.url) {
            std::thread::sleep(*linger);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
