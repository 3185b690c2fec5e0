//! Resource locator: job URL to decoded artifact list.

use crate::artifact::{decode_listing, Artifact};
use crate::error::{FetchError, Result};
use crate::http::{is_success, Request, SharedTransport};
use crate::job::{listing_endpoint, JobReference};

/// Resolves a job URL into its artifact list with one authenticated GET.
#[derive(Clone)]
pub struct ArtifactLocator {
    transport: SharedTransport,
    token: String,
}

impl ArtifactLocator {
    pub fn new(transport: SharedTransport, token: impl Into<String>) -> Self {
        Self {
            transport,
            token: token.into(),
        }
    }

    /// Parses `job_url`, requests the listing endpoint and decodes the items.
    /// A URL that does not parse fails before any network activity.
    ///
    /// Blocking; call from `spawn_blocking` when used from async code.
    pub fn list_artifacts(&self, job_url: &str) -> Result<Vec<Artifact>> {
        let job = JobReference::parse(job_url)?;
        let endpoint = listing_endpoint(job_url, &job)?;
        tracing::info!(
            slug = %job.project_slug,
            job = job.job_number,
            %endpoint,
            "listing artifacts"
        );

        let mut body = Vec::new();
        let status = self
            .transport
            .get(&Request::get(endpoint.as_str(), &self.token), &mut body)
            .map_err(|source| FetchError::Request {
                step: "load artifact list",
                source,
            })?;
        if !is_success(status) {
            tracing::warn!(status, "artifact listing rejected");
            return Err(FetchError::response(status, &body));
        }

        let artifacts = decode_listing(&body)?;
        tracing::debug!(count = artifacts.len(), "artifact listing decoded");
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ResponseSink, Transport, TransportError};
    use crate::job::ParseError;
    use std::sync::{Arc, Mutex};

    const JOB_URL: &str = "https://app.example.com/pipelines/gh/org/repo/1234/workflows/abcd/jobs/77";

    /// Replies with a canned status/body and records every request.
    struct Canned {
        status: u32,
        body: &'static str,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl Canned {
        fn new(status: u32, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Transport for Canned {
        fn get(&self, request: &Request<'_>, sink: &mut dyn ResponseSink) -> Result<u32, TransportError> {
            self.seen
                .lock()
                .unwrap()
                .push((request.url.to_string(), request.token.to_string()));
            sink.write(self.status, self.body.as_bytes()).map_err(TransportError::Sink)?;
            Ok(self.status)
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn get(&self, _: &Request<'_>, _: &mut dyn ResponseSink) -> Result<u32, TransportError> {
            Err(TransportError::Curl(curl::Error::new(7)))
        }
    }

    #[test]
    fn lists_artifacts_from_rewritten_endpoint() {
        let transport = Canned::new(
            200,
            r#"{"items":[{"path":"~/a.txt","url":"https://example.com/art/a.txt"}]}"#,
        );
        let locator = ArtifactLocator::new(transport.clone(), "secret");
        let items = locator.list_artifacts(JOB_URL).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, "~/a.txt");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(
                "https://example.com/api/v2/project/gh/org/repo/77/artifacts".to_string(),
                "secret".to_string()
            )]
        );
    }

    #[test]
    fn bad_url_makes_no_request() {
        let transport = Canned::new(200, r#"{"items":[]}"#);
        let locator = ArtifactLocator::new(transport.clone(), "t");
        let err = locator
            .list_artifacts("https://app.example.com/gh/org/repo/1/workflows/w/jobs/1")
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Parse(ParseError::MissingMarker { marker: "/pipelines", .. })
        ));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn non_2xx_carries_status_and_body() {
        let transport = Canned::new(401, r#"{"message":"Invalid token provided."}"#);
        let locator = ArtifactLocator::new(transport, "t");
        match locator.list_artifacts(JOB_URL).unwrap_err() {
            FetchError::Response { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid token"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let locator = ArtifactLocator::new(Canned::new(200, "{\"items\": ["), "t");
        assert!(matches!(
            locator.list_artifacts(JOB_URL).unwrap_err(),
            FetchError::Decode(_)
        ));
    }

    #[test]
    fn transport_failure_is_request_error() {
        let locator = ArtifactLocator::new(Arc::new(Unreachable), "t");
        match locator.list_artifacts(JOB_URL).unwrap_err() {
            FetchError::Request { step, source } => {
                assert_eq!(step, "load artifact list");
                assert!(matches!(source, TransportError::Curl(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
