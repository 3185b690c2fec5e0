//! One artifact: GET, then stream into its destination file.

use std::path::PathBuf;

use crate::artifact::Artifact;
use crate::cancel::CancelFlag;
use crate::error::FetchError;
use crate::http::{is_success, Request, SharedTransport, TransportError};
use crate::layout::destination_path;

use super::outcome::ArtifactFile;
use super::sink::FileSink;

/// Everything an artifact task needs besides the artifact itself.
#[derive(Clone)]
pub(super) struct TaskContext {
    pub(super) transport: SharedTransport,
    pub(super) token: String,
    pub(super) output_dir: PathBuf,
    pub(super) cancel: CancelFlag,
}

/// Downloads `artifact` under the output root. Blocking.
pub(super) fn download_artifact(ctx: &TaskContext, artifact: &Artifact) -> Result<ArtifactFile, FetchError> {
    if ctx.cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }
    let destination = destination_path(&ctx.output_dir, &artifact.path)?;
    tracing::debug!(path = %artifact.path, url = %artifact.url, "downloading artifact");

    let mut sink = FileSink::new(&destination, &ctx.cancel);
    let request = Request::get(&artifact.url, &ctx.token).with_cancel(&ctx.cancel);
    let status = match ctx.transport.get(&request, &mut sink) {
        Ok(status) => status,
        Err(source) => {
            return Err(match sink.take_failure() {
                Some(failure) => failure,
                None if matches!(source, TransportError::Cancelled) => FetchError::Cancelled,
                None => FetchError::Request {
                    step: "load artifact",
                    source,
                },
            })
        }
    };
    if !is_success(status) {
        return Err(FetchError::response(status, sink.error_body()));
    }

    let bytes = sink.finish()?;
    tracing::debug!(path = %artifact.path, bytes, "artifact written");
    Ok(ArtifactFile { destination, bytes })
}
