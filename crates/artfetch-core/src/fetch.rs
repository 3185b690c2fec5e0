//! End-to-end run: list a job's artifacts, then print or download them.

use tokio::sync::mpsc;

use crate::config::{RunConfig, RunMode};
use crate::downloader::{DownloadOutcome, DownloadSummary, Downloader};
use crate::error::{FetchError, Result};
use crate::http::SharedTransport;
use crate::locator::ArtifactLocator;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchReport {
    /// Print-only mode: artifact download URLs in listing order.
    Listed(Vec<String>),
    Downloaded(DownloadSummary),
}

/// Lists the artifacts of the job at `job_url` and handles them per `config.mode`.
///
/// The listing request runs on the blocking pool. No download is dispatched
/// unless the listing succeeded. Successful downloads are reported on
/// `progress_tx` as they complete.
pub async fn fetch_job_artifacts(
    job_url: &str,
    config: &RunConfig,
    transport: SharedTransport,
    progress_tx: Option<mpsc::Sender<DownloadOutcome>>,
) -> Result<FetchReport> {
    config.validate()?;

    let locator = ArtifactLocator::new(transport.clone(), config.token.clone());
    let url = job_url.to_string();
    let artifacts = tokio::task::spawn_blocking(move || locator.list_artifacts(&url))
        .await
        .map_err(FetchError::Join)??;

    match config.mode {
        RunMode::PrintUrls => Ok(FetchReport::Listed(Downloader::urls(&artifacts))),
        RunMode::Download => {
            let downloader = Downloader::new(transport, config);
            let summary = downloader.download_all(artifacts, progress_tx).await?;
            Ok(FetchReport::Downloaded(summary))
        }
    }
}
