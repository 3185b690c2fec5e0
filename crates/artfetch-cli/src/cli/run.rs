//! Wires the curl transport and stdout reporting around a core run.

use anyhow::Result;
use artfetch_core::config::ArtfetchConfig;
use artfetch_core::downloader::DownloadOutcome;
use artfetch_core::http::{CurlTransport, SharedTransport};
use artfetch_core::{fetch_job_artifacts, FetchReport, RunConfig};
use std::sync::Arc;

pub async fn run_fetch(job_url: &str, config: &RunConfig, cfg: &ArtfetchConfig) -> Result<()> {
    let transport: SharedTransport = Arc::new(CurlTransport::new(cfg.connect_timeout()));

    // Confirmation lines are printed as artifacts complete, not at the end.
    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<DownloadOutcome>(16);
    let printer = tokio::spawn(async move {
        while let Some(outcome) = progress_rx.recv().await {
            println!("downloaded {}", outcome.artifact.url);
        }
    });

    let report = fetch_job_artifacts(job_url, config, transport, Some(progress_tx)).await;
    let _ = printer.await;

    match report? {
        FetchReport::Listed(urls) => {
            for url in urls {
                println!("{url}");
            }
        }
        FetchReport::Downloaded(summary) => {
            tracing::info!(
                "run completed: {} artifact(s), {} bytes",
                summary.artifacts,
                summary.bytes
            );
        }
    }
    Ok(())
}
