//! Bounded concurrent artifact downloader.
//!
//! One task per artifact is spawned up front; each waits for a permit from the
//! shared [`WorkerBudget`], then runs its blocking transfer on the blocking
//! pool. Outcomes are collected in completion order. The first failure raises
//! the run's cancel flag and closes the budget: queued tasks give up without
//! touching the network, in-flight transfers stop at their next callback, and
//! the remaining tasks are drained before the failure is returned.

mod artifact;
mod outcome;
mod sink;

pub use outcome::{ArtifactFile, DownloadOutcome, DownloadSummary};

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::artifact::Artifact;
use crate::budget::WorkerBudget;
use crate::cancel::CancelFlag;
use crate::config::RunConfig;
use crate::error::{FetchError, Result};
use crate::http::SharedTransport;

use self::artifact::{download_artifact, TaskContext};

pub struct Downloader {
    transport: SharedTransport,
    token: String,
    output_dir: PathBuf,
    workers: usize,
}

impl Downloader {
    pub fn new(transport: SharedTransport, config: &RunConfig) -> Self {
        Self {
            transport,
            token: config.token.clone(),
            output_dir: config.output_dir.clone(),
            workers: config.workers,
        }
    }

    /// Download URLs in listing order; used instead of downloading in print-only mode.
    pub fn urls(artifacts: &[Artifact]) -> Vec<String> {
        artifacts.iter().map(|a| a.url.clone()).collect()
    }

    /// Downloads every artifact, at most `workers` at a time.
    ///
    /// Each successful outcome is forwarded to `progress_tx` as it completes.
    /// Returns the first failure, wrapped with the artifact's path.
    pub async fn download_all(
        &self,
        artifacts: Vec<Artifact>,
        progress_tx: Option<mpsc::Sender<DownloadOutcome>>,
    ) -> Result<DownloadSummary> {
        let budget = WorkerBudget::new(self.workers);
        let ctx = TaskContext {
            transport: self.transport.clone(),
            token: self.token.clone(),
            output_dir: self.output_dir.clone(),
            cancel: CancelFlag::new(),
        };
        tracing::info!(
            count = artifacts.len(),
            workers = budget.capacity(),
            output_dir = %self.output_dir.display(),
            "downloading artifacts"
        );

        let mut join_set = JoinSet::new();
        for artifact in artifacts {
            join_set.spawn(run_task(ctx.clone(), budget.clone(), artifact));
        }

        let mut summary = DownloadSummary::default();
        while let Some(joined) = join_set.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    abort_run(&ctx.cancel, &budget, &mut join_set, progress_tx.as_ref()).await;
                    return Err(FetchError::Join(e));
                }
            };
            match outcome.result {
                Ok(file) => {
                    summary.record(&file);
                    if let Some(tx) = &progress_tx {
                        let done = DownloadOutcome {
                            artifact: outcome.artifact,
                            result: Ok(file),
                        };
                        let _ = tx.send(done).await;
                    }
                }
                Err(source) => {
                    tracing::warn!(path = %outcome.artifact.path, error = %source, "artifact download failed");
                    abort_run(&ctx.cancel, &budget, &mut join_set, progress_tx.as_ref()).await;
                    return Err(FetchError::artifact(&outcome.artifact.path, source));
                }
            }
        }

        tracing::info!(
            artifacts = summary.artifacts,
            bytes = summary.bytes,
            "all artifacts downloaded"
        );
        Ok(summary)
    }
}

/// Per-artifact task: permit, blocking transfer, outcome. The permit is held
/// by the blocking closure so it is released only once the transfer is over.
async fn run_task(ctx: TaskContext, budget: WorkerBudget, artifact: Artifact) -> DownloadOutcome {
    let permit = match budget.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            return DownloadOutcome {
                artifact,
                result: Err(e),
            }
        }
    };

    let task_artifact = artifact.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        download_artifact(&ctx, &task_artifact)
    })
    .await
    .unwrap_or_else(|e| Err(FetchError::Join(e)));

    DownloadOutcome { artifact, result }
}

/// Stop the run and wait for every remaining task to wind down. Transfers
/// that still completed are reported like any other success.
async fn abort_run(
    cancel: &CancelFlag,
    budget: &WorkerBudget,
    join_set: &mut JoinSet<DownloadOutcome>,
    progress_tx: Option<&mpsc::Sender<DownloadOutcome>>,
) {
    cancel.cancel();
    budget.close();
    let mut stopped = 0usize;
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(outcome) if outcome.result.is_ok() => {
                if let Some(tx) = progress_tx {
                    let _ = tx.send(outcome).await;
                }
            }
            Ok(DownloadOutcome {
                artifact,
                result: Err(e),
            }) if !e.is_cancelled() => {
                tracing::warn!(path = %artifact.path, error = %e, "artifact also failed");
            }
            _ => stopped += 1,
        }
    }
    tracing::debug!(stopped, "remaining artifact tasks drained");
}
