//! Per-artifact results and the run summary.

use std::path::PathBuf;

use crate::artifact::Artifact;
use crate::error::FetchError;

/// File written for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub destination: PathBuf,
    pub bytes: u64,
}

/// Result of one dispatched artifact download.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub artifact: Artifact,
    pub result: Result<ArtifactFile, FetchError>,
}

/// Totals for a fully successful download run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub artifacts: usize,
    pub bytes: u64,
}

impl DownloadSummary {
    pub(super) fn record(&mut self, file: &ArtifactFile) {
        self.artifacts += 1;
        self.bytes += file.bytes;
    }
}
