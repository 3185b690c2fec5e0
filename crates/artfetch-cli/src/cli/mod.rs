//! CLI for artfetch.

mod run;

use anyhow::Result;
use artfetch_core::config::{self, ArtfetchConfig};
use artfetch_core::{FetchError, RunConfig, RunMode};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use run::run_fetch;

/// Download the artifacts of a CI job run.
#[derive(Debug, Parser)]
#[command(name = "artfetch", version)]
#[command(about = "Download the artifacts of a CI job run", long_about = None)]
pub struct Cli {
    /// API token sent with every request (falls back to `token` in config.toml).
    #[arg(short = 'a', long = "token", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Directory to write all artifacts to.
    #[arg(short = 'd', long = "dir", value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Only print artifact URLs; do not download them.
    #[arg(short = 'p', long = "print-only")]
    pub print_only: bool,

    /// Download at most N artifacts at once (default from config.toml, 16).
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// URL of the job run, e.g. https://app.circleci.com/pipelines/gh/org/repo/12/workflows/<id>/jobs/34
    #[arg(value_name = "JOB_URL")]
    pub job_url: Option<String>,
}

impl Cli {
    /// Parse process arguments and run. `--help` and `--version` print and exit here;
    /// every other parse failure is returned as an argument error.
    pub async fn run_from_args() -> Result<()> {
        let cli = match Cli::try_parse() {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => return Err(FetchError::Argument(clap_message(&e)).into()),
        };
        let cfg = config::load_or_default()?;
        tracing::debug!(
            max_concurrent_downloads = cfg.max_concurrent_downloads,
            connect_timeout_secs = cfg.connect_timeout_secs,
            "loaded config"
        );

        let (job_url, run_config) = cli.run_config(&cfg)?;
        run_fetch(&job_url, &run_config, &cfg).await
    }

    /// Resolve flags against the config file into the job URL and run settings.
    pub fn run_config(&self, cfg: &ArtfetchConfig) -> Result<(String, RunConfig), FetchError> {
        let token = self
            .token
            .clone()
            .or_else(|| cfg.token.clone())
            .unwrap_or_default();
        let mode = if self.print_only {
            RunMode::PrintUrls
        } else {
            RunMode::Download
        };
        let run_config = RunConfig::new(token, self.dir.clone())
            .with_mode(mode)
            .with_workers(self.jobs.unwrap_or(cfg.max_concurrent_downloads));
        run_config.validate()?;

        match &self.job_url {
            Some(url) => Ok((url.clone(), run_config)),
            None => Err(FetchError::Argument(
                "expected exactly 1 URL argument, got 0".to_string(),
            )),
        }
    }

    /// Help text printed after an error.
    pub fn usage() -> String {
        Cli::command().render_help().to_string()
    }
}

/// First line of a clap error, without clap's own `error: ` prefix.
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}
