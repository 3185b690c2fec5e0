//! artfetch core: download the artifacts of a CI job run.
//!
//! The job URL is turned into an artifact-listing request ([`locator`]), and
//! the listed artifacts are fetched concurrently under a fixed worker budget
//! ([`downloader`]), each written below the output directory at its remote
//! relative path.

pub mod config;
pub mod logging;

pub mod artifact;
pub mod budget;
pub mod cancel;
pub mod downloader;
pub mod error;
pub mod fetch;
pub mod http;
pub mod job;
pub mod layout;
pub mod locator;

pub use artifact::Artifact;
pub use config::{RunConfig, RunMode};
pub use error::FetchError;
pub use fetch::{fetch_job_artifacts, FetchReport};

#[cfg(test)]
pub(crate) mod testing;
