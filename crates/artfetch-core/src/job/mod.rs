//! Job URL model.
//!
//! Turns the dashboard URL of a single job run into the identifiers the
//! artifact-listing API needs: the project slug (`gh/org/repo`) and the job
//! number. Both dashboard (`app.` host) and bare API host URLs are accepted.

mod endpoint;

pub use endpoint::listing_endpoint;

const PIPELINES: &str = "/pipelines";
const WORKFLOWS: &str = "/workflows";
const JOBS: &str = "/jobs/";

/// Why a job URL could not be turned into a listing endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("could not find substring '{marker}': {url}")]
    MissingMarker { marker: &'static str, url: String },

    #[error("could not find project slug between '/pipelines/' and '/workflows': {url}")]
    MissingSlug { url: String },

    #[error("job id {value:?} was not a number")]
    JobNumber { value: String },

    #[error("invalid url {url}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Project slug and job number of one job run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReference {
    pub project_slug: String,
    pub job_number: u64,
    /// The job number's digits exactly as they appear in the URL.
    pub job_id: String,
}

impl JobReference {
    /// Extracts the slug and job number from a job URL such as
    /// `https://app.example.com/pipelines/gh/org/repo/1234/workflows/abcd/jobs/77`.
    ///
    /// The slug is everything after `/pipelines/` up to the last `/` before
    /// `/workflows` (the pipeline number is dropped). The job number runs from
    /// `/jobs/` to the next `/`, `?`, `#` or the end of the string.
    pub fn parse(url: &str) -> Result<Self, ParseError> {
        let pipelines = find_marker(url, PIPELINES)?;
        let workflows = find_marker(url, WORKFLOWS)?;

        let slug_start = pipelines + PIPELINES.len() + 1;
        let slug_end = url[..workflows].rfind('/');
        let project_slug = match slug_end.and_then(|end| url.get(slug_start..end)) {
            Some(slug) if !slug.is_empty() => slug,
            _ => {
                return Err(ParseError::MissingSlug {
                    url: url.to_string(),
                })
            }
        };

        let jobs = find_marker(url, JOBS)?;
        let rest = &url[jobs + JOBS.len()..];
        let value = rest
            .split(|c: char| c == '/' || c == '?' || c == '#')
            .next()
            .unwrap_or_default();
        let digits_only = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
        let job_number = value
            .parse::<u64>()
            .ok()
            .filter(|_| digits_only)
            .ok_or_else(|| ParseError::JobNumber {
                value: value.to_string(),
            })?;

        Ok(Self {
            project_slug: project_slug.to_string(),
            job_number,
            job_id: value.to_string(),
        })
    }

    /// Path of the artifact-listing resource for this job.
    pub fn listing_path(&self) -> String {
        format!(
            "/api/v2/project/{}/{}/artifacts",
            self.project_slug, self.job_id
        )
    }
}

fn find_marker(url: &str, marker: &'static str) -> Result<usize, ParseError> {
    url.find(marker).ok_or_else(|| ParseError::MissingMarker {
        marker,
        url: url.to_string(),
    })
}
