//! Listing endpoint construction.

use url::Url;

use super::{JobReference, ParseError};

/// Builds the artifact-listing URL on the same scheme, host and port as
/// `job_url`, dropping a leading `app.` from the host and any query/fragment.
pub fn listing_endpoint(job_url: &str, job: &JobReference) -> Result<Url, ParseError> {
    let invalid = |source| ParseError::Url {
        url: job_url.to_string(),
        source,
    };
    let mut url = Url::parse(job_url).map_err(invalid)?;

    let api_host = url
        .host_str()
        .and_then(|host| host.strip_prefix("app."))
        .map(str::to_string);
    if let Some(host) = api_host {
        url.set_host(Some(&host)).map_err(invalid)?;
    }

    url.set_path(&job.listing_path());
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
