//! Artifact records as returned by the listing API.

use serde::Deserialize;

/// One file produced by a job run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    /// Remote relative path; may start with the `~/` home placeholder.
    pub path: String,
    /// Download URL for the artifact body.
    pub url: String,
}

/// Body of `GET /api/v2/project/{slug}/{job}/artifacts`. Fields other than
/// `items` (pagination tokens, node indexes) are ignored.
#[derive(Debug, Deserialize)]
struct ArtifactListing {
    #[serde(default)]
    items: Option<Vec<Artifact>>,
}

/// Decodes a listing response body. A missing or `null` `items` is an empty listing.
pub fn decode_listing(body: &[u8]) -> Result<Vec<Artifact>, serde_json::Error> {
    let listing: ArtifactListing = serde_json::from_slice(body)?;
    Ok(listing.items.unwrap_or_default())
}
