//! Fetching of the remote patch manifest.

use std::fmt::Display;

use const_format::formatcp;

use crate::models::CatalogEntry;

/// The pinned release of the patch manifest. Patch semantics can change
/// between releases, so the agent always fetches a fixed version.
const CATALOG_VERSION: &str = "v2.186.0";

const CATALOG_URL: &str = formatcp!(
    "https://raw.githubusercontent.com/ReVanced/revanced-patches/{CATALOG_VERSION}/patches.json"
);

/// We separate this out into an enum as the caller degrades differently
/// depending on whether the manifest couldn't be *fetched* or couldn't be
/// *understood*: a fetch failure usually means no internet access.
#[derive(Debug)]
pub enum CatalogError {
    /// The server answered with a non-success status code.
    Status(u16),
    /// The request could not be carried out at all.
    Transport(anyhow::Error),
    /// The response body was not a valid patch manifest.
    Parse(anyhow::Error),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "Patch manifest request gave status {code}"),
            Self::Transport(e) => write!(f, "Failed to download patch manifest: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse patch manifest: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Performs one GET for the pinned patch manifest and parses the body as a
/// list of [CatalogEntry]. Any status other than 200 is an error; there is no
/// retry and no caching, as the manifest is fetched once per process start.
pub fn fetch_catalog(agent: &ureq::Agent) -> Result<Vec<CatalogEntry>, CatalogError> {
    fetch_catalog_from(agent, CATALOG_URL)
}

/// As [fetch_catalog], but from an arbitrary URL. Useful for pointing the
/// agent at a locally hosted manifest during development.
pub fn fetch_catalog_from(agent: &ureq::Agent, url: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => return Err(CatalogError::Status(code)),
        Err(err) => return Err(CatalogError::Transport(err.into())),
    };

    let body = match response.into_string() {
        Ok(body) => body,
        Err(err) => return Err(CatalogError::Transport(err.into())),
    };

    match serde_json::from_str(&body) {
        Ok(entries) => Ok(entries),
        Err(err) => Err(CatalogError::Parse(err.into())),
    }
}
