//! Remote repository API
//!
//! The resolver only needs two calls from the forge: repository metadata and
//! the raw contents of one file. [`GithubClient`] implements them against
//! the GitHub REST API.

pub mod client;

pub use client::GithubClient;

use crate::error::RepoFileResult;
use crate::security::RepoRef;
use serde::{Deserialize, Serialize};

/// Repository metadata returned by the forge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    /// `owner/project` as the forge spells it
    pub full_name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub default_branch: String,

    #[serde(default)]
    pub private: bool,

    pub html_url: String,
}

/// Remote API operations used during resolution
pub trait RemoteClient {
    /// Fetch repository metadata
    fn get_repo(&self, repo: &RepoRef) -> RepoFileResult<RepoMetadata>;

    /// Fetch the contents of `path` on the default branch.
    ///
    /// Any non-success response is a `RemoteFetchFailed`.
    fn file_contents(&self, repo: &RepoRef, path: &str) -> RepoFileResult<String>;
}
