//! Blocking GitHub REST client

use crate::config::schema::GithubConfig;
use crate::error::{RepoFileError, RepoFileResult};
use crate::github::{RemoteClient, RepoMetadata};
use crate::locator::is_normal_path;
use crate::security::RepoRef;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

const USER_AGENT: &str = concat!("repofile/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// GitHub REST API client
pub struct GithubClient {
    agent: Agent,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client from the `[github]` config section
    pub fn new(config: &GithubConfig, token: Option<String>) -> Self {
        let agent = Agent::new_with_config(
            Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
                .build(),
        );

        Self {
            agent,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn repo_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}", self.api_url, repo.owner(), repo.project())
    }

    fn contents_url(&self, repo: &RepoRef, path: &str) -> String {
        format!(
            "{}/contents/{}",
            self.repo_url(repo),
            path.trim_start_matches('/')
        )
    }

    fn get(&self, url: &str, accept: &str, target: &str) -> RepoFileResult<String> {
        debug!("GET {}", url);

        let mut request = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let mut response = request.call().map_err(|e| fetch_failed(target, e))?;
        response
            .body_mut()
            .read_to_string()
            .map_err(|e| fetch_failed(target, e))
    }
}

impl RemoteClient for GithubClient {
    fn get_repo(&self, repo: &RepoRef) -> RepoFileResult<RepoMetadata> {
        let body = self.get(
            &self.repo_url(repo),
            "application/vnd.github+json",
            &repo.to_string(),
        )?;
        Ok(serde_json::from_str(&body)?)
    }

    fn file_contents(&self, repo: &RepoRef, path: &str) -> RepoFileResult<String> {
        let target = format!("{}/{}", repo, path);

        // Dot segments are not normalized before sending and would leave the repository
        if !is_normal_path(path) {
            return Err(RepoFileError::RemoteFetchFailed {
                target,
                detail: "path must be relative without '.', '..' or empty segments".to_string(),
            });
        }

        let body = self.get(
            &self.contents_url(repo, path),
            "application/vnd.github.raw+json",
            &target,
        )?;

        if is_directory_listing(&body) {
            return Err(RepoFileError::RemoteFetchFailed {
                target,
                detail: "path names a directory, not a file".to_string(),
            });
        }

        Ok(body)
    }
}

/// One entry of the contents API's directory response
#[derive(Deserialize)]
struct ListingEntry {
    #[serde(rename = "type")]
    kind: String,
    #[allow(dead_code)]
    sha: String,
    #[allow(dead_code)]
    path: String,
}

// Directories come back as a JSON array of entries even with the raw media type
fn is_directory_listing(body: &str) -> bool {
    match serde_json::from_str::<Vec<ListingEntry>>(body) {
        Ok(entries) => {
            !entries.is_empty()
                && entries
                    .iter()
                    .all(|e| matches!(e.kind.as_str(), "file" | "dir" | "symlink" | "submodule"))
        }
        Err(_) => false,
    }
}

fn fetch_failed(target: &str, err: ureq::Error) -> RepoFileError {
    let detail = match err {
        ureq::Error::StatusCode(code) => format!("server returned status {}", code),
        other => format!("transport error: {}", other),
    };
    RepoFileError::RemoteFetchFailed {
        target: target.to_string(),
        detail,
    }
}
