//! Repository fetch primitive
//!
//! The cache store never shells out itself; it asks a [`RepoFetcher`] to
//! populate a destination directory. [`GitFetcher`] runs `git clone`.

use crate::error::{RepoFileError, RepoFileResult};
use crate::security::RepoRef;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

const TOKEN_REDACTION: &str = "<redacted>";

/// Credentials used to build an authenticated clone URL
#[derive(Clone)]
pub struct CloneCredentials {
    /// Git host, e.g. `github.com`
    pub host: String,
    /// OAuth token; anonymous clone when absent
    pub token: Option<String>,
}

impl CloneCredentials {
    /// Anonymous clone against a host
    pub fn anonymous(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: None,
        }
    }

    /// Build the clone URL for a repository
    pub fn clone_url(&self, repo: &RepoRef) -> CloneUrl {
        let path = format!("{}/{}/{}.git", self.host, repo.owner(), repo.project());
        match self.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => CloneUrl {
                url: format!("https://{}:x-oauth-basic@{}", token, path),
                redacted: format!("https://{}:x-oauth-basic@{}", TOKEN_REDACTION, path),
                secret: Some(token.to_string()),
            },
            None => CloneUrl {
                url: format!("https://{}", path),
                redacted: format!("https://{}", path),
                secret: None,
            },
        }
    }
}

impl std::fmt::Debug for CloneCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloneCredentials")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| TOKEN_REDACTION))
            .finish()
    }
}

/// A clone URL that may embed a token
#[derive(Clone)]
pub struct CloneUrl {
    url: String,
    redacted: String,
    secret: Option<String>,
}

impl CloneUrl {
    /// The URL to hand to git
    pub fn expose(&self) -> &str {
        &self.url
    }

    /// The URL safe for logs and error messages
    pub fn redacted(&self) -> &str {
        &self.redacted
    }

    /// Replace any occurrence of the token in `text`
    pub fn scrub(&self, text: &str) -> String {
        match &self.secret {
            Some(secret) => text.replace(secret.as_str(), TOKEN_REDACTION),
            None => text.to_string(),
        }
    }
}

impl std::fmt::Debug for CloneUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CloneUrl").field(&self.redacted).finish()
    }
}

/// Populates a directory with the contents of a remote repository
pub trait RepoFetcher {
    /// Fetch `url` into `dest`. `dest` does not exist when this is called.
    fn fetch(&self, url: &CloneUrl, dest: &Path) -> RepoFileResult<()>;
}

/// Fetches repositories with a shallow `git clone`
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl RepoFetcher for GitFetcher {
    fn fetch(&self, url: &CloneUrl, dest: &Path) -> RepoFileResult<()> {
        debug!("git clone {} {}", url.redacted(), dest.display());

        let output = Command::new("git")
            .args(["clone", "--depth", "1", "--quiet", url.expose()])
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| RepoFileError::CloneFailed {
                repo: url.redacted().to_string(),
                reason: format!("could not run git: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RepoFileError::CloneFailed {
                repo: url.redacted().to_string(),
                reason: url.scrub(stderr.trim()),
            });
        }

        Ok(())
    }
}
