//! GitHub token provider
//!
//! Precedence: explicit token (flag or env), `github.oauth_token` from the
//! config file, then `gh auth token`. No token at all is fine for public
//! repositories.

use crate::config::schema::GithubConfig;
use crate::error::{RepoFileError, RepoFileResult};
use std::process::{Command, Stdio};
use tracing::debug;

/// GitHub credential provider
pub struct GithubCredentials;

impl GithubCredentials {
    /// Pick the token to use for API calls and clones
    pub fn resolve(explicit: Option<String>, config: &GithubConfig) -> Option<String> {
        if let Some(token) = non_empty(explicit) {
            debug!("Using GitHub token from command line or environment");
            return Some(token);
        }

        if let Some(token) = non_empty(config.oauth_token.clone()) {
            debug!("Using GitHub token from config file");
            return Some(token);
        }

        match Self::get_token(config) {
            Ok(token) => {
                debug!("Using GitHub token from gh CLI");
                Some(token)
            }
            Err(e) => {
                debug!("No GitHub token available ({}), continuing anonymously", e);
                None
            }
        }
    }

    /// Get GitHub token from gh CLI
    pub fn get_token(config: &GithubConfig) -> RepoFileResult<String> {
        debug!("Getting GitHub token from gh CLI...");

        let mut cmd = Command::new("gh");
        cmd.args(["auth", "token"]);

        if config.host != "github.com" {
            cmd.args(["--hostname", &config.host]);
        }

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| RepoFileError::command_failed("gh auth token", e))?;

        token_from_gh_output(output.status.success(), &output.stdout, &output.stderr)
    }
}

/// Interpret the result of `gh auth token`
fn token_from_gh_output(success: bool, stdout: &[u8], stderr: &[u8]) -> RepoFileResult<String> {
    if !success {
        let stderr = String::from_utf8_lossy(stderr);
        if stderr.contains("not logged in") || stderr.contains("gh auth login") {
            return Err(RepoFileError::GithubNotAuthenticated);
        }
        return Err(RepoFileError::User(format!(
            "gh auth token failed: {}",
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(stdout).trim().to_string();

    if token.is_empty() {
        return Err(RepoFileError::GithubNotAuthenticated);
    }

    Ok(token)
}

fn non_empty(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
