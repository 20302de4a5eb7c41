//! Error types for repofile
//!
//! All modules use `RepoFileResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repofile operations
pub type RepoFileResult<T> = Result<T, RepoFileError>;

/// Which identifier form a parse expected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// `owner/project`
    Repo,
    /// `owner/project/path`
    File,
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo => write!(f, "repo identifier"),
            Self::File => write!(f, "file identifier"),
        }
    }
}

/// All errors that can occur in repofile
#[derive(Error, Debug)]
pub enum RepoFileError {
    // Resolution errors
    #[error("'{input}' is not a valid {kind}")]
    InvalidIdentifier { input: String, kind: IdentifierKind },

    #[error("Code from '{owner}' has not been whitelisted for execution. Add them to the security.owners whitelist.")]
    OwnerNotWhitelisted { owner: String },

    #[error("Failed to clone {repo}: {reason}")]
    CloneFailed { repo: String, reason: String },

    #[error("Failed to fetch {target} from the remote API: {detail}")]
    RemoteFetchFailed { target: String, detail: String },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // Credential errors
    #[error("GitHub CLI not authenticated. Run: gh auth login")]
    GithubNotAuthenticated,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl RepoFileError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(input: impl Into<String>, kind: IdentifierKind) -> Self {
        Self::InvalidIdentifier {
            input: input.into(),
            kind,
        }
    }

    /// Check if error is retryable
    ///
    /// Only upstream failures qualify. Caller errors and security rejections
    /// need a different input or a configuration change.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CloneFailed { .. } | Self::RemoteFetchFailed { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidIdentifier { .. } => {
                Some("Use owner/project[/path], optionally prefixed with https://github.com/")
            }
            Self::OwnerNotWhitelisted { .. } => {
                Some("Add the owner to security.owners in the config file")
            }
            Self::FileNotFound(_) => Some(
                "Use a plain relative path; if the clone is stale, run: repofile destroy <owner/project>",
            ),
            Self::GithubNotAuthenticated => Some("Run: gh auth login"),
            _ => None,
        }
    }
}
