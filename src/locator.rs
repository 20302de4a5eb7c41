//! Repository and file identifier parsing
//!
//! Accepts the raw `owner/project[/path]` form or a GitHub web URL:
//!
//! | Input | Owner | Project | Path |
//! |-------|-------|---------|------|
//! | `acme/widgets` | acme | widgets | - |
//! | `https://github.com/acme/widgets/` | acme | widgets | - |
//! | `github.com/acme/widgets/scripts/run.rb` | acme | widgets | scripts/run.rb |
//!
//! Parsing has no side effects. A parsed identifier is not yet trusted: it
//! becomes a [`RepoRef`](crate::security::RepoRef) only after passing the
//! owner whitelist.

use crate::error::{IdentifierKind, RepoFileError, RepoFileResult};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static REPO_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A(?:(?:https?://)?github\.com/)?([a-z0-9_.\-]+)/([a-z0-9_.\-]+)/?\z")
        .expect("repo identifier pattern is valid")
});

static FILE_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\A(?:(?:https?://)?github\.com/)?([a-z0-9_.\-]+)/([a-z0-9_.\-]+)/([a-z0-9_.\-]+(?:/[a-z0-9_.\-]+)*)\z",
    )
    .expect("file identifier pattern is valid")
});

/// An `owner/project` pair that parsed but has not passed the whitelist
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoIdentifier {
    owner: String,
    project: String,
}

impl RepoIdentifier {
    /// Repository owner (user or organization)
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn project(&self) -> &str {
        &self.project
    }
}

impl fmt::Display for RepoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.project)
    }
}

/// A repository identifier plus a path inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentifier {
    /// The repository part
    pub repo: RepoIdentifier,
    /// Slash-separated path, exactly as written
    pub path: String,
}

/// Parse `owner/project`, optionally prefixed with `http(s)://github.com/`
/// and optionally followed by a trailing slash.
pub fn parse_repo_identifier(input: &str) -> RepoFileResult<RepoIdentifier> {
    let caps = REPO_IDENTIFIER
        .captures(input)
        .ok_or_else(|| RepoFileError::invalid_identifier(input, IdentifierKind::Repo))?;

    build_repo(input, &caps[1], &caps[2], IdentifierKind::Repo)
}

/// Parse `owner/project/path`, with the same prefix rules as
/// [`parse_repo_identifier`]. The path is captured verbatim: `.` and `..`
/// segments are kept.
pub fn parse_file_identifier(input: &str) -> RepoFileResult<FileIdentifier> {
    let caps = FILE_IDENTIFIER
        .captures(input)
        .ok_or_else(|| RepoFileError::invalid_identifier(input, IdentifierKind::File))?;

    let repo = build_repo(input, &caps[1], &caps[2], IdentifierKind::File)?;
    Ok(FileIdentifier {
        repo,
        path: caps[3].to_string(),
    })
}

/// True when every segment of `path` is a plain name: no empty, `.` or
/// `..` segments. Only such paths stay inside the repository when joined
/// onto a URL.
pub fn is_normal_path(path: &str) -> bool {
    !path.is_empty() && path.split('/').all(|seg| !matches!(seg, "" | "." | ".."))
}

// `.` and `..` match the character class but would alias or escape the
// cache directory layout.
fn build_repo(
    input: &str,
    owner: &str,
    project: &str,
    kind: IdentifierKind,
) -> RepoFileResult<RepoIdentifier> {
    if [owner, project].iter().any(|c| *c == "." || *c == "..") {
        return Err(RepoFileError::invalid_identifier(input, kind));
    }

    Ok(RepoIdentifier {
        owner: owner.to_string(),
        project: project.to_string(),
    })
}
