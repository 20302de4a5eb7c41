//! Owner whitelist
//!
//! The whitelist is the only way to obtain a [`RepoRef`]. Every cache or
//! network operation takes a `RepoRef`, so an owner that is not whitelisted
//! cannot reach the cache store or the remote API.

use crate::config::schema::SecurityConfig;
use crate::error::{RepoFileError, RepoFileResult};
use crate::locator::{FileIdentifier, RepoIdentifier};
use std::collections::HashSet;
use std::fmt;

/// A repository whose owner passed the whitelist
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: String,
    project: String,
}

impl RepoRef {
    /// Repository owner (user or organization)
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn project(&self) -> &str {
        &self.project
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.project)
    }
}

/// A file inside a whitelisted repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub repo: RepoRef,
    pub path: String,
}

/// Set of owners allowed to have their code fetched
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    owners: HashSet<String>,
    case_sensitive: bool,
}

impl Whitelist {
    /// Build a whitelist from owner names
    pub fn new<I, S>(owners: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let owners = owners
            .into_iter()
            .map(Into::into)
            .map(|o: String| if case_sensitive { o } else { o.to_lowercase() })
            .collect();

        Self {
            owners,
            case_sensitive,
        }
    }

    /// Build a whitelist from the `[security]` config section
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.owners.iter().cloned(), config.case_sensitive)
    }

    /// Check whether an owner is whitelisted
    pub fn contains(&self, owner: &str) -> bool {
        if self.case_sensitive {
            self.owners.contains(owner)
        } else {
            self.owners.contains(&owner.to_lowercase())
        }
    }

    /// Fail with `OwnerNotWhitelisted` unless the owner is whitelisted
    pub fn ensure_whitelisted(&self, owner: &str) -> RepoFileResult<()> {
        if self.contains(owner) {
            Ok(())
        } else {
            Err(RepoFileError::OwnerNotWhitelisted {
                owner: owner.to_string(),
            })
        }
    }

    /// Turn a parsed identifier into a trusted `RepoRef`
    pub fn admit(&self, id: &RepoIdentifier) -> RepoFileResult<RepoRef> {
        self.ensure_whitelisted(id.owner())?;
        Ok(RepoRef {
            owner: id.owner().to_string(),
            project: id.project().to_string(),
        })
    }

    /// Turn a parsed file identifier into a trusted `FileRef`
    pub fn admit_file(&self, id: &FileIdentifier) -> RepoFileResult<FileRef> {
        Ok(FileRef {
            repo: self.admit(&id.repo)?,
            path: id.path.clone(),
        })
    }

    /// Number of whitelisted owners
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no owner is whitelisted
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
