//! Resolved file handles and the execution seam
//!
//! A [`FileHandle`] is what resolution produces: where the content lives, a
//! display basename, and an optional strategy name. How the content is
//! executed is up to an [`Executor`]. Resolution never looks at the strategy.

use crate::error::{RepoFileError, RepoFileResult};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Opaque execution strategy name, passed through to the executor untouched
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Strategy(String);

impl Strategy {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Strategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a handle's content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// File inside a cached clone
    Local(PathBuf),

    /// Content fetched from the remote API
    Remote(String),
}

/// A resolved file, owned by the caller
#[derive(Debug, Clone)]
pub struct FileHandle {
    source: ContentSource,
    basename: String,
    path: String,
    strategy: Option<Strategy>,
}

impl FileHandle {
    pub fn new(
        source: ContentSource,
        basename: impl Into<String>,
        path: impl Into<String>,
        strategy: Option<Strategy>,
    ) -> Self {
        Self {
            source,
            basename: basename.into(),
            path: path.into(),
            strategy,
        }
    }

    /// Content source
    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    /// `owner/project` of the repository the file came from
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Path inside the repository, as requested
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn strategy(&self) -> Option<&Strategy> {
        self.strategy.as_ref()
    }

    /// Local file backing this handle, if it came from a clone
    pub fn local_path(&self) -> Option<&Path> {
        match &self.source {
            ContentSource::Local(path) => Some(path),
            ContentSource::Remote(_) => None,
        }
    }

    /// Read the file content
    pub fn content(&self) -> RepoFileResult<String> {
        match &self.source {
            ContentSource::Local(path) => fs::read_to_string(path)
                .map_err(|e| RepoFileError::io(format!("reading {}", path.display()), e)),
            ContentSource::Remote(content) => Ok(content.clone()),
        }
    }

    /// Execute the file with `executor`
    pub fn run<E: Executor + ?Sized>(&self, executor: &E) -> RepoFileResult<E::Output> {
        executor.execute(self)
    }

    /// Execute the file and hand the result to `on_result` before returning it
    pub fn run_with<E, F>(&self, executor: &E, on_result: F) -> RepoFileResult<E::Output>
    where
        E: Executor + ?Sized,
        F: FnOnce(&E::Output),
    {
        let output = executor.execute(self)?;
        on_result(&output);
        Ok(output)
    }
}

/// Executes resolved files
pub trait Executor {
    type Output;

    fn execute(&self, file: &FileHandle) -> RepoFileResult<Self::Output>;
}
