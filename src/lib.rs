//! repofile - resolve files from whitelisted GitHub repositories
//!
//! Parses `owner/project/path` references (or GitHub URLs), checks the owner
//! against a whitelist, then reads the file from a local clone when one is
//! cached or from the GitHub API otherwise.

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod github;
pub mod handle;
pub mod locator;
pub mod resolver;
pub mod security;
pub mod ui;

pub use error::{RepoFileError, RepoFileResult};
pub use handle::{ContentSource, Executor, FileHandle, Strategy};
pub use locator::{parse_file_identifier, parse_repo_identifier, FileIdentifier, RepoIdentifier};
pub use resolver::Resolver;
pub use security::{FileRef, RepoRef, Whitelist};
