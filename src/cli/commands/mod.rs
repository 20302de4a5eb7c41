//! CLI command implementations

pub mod clone;
pub mod config;
pub mod destroy;
pub mod fetch;
pub mod info;
pub mod status;

pub use clone::execute as clone;
pub use config::execute as config;
pub use destroy::execute as destroy;
pub use fetch::execute as fetch;
pub use info::execute as info;
pub use status::execute as status;

use crate::audit::{self, AuditLog};
use crate::cache::{CacheStore, GitFetcher};
use crate::config::Config;
use crate::credentials::GithubCredentials;
use crate::error::{RepoFileError, RepoFileResult};
use crate::locator::{parse_file_identifier, parse_repo_identifier};
use crate::resolver::Resolver;
use crate::security::{FileRef, RepoRef, Whitelist};

/// Build the resolver, resolving the GitHub token on the way
fn build_resolver(config: &Config, token: Option<String>) -> Resolver {
    let token = GithubCredentials::resolve(token, &config.github);
    Resolver::from_config(config, token)
}

/// Parse a repo identifier and check it against the whitelist.
///
/// Runs before the token lookup so a rejected owner triggers nothing else.
fn admit_repo(config: &Config, audit: &AuditLog, identifier: &str) -> RepoFileResult<RepoRef> {
    let id = parse_repo_identifier(identifier)?;
    audit_rejection(audit, Whitelist::from_config(&config.security).admit(&id))
}

/// Parse a file identifier and check it against the whitelist
fn admit_file(config: &Config, audit: &AuditLog, identifier: &str) -> RepoFileResult<FileRef> {
    let id = parse_file_identifier(identifier)?;
    audit_rejection(audit, Whitelist::from_config(&config.security).admit_file(&id))
}

/// Admit a repo and open the cache, for commands that only touch disk
fn local_repo(
    config: &Config,
    audit: &AuditLog,
    identifier: &str,
) -> RepoFileResult<(RepoRef, CacheStore)> {
    let repo = admit_repo(config, audit, identifier)?;
    Ok((repo, CacheStore::new(config.cache.root_dir(), GitFetcher)))
}

/// Record whitelist rejections in the audit log, passing the result through
fn audit_rejection<T>(audit: &AuditLog, result: RepoFileResult<T>) -> RepoFileResult<T> {
    if let Err(RepoFileError::OwnerNotWhitelisted { ref owner }) = result {
        audit.log(
            audit::SECURITY_REJECTED,
            &serde_json::json!({ "owner": owner }),
        );
    }
    result
}
