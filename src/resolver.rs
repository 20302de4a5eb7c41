//! File resolution
//!
//! Ties the pieces together: identifiers are parsed, owners are checked
//! against the whitelist, then a file is read from a valid clone or fetched
//! from the remote API. Plain resolution never clones; cloning is an explicit
//! operation.

use crate::cache::{CacheStore, CloneCredentials, GitFetcher};
use crate::config::Config;
use crate::error::{RepoFileError, RepoFileResult};
use crate::github::{GithubClient, RemoteClient, RepoMetadata};
use crate::handle::{ContentSource, Executor, FileHandle, Strategy};
use crate::locator::{is_normal_path, parse_file_identifier, parse_repo_identifier};
use crate::security::{FileRef, RepoRef, Whitelist};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves repository files through the cache or the remote API
pub struct Resolver {
    whitelist: Whitelist,
    cache: CacheStore,
    remote: Box<dyn RemoteClient>,
    credentials: CloneCredentials,
}

impl Resolver {
    pub fn new(
        whitelist: Whitelist,
        cache: CacheStore,
        remote: impl RemoteClient + 'static,
        credentials: CloneCredentials,
    ) -> Self {
        Self {
            whitelist,
            cache,
            remote: Box::new(remote),
            credentials,
        }
    }

    /// Build the production resolver from configuration.
    ///
    /// `token` authenticates both API calls and clones.
    pub fn from_config(config: &Config, token: Option<String>) -> Self {
        let credentials = CloneCredentials {
            host: config.github.host.clone(),
            token: token.clone(),
        };

        Self::new(
            Whitelist::from_config(&config.security),
            CacheStore::new(config.cache.root_dir(), GitFetcher),
            GithubClient::new(&config.github, token),
            credentials,
        )
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Parse a repo identifier and check its owner
    pub fn repo(&self, identifier: &str) -> RepoFileResult<RepoRef> {
        let id = parse_repo_identifier(identifier)?;
        self.whitelist.admit(&id)
    }

    /// Parse a file identifier and check its owner
    pub fn file_ref(&self, identifier: &str) -> RepoFileResult<FileRef> {
        let id = parse_file_identifier(identifier)?;
        self.whitelist.admit_file(&id)
    }

    /// Resolve `path` inside `repo`.
    ///
    /// Reads from the clone when one is valid, otherwise asks the remote API.
    /// The strategy is attached to the handle as given.
    pub fn resolve_file(
        &self,
        repo: &RepoRef,
        path: &str,
        strategy: Option<Strategy>,
    ) -> RepoFileResult<FileHandle> {
        let basename = repo.to_string();

        if self.cache.is_valid(repo) {
            debug!("Reading {} from cached clone of {}", path, repo);
            let local = self.local_file(repo, path)?;
            return Ok(FileHandle::new(
                ContentSource::Local(local),
                basename,
                path,
                strategy,
            ));
        }

        // Dot segments in the API URL would address another repository
        if !is_normal_path(path) {
            return Err(RepoFileError::FileNotFound(PathBuf::from(path)));
        }

        debug!("No valid clone of {}, fetching {} remotely", repo, path);
        let content = self.remote.file_contents(repo, path)?;
        Ok(FileHandle::new(
            ContentSource::Remote(content),
            basename,
            path,
            strategy,
        ))
    }

    /// Parse, check and resolve a file identifier in one step
    pub fn file(&self, identifier: &str, strategy: Option<Strategy>) -> RepoFileResult<FileHandle> {
        let file = self.file_ref(identifier)?;
        self.resolve_file(&file.repo, &file.path, strategy)
    }

    /// Resolve then execute
    pub fn run_file<E>(
        &self,
        repo: &RepoRef,
        path: &str,
        strategy: Option<Strategy>,
        executor: &E,
    ) -> RepoFileResult<E::Output>
    where
        E: Executor + ?Sized,
    {
        self.resolve_file(repo, path, strategy)?.run(executor)
    }

    /// Resolve then execute, forwarding the result to `on_result`
    pub fn run_file_with<E, F>(
        &self,
        repo: &RepoRef,
        path: &str,
        strategy: Option<Strategy>,
        executor: &E,
        on_result: F,
    ) -> RepoFileResult<E::Output>
    where
        E: Executor + ?Sized,
        F: FnOnce(&E::Output),
    {
        self.resolve_file(repo, path, strategy)?
            .run_with(executor, on_result)
    }

    /// Parse, check, resolve and execute a file identifier
    pub fn run<E>(
        &self,
        identifier: &str,
        strategy: Option<Strategy>,
        executor: &E,
    ) -> RepoFileResult<E::Output>
    where
        E: Executor + ?Sized,
    {
        self.file(identifier, strategy)?.run(executor)
    }

    /// Repository metadata from the remote API
    pub fn metadata(&self, repo: &RepoRef) -> RepoFileResult<RepoMetadata> {
        self.remote.get_repo(repo)
    }

    /// Clone `repo` into the cache; it stays until destroyed
    pub fn clone_repo(&self, repo: &RepoRef) -> RepoFileResult<PathBuf> {
        self.cache.clone_repo(repo, &self.credentials)
    }

    /// Clone `repo`, run `body`, then remove the clone
    pub fn with_clone<T, F>(&self, repo: &RepoRef, body: F) -> RepoFileResult<T>
    where
        F: FnOnce(&Path) -> RepoFileResult<T>,
    {
        self.cache.with_clone(repo, &self.credentials, body)
    }

    /// Remove `repo`'s clone
    pub fn destroy(&self, repo: &RepoRef) -> RepoFileResult<()> {
        self.cache.destroy(repo)
    }

    // Paths that leave the clone directory count as missing.
    fn local_file(&self, repo: &RepoRef, path: &str) -> RepoFileResult<PathBuf> {
        let root = self.cache.cache_path_for(repo);
        let candidate = root.join(path);

        if !candidate.is_file() {
            return Err(RepoFileError::FileNotFound(candidate));
        }

        let inside = match (candidate.canonicalize(), root.canonicalize()) {
            (Ok(file), Ok(root)) => file.starts_with(root),
            _ => false,
        };
        if !inside {
            return Err(RepoFileError::FileNotFound(candidate));
        }

        Ok(candidate)
    }
}
