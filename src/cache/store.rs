//! Clone cache store
//!
//! One directory per repository at `{root}/{owner}/{project}`. A clone is
//! valid while its marker file is readable; the marker holds the Unix
//! timestamp of the clone as decimal text.

use crate::cache::fetcher::{CloneCredentials, RepoFetcher};
use crate::error::{RepoFileError, RepoFileResult};
use crate::security::RepoRef;
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Freshness marker written at the top of every clone
pub const MARKER_FILE: &str = ".repofile";

/// Contents of a clone's freshness marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheMarker {
    /// When the clone was created
    pub created_at: DateTime<Utc>,
}

impl CacheMarker {
    /// Parse marker text (decimal Unix seconds)
    pub fn parse(text: &str) -> Option<Self> {
        let secs: i64 = text.trim().parse().ok()?;
        DateTime::from_timestamp(secs, 0).map(|created_at| Self { created_at })
    }

    /// Time since the clone was created
    pub fn age(&self) -> Duration {
        Utc::now() - self.created_at
    }
}

/// Local clone cache
pub struct CacheStore {
    root: PathBuf,
    fetcher: Box<dyn RepoFetcher>,
}

impl CacheStore {
    /// Create a store rooted at `root` that clones with `fetcher`
    pub fn new(root: impl Into<PathBuf>, fetcher: impl RepoFetcher + 'static) -> Self {
        Self {
            root: root.into(),
            fetcher: Box::new(fetcher),
        }
    }

    /// Root directory holding all clones
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a repository's clone
    pub fn cache_path_for(&self, repo: &RepoRef) -> PathBuf {
        self.root.join(repo.owner()).join(repo.project())
    }

    fn marker_path(&self, repo: &RepoRef) -> PathBuf {
        self.cache_path_for(repo).join(MARKER_FILE)
    }

    /// Whether a usable clone exists. Read failures of any kind mean "no".
    pub fn is_valid(&self, repo: &RepoRef) -> bool {
        fs::read_to_string(self.marker_path(repo)).is_ok()
    }

    /// Parsed marker of an existing clone
    pub fn marker(&self, repo: &RepoRef) -> Option<CacheMarker> {
        let text = fs::read_to_string(self.marker_path(repo)).ok()?;
        CacheMarker::parse(&text)
    }

    /// Clone a repository into its cache directory, replacing any previous
    /// clone. The clone persists until [`destroy`](Self::destroy).
    pub fn clone_repo(
        &self,
        repo: &RepoRef,
        credentials: &CloneCredentials,
    ) -> RepoFileResult<PathBuf> {
        let path = self.cache_path_for(repo);
        let url = credentials.clone_url(repo);

        info!("Cloning {} into {}", repo, path.display());

        self.destroy(repo)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RepoFileError::io(format!("creating cache directory {}", parent.display()), e)
            })?;
        }

        if let Err(e) = self.fetcher.fetch(&url, &path) {
            if let Err(cleanup) = remove_dir_if_exists(&path) {
                warn!("Failed to remove partial clone of {}: {}", repo, cleanup);
            }
            return Err(match e {
                RepoFileError::CloneFailed { .. } => e,
                other => RepoFileError::CloneFailed {
                    repo: repo.to_string(),
                    reason: url.scrub(&other.to_string()),
                },
            });
        }

        // Cache holds file content only, no history
        remove_dir_if_exists(&path.join(".git"))?;

        let marker = path.join(MARKER_FILE);
        fs::write(&marker, Utc::now().timestamp().to_string()).map_err(|e| {
            RepoFileError::io(format!("writing cache marker {}", marker.display()), e)
        })?;

        Ok(path)
    }

    /// Clone, run `body` against the clone, then remove it.
    ///
    /// The clone is removed on every exit path: success, error from the
    /// clone or the body, and unwinding panics.
    pub fn with_clone<T, F>(
        &self,
        repo: &RepoRef,
        credentials: &CloneCredentials,
        body: F,
    ) -> RepoFileResult<T>
    where
        F: FnOnce(&Path) -> RepoFileResult<T>,
    {
        let _guard = CloneGuard { store: self, repo };
        let path = self.clone_repo(repo, credentials)?;
        body(&path)
    }

    /// Remove a repository's clone. Missing clones are not an error.
    pub fn destroy(&self, repo: &RepoRef) -> RepoFileResult<()> {
        let path = self.cache_path_for(repo);
        debug!("Removing clone at {}", path.display());
        remove_dir_if_exists(&path)
    }
}

struct CloneGuard<'a> {
    store: &'a CacheStore,
    repo: &'a RepoRef,
}

impl Drop for CloneGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.store.destroy(self.repo) {
            warn!("Failed to remove scoped clone of {}: {}", self.repo, e);
        }
    }
}

fn remove_dir_if_exists(path: &Path) -> RepoFileResult<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(RepoFileError::io(format!("removing {}", path.display()), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fetcher::CloneUrl;
    use crate::locator::parse_repo_identifier;
    use crate::security::Whitelist;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Writes a fixed file set plus a `.git` directory, recording each URL
    #[derive(Clone, Default)]
    struct FakeFetcher {
        files: Vec<(&'static str, &'static str)>,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl RepoFetcher for FakeFetcher {
        fn fetch(&self, url: &CloneUrl, dest: &Path) -> RepoFileResult<()> {
            self.calls.borrow_mut().push(url.redacted().to_string());
            fs::create_dir_all(dest.join(".git")).unwrap();
            fs::write(dest.join(".git").join("HEAD"), "ref: refs/heads/main").unwrap();
            for (name, content) in &self.files {
                let file = dest.join(name);
                fs::create_dir_all(file.parent().unwrap()).unwrap();
                fs::write(file, content).unwrap();
            }
            Ok(())
        }
    }

    /// Leaves a half-populated directory behind and fails
    struct BrokenFetcher;

    impl RepoFetcher for BrokenFetcher {
        fn fetch(&self, _url: &CloneUrl, dest: &Path) -> RepoFileResult<()> {
            fs::create_dir_all(dest).unwrap();
            fs::write(dest.join("partial"), "x").unwrap();
            Err(RepoFileError::User("remote hung up".to_string()))
        }
    }

    fn repo(id: &str) -> RepoRef {
        let id = parse_repo_identifier(id).unwrap();
        Whitelist::new([id.owner().to_string()], true)
            .admit(&id)
            .unwrap()
    }

    fn creds() -> CloneCredentials {
        CloneCredentials::anonymous("github.com")
    }

    fn store_with(files: Vec<(&'static str, &'static str)>) -> (CacheStore, FakeFetcher, TempDir) {
        let temp = TempDir::new().unwrap();
        let fetcher = FakeFetcher {
            files,
            ..Default::default()
        };
        let store = CacheStore::new(temp.path(), fetcher.clone());
        (store, fetcher, temp)
    }

    #[test]
    fn cache_path_is_deterministic() {
        let (store, _, temp) = store_with(vec![]);
        let a = repo("acme/widgets");
        assert_eq!(store.cache_path_for(&a), store.cache_path_for(&a));
        assert_eq!(store.cache_path_for(&a), temp.path().join("acme").join("widgets"));
    }

    #[test]
    fn cache_path_is_injective() {
        let (store, _, _temp) = store_with(vec![]);
        let repos = [
            repo("acme/widgets"),
            repo("acme/gadgets"),
            repo("initech/widgets"),
            repo("acme.widgets/x"),
            repo("Acme/widgets"),
        ];
        for (i, a) in repos.iter().enumerate() {
            for b in &repos[i + 1..] {
                assert_ne!(store.cache_path_for(a), store.cache_path_for(b));
            }
        }
    }

    #[test]
    fn missing_clone_is_invalid() {
        let (store, _, _temp) = store_with(vec![]);
        assert!(!store.is_valid(&repo("acme/widgets")));
        assert!(store.marker(&repo("acme/widgets")).is_none());
    }

    #[test]
    fn clone_then_valid_then_destroy() {
        let (store, fetcher, _temp) = store_with(vec![("scripts/run.rb", "puts 1")]);
        let r = repo("acme/widgets");

        let path = store.clone_repo(&r, &creds()).unwrap();
        assert!(store.is_valid(&r));
        assert_eq!(fs::read_to_string(path.join("scripts/run.rb")).unwrap(), "puts 1");
        assert_eq!(
            *fetcher.calls.borrow(),
            vec!["https://github.com/acme/widgets.git".to_string()]
        );

        store.destroy(&r).unwrap();
        assert!(!store.is_valid(&r));
        assert!(!path.exists());
    }

    #[test]
    fn clone_strips_git_metadata() {
        let (store, _, _temp) = store_with(vec![("README.md", "hi")]);
        let path = store.clone_repo(&repo("acme/widgets"), &creds()).unwrap();
        assert!(!path.join(".git").exists());
        assert!(path.join("README.md").exists());
    }

    #[test]
    fn clone_writes_timestamp_marker() {
        let (store, _, _temp) = store_with(vec![]);
        let r = repo("acme/widgets");
        let before = Utc::now().timestamp();
        let path = store.clone_repo(&r, &creds()).unwrap();

        let text = fs::read_to_string(path.join(MARKER_FILE)).unwrap();
        let secs: i64 = text.parse().unwrap();
        assert!(secs >= before);

        let marker = store.marker(&r).unwrap();
        assert_eq!(marker.created_at.timestamp(), secs);
        assert!(marker.age() >= Duration::zero());
    }

    #[test]
    fn clone_replaces_previous_contents() {
        let (store, _, _temp) = store_with(vec![("run.rb", "puts 1")]);
        let r = repo("acme/widgets");
        let path = store.cache_path_for(&r);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("stale.rb"), "old").unwrap();

        store.clone_repo(&r, &creds()).unwrap();
        assert!(!path.join("stale.rb").exists());
        assert!(path.join("run.rb").exists());
    }

    #[test]
    fn destroy_twice_is_ok() {
        let (store, _, _temp) = store_with(vec![]);
        let r = repo("acme/widgets");
        store.clone_repo(&r, &creds()).unwrap();
        store.destroy(&r).unwrap();
        store.destroy(&r).unwrap();
    }

    #[test]
    fn unreadable_marker_is_invalid() {
        let (store, _, _temp) = store_with(vec![]);
        let r = repo("acme/widgets");
        // A directory where the marker file should be cannot be read as text
        fs::create_dir_all(store.cache_path_for(&r).join(MARKER_FILE)).unwrap();
        assert!(!store.is_valid(&r));
    }

    #[test]
    fn marker_parse() {
        let marker = CacheMarker::parse("1700000000\n").unwrap();
        assert_eq!(marker.created_at.timestamp(), 1_700_000_000);
        assert!(CacheMarker::parse("yesterday").is_none());
    }

    #[test]
    fn with_clone_removes_after_success() {
        let (store, _, _temp) = store_with(vec![("run.rb", "puts 1")]);
        let r = repo("acme/widgets");

        let content = store
            .with_clone(&r, &creds(), |path| {
                fs::read_to_string(path.join("run.rb")).map_err(|e| RepoFileError::io("read", e))
            })
            .unwrap();

        assert_eq!(content, "puts 1");
        assert!(!store.is_valid(&r));
        assert!(!store.cache_path_for(&r).exists());
    }

    #[test]
    fn with_clone_removes_after_body_error() {
        let (store, _, _temp) = store_with(vec![("run.rb", "puts 1")]);
        let r = repo("acme/widgets");

        let result: RepoFileResult<()> = store.with_clone(&r, &creds(), |_| {
            Err(RepoFileError::User("body failed".to_string()))
        });

        assert!(matches!(result, Err(RepoFileError::User(_))));
        assert!(!store.cache_path_for(&r).exists());
    }

    #[test]
    fn with_clone_removes_after_panic() {
        let (store, _, _temp) = store_with(vec![("run.rb", "puts 1")]);
        let r = repo("acme/widgets");

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _: RepoFileResult<()> = store.with_clone(&r, &creds(), |_| panic!("boom"));
        }));

        assert!(outcome.is_err());
        assert!(!store.cache_path_for(&r).exists());
    }

    #[test]
    fn failed_clone_surfaces_clone_failed_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path(), BrokenFetcher);
        let r = repo("acme/widgets");

        let err = store
            .with_clone(&r, &creds(), |_| Ok(()))
            .unwrap_err();

        match err {
            RepoFileError::CloneFailed { repo, reason } => {
                assert_eq!(repo, "acme/widgets");
                assert!(reason.contains("remote hung up"));
            }
            other => panic!("expected CloneFailed, got {other:?}"),
        }
        assert!(!store.cache_path_for(&r).exists());
        assert!(!store.is_valid(&r));
    }

    #[test]
    fn failed_clone_leaves_no_partial_directory() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path(), BrokenFetcher);
        let r = repo("acme/widgets");

        let err = store.clone_repo(&r, &creds()).unwrap_err();
        assert!(matches!(err, RepoFileError::CloneFailed { .. }));
        assert!(!store.cache_path_for(&r).exists());
    }
}
