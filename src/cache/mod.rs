//! Local clone cache
//!
//! Keeps a shallow, history-free copy of a repository on disk so files can be
//! read without an API round trip.
//!
//! # Lifecycle
//!
//! | Step | Effect |
//! |------|--------|
//! | clone | remove old copy, fetch, strip `.git`, write marker |
//! | scoped clone | clone, run a closure, always remove |
//! | destroy | remove the directory (no-op when absent) |
//!
//! A clone is valid while its marker file is readable. There is no
//! time-based expiry and no locking: callers serialize operations on the
//! same repository.

pub mod fetcher;
pub mod store;

pub use fetcher::{CloneCredentials, CloneUrl, GitFetcher, RepoFetcher};
pub use store::{CacheMarker, CacheStore, MARKER_FILE};
