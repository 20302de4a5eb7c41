//! Credential providers

pub mod github;

pub use github::GithubCredentials;
