//! Configuration schema for repofile
//!
//! Configuration is stored at `~/.config/repofile/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Owner whitelist
    pub security: SecurityConfig,

    /// GitHub API and clone settings
    pub github: GithubConfig,

    /// Local clone cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Enable audit logging
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            audit_log: true,
        }
    }
}

/// Owner whitelist settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Owners whose repositories may be fetched. Empty rejects everyone.
    pub owners: Vec<String>,

    /// Compare owner names case-sensitively
    pub case_sensitive: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            owners: vec![],
            case_sensitive: true,
        }
    }
}

/// GitHub settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// GitHub host used for clone URLs (for GitHub Enterprise)
    pub host: String,

    /// REST API base URL
    pub api_url: String,

    /// OAuth token for the API and authenticated clones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,

    /// API request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
            api_url: "https://api.github.com".to_string(),
            oauth_token: None,
            timeout_secs: 30,
        }
    }
}

/// Clone cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root directory for clones (default: platform cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl CacheConfig {
    /// Effective cache root
    pub fn root_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("repofile")
                .join("repos")
        })
    }
}
