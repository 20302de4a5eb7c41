//! CLI argument definitions using clap derive

use crate::handle::Strategy;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// repofile - fetch files from whitelisted GitHub repositories
///
/// Reads from a local clone when one exists, otherwise from the GitHub API.
#[derive(Parser, Debug)]
#[command(name = "repofile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "REPOFILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// GitHub token for API calls and clones
    #[arg(long, global = true, env = "REPOFILE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a file from a repository
    Fetch(FetchArgs),

    /// Clone a repository into the local cache
    Clone(RepoArgs),

    /// Remove a repository's clone from the local cache
    Destroy(RepoArgs),

    /// Show cache state for a repository
    Status(RepoArgs),

    /// Show repository metadata from the GitHub API
    Info(RepoArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// File identifier: owner/project/path or https://github.com/owner/project/path
    pub file: String,

    /// Execution strategy to tag the file with
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    /// Clone the repository for this read only, then remove the clone
    #[arg(long)]
    pub fresh_clone: bool,
}

/// Arguments for commands that take a repository
#[derive(Parser, Debug)]
pub struct RepoArgs {
    /// Repo identifier: owner/project or https://github.com/owner/project
    pub repo: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
