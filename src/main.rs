//! repofile CLI entry point

use clap::Parser;
use console::style;
use repofile::cli::{Cli, Commands};
use repofile::config::{Config, ConfigManager};
use repofile::error::RepoFileResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> RepoFileResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;

    init_logging(cli.verbose, &config);

    match cli.command {
        Commands::Fetch(args) => repofile::cli::commands::fetch(args, &config, cli.token),
        Commands::Clone(args) => repofile::cli::commands::clone(args, &config, cli.token),
        Commands::Destroy(args) => repofile::cli::commands::destroy(args, &config),
        Commands::Status(args) => repofile::cli::commands::status(args, &config),
        Commands::Info(args) => repofile::cli::commands::info(args, &config, cli.token),
        Commands::Config(args) => repofile::cli::commands::config(args, &config, &config_manager),
    }
}

// 0 = warn, 1 = info, 2+ = debug. RUST_LOG wins when set.
fn init_logging(verbose: u8, config: &Config) {
    let default = match verbose {
        0 => "repofile=warn",
        1 => "repofile=info",
        _ => "repofile=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
