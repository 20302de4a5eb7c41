//! Fetch command - print a file from a repository

use super::{admit_file, build_resolver};
use crate::audit::{self, AuditLog};
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::{RepoFileError, RepoFileResult};
use crate::ui::{TaskSpinner, UiContext};
use std::io::{self, Write};
use tracing::debug;

/// Execute the fetch command
pub fn execute(args: FetchArgs, config: &Config, token: Option<String>) -> RepoFileResult<()> {
    let audit = AuditLog::new(config);
    let file = admit_file(config, &audit, &args.file)?;
    let resolver = build_resolver(config, token);

    let content = if args.fresh_clone {
        let ctx = UiContext::detect();
        let mut spinner = TaskSpinner::new(&ctx);
        spinner.start(&format!("Cloning {}...", file.repo));

        let result = resolver.with_clone(&file.repo, |_| {
            resolver
                .resolve_file(&file.repo, &file.path, args.strategy.clone())?
                .content()
        });

        match result {
            Ok(content) => {
                spinner.stop(&format!("Read {} from a fresh clone", file.path));
                audit.log(
                    audit::CACHE_CLONED,
                    &serde_json::json!({ "repo": file.repo.to_string(), "scoped": true }),
                );
                content
            }
            Err(e) => {
                spinner.stop_error(&format!("Could not read {} from {}", file.path, file.repo));
                return Err(e);
            }
        }
    } else {
        let handle = resolver.resolve_file(&file.repo, &file.path, args.strategy)?;
        if let Some(strategy) = handle.strategy() {
            debug!("{} tagged with strategy {}", handle.path(), strategy);
        }
        handle.content()?
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| RepoFileError::io("writing file content to stdout", e))
}
