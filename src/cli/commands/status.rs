//! Status command - show cache state for a repository

use super::local_repo;
use crate::audit::AuditLog;
use crate::cli::args::RepoArgs;
use crate::config::Config;
use crate::error::RepoFileResult;
use crate::ui::{self, UiContext};

/// Execute the status command
///
/// Only reads local state, so no token lookup or API client is needed.
pub fn execute(args: RepoArgs, config: &Config) -> RepoFileResult<()> {
    let ctx = UiContext::detect();
    let audit = AuditLog::new(config);
    let (repo, cache) = local_repo(config, &audit, &args.repo)?;

    ui::section(&ctx, &repo.to_string());
    ui::key_value(&ctx, "path", &cache.cache_path_for(&repo).display().to_string());

    if !cache.is_valid(&repo) {
        ui::key_value_status(&ctx, "cached", "no (files come from the GitHub API)", false);
        return Ok(());
    }

    ui::key_value_status(&ctx, "cached", "yes", true);
    if let Some(marker) = cache.marker(&repo) {
        ui::key_value(
            &ctx,
            "cloned",
            &format!(
                "{} ({})",
                marker.created_at.format("%Y-%m-%d %H:%M UTC"),
                format_age(marker.age())
            ),
        );
    }

    Ok(())
}

fn format_age(age: chrono::Duration) -> String {
    if age.num_days() > 0 {
        format!("{} days ago", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{} hours ago", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{} minutes ago", age.num_minutes())
    } else {
        "just now".to_string()
    }
}
