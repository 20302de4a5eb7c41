//! Destroy command - remove a repository's clone

use super::local_repo;
use crate::audit::{self, AuditLog};
use crate::cli::args::RepoArgs;
use crate::config::Config;
use crate::error::RepoFileResult;
use crate::ui::{self, UiContext};

/// Execute the destroy command
pub fn execute(args: RepoArgs, config: &Config) -> RepoFileResult<()> {
    let ctx = UiContext::detect();
    let audit = AuditLog::new(config);
    let (repo, cache) = local_repo(config, &audit, &args.repo)?;

    let path = cache.cache_path_for(&repo);
    let existed = path.exists();

    cache.destroy(&repo)?;

    if existed {
        audit.log(
            audit::CACHE_DESTROYED,
            &serde_json::json!({ "repo": repo.to_string() }),
        );
        ui::step_ok_detail(&ctx, &format!("Removed clone of {}", repo), &path.display().to_string());
    } else {
        ui::step_warn_hint(&ctx, &format!("No clone of {}", repo), "nothing to remove");
    }

    Ok(())
}
