//! Clone command - populate the local cache for a repository

use super::{admit_repo, build_resolver};
use crate::audit::{self, AuditLog};
use crate::cli::args::RepoArgs;
use crate::config::Config;
use crate::error::RepoFileResult;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the clone command
pub fn execute(args: RepoArgs, config: &Config, token: Option<String>) -> RepoFileResult<()> {
    let ctx = UiContext::detect();
    let audit = AuditLog::new(config);
    let repo = admit_repo(config, &audit, &args.repo)?;
    let resolver = build_resolver(config, token);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Cloning {}...", repo));

    let path = match resolver.clone_repo(&repo) {
        Ok(path) => path,
        Err(e) => {
            spinner.stop_error(&format!("Clone of {} failed", repo));
            return Err(e);
        }
    };
    spinner.stop(&format!("Cloned {}", repo));

    audit.log(
        audit::CACHE_CLONED,
        &serde_json::json!({ "repo": repo.to_string(), "path": path.display().to_string() }),
    );
    ui::step_ok_detail(&ctx, "Cached", &path.display().to_string());

    Ok(())
}
