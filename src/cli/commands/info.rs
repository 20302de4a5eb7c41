//! Info command - show repository metadata from the GitHub API

use super::{admit_repo, build_resolver};
use crate::audit::AuditLog;
use crate::cli::args::RepoArgs;
use crate::config::Config;
use crate::error::RepoFileResult;
use crate::ui::{self, UiContext};

/// Execute the info command
pub fn execute(args: RepoArgs, config: &Config, token: Option<String>) -> RepoFileResult<()> {
    let ctx = UiContext::detect();
    let audit = AuditLog::new(config);
    let repo = admit_repo(config, &audit, &args.repo)?;
    let resolver = build_resolver(config, token);

    let meta = resolver.metadata(&repo)?;

    ui::section(&ctx, &meta.full_name);
    if let Some(ref description) = meta.description {
        ui::key_value(&ctx, "description", description);
    }
    ui::key_value(&ctx, "default branch", &meta.default_branch);
    ui::key_value(&ctx, "visibility", if meta.private { "private" } else { "public" });
    ui::key_value(&ctx, "url", &meta.html_url);
    let cached = resolver.cache().is_valid(&repo);
    ui::key_value_status(&ctx, "cached", if cached { "yes" } else { "no" }, cached);

    Ok(())
}
