use anyhow::Result;

use super::{CommandResult, CommandSummary, SyncSummary};
use crate::{
    cli::args::SyncCommand,
    core::{BuildContext, sync::reconcile},
};

/// Extract identities and reconcile the resource tables with them.
///
/// With `--check` nothing is written and partial translations are not
/// reported, since the tables on disk may still lack the new keys.
pub fn sync(cmd: SyncCommand) -> Result<CommandResult> {
    let ctx = BuildContext::new(&cmd.common)?;
    let extraction = ctx.extraction()?;

    let outcome = reconcile(
        ctx.store(),
        &extraction.identities,
        &extraction.languages,
        !cmd.check,
    )?;

    let mut issues = ctx.parse_error_issues();
    issues.extend(extraction.issues.iter().cloned());
    issues.extend(outcome.issues);
    if !cmd.check {
        // Built after the writes above, so it sees the reconciled tables.
        let table = ctx.replacement_table()?;
        issues.extend(table.partial_translations(extraction));
    }

    Ok(CommandResult::new(
        CommandSummary::Sync(SyncSummary {
            changes: outcome.changes,
            is_check: cmd.check,
        }),
        issues,
        ctx.files.len(),
    ))
}
