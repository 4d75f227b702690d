use std::collections::HashSet;

use anyhow::{Result, anyhow, bail};

use super::{CommandResult, CommandSummary, TranslateSummary};
use crate::{
    cli::args::TranslateCommand,
    core::{
        BuildContext, TextIdentity,
        extract::Extraction,
        translate::{OpenAiBackend, commit, plan, translate_all},
    },
};

/// Identities named by `--retranslate`; each must be used in the source.
fn parse_targets(values: &[String], extraction: &Extraction) -> Result<HashSet<TextIdentity>> {
    values
        .iter()
        .map(|value| -> Result<TextIdentity> {
            let identity = TextIdentity::parse(value)
                .ok_or_else(|| anyhow!("Invalid identity \"{}\": expected namespace.key", value))?;
            if !extraction.contains(&identity) {
                bail!("\"{}\" is not used in the source", value);
            }
            Ok(identity)
        })
        .collect()
}

/// Plan, translate and commit untranslated entries.
pub fn translate(cmd: TranslateCommand) -> Result<CommandResult> {
    let ctx = BuildContext::new(&cmd.common)?;
    let extraction = ctx.extraction()?;
    let targets = parse_targets(&cmd.retranslate, extraction)?;

    let (jobs, plan_issues) = plan(ctx.store(), extraction, ctx.default_language(), &targets);

    let mut issues = ctx.parse_error_issues();
    issues.extend(extraction.issues.iter().cloned());

    if cmd.dry_run {
        issues.extend(plan_issues);
        return Ok(CommandResult::new(
            CommandSummary::Translate(TranslateSummary {
                planned: jobs,
                completed: Vec::new(),
                changes: Vec::new(),
                is_dry_run: true,
            }),
            issues,
            ctx.files.len(),
        ));
    }

    let batch = if jobs.is_empty() {
        Default::default()
    } else {
        let backend = OpenAiBackend::from_env(&ctx.config.translator)?;
        translate_all(
            ctx.program(),
            extraction,
            &jobs,
            &backend,
            ctx.config.translator.context_radius,
        )
    };

    // Commit re-reads every table and reports malformed ones itself.
    let outcome = commit(
        ctx.store(),
        extraction,
        &batch.translations,
        &targets,
        ctx.default_language(),
    )?;
    issues.extend(batch.issues);
    issues.extend(outcome.issues);

    Ok(CommandResult::new(
        CommandSummary::Translate(TranslateSummary {
            planned: jobs,
            completed: batch.completed,
            changes: outcome.changes,
            is_dry_run: false,
        }),
        issues,
        ctx.files.len(),
    ))
}
