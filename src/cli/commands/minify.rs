use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;

use super::{CommandResult, CommandSummary, MinifySummary};
use crate::{
    cli::args::MinifyCommand,
    core::{
        BuildContext,
        minify::{rewrite_program, rewrite_table},
    },
};

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Project-relative paths only; anything escaping the root is not emitted.
fn output_path(out_dir: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        .then(|| out_dir.join(relative))
}

/// Assign indices and rewrite mature call sites.
///
/// Without `--out-dir` nothing is written; the summary tells how many call
/// sites would be rewritten. With it, every root source file and every
/// table of a supported language is emitted under the output directory.
pub fn minify(cmd: MinifyCommand) -> Result<CommandResult> {
    let excluded: Vec<PathBuf> = cmd.out_dir.iter().cloned().collect();
    let ctx = BuildContext::with_excluded_dirs(&cmd.common, &excluded)?;
    let extraction = ctx.extraction()?;
    let table = ctx.replacement_table()?;

    let outcome = rewrite_program(ctx.program(), table);

    let mut issues = ctx.parse_error_issues();
    issues.extend(extraction.issues.iter().cloned());
    issues.extend(ctx.replacement_issues()?.iter().cloned());
    issues.extend(table.partial_translations(extraction));
    issues.extend(outcome.issues);

    let mut files_written = 0;
    if let Some(out_dir) = &cmd.out_dir {
        let out_root = if out_dir.is_absolute() {
            out_dir.clone()
        } else {
            ctx.root_dir.join(out_dir)
        };

        for file in &outcome.files {
            let Some(path) = output_path(&out_root, &file.display_path) else {
                if ctx.verbose {
                    eprintln!(
                        "{} {} is outside the project root, not emitted",
                        "note:".bold(),
                        file.display_path
                    );
                }
                continue;
            };
            write_output(&path, &file.content)?;
            files_written += 1;
        }

        let store = ctx.store();
        for table_file in store.list_tables()? {
            if !table.languages().contains(&table_file.language) {
                continue;
            }
            // Malformed tables were reported while building the index.
            let Ok(Some(resource)) = store.read_path(&table_file.path) else {
                continue;
            };
            let Some(path) = output_path(&out_root, &store.display(&table_file.path)) else {
                continue;
            };
            write_output(&path, &rewrite_table(&resource, &table_file.namespace, table)?)?;
            files_written += 1;
        }
    }

    Ok(CommandResult::new(
        CommandSummary::Minify(MinifySummary {
            rewritten: outcome.rewritten,
            kept: outcome.kept,
            out_dir: cmd.out_dir.map(|dir| dir.to_string_lossy().to_string()),
            files_written,
        }),
        issues,
        ctx.files.len(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_stays_inside_out_dir() {
        let out = Path::new("/build");
        assert_eq!(
            output_path(out, "src/app.ts"),
            Some(PathBuf::from("/build/src/app.ts"))
        );
        assert_eq!(output_path(out, "../shared/x.ts"), None);
        assert_eq!(output_path(out, "/abs/x.ts"), None);
    }
}
