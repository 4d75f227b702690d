//! Report formatting and printing utilities.
//!
//! This module provides functions to display issues in cargo-style format.
//! Separate from core logic to allow loctext to be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, InitSummary, MinifySummary, SyncSummary, TranslateSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::core::sync::{ChangeKind, FileChange};
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
///
/// Issues are sorted and displayed with severity, location, source
/// context, and details.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    // Calculate max line number width for alignment
    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no issues are found.
pub fn print_success(source_files: usize) {
    print_success_to(source_files, &mut io::stdout().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(source_files: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} source {} - no issues found",
            source_files,
            if source_files == 1 { "file" } else { "files" }
        )
        .green()
    );
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();

    // Print severity and message (cargo-style)
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Print clickable location: --> path:line:col
    match &loc {
        ReportLocation::Source(ctx) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                ctx.file_path(),
                ctx.line(),
                ctx.col()
            );
        }
        ReportLocation::Table(ctx) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                ctx.file_path(),
                ctx.line(),
                ctx.col()
            );
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
        ReportLocation::Program => {}
    }

    // Print source context if available
    if let ReportLocation::Source(ctx) = &loc {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };
        let line = ctx.line();
        let col = ctx.col();
        let source_line = &ctx.source_line;

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Caret pointing to the column (col is 1-based)
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    // Print details if present (cargo-style note)
    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    // Print hint if present
    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            _ => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

pub fn print(result: &CommandResult, _verbose: bool) {
    print_command_output(result);

    if result.issues.is_empty() && !matches!(result.summary, CommandSummary::Init(_)) {
        print_success(result.source_files);
    }
}

fn print_command_output(result: &CommandResult) {
    let stdout = &mut io::stdout().lock();
    match &result.summary {
        CommandSummary::Sync(summary) => print_sync(summary, stdout),
        CommandSummary::Minify(summary) => print_minify(summary, stdout),
        CommandSummary::Translate(summary) => print_translate(summary, stdout),
        CommandSummary::Init(summary) => print_init(summary, stdout),
    }
    report_to(&result.issues, stdout);
}

fn print_changes<W: Write>(changes: &[FileChange], preview: bool, writer: &mut W) {
    for change in changes {
        let line = match (change.kind, preview) {
            (ChangeKind::Created, false) => format!(
                "{} {} ({} key(s) added)",
                "Created".green().bold(),
                change.path,
                change.added
            ),
            (ChangeKind::Created, true) => format!(
                "{} {} ({} key(s) added)",
                "Would create".yellow().bold(),
                change.path,
                change.added
            ),
            (ChangeKind::Updated, _) if change.translated > 0 => format!(
                "{} {} ({} translated)",
                "Updated".green().bold(),
                change.path,
                change.translated
            ),
            (ChangeKind::Updated, false) => format!(
                "{} {} key(s) to {}",
                "Added".green().bold(),
                change.added,
                change.path
            ),
            (ChangeKind::Updated, true) => format!(
                "{} {} key(s) to {}",
                "Would add".yellow().bold(),
                change.added,
                change.path
            ),
        };
        let _ = writeln!(writer, "{}", line);
    }
}

fn print_sync<W: Write>(summary: &SyncSummary, writer: &mut W) {
    print_changes(&summary.changes, summary.is_check, writer);
    if summary.changes.is_empty() {
        let _ = writeln!(writer, "Resource tables are up to date.");
    } else if summary.is_check {
        let _ = writeln!(
            writer,
            "{} {} file(s) out of date. Run {} to update them.",
            FAILURE_MARK.red(),
            summary.changes.len(),
            "loctext sync".cyan()
        );
    }
}

fn print_minify<W: Write>(summary: &MinifySummary, writer: &mut W) {
    match &summary.out_dir {
        Some(out_dir) => {
            let _ = writeln!(
                writer,
                "{} {} call site(s), kept {} with incomplete translations; wrote {} file(s) to {}",
                "Rewrote".green().bold(),
                summary.rewritten,
                summary.kept,
                summary.files_written,
                out_dir
            );
        }
        None => {
            let _ = writeln!(
                writer,
                "{} {} call site(s), keep {} with incomplete translations.",
                "Would rewrite".yellow().bold(),
                summary.rewritten,
                summary.kept
            );
            let _ = writeln!(writer, "Run with {} to emit the output.", "--out-dir".cyan());
        }
    }
}

fn print_translate<W: Write>(summary: &TranslateSummary, writer: &mut W) {
    if summary.is_dry_run {
        if summary.planned.is_empty() {
            let _ = writeln!(writer, "Nothing to translate.");
            return;
        }
        let _ = writeln!(
            writer,
            "{} {} entr{}:",
            "Would translate".yellow().bold(),
            summary.planned.len(),
            if summary.planned.len() == 1 { "y" } else { "ies" }
        );
        for job in &summary.planned {
            let _ = writeln!(
                writer,
                "  - {} [{}] ({} occurrences)",
                job.identity, job.language, job.occurrences
            );
        }
        return;
    }

    for done in &summary.completed {
        let _ = writeln!(
            writer,
            "{} {} ({} occurrences) [{}]: {}",
            "Translated".green().bold(),
            done.job.identity,
            done.job.occurrences,
            done.job.language,
            done.text
        );
    }
    print_changes(&summary.changes, false, writer);
    if summary.planned.is_empty() {
        let _ = writeln!(writer, "Nothing to translate.");
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        SourceContext, SourceLocation, TableEntryContext, TableLocation, TextIdentity,
    };
    use crate::issues::{
        CallShapeIssue, CallShapeReason, MissingConstructorIssue, PartialTranslationIssue,
        UnusedKeyIssue,
    };

    fn strip_ansi(s: &str) -> String {
        // Simple ANSI escape code stripper for testing
        let mut result = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                // Skip until 'm'
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn render(issues: &[Issue]) -> String {
        let mut output = Vec::new();
        report_to(issues, &mut output);
        strip_ansi(&String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_report_empty() {
        let mut output = Vec::new();
        report_to(&[], &mut output);
        assert!(output.is_empty());
    }

    #[test]
    fn test_report_call_shape_issue() {
        let loc = SourceLocation::new("src/app.ts", 10, 5);
        let ctx = SourceContext::new(loc, "    locText(label);");
        let issue = Issue::CallShape(CallShapeIssue {
            context: ctx,
            reason: CallShapeReason::KeyNotLiteral,
        });

        let stripped = render(&[issue]);

        assert!(stripped.contains("error:"));
        assert!(stripped.contains("call-shape"));
        assert!(stripped.contains("src/app.ts:10:5"));
        assert!(stripped.contains("    locText(label);"));
        assert!(stripped.contains("|     ^"));
    }

    #[test]
    fn test_report_unused_key() {
        let loc = TableLocation::with_line("src/language/default.en.ts", 6);
        let ctx = TableEntryContext::new(loc, "Bye", "Goodbye");
        let issue = Issue::UnusedKey(UnusedKeyIssue { context: ctx });

        let stripped = render(&[issue]);

        assert!(stripped.contains("warning:"));
        assert!(stripped.contains("\"Bye\""));
        assert!(stripped.contains("unused-key"));
        assert!(stripped.contains("src/language/default.en.ts:6:1"));
        assert!(stripped.contains("(\"Goodbye\")"));
    }

    #[test]
    fn test_report_program_level_issue_has_no_location() {
        let stripped = render(&[Issue::MissingConstructor(MissingConstructorIssue)]);

        assert!(stripped.contains("constructor-anomaly"));
        assert!(!stripped.contains("-->"));
        assert!(stripped.contains("hint:"));
    }

    #[test]
    fn test_report_summary() {
        let ctx = SourceContext::new(SourceLocation::new("src/a.ts", 3, 1), "locText(x)");
        let issue1 = Issue::CallShape(CallShapeIssue {
            context: ctx,
            reason: CallShapeReason::KeyNotLiteral,
        });
        let issue2 = Issue::PartialTranslation(PartialTranslationIssue {
            identity: TextIdentity::default_ns("Hello"),
            missing_in: vec!["ko".to_string()],
            usage: None,
        });

        let stripped = render(&[issue1, issue2]);

        assert!(stripped.contains("2 problems"));
        assert!(stripped.contains("1 error"));
        assert!(stripped.contains("1 warning"));
        assert!(stripped.contains("not translated in: ko"));
    }

    #[test]
    fn test_print_success() {
        let mut output = Vec::new();
        print_success_to(10, &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());

        assert!(stripped.contains("10 source files"));
        assert!(stripped.contains("no issues found"));
    }

    #[test]
    fn test_print_sync_preview() {
        let summary = SyncSummary {
            changes: vec![FileChange {
                path: "src/language/default.ko.ts".to_string(),
                kind: ChangeKind::Created,
                added: 2,
                translated: 0,
            }],
            is_check: true,
        };
        let mut output = Vec::new();
        print_sync(&summary, &mut output);
        let stripped = strip_ansi(&String::from_utf8(output).unwrap());

        assert!(stripped.contains("Would create src/language/default.ko.ts (2 key(s) added)"));
        assert!(stripped.contains("1 file(s) out of date"));
    }
}
