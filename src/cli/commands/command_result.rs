use crate::{
    cli::ExitStatus,
    core::{
        sync::FileChange,
        translate::{CompletedTranslation, TranslationJob},
    },
    issues::{Issue, Severity},
};

#[derive(Debug)]
pub enum CommandSummary {
    Sync(SyncSummary),
    Minify(MinifySummary),
    Translate(TranslateSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct SyncSummary {
    pub changes: Vec<FileChange>,
    pub is_check: bool,
}

#[derive(Debug)]
pub struct MinifySummary {
    /// Call sites rewritten to an ordinal.
    pub rewritten: usize,
    /// Call sites kept string-keyed (partial translation).
    pub kept: usize,
    /// Output directory, as given; `None` for a dry run.
    pub out_dir: Option<String>,
    pub files_written: usize,
}

#[derive(Debug)]
pub struct TranslateSummary {
    pub planned: Vec<TranslationJob>,
    pub completed: Vec<CompletedTranslation>,
    pub changes: Vec<FileChange>,
    pub is_dry_run: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running a loctext command.
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// All issues found, unsorted.
    pub issues: Vec<Issue>,
    /// Number of root source files in the program.
    pub source_files: usize,
}

impl CommandResult {
    pub fn new(summary: CommandSummary, issues: Vec<Issue>, source_files: usize) -> Self {
        let error_count = issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
            .count();
        Self {
            summary,
            error_count,
            warning_count: issues.len() - error_count,
            issues,
            source_files,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        let pending_changes = match &self.summary {
            CommandSummary::Sync(summary) => summary.is_check && !summary.changes.is_empty(),
            _ => false,
        };
        if self.error_count > 0 || pending_changes {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
