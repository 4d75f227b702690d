//! Issue types reported by the extraction, synchronization, minification
//! and translation passes.
//!
//! Issues are per-item problems: they are collected, sorted and reported,
//! and never abort a pass. Structural failures are `anyhow` errors instead.

use enum_dispatch::enum_dispatch;

use crate::core::{SourceContext, TableEntryContext, TextIdentity};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ConstructorAnomaly,
    MissingLookup,
    CallShape,
    KeyNotFound,
    UnusedKey,
    PartialTranslation,
    Untranslated,
    TranslationFailed,
    MalformedTable,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::ConstructorAnomaly => write!(f, "constructor-anomaly"),
            Rule::MissingLookup => write!(f, "missing-lookup"),
            Rule::CallShape => write!(f, "call-shape"),
            Rule::KeyNotFound => write!(f, "key-not-found"),
            Rule::UnusedKey => write!(f, "unused-key"),
            Rule::PartialTranslation => write!(f, "partial-translation"),
            Rule::Untranslated => write!(f, "untranslated"),
            Rule::TranslationFailed => write!(f, "translation-failed"),
            Rule::MalformedTable => write!(f, "malformed-table"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Call Shape Reason
// ============================================================

/// Why a marked lookup call could not be turned into an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallShapeReason {
    /// Fewer arguments than the lookup form requires.
    MissingArguments { expected: usize, found: usize },
    /// `locText(key)` / `nsLocText(ns, key)` with a non-literal key.
    KeyNotLiteral,
    /// `nsLocText(ns, key)` with a non-literal namespace.
    NamespaceNotLiteral,
    /// A spread argument in a key or namespace position.
    SpreadArgument,
    /// Empty namespace, or one containing `.` or a path separator.
    InvalidNamespace(String),
}

impl std::fmt::Display for CallShapeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallShapeReason::MissingArguments { expected, found } => write!(
                f,
                "expected at least {} argument(s), found {}",
                expected, found
            ),
            CallShapeReason::KeyNotLiteral => write!(f, "key is not a string literal"),
            CallShapeReason::NamespaceNotLiteral => {
                write!(f, "namespace is not a string literal")
            }
            CallShapeReason::SpreadArgument => write!(f, "spread argument in key position"),
            CallShapeReason::InvalidNamespace(ns) => write!(f, "invalid namespace \"{}\"", ns),
        }
    }
}

// ============================================================
// Issue Types - Program Level
// ============================================================

/// No i18n-instance constructor call was found; no languages are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingConstructorIssue;

impl MissingConstructorIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::ConstructorAnomaly
    }
}

/// No declaration in the program carries a lookup marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingLookupIssue;

impl MissingLookupIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MissingLookup
    }
}

/// A key lacks a real translation in some supported language, so it is
/// kept as a string key by the minifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialTranslationIssue {
    pub identity: TextIdentity,
    pub missing_in: Vec<String>,
    /// First call site using this key.
    pub usage: Option<SourceContext>,
}

impl PartialTranslationIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::PartialTranslation
    }
}

/// The translation backend failed for one key and language; the entry is
/// left untranslated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFailedIssue {
    pub identity: TextIdentity,
    pub language: String,
    pub error: String,
}

impl TranslationFailedIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::TranslationFailed
    }
}

// ============================================================
// Issue Types - Source Code (SourceContext)
// ============================================================

/// A second i18n-instance constructor call; the first one found is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateConstructorIssue {
    pub context: SourceContext,
}

impl DuplicateConstructorIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::ConstructorAnomaly
    }
}

/// A marked lookup call whose arguments are not the required literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallShapeIssue {
    pub context: SourceContext,
    pub reason: CallShapeReason,
}

impl CallShapeIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::CallShape
    }
}

/// A lookup call whose identity is in no resource table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNotFoundIssue {
    pub context: SourceContext,
    pub identity: TextIdentity,
}

impl KeyNotFoundIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::KeyNotFound
    }
}

// ============================================================
// Issue Types - Resource Tables
// ============================================================

/// Key present in a resource table but referenced by no lookup call.
/// The key is kept in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedKeyIssue {
    pub context: TableEntryContext,
}

impl UnusedKeyIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnusedKey
    }
}

/// Placeholder entries still left in a table after translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntranslatedIssue {
    pub file_path: String,
    pub language: String,
    pub keys: Vec<String>,
}

impl UntranslatedIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::Untranslated
    }
}

/// Resource table whose region cannot be located or parsed. The file is
/// neither read nor written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedTableIssue {
    pub file_path: String,
    pub error: String,
}

impl MalformedTableIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::MalformedTable
    }
}

/// Source file could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingConstructor(MissingConstructorIssue),
    DuplicateConstructor(DuplicateConstructorIssue),
    MissingLookup(MissingLookupIssue),
    CallShape(CallShapeIssue),
    KeyNotFound(KeyNotFoundIssue),
    UnusedKey(UnusedKeyIssue),
    PartialTranslation(PartialTranslationIssue),
    Untranslated(UntranslatedIssue),
    TranslationFailed(TranslationFailedIssue),
    MalformedTable(MalformedTableIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// Resource table entry (has key/value, no source line).
    Table(&'a TableEntryContext),
    /// File-level only (no line context).
    File { path: &'a str },
    /// Whole-program finding.
    Program,
}

/// Trait for types that can be reported to CLI.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display (key, identity, error, ...).
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for MissingConstructorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Program
    }

    fn message(&self) -> String {
        "no i18n constructor found in the program".to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("tag the i18n class with a /** I18NCONSTRUCTORSYMBOL */ comment")
    }
}

impl Report for DuplicateConstructorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        "multiple i18n constructors found".to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("languages are taken from the first one".to_string())
    }
}

impl Report for MissingLookupIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Program
    }

    fn message(&self) -> String {
        "no lookup method found in the program".to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("tag lookup methods with /** I18NLOCTEXTSYMBOL */ or /** I18NNSLOCTEXTSYMBOL */")
    }
}

impl Report for CallShapeIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.reason.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("lookup keys must be string literals so they can be extracted")
    }
}

impl Report for KeyNotFoundIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.identity.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("run `loctext sync` to add it")
    }
}

impl Report for UnusedKeyIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Table(&self.context)
    }

    fn message(&self) -> String {
        self.context.key.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("(\"{}\")", self.context.value))
    }
}

impl Report for PartialTranslationIssue {
    fn location(&self) -> ReportLocation<'_> {
        match &self.usage {
            Some(context) => ReportLocation::Source(context),
            None => ReportLocation::Program,
        }
    }

    fn message(&self) -> String {
        self.identity.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("not translated in: {}", self.missing_in.join(", ")))
    }
}

impl Report for UntranslatedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        format!(
            "{} key(s) still untranslated in {}",
            self.keys.len(),
            self.language
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.keys.join(", "))
    }
}

impl Report for TranslationFailedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Program
    }

    fn message(&self) -> String {
        format!("{} ({})", self.identity, self.language)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.error.clone())
    }
}

impl Report for MalformedTableIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<&str> {
        Some("the file was left untouched; fix the table by hand")
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    fn sort_file_path(&self) -> Option<&str> {
        match self.location() {
            ReportLocation::Source(ctx) => Some(&ctx.location.file_path),
            ReportLocation::Table(ctx) => Some(&ctx.location.file_path),
            ReportLocation::File { path } => Some(path),
            ReportLocation::Program => None,
        }
    }

    fn sort_line(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.location.line,
            ReportLocation::Table(ctx) => ctx.location.line,
            ReportLocation::File { .. } | ReportLocation::Program => 0,
        }
    }

    fn sort_col(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.location.col,
            ReportLocation::Table(ctx) => ctx.location.col,
            ReportLocation::File { .. } | ReportLocation::Program => 0,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        // Sort by: file_path (program-level last), line, col, message
        match (self.sort_file_path(), other.sort_file_path()) {
            (Some(a), Some(b)) => a
                .cmp(b)
                .then_with(|| self.sort_line().cmp(&other.sort_line()))
                .then_with(|| self.sort_col().cmp(&other.sort_col()))
                .then_with(|| self.message().cmp(&other.message())),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .rule()
                .cmp(&other.rule())
                .then_with(|| self.message().cmp(&other.message())),
        }
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{SourceLocation, TableLocation};
    use crate::issues::*;

    #[test]
    fn test_call_shape_issue() {
        let loc = SourceLocation::new("src/app.tsx", 10, 5);
        let ctx = SourceContext::new(loc, "locText(label)");
        let issue = Issue::CallShape(CallShapeIssue {
            context: ctx,
            reason: CallShapeReason::KeyNotLiteral,
        });

        assert!(issue.is_error());
        assert_eq!(issue.rule(), Rule::CallShape);
        assert_eq!(issue.message(), "key is not a string literal");
    }

    #[test]
    fn test_unused_key_issue() {
        let loc = TableLocation::with_line("src/language/default.en.ts", 6);
        let ctx = TableEntryContext::new(loc, "Bye", "Goodbye");
        let issue = Issue::UnusedKey(UnusedKeyIssue { context: ctx });

        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(issue.message(), "Bye");
        assert_eq!(issue.details().as_deref(), Some("(\"Goodbye\")"));
    }

    #[test]
    fn test_partial_translation_without_usage_is_program_level() {
        let issue = PartialTranslationIssue {
            identity: TextIdentity::default_ns("Hello"),
            missing_in: vec!["ko".to_string()],
            usage: None,
        };
        assert!(matches!(issue.location(), ReportLocation::Program));
        assert_eq!(issue.details().as_deref(), Some("not translated in: ko"));
    }

    #[test]
    fn test_sorting_puts_program_level_last() {
        let mut issues = vec![
            Issue::MissingLookup(MissingLookupIssue),
            Issue::ParseError(ParseErrorIssue {
                file_path: "src/b.ts".to_string(),
                error: "x".to_string(),
            }),
            Issue::KeyNotFound(KeyNotFoundIssue {
                context: SourceContext::new(SourceLocation::new("src/a.ts", 3, 1), ""),
                identity: TextIdentity::default_ns("Hi"),
            }),
        ];
        issues.sort();

        let rules: Vec<_> = issues.iter().map(|i| i.rule()).collect();
        assert_eq!(
            rules,
            vec![Rule::KeyNotFound, Rule::ParseError, Rule::MissingLookup]
        );
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(Rule::ConstructorAnomaly.to_string(), "constructor-anomaly");
        assert_eq!(Rule::MissingLookup.to_string(), "missing-lookup");
        assert_eq!(Rule::CallShape.to_string(), "call-shape");
        assert_eq!(Rule::KeyNotFound.to_string(), "key-not-found");
        assert_eq!(Rule::UnusedKey.to_string(), "unused-key");
        assert_eq!(Rule::PartialTranslation.to_string(), "partial-translation");
        assert_eq!(Rule::Untranslated.to_string(), "untranslated");
        assert_eq!(Rule::TranslationFailed.to_string(), "translation-failed");
        assert_eq!(Rule::MalformedTable.to_string(), "malformed-table");
        assert_eq!(Rule::ParseError.to_string(), "parse-error");
    }
}
