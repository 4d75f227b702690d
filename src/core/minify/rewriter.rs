use std::ops::Range;

use anyhow::Result;
use swc_ecma_ast::CallExpr;
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    core::{
        TextIdentity,
        extract::LookupCall,
        minify::{Replacement, ReplacementTable},
        parsers::table::{ResourceFile, ResourceTable},
        program::{FileId, Program},
    },
    issues::{Issue, KeyNotFoundIssue},
};

/// A root source file after the rewrite pass.
#[derive(Debug)]
pub struct RewrittenFile {
    pub file: FileId,
    pub display_path: String,
    pub content: String,
    /// Call sites replaced in this file.
    pub rewritten: usize,
}

#[derive(Debug, Default)]
pub struct RewriteOutcome {
    pub files: Vec<RewrittenFile>,
    /// Call sites whose key became an ordinal.
    pub rewritten: usize,
    /// Call sites left with their string key because a translation is missing.
    pub kept: usize,
    pub issues: Vec<Issue>,
}

struct TextEdit {
    range: Range<usize>,
    replacement: String,
}

/// Apply non-overlapping edits to `text`.
fn apply_edits(text: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by_key(|edit| edit.range.start);
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&text[cursor..edit.range.start]);
        out.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

struct RewriteVisitor<'a> {
    program: &'a Program,
    file: FileId,
    table: &'a ReplacementTable,
    edits: Vec<TextEdit>,
    kept: usize,
    issues: Vec<Issue>,
}

impl Visit for RewriteVisitor<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        // Shape errors were already reported by extraction.
        if let Some(Ok(lookup)) = LookupCall::classify(self.program, self.file, node) {
            match self.table.lookup(&lookup.identity) {
                Replacement::Mature(ordinal) => {
                    let parsed = &self.program.unit(self.file).parsed;
                    self.edits.push(TextEdit {
                        range: parsed.offset_of(lookup.key_span.lo)..parsed.offset_of(lookup.key_span.hi),
                        replacement: ordinal.to_string(),
                    });
                }
                Replacement::Immature(_) => self.kept += 1,
                Replacement::Missing => {
                    self.issues.push(Issue::KeyNotFound(KeyNotFoundIssue {
                        context: self.program.source_context(self.file, node.span.lo),
                        identity: lookup.identity,
                    }));
                }
            }
        }
        node.visit_children_with(self);
    }
}

/// Rewrite every root file: the key literal of each mature lookup call
/// becomes its ordinal. Every other byte of the file, including the
/// remaining call arguments, is left as is.
///
/// Immature identities keep their string key; identities no table knows
/// are reported as `key-not-found` and left untouched.
pub fn rewrite_program(program: &Program, table: &ReplacementTable) -> RewriteOutcome {
    let mut outcome = RewriteOutcome::default();

    for (file, unit) in program.root_files() {
        let mut visitor = RewriteVisitor {
            program,
            file,
            table,
            edits: Vec::new(),
            kept: 0,
            issues: Vec::new(),
        };
        unit.parsed.module.visit_with(&mut visitor);

        let rewritten = visitor.edits.len();
        let mut content = apply_edits(&unit.parsed.text, visitor.edits);
        if unit.parsed.has_bom {
            content.insert(0, '\u{feff}');
        }
        outcome.rewritten += rewritten;
        outcome.kept += visitor.kept;
        outcome.issues.extend(visitor.issues);
        outcome.files.push(RewrittenFile {
            file,
            display_path: unit.display_path.clone(),
            content,
            rewritten,
        });
    }

    outcome
}

/// Render `file` (a table of `namespace`) with every mature key replaced
/// by its ordinal, so that the runtime can index the table by number.
/// Immature keys stay string-keyed.
pub fn rewrite_table(file: &ResourceFile, namespace: &str, table: &ReplacementTable) -> Result<String> {
    let rekeyed: ResourceTable = file
        .table
        .iter()
        .map(|(key, value)| {
            let identity = TextIdentity::new(namespace, key);
            let key = match table.lookup(&identity) {
                Replacement::Mature(ordinal) => ordinal.to_string(),
                _ => key.to_string(),
            };
            (key, value.to_string())
        })
        .collect();
    file.render_with(&rekeyed)
}
