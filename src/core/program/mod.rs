//! Program model: every root source file plus the files it imports,
//! parsed once and shared by all passes.
//!
//! ## Module Structure
//!
//! - `symbols`: per-module declarations, imports and exports
//! - `resolve`: module specifier resolution and alias chasing
//! - `scope`: callee identifiers bound by a local (non-module) binding

pub mod resolve;
pub mod scope;
pub mod symbols;

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use rayon::prelude::*;
use swc_common::{BytePos, SourceMap};

use crate::{
    core::{
        SourceContext, SourceLocation,
        markers::Marker,
        parsers::source::{ParsedSource, parse_source},
    },
    issues::ParseErrorIssue,
    utils::display_path,
};

pub use resolve::{Symbol, normalize_path, resolve_module_path};
pub use symbols::{DeclKind, Declaration, ExportTarget, LocalBinding, ModuleSymbols};

/// Index of a file in the program, in enumeration order.
pub type FileId = usize;
/// Index of a declaration in the program.
pub type DeclId = usize;

/// One parsed file of the program.
pub struct SourceUnit {
    pub path: PathBuf,
    /// Path relative to the project root, for reports.
    pub display_path: String,
    pub parsed: ParsedSource,
    pub symbols: ModuleSymbols,
    /// Resolved target of each module specifier this file uses.
    pub imports: HashMap<String, FileId>,
    /// Scanned as a root; `false` for files pulled in through imports.
    pub is_root: bool,
    /// Callee identifiers that refer to a parameter or local declaration.
    pub shadowed_callees: HashSet<BytePos>,
}

#[derive(Default)]
pub struct Program {
    units: Vec<SourceUnit>,
    declarations: Vec<Declaration>,
    members_by_name: HashMap<String, Vec<DeclId>>,
    parse_errors: Vec<ParseErrorIssue>,
}

fn read_and_parse(path: &Path, source_map: &Arc<SourceMap>) -> Result<ParsedSource> {
    let code = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_source(code, &path.to_string_lossy(), Arc::clone(source_map))
}

impl Program {
    /// Parse `roots` and, transitively, every file they import.
    ///
    /// Root files keep their (sorted) order and come first; imported files
    /// follow in discovery order. Files that fail to parse are left out
    /// and reported through [`Program::parse_errors`].
    pub fn load(root_dir: &Path, roots: &BTreeSet<PathBuf>) -> Self {
        let root_dir = normalize_path(root_dir);
        // One map for the whole program, so byte positions never overlap.
        let source_map: Arc<SourceMap> = Default::default();
        let mut program = Program::default();
        let mut by_path: HashMap<PathBuf, FileId> = HashMap::new();
        let mut queued: HashSet<PathBuf> = HashSet::new();
        // Per file: (specifier, resolved path)
        let mut resolved: Vec<Vec<(String, PathBuf)>> = Vec::new();

        let mut pending: Vec<PathBuf> = roots
            .iter()
            .map(|p| normalize_path(p))
            .filter(|p| queued.insert(p.clone()))
            .collect();
        let mut is_root = true;

        while !pending.is_empty() {
            let results: Vec<(PathBuf, Result<ParsedSource>)> = pending
                .par_iter()
                .map(|path| (path.clone(), read_and_parse(path, &source_map)))
                .collect();

            let first_new = program.units.len();
            for (path, result) in results {
                let display_path = display_path(&path, &root_dir);
                match result {
                    Ok(parsed) => {
                        let id = program.units.len();
                        let symbols = symbols::collect_symbols(
                            id,
                            &parsed.module,
                            &parsed.comments,
                            &mut program.declarations,
                        );
                        let shadowed_callees = scope::shadowed_callees(&parsed.module);
                        by_path.insert(path.clone(), id);
                        program.units.push(SourceUnit {
                            path,
                            display_path,
                            parsed,
                            symbols,
                            imports: HashMap::new(),
                            is_root,
                            shadowed_callees,
                        });
                    }
                    Err(e) => program.parse_errors.push(ParseErrorIssue {
                        file_path: display_path,
                        error: format!("{:#}", e),
                    }),
                }
            }

            let mut next = Vec::new();
            for unit in &program.units[first_new..] {
                let mut targets = Vec::new();
                for specifier in &unit.symbols.specifiers {
                    if let Some(target) = resolve_module_path(&unit.path, specifier) {
                        if queued.insert(target.clone()) {
                            next.push(target.clone());
                        }
                        targets.push((specifier.clone(), target));
                    }
                }
                resolved.push(targets);
            }
            pending = next;
            is_root = false;
        }

        for (id, targets) in resolved.into_iter().enumerate() {
            for (specifier, target) in targets {
                if let Some(&target_id) = by_path.get(&target) {
                    program.units[id].imports.insert(specifier, target_id);
                }
            }
        }

        for (id, decl) in program.declarations.iter().enumerate() {
            if decl.kind == DeclKind::Member {
                program
                    .members_by_name
                    .entry(decl.name.clone())
                    .or_default()
                    .push(id);
            }
        }

        program
    }

    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    pub fn unit(&self, id: FileId) -> &SourceUnit {
        &self.units[id]
    }

    /// Root files in enumeration order.
    pub fn root_files(&self) -> impl Iterator<Item = (FileId, &SourceUnit)> {
        self.units.iter().enumerate().filter(|(_, unit)| unit.is_root)
    }

    pub fn declaration(&self, id: DeclId) -> &Declaration {
        &self.declarations[id]
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Class members named `name`, across the whole program.
    pub fn members_named(&self, name: &str) -> &[DeclId] {
        self.members_by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// File a module specifier used in `file` resolved to.
    pub fn imported_module(&self, file: FileId, specifier: &str) -> Option<FileId> {
        self.unit(file).imports.get(specifier).copied()
    }

    pub fn parse_errors(&self) -> &[ParseErrorIssue] {
        &self.parse_errors
    }

    /// Whether any declaration carries a lookup marker.
    pub fn has_lookup_methods(&self) -> bool {
        self.declarations
            .iter()
            .any(|d| d.marker.is_some_and(Marker::is_lookup))
    }

    /// Raw text of the comments leading the token at `pos` in `file`.
    pub fn leading_comment(&self, file: FileId, pos: BytePos) -> String {
        self.unit(file).parsed.comments.leading_text(pos)
    }

    /// Position of `pos` in `file` with its source line, for reports.
    pub fn source_context(&self, file: FileId, pos: BytePos) -> SourceContext {
        let unit = self.unit(file);
        let loc = unit.parsed.source_map.lookup_char_pos(pos);
        let source_line = loc
            .file
            .get_line(loc.line - 1)
            .map(|cow| cow.to_string())
            .unwrap_or_default();
        SourceContext::new(
            SourceLocation::new(&unit.display_path, loc.line, loc.col_display + 1),
            source_line,
        )
    }
}
