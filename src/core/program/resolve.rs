//! Module specifier resolution and symbol alias chasing.

use std::{
    collections::HashSet,
    ffi::OsString,
    fs,
    path::{Component, Path, PathBuf},
};

use serde::Deserialize;
use swc_ecma_ast::{Expr, MemberProp};

use crate::core::{
    markers::Marker,
    program::{DeclId, FileId, Program, symbols::{ExportTarget, LocalBinding}},
};

const RESOLVE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".d.ts", ".mts", ".cts", ".js", ".jsx"];

/// Lexically normalize a path: drop `.` components and fold `..` into
/// their parent where possible.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = base.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Exact file or extension candidates of `base`.
fn resolve_file(base: &Path) -> Option<PathBuf> {
    // ESM-style `./foo.js` specifiers point at `./foo.ts` sources.
    if let Some(ext) = base.extension().and_then(|e| e.to_str())
        && matches!(ext, "js" | "jsx" | "mjs" | "cjs")
    {
        let stem = base.with_extension("");
        for candidate in [".ts", ".tsx", ".d.ts"] {
            let path = with_suffix(&stem, candidate);
            if path.is_file() {
                return Some(path);
            }
        }
    }
    if base.is_file() && crate::core::file_scanner::is_source_file(base) {
        return Some(base.to_path_buf());
    }
    RESOLVE_EXTENSIONS
        .iter()
        .map(|ext| with_suffix(base, ext))
        .find(|path| path.is_file())
}

/// Resolve a file-or-directory base path the way TypeScript module
/// resolution does: exact file, extension candidates, then the package
/// entry or `index` file of a directory.
fn resolve_file_like(base: &Path) -> Option<PathBuf> {
    resolve_file(base).or_else(|| {
        if base.is_dir() {
            resolve_package_dir(base)
        } else {
            None
        }
    })
}

#[derive(Deserialize)]
struct PackageManifest {
    types: Option<String>,
    typings: Option<String>,
    main: Option<String>,
}

fn resolve_package_dir(dir: &Path) -> Option<PathBuf> {
    if let Ok(content) = fs::read_to_string(dir.join("package.json"))
        && let Ok(manifest) = serde_json::from_str::<PackageManifest>(&content)
    {
        let entries = [manifest.types, manifest.typings, manifest.main];
        for entry in entries.into_iter().flatten() {
            let entry_path = dir.join(&entry);
            if let Some(path) = resolve_file(&entry_path) {
                return Some(path);
            }
        }
    }
    RESOLVE_EXTENSIONS
        .iter()
        .map(|ext| with_suffix(&dir.join("index"), ext))
        .find(|path| path.is_file())
}

/// Resolve `specifier` imported from `from_file` to a source file.
///
/// Relative and absolute specifiers resolve against the importing file;
/// bare specifiers are looked up in `node_modules` directories walking up
/// from it. Returns `None` for anything that cannot be found.
pub fn resolve_module_path(from_file: &Path, specifier: &str) -> Option<PathBuf> {
    let from_dir = from_file.parent().unwrap_or(Path::new(""));
    if specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".." {
        return resolve_file_like(&from_dir.join(specifier)).map(|p| normalize_path(&p));
    }
    if Path::new(specifier).is_absolute() {
        return resolve_file_like(Path::new(specifier)).map(|p| normalize_path(&p));
    }

    let mut dir = Some(from_dir);
    while let Some(current) = dir {
        let candidate = current.join("node_modules").join(specifier);
        if let Some(path) = resolve_file_like(&candidate) {
            return Some(normalize_path(&path));
        }
        // `@types/foo` for untyped packages; scoped `@a/b` maps to `@types/a__b`.
        let types_name = specifier.trim_start_matches('@').replacen('/', "__", 1);
        let types_candidate = current.join("node_modules").join("@types").join(types_name);
        if let Some(path) = resolve_file_like(&types_candidate) {
            return Some(normalize_path(&path));
        }
        dir = current.parent().filter(|p| !p.as_os_str().is_empty());
    }
    None
}

/// Result of resolving a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Declaration(DeclId),
    /// An import or re-export in `file` that still has to be followed.
    Alias {
        file: FileId,
        specifier: String,
        imported: String,
    },
    /// A whole module, reached through a namespace import.
    Module(FileId),
}

impl Program {
    /// One-step lookup of a module-level name in `file`.
    pub fn local_symbol(&self, file: FileId, name: &str) -> Option<Symbol> {
        match self.unit(file).symbols.locals.get(name)? {
            LocalBinding::Decl(id) => Some(Symbol::Declaration(*id)),
            LocalBinding::Import {
                specifier,
                imported,
            } => Some(Symbol::Alias {
                file,
                specifier: specifier.clone(),
                imported: imported.clone(),
            }),
            LocalBinding::Namespace { specifier } => Some(
                self.imported_module(file, specifier)
                    .map(Symbol::Module)
                    .unwrap_or_else(|| Symbol::Alias {
                        file,
                        specifier: specifier.clone(),
                        imported: "*".to_string(),
                    }),
            ),
        }
    }

    /// One-step lookup of an exported name of `file`, searching
    /// `export * from` targets when it is not exported directly.
    pub fn export_symbol(&self, file: FileId, name: &str) -> Option<Symbol> {
        let mut visited = HashSet::new();
        self.export_symbol_in(file, name, &mut visited)
    }

    fn export_symbol_in(&self, file: FileId, name: &str, visited: &mut HashSet<FileId>) -> Option<Symbol> {
        if !visited.insert(file) {
            return None;
        }
        let symbols = &self.unit(file).symbols;
        if let Some(target) = symbols.exports.get(name) {
            return match target {
                ExportTarget::Decl(id) => Some(Symbol::Declaration(*id)),
                ExportTarget::Local(local) => self.local_symbol(file, local),
                ExportTarget::Reexport {
                    specifier,
                    imported,
                } => Some(Symbol::Alias {
                    file,
                    specifier: specifier.clone(),
                    imported: imported.clone(),
                }),
                ExportTarget::Namespace { specifier } => {
                    self.imported_module(file, specifier).map(Symbol::Module)
                }
            };
        }
        if name == "default" {
            return None;
        }
        symbols.star_exports.iter().find_map(|specifier| {
            let target = self.imported_module(file, specifier)?;
            self.export_symbol_in(target, name, visited)
        })
    }

    /// Follow one alias hop. `None` when the target module or export is
    /// not part of the program.
    fn resolve_alias_step(&self, file: FileId, specifier: &str, imported: &str) -> Option<Symbol> {
        let target = self.imported_module(file, specifier)?;
        if imported == "*" {
            return Some(Symbol::Module(target));
        }
        self.export_symbol(target, imported)
    }

    /// Resolve `symbol` through its alias chain to the underlying
    /// declaration or module.
    ///
    /// A chain ending at an unresolvable alias (external or missing module,
    /// unknown export) stops at that alias. Cycles stop at the first alias
    /// seen twice.
    pub fn resolve_aliased_symbol(&self, symbol: Symbol) -> Symbol {
        let mut visited = HashSet::new();
        let mut current = symbol;
        loop {
            let Symbol::Alias {
                file,
                specifier,
                imported,
            } = &current
            else {
                return current;
            };
            if !visited.insert(current.clone()) {
                return current;
            }
            match self.resolve_alias_step(*file, specifier, imported) {
                Some(next) => current = next,
                None => return current,
            }
        }
    }

    /// Declarations a callee expression in `file` may refer to.
    ///
    /// Identifiers resolve through module bindings and import aliases;
    /// one bound by a parameter or local declaration resolves to nothing.
    /// `ns.name` resolves through a namespace import; any other property
    /// access resolves by name to every class member called `name`.
    pub fn callee_declarations(&self, file: FileId, callee: &Expr) -> Vec<DeclId> {
        let shadowed = &self.unit(file).shadowed_callees;
        match callee {
            Expr::Paren(paren) => self.callee_declarations(file, &paren.expr),
            Expr::TsNonNull(non_null) => self.callee_declarations(file, &non_null.expr),
            Expr::Ident(ident) if shadowed.contains(&ident.span.lo) => Vec::new(),
            Expr::Ident(ident) => self
                .local_symbol(file, ident.sym.as_str())
                .map(|symbol| self.resolve_aliased_symbol(symbol))
                .and_then(|symbol| match symbol {
                    Symbol::Declaration(id) => Some(vec![id]),
                    _ => None,
                })
                .unwrap_or_default(),
            Expr::Member(member) => {
                let name = match &member.prop {
                    MemberProp::Ident(ident) => ident.sym.to_string(),
                    MemberProp::Computed(computed) => match &*computed.expr {
                        Expr::Lit(swc_ecma_ast::Lit::Str(s)) => match s.value.as_str() {
                            Some(name) => name.to_string(),
                            None => return Vec::new(),
                        },
                        _ => return Vec::new(),
                    },
                    MemberProp::PrivateName(_) => return Vec::new(),
                };
                if let Expr::Ident(object) = &*member.obj
                    && !shadowed.contains(&object.span.lo)
                    && let Some(Symbol::Module(module)) = self
                        .local_symbol(file, object.sym.as_str())
                        .map(|symbol| self.resolve_aliased_symbol(symbol))
                {
                    return self
                        .export_symbol(module, &name)
                        .map(|symbol| self.resolve_aliased_symbol(symbol))
                        .and_then(|symbol| match symbol {
                            Symbol::Declaration(id) => Some(vec![id]),
                            _ => None,
                        })
                        .unwrap_or_default();
                }
                self.members_named(&name).to_vec()
            }
            _ => Vec::new(),
        }
    }

    /// Marker of the declaration a callee resolves to. When several
    /// declarations match, the first marked one wins.
    pub fn callee_marker(&self, file: FileId, callee: &Expr) -> Option<Marker> {
        self.callee_declarations(file, callee)
            .into_iter()
            .find_map(|id| self.declaration(id).marker)
    }
}
