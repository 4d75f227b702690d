//! Per-module symbol tables: top-level declarations, imports and exports.

use std::collections::HashMap;

use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    ClassMember, Decl, DefaultDecl, ExportSpecifier, Expr, ImportSpecifier, Module, ModuleDecl,
    ModuleExportName, ModuleItem, Pat, PropName, Stmt,
};

use crate::core::{
    markers::Marker,
    parsers::source::ExtractedComments,
    program::{DeclId, FileId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Function,
    Class,
    Variable,
    /// Method or property of a class.
    Member,
}

/// A named declaration somewhere in the program.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub file: FileId,
    /// Raw text of the leading comments, including those before `export`.
    pub comment: String,
    pub marker: Option<Marker>,
    /// Class declaring this member.
    pub owner: Option<DeclId>,
}

/// What a module-level name is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalBinding {
    Decl(DeclId),
    /// `import { imported as local } from "specifier"`; default imports use
    /// `imported == "default"`.
    Import { specifier: String, imported: String },
    /// `import * as local from "specifier"`
    Namespace { specifier: String },
}

/// What an exported name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Decl(DeclId),
    /// `export { local as name }`
    Local(String),
    /// `export { imported as name } from "specifier"`
    Reexport { specifier: String, imported: String },
    /// `export * as name from "specifier"`
    Namespace { specifier: String },
}

#[derive(Debug, Clone, Default)]
pub struct ModuleSymbols {
    pub locals: HashMap<String, LocalBinding>,
    pub exports: HashMap<String, ExportTarget>,
    /// Specifiers of `export * from "..."`, in source order.
    pub star_exports: Vec<String>,
    /// Every module specifier this file depends on, in source order.
    pub specifiers: Vec<String>,
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string_lossy().to_string(),
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

fn join_comments(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

struct SymbolCollector<'a> {
    file: FileId,
    comments: &'a ExtractedComments,
    declarations: &'a mut Vec<Declaration>,
    symbols: ModuleSymbols,
}

impl SymbolCollector<'_> {
    fn comment_at(&self, positions: &[BytePos]) -> String {
        let parts: Vec<String> = positions
            .iter()
            .map(|pos| self.comments.leading_text(*pos))
            .collect();
        join_comments(&parts)
    }

    fn push(&mut self, name: String, kind: DeclKind, comment: String, owner: Option<DeclId>) -> DeclId {
        let id = self.declarations.len();
        self.declarations.push(Declaration {
            name,
            kind,
            file: self.file,
            marker: Marker::from_comment(&comment),
            comment,
            owner,
        });
        id
    }

    /// Bind a top-level name. Overload signatures share a name; the one
    /// carrying a marker wins.
    fn bind(&mut self, name: &str, id: DeclId, exported: bool) {
        let keep_existing = match self.symbols.locals.get(name) {
            Some(LocalBinding::Decl(existing)) => {
                self.declarations[*existing].marker.is_some()
                    && self.declarations[id].marker.is_none()
            }
            _ => false,
        };
        if keep_existing {
            return;
        }
        self.symbols
            .locals
            .insert(name.to_string(), LocalBinding::Decl(id));
        if exported {
            self.symbols
                .exports
                .insert(name.to_string(), ExportTarget::Decl(id));
        }
    }

    fn collect_class(&mut self, name: String, class: &swc_ecma_ast::Class, comment: String) -> DeclId {
        let class_id = self.push(name, DeclKind::Class, comment, None);
        for member in &class.body {
            let (key, span_lo) = match member {
                ClassMember::Method(m) => (&m.key, m.span.lo),
                ClassMember::ClassProp(p) => (&p.key, p.span.lo),
                _ => continue,
            };
            let Some(member_name) = prop_name(key) else {
                continue;
            };
            let comment = self.comment_at(&[span_lo, key.span().lo]);
            self.push(member_name, DeclKind::Member, comment, Some(class_id));
        }
        class_id
    }

    fn collect_decl(&mut self, decl: &Decl, export_pos: Option<BytePos>, exported: bool) {
        let mut positions: Vec<BytePos> = export_pos.into_iter().collect();
        match decl {
            Decl::Fn(f) => {
                positions.push(f.function.span.lo);
                let comment = self.comment_at(&positions);
                let name = f.ident.sym.to_string();
                let id = self.push(name.clone(), DeclKind::Function, comment, None);
                self.bind(&name, id, exported);
            }
            Decl::Class(c) => {
                positions.push(c.class.span.lo);
                let comment = self.comment_at(&positions);
                let name = c.ident.sym.to_string();
                let id = self.collect_class(name.clone(), &c.class, comment);
                self.bind(&name, id, exported);
            }
            Decl::Var(v) => {
                positions.push(v.span.lo);
                let comment = self.comment_at(&positions);
                for declarator in &v.decls {
                    if let Pat::Ident(binding) = &declarator.name {
                        let name = binding.id.sym.to_string();
                        let id = self.push(name.clone(), DeclKind::Variable, comment.clone(), None);
                        self.bind(&name, id, exported);
                    }
                }
            }
            _ => {}
        }
    }

    fn collect_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                let Some(specifier) = import.src.value.as_str() else {
                    return;
                };
                self.symbols.specifiers.push(specifier.to_string());
                for spec in &import.specifiers {
                    let (local, binding) = match spec {
                        ImportSpecifier::Named(named) => {
                            let local = named.local.sym.to_string();
                            let imported = named
                                .imported
                                .as_ref()
                                .map(export_name)
                                .unwrap_or_else(|| local.clone());
                            (
                                local,
                                LocalBinding::Import {
                                    specifier: specifier.to_string(),
                                    imported,
                                },
                            )
                        }
                        ImportSpecifier::Default(default) => (
                            default.local.sym.to_string(),
                            LocalBinding::Import {
                                specifier: specifier.to_string(),
                                imported: "default".to_string(),
                            },
                        ),
                        ImportSpecifier::Namespace(ns) => (
                            ns.local.sym.to_string(),
                            LocalBinding::Namespace {
                                specifier: specifier.to_string(),
                            },
                        ),
                    };
                    self.symbols.locals.insert(local, binding);
                }
            }
            ModuleDecl::ExportDecl(export) => {
                self.collect_decl(&export.decl, Some(export.span.lo), true);
            }
            ModuleDecl::ExportNamed(named) => {
                let source = named
                    .src
                    .as_ref()
                    .and_then(|s| s.value.as_str())
                    .map(str::to_string);
                if let Some(specifier) = &source {
                    self.symbols.specifiers.push(specifier.clone());
                }
                for spec in &named.specifiers {
                    let (exported, target) = match (spec, &source) {
                        (ExportSpecifier::Named(n), Some(specifier)) => {
                            let orig = export_name(&n.orig);
                            let exported = n.exported.as_ref().map(export_name).unwrap_or(orig.clone());
                            (
                                exported,
                                ExportTarget::Reexport {
                                    specifier: specifier.clone(),
                                    imported: orig,
                                },
                            )
                        }
                        (ExportSpecifier::Named(n), None) => {
                            let orig = export_name(&n.orig);
                            let exported = n.exported.as_ref().map(export_name).unwrap_or(orig.clone());
                            (exported, ExportTarget::Local(orig))
                        }
                        (ExportSpecifier::Namespace(ns), Some(specifier)) => (
                            export_name(&ns.name),
                            ExportTarget::Namespace {
                                specifier: specifier.clone(),
                            },
                        ),
                        (ExportSpecifier::Default(d), Some(specifier)) => (
                            d.exported.sym.to_string(),
                            ExportTarget::Reexport {
                                specifier: specifier.clone(),
                                imported: "default".to_string(),
                            },
                        ),
                        _ => continue,
                    };
                    self.symbols.exports.insert(exported, target);
                }
            }
            ModuleDecl::ExportDefaultDecl(default) => {
                let id = match &default.decl {
                    DefaultDecl::Fn(f) => {
                        let comment = self.comment_at(&[default.span.lo, f.function.span.lo]);
                        let name = f
                            .ident
                            .as_ref()
                            .map(|i| i.sym.to_string())
                            .unwrap_or_else(|| "default".to_string());
                        let id = self.push(name.clone(), DeclKind::Function, comment, None);
                        if f.ident.is_some() {
                            self.bind(&name, id, false);
                        }
                        id
                    }
                    DefaultDecl::Class(c) => {
                        let comment = self.comment_at(&[default.span.lo, c.class.span.lo]);
                        let name = c
                            .ident
                            .as_ref()
                            .map(|i| i.sym.to_string())
                            .unwrap_or_else(|| "default".to_string());
                        let id = self.collect_class(name.clone(), &c.class, comment);
                        if c.ident.is_some() {
                            self.bind(&name, id, false);
                        }
                        id
                    }
                    DefaultDecl::TsInterfaceDecl(_) => return,
                };
                self.symbols
                    .exports
                    .insert("default".to_string(), ExportTarget::Decl(id));
            }
            ModuleDecl::ExportDefaultExpr(default) => {
                if let Expr::Ident(ident) = &*default.expr {
                    self.symbols
                        .exports
                        .insert("default".to_string(), ExportTarget::Local(ident.sym.to_string()));
                }
            }
            ModuleDecl::ExportAll(all) => {
                if let Some(specifier) = all.src.value.as_str() {
                    self.symbols.specifiers.push(specifier.to_string());
                    self.symbols.star_exports.push(specifier.to_string());
                }
            }
            _ => {}
        }
    }
}

/// Collect the symbol table of one module, appending its declarations to
/// the program-wide declaration list.
pub fn collect_symbols(
    file: FileId,
    module: &Module,
    comments: &ExtractedComments,
    declarations: &mut Vec<Declaration>,
) -> ModuleSymbols {
    let mut collector = SymbolCollector {
        file,
        comments,
        declarations,
        symbols: ModuleSymbols::default(),
    };
    for item in &module.body {
        match item {
            ModuleItem::ModuleDecl(decl) => collector.collect_module_decl(decl),
            ModuleItem::Stmt(Stmt::Decl(decl)) => collector.collect_decl(decl, None, false),
            ModuleItem::Stmt(_) => {}
        }
    }
    collector.symbols
}
