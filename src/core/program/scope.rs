//! Local scopes: names bound by parameters and by declarations inside
//! functions and blocks. A callee identifier bound this way refers to the
//! local binding, not to a module-level declaration of the same name.

use std::collections::HashSet;

use swc_common::BytePos;
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CallExpr, Callee, CatchClause, Class, Constructor,
    Decl, Expr, ForHead, ForInStmt, ForOfStmt, ForStmt, Function, Module, ObjectPatProp,
    ParamOrTsParamProp, Pat, Stmt, TsParamPropParam, VarDecl, VarDeclKind, VarDeclOrExpr,
};
use swc_ecma_visit::{Visit, VisitWith};

/// Names bound by a pattern.
fn pat_names(pat: &Pat, out: &mut HashSet<String>) {
    match pat {
        Pat::Ident(binding) => {
            out.insert(binding.id.sym.to_string());
        }
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pat_names(elem, out);
            }
        }
        Pat::Rest(rest) => pat_names(&rest.arg, out),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pat_names(&kv.value, out),
                    ObjectPatProp::Assign(assign) => {
                        out.insert(assign.key.id.sym.to_string());
                    }
                    ObjectPatProp::Rest(rest) => pat_names(&rest.arg, out),
                }
            }
        }
        Pat::Assign(assign) => pat_names(&assign.left, out),
        _ => {}
    }
}

fn var_decl_names(decl: &VarDecl, out: &mut HashSet<String>) {
    for declarator in &decl.decls {
        pat_names(&declarator.name, out);
    }
}

/// `var` declarations of one function body; nested functions and classes
/// have their own.
#[derive(Default)]
struct HoistedVars {
    names: HashSet<String>,
}

impl Visit for HoistedVars {
    fn visit_var_decl(&mut self, node: &VarDecl) {
        if node.kind == VarDeclKind::Var {
            var_decl_names(node, &mut self.names);
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}
}

fn hoisted_vars(body: &BlockStmt) -> HashSet<String> {
    let mut collector = HoistedVars::default();
    body.visit_with(&mut collector);
    collector.names
}

/// Block-scoped declarations directly inside `stmts`.
fn lexical_names(stmts: &[Stmt]) -> HashSet<String> {
    let mut names = HashSet::new();
    for stmt in stmts {
        match stmt {
            Stmt::Decl(Decl::Var(var)) if var.kind != VarDeclKind::Var => {
                var_decl_names(var, &mut names);
            }
            Stmt::Decl(Decl::Fn(function)) => {
                names.insert(function.ident.sym.to_string());
            }
            Stmt::Decl(Decl::Class(class)) => {
                names.insert(class.ident.sym.to_string());
            }
            _ => {}
        }
    }
    names
}

#[derive(Default)]
struct ScopeVisitor {
    scopes: Vec<HashSet<String>>,
    shadowed: HashSet<BytePos>,
}

impl ScopeVisitor {
    fn is_local(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn in_scope(&mut self, names: HashSet<String>, visit: impl FnOnce(&mut Self)) {
        self.scopes.push(names);
        visit(self);
        self.scopes.pop();
    }

    fn callee_ident_start(&self, callee: &Expr) -> Option<BytePos> {
        match callee {
            Expr::Paren(paren) => self.callee_ident_start(&paren.expr),
            Expr::TsNonNull(non_null) => self.callee_ident_start(&non_null.expr),
            Expr::Ident(ident) if self.is_local(&ident.sym) => Some(ident.span.lo),
            Expr::Member(member) => match &*member.obj {
                Expr::Ident(object) if self.is_local(&object.sym) => Some(object.span.lo),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Visit for ScopeVisitor {
    fn visit_function(&mut self, node: &Function) {
        let mut names = HashSet::new();
        for param in &node.params {
            pat_names(&param.pat, &mut names);
        }
        if let Some(body) = &node.body {
            names.extend(hoisted_vars(body));
        }
        self.in_scope(names, |v| node.visit_children_with(v));
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let mut names = HashSet::new();
        for param in &node.params {
            pat_names(param, &mut names);
        }
        if let BlockStmtOrExpr::BlockStmt(body) = &*node.body {
            names.extend(hoisted_vars(body));
        }
        self.in_scope(names, |v| node.visit_children_with(v));
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        let mut names = HashSet::new();
        for param in &node.params {
            match param {
                ParamOrTsParamProp::Param(param) => pat_names(&param.pat, &mut names),
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(binding) => {
                        names.insert(binding.id.sym.to_string());
                    }
                    TsParamPropParam::Assign(assign) => pat_names(&assign.left, &mut names),
                },
            }
        }
        if let Some(body) = &node.body {
            names.extend(hoisted_vars(body));
        }
        self.in_scope(names, |v| node.visit_children_with(v));
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.in_scope(lexical_names(&node.stmts), |v| node.visit_children_with(v));
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        let mut names = HashSet::new();
        if let Some(param) = &node.param {
            pat_names(param, &mut names);
        }
        self.in_scope(names, |v| node.visit_children_with(v));
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        let mut names = HashSet::new();
        if let Some(VarDeclOrExpr::VarDecl(var)) = &node.init {
            var_decl_names(var, &mut names);
        }
        self.in_scope(names, |v| node.visit_children_with(v));
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        let mut names = HashSet::new();
        if let ForHead::VarDecl(var) = &node.left {
            var_decl_names(var, &mut names);
        }
        self.in_scope(names, |v| node.visit_children_with(v));
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        let mut names = HashSet::new();
        if let ForHead::VarDecl(var) = &node.left {
            var_decl_names(var, &mut names);
        }
        self.in_scope(names, |v| node.visit_children_with(v));
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && let Some(pos) = self.callee_ident_start(callee)
        {
            self.shadowed.insert(pos);
        }
        node.visit_children_with(self);
    }
}

/// Start positions of callee identifiers (or callee member objects) that
/// refer to a local binding.
pub fn shadowed_callees(module: &Module) -> HashSet<BytePos> {
    let mut visitor = ScopeVisitor::default();
    module.visit_with(&mut visitor);
    visitor.shadowed
}
