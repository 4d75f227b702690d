use std::collections::HashSet;

use anyhow::{Result, anyhow, bail};
use swc_common::Spanned;
use swc_ecma_ast::{CallExpr, Expr, ExprOrSpread, Lit, NewExpr, Prop, PropName, PropOrSpread};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    core::{
        CallSite, CallSiteMap, TextIdentity,
        extract::LookupCall,
        markers::{CONSTRUCTOR_MARKER, Marker},
        program::{FileId, Program},
    },
    issues::{
        CallShapeIssue, DuplicateConstructorIssue, Issue, MissingConstructorIssue,
        MissingLookupIssue,
    },
};

/// Output of the extraction pass.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Supported languages, in the order the constructor lists them.
    pub languages: Vec<String>,
    /// Required identities in first-seen order.
    pub identities: Vec<TextIdentity>,
    /// Every lookup call site, per identity, in traversal order.
    pub call_sites: CallSiteMap,
    pub issues: Vec<Issue>,
}

impl Extraction {
    pub fn contains(&self, identity: &TextIdentity) -> bool {
        self.call_sites.contains_key(identity)
    }

    /// First call site of `identity`.
    pub fn first_call_site(&self, identity: &TextIdentity) -> Option<&CallSite> {
        self.call_sites.get(identity).and_then(|sites| sites.first())
    }
}

fn prop_language(prop: &PropOrSpread) -> Result<String> {
    let PropOrSpread::Prop(prop) = prop else {
        bail!("i18n constructor argument must not contain spreads");
    };
    let key = match &**prop {
        Prop::KeyValue(kv) => &kv.key,
        Prop::Shorthand(ident) => return Ok(ident.sym.to_string()),
        _ => bail!("i18n constructor argument must only contain property assignments"),
    };
    match key {
        PropName::Str(s) => s
            .value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("i18n constructor property name is not valid UTF-8")),
        PropName::Ident(ident) => Ok(ident.sym.to_string()),
        _ => bail!("i18n constructor property name must be a string literal"),
    }
}

fn element_language(element: &Option<ExprOrSpread>) -> Result<String> {
    match element {
        Some(ExprOrSpread { spread: None, expr }) => match &**expr {
            Expr::Lit(Lit::Str(s)) => s
                .value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow!("i18n constructor language is not valid UTF-8")),
            _ => bail!("i18n constructor languages must be string literals"),
        },
        _ => bail!("i18n constructor languages must be string literals"),
    }
}

/// Languages listed by an i18n constructor call.
///
/// Accepts an object literal keyed by language as the first argument, or
/// the first array literal of language strings.
fn constructor_languages(args: &[ExprOrSpread]) -> Result<Vec<String>> {
    let Some(first) = args.first() else {
        bail!("i18n constructor must have at least one argument");
    };

    let languages = if let Expr::Object(object) = &*first.expr {
        object
            .props
            .iter()
            .map(prop_language)
            .collect::<Result<Vec<_>>>()?
    } else if let Some(array) = args.iter().find_map(|arg| match &*arg.expr {
        Expr::Array(array) => Some(array),
        _ => None,
    }) {
        array
            .elems
            .iter()
            .map(element_language)
            .collect::<Result<Vec<_>>>()?
    } else {
        bail!("i18n constructor needs an object literal or an array literal of languages");
    };

    let mut seen = HashSet::new();
    Ok(languages
        .into_iter()
        .filter(|language| seen.insert(language.clone()))
        .collect())
}

#[derive(Default)]
struct ExtractState {
    languages: Option<Vec<String>>,
    seen: HashSet<TextIdentity>,
    extraction: Extraction,
    fatal: Option<anyhow::Error>,
}

struct ExtractVisitor<'a> {
    program: &'a Program,
    file: FileId,
    state: &'a mut ExtractState,
}

impl ExtractVisitor<'_> {
    fn is_constructor(&self, node: &NewExpr) -> bool {
        self.program.leading_comment(self.file, node.span.lo).contains(CONSTRUCTOR_MARKER)
            || self.program.callee_marker(self.file, &node.callee) == Some(Marker::Constructor)
    }

    fn record_constructor(&mut self, node: &NewExpr) {
        if self.state.languages.is_some() {
            let context = self.program.source_context(self.file, node.span.lo);
            self.state
                .extraction
                .issues
                .push(Issue::DuplicateConstructor(DuplicateConstructorIssue { context }));
            return;
        }
        let args = node.args.as_deref().unwrap_or_default();
        match constructor_languages(args) {
            Ok(languages) => self.state.languages = Some(languages),
            Err(e) => {
                let ctx = self.program.source_context(self.file, node.span.lo);
                self.state.fatal = Some(e.context(format!(
                    "invalid i18n constructor at {}:{}:{}",
                    ctx.file_path(),
                    ctx.line(),
                    ctx.col()
                )));
            }
        }
    }

    fn record_lookup(&mut self, node: &CallExpr) {
        let Some(result) = LookupCall::classify(self.program, self.file, node) else {
            return;
        };
        let context = self.program.source_context(self.file, node.span.lo);
        match result {
            Ok(lookup) => {
                let extraction = &mut self.state.extraction;
                if self.state.seen.insert(lookup.identity.clone()) {
                    extraction.identities.push(lookup.identity.clone());
                }
                let unit = self.program.unit(self.file);
                extraction
                    .call_sites
                    .entry(lookup.identity)
                    .or_default()
                    .push(CallSite {
                        file: self.file,
                        offset: unit.parsed.offset_of(node.span().lo),
                        context,
                    });
            }
            Err(reason) => self
                .state
                .extraction
                .issues
                .push(Issue::CallShape(CallShapeIssue { context, reason })),
        }
    }
}

impl Visit for ExtractVisitor<'_> {
    fn visit_new_expr(&mut self, node: &NewExpr) {
        if self.state.fatal.is_some() {
            return;
        }
        if self.is_constructor(node) {
            self.record_constructor(node);
        }
        node.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.state.fatal.is_some() {
            return;
        }
        // Pre-order: this call before any lookup nested in its arguments.
        self.record_lookup(node);
        node.visit_children_with(self);
    }
}

/// Run the extraction pass over every root file of `program`, in
/// enumeration order.
///
/// Malformed constructor arguments abort the pass. Everything else is
/// reported through [`Extraction::issues`].
pub fn extract(program: &Program) -> Result<Extraction> {
    let mut state = ExtractState::default();

    for (file, unit) in program.root_files() {
        let mut visitor = ExtractVisitor {
            program,
            file,
            state: &mut state,
        };
        unit.parsed.module.visit_with(&mut visitor);
        if let Some(e) = state.fatal.take() {
            return Err(e);
        }
    }

    let mut extraction = state.extraction;
    match state.languages {
        Some(languages) => extraction.languages = languages,
        None => extraction
            .issues
            .push(Issue::MissingConstructor(MissingConstructorIssue)),
    }
    if !program.has_lookup_methods() {
        extraction.issues.push(Issue::MissingLookup(MissingLookupIssue));
    }
    Ok(extraction)
}
