use swc_common::Span;
use swc_ecma_ast::{CallExpr, Callee, ExprOrSpread, Expr, Lit};

use crate::{
    core::{
        TextIdentity,
        markers::Marker,
        program::{FileId, Program},
    },
    issues::CallShapeReason,
};

/// A call to a marked lookup method with literal arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupCall {
    pub marker: Marker,
    pub identity: TextIdentity,
    /// Span of the key string literal; the minifier replaces exactly this.
    pub key_span: Span,
}

/// String value and span of a string-literal argument.
fn literal_arg(
    args: &[ExprOrSpread],
    index: usize,
    not_literal: CallShapeReason,
) -> Result<(String, Span), CallShapeReason> {
    let arg = &args[index];
    if arg.spread.is_some() {
        return Err(CallShapeReason::SpreadArgument);
    }
    match &*arg.expr {
        Expr::Lit(Lit::Str(s)) => s
            .value
            .as_str()
            .map(|value| (value.to_string(), s.span))
            .ok_or(not_literal),
        _ => Err(not_literal),
    }
}

/// Namespaces name files and prefix the canonical `namespace.key` form.
fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty() && !namespace.contains(['.', '/', '\\'])
}

impl LookupCall {
    /// Classify `call` in `file`.
    ///
    /// Returns `None` when the callee is not a marked lookup method,
    /// `Some(Err(..))` when it is but the arguments have the wrong shape.
    pub fn classify(
        program: &Program,
        file: FileId,
        call: &CallExpr,
    ) -> Option<Result<Self, CallShapeReason>> {
        let Callee::Expr(callee) = &call.callee else {
            return None;
        };
        let marker = program.callee_marker(file, callee)?;
        let args = &call.args;

        let result = match marker {
            Marker::Lookup => {
                if args.is_empty() {
                    Err(CallShapeReason::MissingArguments {
                        expected: 1,
                        found: 0,
                    })
                } else {
                    literal_arg(args, 0, CallShapeReason::KeyNotLiteral).map(|(key, key_span)| {
                        Self {
                            marker,
                            identity: TextIdentity::default_ns(key),
                            key_span,
                        }
                    })
                }
            }
            Marker::NsLookup => {
                if args.len() < 2 {
                    Err(CallShapeReason::MissingArguments {
                        expected: 2,
                        found: args.len(),
                    })
                } else {
                    literal_arg(args, 0, CallShapeReason::NamespaceNotLiteral).and_then(|(namespace, _)| {
                        if !is_valid_namespace(&namespace) {
                            return Err(CallShapeReason::InvalidNamespace(namespace));
                        }
                        literal_arg(args, 1, CallShapeReason::KeyNotLiteral).map(|(key, key_span)| Self {
                            marker,
                            identity: TextIdentity::new(namespace, key),
                            key_span,
                        })
                    })
                }
            }
            Marker::Constructor => return None,
        };
        Some(result)
    }
}
