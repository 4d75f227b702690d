//! Key minification: index assignment over the resource tables, then a
//! rewrite of mature call sites to their ordinals.
//!
//! Both halves read the same [`ReplacementTable`], built once per run.

mod replacement;
mod rewriter;

pub use replacement::{Replacement, ReplacementEntry, ReplacementTable};
pub use rewriter::{RewriteOutcome, RewrittenFile, rewrite_program, rewrite_table};
