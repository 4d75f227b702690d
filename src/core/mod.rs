//! The i18n engine.
//!
//! ## Module Structure
//!
//! - `data`: Identities, call sites and location types
//! - `markers`: Marker comments and table delimiters
//! - `parsers`: Source parsing (swc) and resource file parsing
//! - `file_scanner`: Source file discovery
//! - `program`: Parsed program with symbol and alias resolution
//! - `extract`: Extraction pass (languages, identities, call sites)
//! - `sync`: Resource table store and synchronizer
//! - `minify`: Index assignment and the rewrite pass
//! - `translate`: Machine translation orchestration
//! - `context`: Per-invocation cache shared by every pass

pub mod context;
pub mod data;
pub mod extract;
pub mod file_scanner;
pub mod markers;
pub mod minify;
pub mod parsers;
pub mod program;
pub mod sync;
pub mod translate;

pub use context::BuildContext;
pub use data::{
    CallSite, CallSiteMap, DEFAULT_NAMESPACE, SourceContext, SourceLocation, TableEntryContext,
    TableLocation, TextIdentity,
};
