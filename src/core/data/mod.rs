//! Core data types shared by every pass.
//!
//! ## Module Structure
//!
//! - `identity`: Text identities (`namespace.key`) and call-site records
//! - `source`: Source code location types (SourceContext, SourceLocation)
//! - `table`: Resource table location types (TableLocation, TableEntryContext)

pub mod identity;
pub mod source;
pub mod table;

pub use identity::{CallSite, CallSiteMap, DEFAULT_NAMESPACE, TextIdentity};
pub use source::{SourceContext, SourceLocation};
pub use table::{TableEntryContext, TableLocation};
