//! Extraction pass: supported languages, required identities and call sites.
//!
//! - `lookup`: classification of a call expression as a lookup call; shared
//!   with the minifying rewrite so both passes agree on every call site
//! - `extractor`: the traversal over every root file

mod extractor;
mod lookup;

pub use extractor::{Extraction, extract};
pub use lookup::LookupCall;
