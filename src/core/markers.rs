//! Sentinel substrings that tag declarations in leading comments.

/// Tags the i18n class (or a single `new` expression) whose constructor
/// arguments list the supported languages.
pub const CONSTRUCTOR_MARKER: &str = "I18NCONSTRUCTORSYMBOL";
/// Tags the default-namespace lookup method: `locText(key, ...args)`.
pub const LOOKUP_MARKER: &str = "I18NLOCTEXTSYMBOL";
/// Tags the namespace-qualified lookup method: `nsLocText(ns, key, ...args)`.
pub const NS_LOOKUP_MARKER: &str = "I18NNSLOCTEXTSYMBOL";

pub const TABLE_START_MARKER: &str = "I18NTABLESYMBOL";
pub const TABLE_END_MARKER: &str = "I18NTABLEEND";

/// Role a declaration plays in the i18n pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Constructor,
    Lookup,
    NsLookup,
}

impl Marker {
    /// Classify raw comment text.
    ///
    /// `I18NNSLOCTEXTSYMBOL` is checked first: it does not contain
    /// `I18NLOCTEXTSYMBOL`, but a comment tagging both roles resolves to the
    /// namespaced form.
    pub fn from_comment(text: &str) -> Option<Self> {
        if text.contains(NS_LOOKUP_MARKER) {
            Some(Self::NsLookup)
        } else if text.contains(LOOKUP_MARKER) {
            Some(Self::Lookup)
        } else if text.contains(CONSTRUCTOR_MARKER) {
            Some(Self::Constructor)
        } else {
            None
        }
    }

    pub fn is_lookup(self) -> bool {
        matches!(self, Self::Lookup | Self::NsLookup)
    }
}
