use std::{collections::HashMap, fmt};

use crate::core::data::SourceContext;
use crate::core::program::FileId;

/// Namespace used by the unqualified lookup form (`locText("key")`).
pub const DEFAULT_NAMESPACE: &str = "default";

/// One translatable unit: a key inside a namespace.
///
/// Serialized canonically as `"{namespace}.{key}"`. Namespaces never contain a
/// dot, keys may (they are usually whole sentences), so the canonical form is
/// split at the first dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextIdentity {
    pub namespace: String,
    pub key: String,
}

impl TextIdentity {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// Identity in the default namespace.
    pub fn default_ns(key: impl Into<String>) -> Self {
        Self::new(DEFAULT_NAMESPACE, key)
    }

    /// Parse the canonical `namespace.key` form.
    ///
    /// ```
    /// use loctext::core::TextIdentity;
    ///
    /// let id = TextIdentity::parse("default.Hello. World").unwrap();
    /// assert_eq!(id.namespace, "default");
    /// assert_eq!(id.key, "Hello. World");
    /// assert!(TextIdentity::parse("nodot").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let (namespace, key) = text.split_once('.')?;
        if namespace.is_empty() {
            return None;
        }
        Some(Self::new(namespace, key))
    }
}

impl fmt::Display for TextIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

/// A single occurrence of a lookup call in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Program file the call lives in.
    pub file: FileId,
    /// Byte offset of the call expression start within the file text.
    pub offset: usize,
    pub context: SourceContext,
}

/// Every recorded call site, per identity, in traversal order.
pub type CallSiteMap = HashMap<TextIdentity, Vec<CallSite>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let id = TextIdentity::new("editor", "Save file.");
        assert_eq!(id.to_string(), "editor.Save file.");
        assert_eq!(TextIdentity::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn test_default_namespace() {
        let id = TextIdentity::default_ns("Hello");
        assert_eq!(id.to_string(), "default.Hello");
    }

    #[test]
    fn test_parse_rejects_empty_namespace() {
        assert!(TextIdentity::parse(".Hello").is_none());
    }
}
