//! Resource table files: opaque boilerplate around one JSON table region.
//!
//! A table file looks like:
//!
//! ```text
//! /* eslint-disable */
//!
//! /** I18NTABLESYMBOL */
//! export default {
//!     "Hello": "안녕"
//! }; /** I18NTABLEEND */
//! ```
//!
//! The region runs from the first `{` after the start marker (or the first
//! `{` of the file when there is no start marker) to the last `}` before the
//! end marker. Everything outside it is kept byte-for-byte on rewrite.

use std::ops::Range;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use crate::{
    core::markers::{TABLE_END_MARKER, TABLE_START_MARKER},
    utils::{build_line_index, offset_to_line},
};

/// Ordered key → translated value mapping of one (namespace, language) file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTable {
    entries: Map<String, Value>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`. New keys go to the end.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Value::String(value.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str().unwrap_or_default()))
    }

    /// Parse a JSON object whose values are all strings.
    fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        let Value::Object(entries) = value else {
            bail!("table region is not an object");
        };
        if let Some((key, _)) = entries.iter().find(|(_, v)| !v.is_string()) {
            bail!("value of \"{}\" is not a string", key);
        }
        Ok(Self { entries })
    }

    /// 4-space indented JSON, insertion order preserved.
    fn to_json(&self) -> Result<String> {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.entries.serialize(&mut serializer)?;
        Ok(String::from_utf8(out)?)
    }
}

impl FromIterator<(String, String)> for ResourceTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

/// A placeholder entry is one whose value is still its own key.
pub fn is_placeholder(key: &str, value: &str) -> bool {
    key == value
}

/// Byte offset of the object key `key` inside the JSON text `json`.
///
/// Walks the string tokens of the text; a token followed by `:` is a key
/// and is decoded before comparing.
fn key_offset(json: &str, key: &str) -> Option<usize> {
    let bytes = json.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'"' {
            i += 1;
            continue;
        }
        let start = i;
        i += 1;
        while i < bytes.len() && bytes[i] != b'"' {
            i += if bytes[i] == b'\\' { 2 } else { 1 };
        }
        let end = (i + 1).min(bytes.len());
        i = end;
        let is_key = json[end..].trim_start().starts_with(':');
        if is_key && serde_json::from_str::<String>(&json[start..end]).ok().as_deref() == Some(key) {
            return Some(start);
        }
    }
    None
}

/// A parsed resource file: the table plus the text surrounding it.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    source: String,
    region: Range<usize>,
    pub table: ResourceTable,
}

impl ResourceFile {
    /// Parse file content, locating the table region by its delimiters.
    pub fn parse(source: String) -> Result<Self> {
        let end_marker = source
            .find(TABLE_END_MARKER)
            .ok_or_else(|| anyhow!("missing {} marker", TABLE_END_MARKER))?;
        let search_from = source[..end_marker]
            .find(TABLE_START_MARKER)
            .map(|pos| pos + TABLE_START_MARKER.len())
            .unwrap_or(0);
        let open = source[search_from..end_marker]
            .find('{')
            .map(|pos| search_from + pos)
            .ok_or_else(|| anyhow!("no table literal before {}", TABLE_END_MARKER))?;
        let close = source[open..end_marker]
            .rfind('}')
            .map(|pos| open + pos)
            .ok_or_else(|| anyhow!("unterminated table literal"))?;

        let region = open..close + 1;
        let table = ResourceTable::from_json(&source[region.clone()])
            .context("table region is not a valid JSON object of strings")?;

        Ok(Self {
            source,
            region,
            table,
        })
    }

    /// Minimal file for a table that does not exist yet.
    pub fn scaffold() -> Self {
        let prefix = format!("/* eslint-disable */\n\n/** {} */\nexport default ", TABLE_START_MARKER);
        let source = format!("{}{{}}; /** {} */\n", prefix, TABLE_END_MARKER);
        let region = prefix.len()..prefix.len() + 2;
        Self {
            source,
            region,
            table: ResourceTable::new(),
        }
    }

    /// File content with `table` spliced into the region.
    pub fn render_with(&self, table: &ResourceTable) -> Result<String> {
        let json = table.to_json()?;
        Ok(format!(
            "{}{}{}",
            &self.source[..self.region.start],
            json,
            &self.source[self.region.end..]
        ))
    }

    /// File content with the current table.
    pub fn render(&self) -> Result<String> {
        self.render_with(&self.table)
    }

    /// 1-based line of `key` inside the file as it was read.
    ///
    /// Keys are compared after unescaping, so `"\u00e9"` in the file
    /// matches the key `é`.
    pub fn key_line(&self, key: &str) -> Option<usize> {
        let offset = self.region.start + key_offset(&self.source[self.region.clone()], key)?;
        Some(offset_to_line(&build_line_index(&self.source), offset))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = "/* eslint-disable */\n\n/** I18NTABLESYMBOL */\nexport default {\n    \"Hello\": \"안녕\",\n    \"Bye\": \"Bye\"\n}; /** I18NTABLEEND */\n\nexport const dynamic = { \"x\": \"y\" };\n";

    #[test]
    fn test_parse_table_region() {
        let file = ResourceFile::parse(SAMPLE.to_string()).unwrap();
        assert_eq!(file.table.len(), 2);
        assert_eq!(file.table.get("Hello"), Some("안녕"));
        let keys: Vec<_> = file.table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Hello", "Bye"]);
    }

    #[test]
    fn test_render_unchanged_round_trips() {
        let file = ResourceFile::parse(SAMPLE.to_string()).unwrap();
        assert_eq!(file.render().unwrap(), SAMPLE);
    }

    #[test]
    fn test_render_preserves_surrounding_text() {
        let mut file = ResourceFile::parse(SAMPLE.to_string()).unwrap();
        file.table.insert("New", "New");
        let rendered = file.render().unwrap();
        assert!(rendered.starts_with("/* eslint-disable */\n\n/** I18NTABLESYMBOL */\nexport default {\n"));
        assert!(rendered.contains("    \"New\": \"New\"\n}; /** I18NTABLEEND */"));
        assert!(rendered.ends_with("export const dynamic = { \"x\": \"y\" };\n"));
    }

    #[test]
    fn test_scaffold() {
        let mut file = ResourceFile::scaffold();
        assert_eq!(
            file.render().unwrap(),
            "/* eslint-disable */\n\n/** I18NTABLESYMBOL */\nexport default {}; /** I18NTABLEEND */\n"
        );
        file.table.insert("Hello", "Hello");
        assert_eq!(
            file.render().unwrap(),
            "/* eslint-disable */\n\n/** I18NTABLESYMBOL */\nexport default {\n    \"Hello\": \"Hello\"\n}; /** I18NTABLEEND */\n"
        );
        // A rendered scaffold parses back.
        let reparsed = ResourceFile::parse(file.render().unwrap()).unwrap();
        assert_eq!(reparsed.table, file.table);
    }

    #[test]
    fn test_key_line() {
        let file = ResourceFile::parse(SAMPLE.to_string()).unwrap();
        assert_eq!(file.key_line("Hello"), Some(5));
        assert_eq!(file.key_line("Bye"), Some(6));
        assert_eq!(file.key_line("Missing"), None);
    }

    #[test]
    fn test_key_line_with_escaped_key() {
        let source = "/** I18NTABLESYMBOL */\nexport default {\n    \"Caf\\u00e9\": \"Coffee\",\n    \"say \\\"hi\\\"\": \"Caf\\u00e9\"\n}; /** I18NTABLEEND */\n";
        let file = ResourceFile::parse(source.to_string()).unwrap();
        assert_eq!(file.key_line("Café"), Some(3));
        assert_eq!(file.key_line("say \"hi\""), Some(4));
        // Values are never matched as keys.
        assert_eq!(file.key_line("Coffee"), None);
    }

    #[test]
    fn test_missing_end_marker() {
        let err = ResourceFile::parse("export default {};".to_string()).unwrap_err();
        assert!(err.to_string().contains("I18NTABLEEND"));
    }

    #[test]
    fn test_malformed_region() {
        let source = "export default { Hello: 'x', }; /** I18NTABLEEND */".to_string();
        assert!(ResourceFile::parse(source).is_err());
    }

    #[test]
    fn test_non_string_value() {
        let source = "export default { \"n\": 1 }; /** I18NTABLEEND */".to_string();
        let err = ResourceFile::parse(source).unwrap_err();
        assert!(format!("{:#}", err).contains("\"n\""));
    }

    #[test]
    fn test_is_placeholder() {
        assert!(is_placeholder("Hello", "Hello"));
        assert!(!is_placeholder("Hello", "Hi"));
    }
}
