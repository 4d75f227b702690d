use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::{
    core::{
        TextIdentity,
        extract::Extraction,
        parsers::table::is_placeholder,
        sync::ResourceStore,
    },
    issues::{Issue, MalformedTableIssue, PartialTranslationIssue},
};

/// Ordinal and translation coverage of one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementEntry {
    /// Per-namespace index, in table-scan order. Dense unless a numeric
    /// string key forced a gap.
    pub ordinal: usize,
    /// Languages holding a real translation, in scan order.
    pub translated_in: Vec<String>,
}

impl ReplacementEntry {
    pub fn translation_count(&self) -> usize {
        self.translated_in.len()
    }
}

/// How a call site for a given identity is treated by the rewrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement<'a> {
    /// No table holds the identity.
    Missing,
    /// Some supported language still lacks a translation.
    Immature(&'a ReplacementEntry),
    /// Every supported language is translated; rewrite to this ordinal.
    Mature(usize),
}

/// Identity → (ordinal, translation count), rebuilt on every run.
#[derive(Debug, Default)]
pub struct ReplacementTable {
    entries: HashMap<TextIdentity, ReplacementEntry>,
    languages: Vec<String>,
}

impl ReplacementTable {
    /// Scan every table of a supported language in file-name order.
    ///
    /// Ordinals are assigned per namespace in first-seen key order,
    /// starting at 0. An ordinal whose decimal form is the literal key of an
    /// entry that stays string-keyed is skipped, since `table[1]` and
    /// `table["1"]` name the same property at runtime.
    ///
    /// An entry counts as translated when its value is non-empty and not a
    /// placeholder; in `default_language` any non-empty value counts.
    /// Malformed tables are skipped and returned as issues.
    pub fn build(
        store: &ResourceStore,
        languages: &[String],
        default_language: Option<&str>,
    ) -> Result<(Self, Vec<Issue>)> {
        let mut translated_in: HashMap<TextIdentity, Vec<String>> = HashMap::new();
        let mut order: Vec<TextIdentity> = Vec::new();
        let mut issues = Vec::new();

        for file in store.list_tables()? {
            if !languages.contains(&file.language) {
                continue;
            }
            let resource = match store.read_path(&file.path) {
                Ok(Some(resource)) => resource,
                Ok(None) => continue,
                Err(e) => {
                    issues.push(Issue::MalformedTable(MalformedTableIssue {
                        file_path: store.display(&file.path),
                        error: format!("{:#}", e),
                    }));
                    continue;
                }
            };
            let is_default = Some(file.language.as_str()) == default_language;

            for (key, value) in resource.table.iter() {
                let identity = TextIdentity::new(file.namespace.as_str(), key);
                let langs = translated_in.entry(identity.clone()).or_insert_with(|| {
                    order.push(identity);
                    Vec::new()
                });
                let translated = !value.is_empty() && (is_default || !is_placeholder(key, value));
                if translated && !langs.contains(&file.language) {
                    langs.push(file.language.clone());
                }
            }
        }

        // Literal keys that keep their string form, per namespace.
        let mut string_keys: HashMap<&str, HashSet<&str>> = HashMap::new();
        for (identity, langs) in &translated_in {
            if langs.len() != languages.len() {
                string_keys
                    .entry(identity.namespace.as_str())
                    .or_default()
                    .insert(identity.key.as_str());
            }
        }

        let mut next_ordinal: HashMap<&str, usize> = HashMap::new();
        let mut entries = HashMap::with_capacity(order.len());
        for identity in &order {
            let taken = string_keys.get(identity.namespace.as_str());
            let counter = next_ordinal.entry(identity.namespace.as_str()).or_default();
            while taken.is_some_and(|keys| keys.contains(counter.to_string().as_str())) {
                *counter += 1;
            }
            let ordinal = *counter;
            *counter += 1;
            entries.insert(
                identity.clone(),
                ReplacementEntry {
                    ordinal,
                    translated_in: translated_in.get(identity).cloned().unwrap_or_default(),
                },
            );
        }

        let table = Self {
            entries,
            languages: languages.to_vec(),
        };
        Ok((table, issues))
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identity: &TextIdentity) -> Option<&ReplacementEntry> {
        self.entries.get(identity)
    }

    pub fn lookup(&self, identity: &TextIdentity) -> Replacement<'_> {
        match self.entries.get(identity) {
            None => Replacement::Missing,
            Some(entry) if entry.translation_count() == self.languages.len() => {
                Replacement::Mature(entry.ordinal)
            }
            Some(entry) => Replacement::Immature(entry),
        }
    }

    pub fn is_mature(&self, identity: &TextIdentity) -> bool {
        matches!(self.lookup(identity), Replacement::Mature(_))
    }

    /// Warnings for extracted identities that some language has not
    /// translated yet, in extraction order.
    pub fn partial_translations(&self, extraction: &Extraction) -> Vec<Issue> {
        extraction
            .identities
            .iter()
            .filter_map(|identity| {
                let Replacement::Immature(entry) = self.lookup(identity) else {
                    return None;
                };
                let missing_in = self
                    .languages
                    .iter()
                    .filter(|language| !entry.translated_in.contains(language))
                    .cloned()
                    .collect();
                Some(Issue::PartialTranslation(PartialTranslationIssue {
                    identity: identity.clone(),
                    missing_in,
                    usage: extraction
                        .first_call_site(identity)
                        .map(|site| site.context.clone()),
                }))
            })
            .collect()
    }
}
