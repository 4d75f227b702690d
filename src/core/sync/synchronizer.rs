//! Reconciliation of resource tables against the extracted identities.
//!
//! Both modes share the same per-file steps: load the table (or scaffold a
//! new one), make sure every required key is present, and write the file
//! back only when something changed.

use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::{
    core::{
        TableEntryContext, TableLocation, TextIdentity,
        parsers::table::{ResourceFile, is_placeholder},
        sync::ResourceStore,
    },
    issues::{Issue, MalformedTableIssue, UnusedKeyIssue, UntranslatedIssue},
};

/// Translated values keyed by identity and target language.
pub type TranslationMap = HashMap<(TextIdentity, String), String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
}

/// One written (or, in check mode, would-be written) resource file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
    /// Keys inserted as placeholders.
    pub added: usize,
    /// Values replaced by a translation.
    pub translated: usize,
}

#[derive(Debug, Default)]
pub struct SyncOutcome {
    pub changes: Vec<FileChange>,
    pub issues: Vec<Issue>,
}

/// Group identities by namespace, keeping first-seen order of both
/// namespaces and keys.
pub fn group_by_namespace(identities: &[TextIdentity]) -> Vec<(&str, Vec<&str>)> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for identity in identities {
        let slot = *index.entry(identity.namespace.as_str()).or_insert_with(|| {
            groups.push((identity.namespace.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(identity.key.as_str());
    }
    groups
}

/// Load the table of (namespace, language), scaffolding a fresh one when
/// the file does not exist. A malformed table becomes an issue.
fn load_table(
    store: &ResourceStore,
    namespace: &str,
    language: &str,
    issues: &mut Vec<Issue>,
) -> Option<(ResourceFile, ChangeKind)> {
    let path = store.file_path(namespace, language);
    match store.read_path(&path) {
        Ok(Some(file)) => Some((file, ChangeKind::Updated)),
        Ok(None) => Some((ResourceFile::scaffold(), ChangeKind::Created)),
        Err(e) => {
            issues.push(Issue::MalformedTable(MalformedTableIssue {
                file_path: store.display(&path),
                error: format!("{:#}", e),
            }));
            None
        }
    }
}

/// Insert a placeholder for every required key that is missing or empty.
/// Returns the number of keys inserted.
fn insert_placeholders(file: &mut ResourceFile, keys: &[&str]) -> usize {
    let mut added = 0;
    for key in keys {
        let present = file.table.get(key).is_some_and(|value| !value.is_empty());
        if !present {
            file.table.insert(*key, *key);
            added += 1;
        }
    }
    added
}

fn unused_key_issues(store: &ResourceStore, namespace: &str, language: &str, file: &ResourceFile, required: &HashSet<&str>) -> Vec<Issue> {
    let display = store.display(&store.file_path(namespace, language));
    file.table
        .iter()
        .filter(|(key, _)| !required.contains(key))
        .map(|(key, value)| {
            let line = file.key_line(key).unwrap_or(1);
            Issue::UnusedKey(UnusedKeyIssue {
                context: TableEntryContext::new(TableLocation::with_line(&display, line), key, value),
            })
        })
        .collect()
}

/// Files of supported languages whose namespace no source code references:
/// every key in them is unused.
fn orphaned_namespace_issues(
    store: &ResourceStore,
    namespaces: &HashSet<&str>,
    languages: &[String],
    issues: &mut Vec<Issue>,
) -> Result<()> {
    let no_keys = HashSet::new();
    for table in store.list_tables()? {
        if namespaces.contains(table.namespace.as_str()) || !languages.contains(&table.language) {
            continue;
        }
        match store.read_path(&table.path) {
            Ok(Some(file)) => issues.extend(unused_key_issues(
                store,
                &table.namespace,
                &table.language,
                &file,
                &no_keys,
            )),
            Ok(None) => {}
            Err(e) => issues.push(Issue::MalformedTable(MalformedTableIssue {
                file_path: store.display(&table.path),
                error: format!("{:#}", e),
            })),
        }
    }
    Ok(())
}

/// Make every (namespace, language) table contain every required key.
///
/// Missing files are created with placeholders (value = key); missing or
/// empty entries get a placeholder; existing values are never changed and
/// keys no longer referenced are reported, never removed. A file is written
/// only when at least one key was added, so a second run writes nothing.
///
/// With `apply == false` nothing is written; the outcome still lists the
/// changes that would be made.
pub fn reconcile(
    store: &ResourceStore,
    identities: &[TextIdentity],
    languages: &[String],
    apply: bool,
) -> Result<SyncOutcome> {
    let mut outcome = SyncOutcome::default();
    let groups = group_by_namespace(identities);

    for (namespace, keys) in &groups {
        let required: HashSet<&str> = keys.iter().copied().collect();
        for language in languages {
            let Some((mut file, kind)) = load_table(store, namespace, language, &mut outcome.issues) else {
                continue;
            };
            if kind == ChangeKind::Updated {
                outcome
                    .issues
                    .extend(unused_key_issues(store, namespace, language, &file, &required));
            }

            let added = insert_placeholders(&mut file, keys);
            if added == 0 {
                continue;
            }
            let path = store.file_path(namespace, language);
            if apply {
                store.write(&path, &file.render()?)?;
            }
            outcome.changes.push(FileChange {
                path: store.display(&path),
                kind,
                added,
                translated: 0,
            });
        }
    }

    let namespaces: HashSet<&str> = groups.iter().map(|(ns, _)| *ns).collect();
    orphaned_namespace_issues(store, &namespaces, languages, &mut outcome.issues)?;

    Ok(outcome)
}

/// Commit translations into the tables.
///
/// A translation replaces the current value only when that value is
/// missing, empty or still the placeholder, or when the identity is listed
/// in `targets`. Genuine translations are otherwise never overwritten.
/// Placeholders left afterwards are reported per file, except in the
/// default language where the key is the text.
pub fn fill(
    store: &ResourceStore,
    identities: &[TextIdentity],
    languages: &[String],
    translations: &TranslationMap,
    targets: &HashSet<TextIdentity>,
    default_language: Option<&str>,
    apply: bool,
) -> Result<SyncOutcome> {
    let mut outcome = SyncOutcome::default();

    for (namespace, keys) in group_by_namespace(identities) {
        for language in languages {
            let Some((mut file, kind)) = load_table(store, namespace, language, &mut outcome.issues) else {
                continue;
            };
            let added = insert_placeholders(&mut file, &keys);

            let mut translated = 0;
            for key in &keys {
                let identity = TextIdentity::new(namespace, *key);
                let lookup = (identity, language.clone());
                let Some(value) = translations.get(&lookup) else {
                    continue;
                };
                let current = file.table.get(key).unwrap_or_default();
                let writable = current.is_empty() || is_placeholder(key, current) || targets.contains(&lookup.0);
                if writable && current != value.as_str() {
                    file.table.insert(*key, value.clone());
                    translated += 1;
                }
            }

            let path = store.file_path(namespace, language);
            if Some(language.as_str()) != default_language {
                let remaining: Vec<String> = keys
                    .iter()
                    .filter(|key| file.table.get(key).is_some_and(|value| is_placeholder(key, value)))
                    .map(|key| key.to_string())
                    .collect();
                if !remaining.is_empty() {
                    outcome.issues.push(Issue::Untranslated(UntranslatedIssue {
                        file_path: store.display(&path),
                        language: language.clone(),
                        keys: remaining,
                    }));
                }
            }

            if added == 0 && translated == 0 {
                continue;
            }
            if apply {
                store.write(&path, &file.render()?)?;
            }
            outcome.changes.push(FileChange {
                path: store.display(&path),
                kind,
                added,
                translated,
            });
        }
    }

    Ok(outcome)
}
