use std::collections::HashSet;

use anyhow::Result;
use rayon::prelude::*;

use crate::{
    core::{
        TextIdentity,
        extract::Extraction,
        parsers::table::is_placeholder,
        program::Program,
        sync::{ResourceStore, SyncOutcome, TranslationMap, fill, group_by_namespace},
        translate::{TranslationBackend, TranslationRequest},
    },
    issues::{Issue, MalformedTableIssue, TranslationFailedIssue},
    utils::context_window,
};

/// One identity to translate into one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub identity: TextIdentity,
    pub language: String,
    /// Number of call sites the identity has.
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTranslation {
    pub job: TranslationJob,
    pub text: String,
}

/// Result of the translate phase.
#[derive(Debug, Default)]
pub struct TranslationBatch {
    pub translations: TranslationMap,
    /// Successful jobs in plan order.
    pub completed: Vec<CompletedTranslation>,
    /// Failed jobs, as warnings.
    pub issues: Vec<Issue>,
}

/// Phase 1: every (identity, language) pair that needs a translation.
///
/// The default language is skipped. An identity needs a translation when
/// its entry is missing, empty or still the placeholder, or when it is in
/// `targets`. Malformed tables are skipped and reported.
pub fn plan(
    store: &ResourceStore,
    extraction: &Extraction,
    default_language: Option<&str>,
    targets: &HashSet<TextIdentity>,
) -> (Vec<TranslationJob>, Vec<Issue>) {
    let mut jobs = Vec::new();
    let mut issues = Vec::new();

    for language in &extraction.languages {
        if Some(language.as_str()) == default_language {
            continue;
        }
        for (namespace, keys) in group_by_namespace(&extraction.identities) {
            let file = match store.read(namespace, language) {
                Ok(file) => file,
                Err(e) => {
                    issues.push(Issue::MalformedTable(MalformedTableIssue {
                        file_path: store.display(&store.file_path(namespace, language)),
                        error: format!("{:#}", e),
                    }));
                    continue;
                }
            };
            for key in keys {
                let identity = TextIdentity::new(namespace, key);
                let current = file.as_ref().and_then(|f| f.table.get(key)).unwrap_or_default();
                let untranslated = current.is_empty() || is_placeholder(key, current);
                if !untranslated && !targets.contains(&identity) {
                    continue;
                }
                let occurrences = extraction.call_sites.get(&identity).map_or(0, Vec::len);
                jobs.push(TranslationJob {
                    identity,
                    language: language.clone(),
                    occurrences,
                });
            }
        }
    }

    (jobs, issues)
}

/// Phase 2: send every job to `backend`, in parallel.
///
/// Each request carries the key text plus a window of `context_radius`
/// characters around every call site of the identity. A failed request
/// becomes a warning and leaves the entry as it is.
pub fn translate_all(
    program: &Program,
    extraction: &Extraction,
    jobs: &[TranslationJob],
    backend: &dyn TranslationBackend,
    context_radius: usize,
) -> TranslationBatch {
    let results: Vec<(&TranslationJob, Result<String>)> = jobs
        .par_iter()
        .map(|job| {
            let contexts = extraction
                .call_sites
                .get(&job.identity)
                .map(|sites| {
                    sites
                        .iter()
                        .map(|site| {
                            let text = &program.unit(site.file).parsed.text;
                            context_window(text, site.offset, context_radius)
                        })
                        .collect()
                })
                .unwrap_or_default();
            let request = TranslationRequest {
                text: &job.identity.key,
                contexts,
                target_language: &job.language,
            };
            (job, backend.translate(&request))
        })
        .collect();

    let mut batch = TranslationBatch::default();
    for (job, result) in results {
        match result {
            Ok(text) => {
                batch
                    .translations
                    .insert((job.identity.clone(), job.language.clone()), text.clone());
                batch.completed.push(CompletedTranslation {
                    job: job.clone(),
                    text,
                });
            }
            Err(e) => batch.issues.push(Issue::TranslationFailed(TranslationFailedIssue {
                identity: job.identity.clone(),
                language: job.language.clone(),
                error: format!("{:#}", e),
            })),
        }
    }
    batch
}

/// Phase 3: write the translations, one file at a time.
pub fn commit(
    store: &ResourceStore,
    extraction: &Extraction,
    translations: &TranslationMap,
    targets: &HashSet<TextIdentity>,
    default_language: Option<&str>,
) -> Result<SyncOutcome> {
    fill(
        store,
        &extraction.identities,
        &extraction.languages,
        translations,
        targets,
        default_language,
        true,
    )
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeSet,
        fs,
        sync::Mutex,
    };

    use anyhow::bail;
    use pretty_assertions::assert_eq;
    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::core::extract::extract;

    const I18N_LIB: &str = r#"
/** I18NCONSTRUCTORSYMBOL */
export class I18n {
    constructor(data: object) {}
    /** I18NLOCTEXTSYMBOL */
    locText(key: string): string { return key; }
}
"#;

    /// Answers `[lang] text`, fails for French greetings.
    #[derive(Default)]
    struct MockBackend {
        requests: Mutex<Vec<(String, String, Vec<String>)>>,
    }

    impl TranslationBackend for MockBackend {
        fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
            self.requests.lock().unwrap().push((
                request.text.to_string(),
                request.target_language.to_string(),
                request.contexts.iter().map(|c| c.to_string()).collect(),
            ));
            if request.target_language == "fr" && request.text == "Hello" {
                bail!("connection reset");
            }
            Ok(format!("[{}] {}", request.target_language, request.text))
        }
    }

    struct Fixture {
        _dir: TempDir,
        program: Program,
        extraction: Extraction,
        store: ResourceStore,
    }

    fn fixture(app: &str) -> Fixture {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("i18n.ts"), I18N_LIB).unwrap();
        fs::write(src.join("app.ts"), app).unwrap();
        let roots = BTreeSet::from([src.join("app.ts"), src.join("i18n.ts")]);
        let program = Program::load(dir.path(), &roots);
        let extraction = extract(&program).unwrap();
        let store = ResourceStore::new(dir.path().join("lang"), "ts", dir.path());
        Fixture {
            _dir: dir,
            program,
            extraction,
            store,
        }
    }

    const APP: &str = "import { I18n } from \"./i18n\";\nconst i18n = new I18n({ en: {}, fr: {}, ko: {} });\nbutton(i18n.locText(\"Hello\"));\ntitle(i18n.locText(\"Bye\"));\n";

    fn table(f: &Fixture, language: &str) -> Vec<(String, String)> {
        f.store
            .read("default", language)
            .unwrap()
            .unwrap()
            .table
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_plan_skips_default_language_and_translated_entries() {
        let f = fixture(APP);
        let mut file = crate::core::parsers::table::ResourceFile::scaffold();
        file.table.insert("Hello", "Bonjour");
        file.table.insert("Bye", "Bye");
        f.store
            .write(&f.store.file_path("default", "fr"), &file.render().unwrap())
            .unwrap();

        let (jobs, issues) = plan(&f.store, &f.extraction, Some("en"), &HashSet::new());

        assert!(issues.is_empty());
        let planned: Vec<_> = jobs
            .iter()
            .map(|j| format!("{}:{}", j.language, j.identity))
            .collect();
        assert_eq!(planned, vec!["fr:default.Bye", "ko:default.Hello", "ko:default.Bye"]);
        assert_eq!(jobs[0].occurrences, 1);
    }

    #[test]
    fn test_targets_are_planned_even_when_translated() {
        let f = fixture(APP);
        let mut file = crate::core::parsers::table::ResourceFile::scaffold();
        file.table.insert("Hello", "Bonjour");
        file.table.insert("Bye", "Au revoir");
        f.store
            .write(&f.store.file_path("default", "fr"), &file.render().unwrap())
            .unwrap();
        let targets = HashSet::from([TextIdentity::default_ns("Hello")]);

        let (jobs, _) = plan(&f.store, &f.extraction, Some("en"), &targets);

        assert!(
            jobs.iter()
                .any(|j| j.language == "fr" && j.identity == TextIdentity::default_ns("Hello"))
        );
        assert!(
            !jobs
                .iter()
                .any(|j| j.language == "fr" && j.identity == TextIdentity::default_ns("Bye"))
        );
    }

    #[test]
    fn test_requests_carry_call_site_context() {
        let f = fixture(APP);
        let backend = MockBackend::default();
        let jobs = vec![TranslationJob {
            identity: TextIdentity::default_ns("Hello"),
            language: "ko".to_string(),
            occurrences: 1,
        }];

        let batch = translate_all(&f.program, &f.extraction, &jobs, &backend, 10);

        let requests = backend.requests.lock().unwrap();
        let (text, language, contexts) = &requests[0];
        assert_eq!(text, "Hello");
        assert_eq!(language, "ko");
        assert_eq!(contexts.len(), 1);
        assert!(contexts[0].contains("i18n.locT"), "{:?}", contexts);
        assert_eq!(batch.completed[0].text, "[ko] Hello");
    }

    #[test]
    fn test_context_window_after_byte_order_mark() {
        let f = fixture(&format!("\u{feff}// 인사\n{}", APP));
        let backend = MockBackend::default();
        let jobs = vec![TranslationJob {
            identity: TextIdentity::default_ns("Hello"),
            language: "ko".to_string(),
            occurrences: 1,
        }];

        translate_all(&f.program, &f.extraction, &jobs, &backend, 8);

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests[0].2, vec!["\nbutton(i18n.loc".to_string()]);
    }

    #[test]
    fn test_backend_failure_leaves_placeholder() {
        let f = fixture(APP);
        let backend = MockBackend::default();
        let (jobs, _) = plan(&f.store, &f.extraction, Some("en"), &HashSet::new());

        let batch = translate_all(&f.program, &f.extraction, &jobs, &backend, 300);
        let outcome = commit(
            &f.store,
            &f.extraction,
            &batch.translations,
            &HashSet::new(),
            Some("en"),
        )
        .unwrap();

        let [Issue::TranslationFailed(failure)] = batch.issues.as_slice() else {
            panic!("expected one failure, got {:?}", batch.issues);
        };
        assert_eq!(failure.language, "fr");
        assert_eq!(failure.identity, TextIdentity::default_ns("Hello"));

        assert_eq!(table(&f, "fr"), vec![pair("Hello", "Hello"), pair("Bye", "[fr] Bye")]);
        assert_eq!(
            table(&f, "ko"),
            vec![pair("Hello", "[ko] Hello"), pair("Bye", "[ko] Bye")]
        );
        assert_eq!(table(&f, "en"), vec![pair("Hello", "Hello"), pair("Bye", "Bye")]);

        let untranslated: Vec<_> = outcome
            .issues
            .iter()
            .filter_map(|i| match i {
                Issue::Untranslated(u) => Some((u.language.clone(), u.keys.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(untranslated, vec![("fr".to_string(), vec!["Hello".to_string()])]);
    }
}
