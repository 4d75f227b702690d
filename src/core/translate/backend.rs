use anyhow::Result;

/// One text to translate, with the source snippets around its call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    pub contexts: Vec<&'a str>,
    pub target_language: &'a str,
}

/// A service that turns a request into a single translated string.
///
/// Requests are issued from several threads at once.
pub trait TranslationBackend: Sync {
    fn translate(&self, request: &TranslationRequest<'_>) -> Result<String>;
}
