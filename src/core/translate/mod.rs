//! Machine translation of untranslated table entries.
//!
//! Runs in three phases over one loaded program: plan (which identities
//! need a translation in which language), translate (parallel backend
//! requests), commit (sequential table writes through the synchronizer).

mod backend;
mod openai;
mod orchestrator;

pub use backend::{TranslationBackend, TranslationRequest};
pub use openai::OpenAiBackend;
pub use orchestrator::{
    CompletedTranslation, TranslationBatch, TranslationJob, commit, plan, translate_all,
};
