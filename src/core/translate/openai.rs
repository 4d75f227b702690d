use std::env;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::Client;
use serde_json::{Value, json};

use crate::{
    config::TranslatorConfig,
    core::translate::{TranslationBackend, TranslationRequest},
};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat-completion backend for any OpenAI-compatible endpoint.
pub struct OpenAiBackend {
    client: Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiBackend {
    /// Backend configured from `config`, with the API key taken from the
    /// `OPENAI_API_KEY` environment variable.
    pub fn from_env(config: &TranslatorConfig) -> Result<Self> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("{} is not set", API_KEY_ENV))?;
        Self::new(config, api_key)
    }

    pub fn new(config: &TranslatorConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.endpoint.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn payload(&self, request: &TranslationRequest<'_>) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt(request.target_language) },
                { "role": "user", "content": user_prompt(request) },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}

fn system_prompt(language: &str) -> String {
    format!(
        "You are a professional translator. Translate the given text to {}.\n\
         Consider ALL provided code contexts to ensure accurate translation.\n\
         The text might appear in multiple places - use all contexts to understand its usage.\n\
         Respond with ONLY the translation, no explanations or additional text.",
        language
    )
}

fn user_prompt(request: &TranslationRequest<'_>) -> String {
    let contexts = request
        .contexts
        .iter()
        .enumerate()
        .map(|(i, context)| format!("Context {}:\n{}", i + 1, context))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{}\n\nText to translate: \"{}\"", contexts, request.text)
}

/// Content of the first choice, trimmed. An empty reply is an error.
fn parse_reply(body: &Value) -> Result<String> {
    if let Some(message) = body.pointer("/error/message").and_then(Value::as_str) {
        bail!("translation service error: {}", message);
    }
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if content.is_empty() {
        bail!("translation service returned an empty reply");
    }
    Ok(content.to_string())
}

impl TranslationBackend for OpenAiBackend {
    fn translate(&self, request: &TranslationRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(request))
            .send()
            .with_context(|| format!("Request to {} failed", self.url))?;
        let status = response.status();
        let body: Value = response
            .json()
            .with_context(|| format!("Invalid response from {} ({})", self.url, status))?;
        if !status.is_success() && body.pointer("/error/message").is_none() {
            bail!("translation service responded with {}", status);
        }
        parse_reply(&body)
    }
}
