/*!
 * Core translation service implementation.
 *
 * This module defines the `Translator` capability consumed by the batch
 * orchestrator and implements it on top of the provider clients. Provider
 * routing is fixed at construction time; credentials, model, glossary, and
 * segment size all travel inside each request so the service itself holds
 * no per-batch state.
 */

use async_trait::async_trait;
use log::debug;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::together::{Together, TogetherRequest};

use super::prompt::{self, PromptBuilder};
use super::segment;

/// One translation request, carrying everything the backend needs
#[derive(Debug, Clone)]
pub struct TranslateRequest {
    /// The full text to translate
    pub text: String,

    /// Source language code (ISO 639-1)
    pub source_lang: String,

    /// Target language code (ISO 639-1)
    pub target_lang: String,

    /// Credential for the provider API
    pub api_key: String,

    /// Model identifier understood by the provider
    pub model: String,

    /// Custom terminology glossary, possibly empty
    pub custom_terms: String,

    /// Optional characters-per-segment budget
    pub segment_size: Option<usize>,
}

/// The pluggable translation capability consumed by batch workers
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a text; an empty result means the backend produced nothing
    async fn translate(&self, request: TranslateRequest) -> Result<String, ProviderError>;

    /// Mapping of supported language codes to display names
    fn supported_languages(&self) -> BTreeMap<String, String>;
}

/// Translation provider implementation variants
enum ProviderImpl {
    /// Google Gemini API service
    Gemini {
        /// Client instance
        client: Gemini,
    },

    /// Together AI API service
    Together {
        /// Client instance
        client: Together,
    },
}

/// Translation service routing requests to the configured provider
pub struct TranslationService {
    /// The concrete provider client
    provider_impl: ProviderImpl,
}

impl TranslationService {
    /// Create a translation service from the translation configuration
    pub fn new(config: TranslationConfig) -> Result<Self, ProviderError> {
        let endpoint = config.get_endpoint();
        let timeout = Duration::from_secs(config.get_timeout_secs());

        let provider_impl = match config.provider {
            ConfigTranslationProvider::Gemini => ProviderImpl::Gemini {
                client: Gemini::new(endpoint, timeout),
            },
            ConfigTranslationProvider::Together => ProviderImpl::Together {
                client: Together::new(endpoint, timeout),
            },
        };

        Ok(Self { provider_impl })
    }

    async fn translate_segment(
        &self,
        prompt_text: String,
        model: &str,
        api_key: &str,
    ) -> Result<String, ProviderError> {
        match &self.provider_impl {
            ProviderImpl::Gemini { client } => {
                let request = GeminiRequest::new(model).add_text(prompt_text);
                let response = client.complete(request, api_key).await?;
                Ok(Gemini::extract_text(&response))
            }
            ProviderImpl::Together { client } => {
                let request = TogetherRequest::new(model).add_message("user", prompt_text);
                let response = client.complete(request, api_key).await?;
                Ok(Together::extract_text(&response))
            }
        }
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(&self, request: TranslateRequest) -> Result<String, ProviderError> {
        let source_name = language_utils::display_name(&request.source_lang)
            .map_err(|_| ProviderError::UnsupportedLanguage(request.source_lang.clone()))?;
        let target_name = language_utils::display_name(&request.target_lang)
            .map_err(|_| ProviderError::UnsupportedLanguage(request.target_lang.clone()))?;

        let builder =
            PromptBuilder::new(&source_name, &target_name).with_custom_terms(&request.custom_terms);

        let segments = segment::split_into_segments(&request.text, request.segment_size);
        debug!(
            "Translating {} segment(s) with model {}",
            segments.len(),
            request.model
        );

        let mut parts = Vec::with_capacity(segments.len());
        for piece in segments {
            let prompt_text = builder.build(&piece);
            let raw = self
                .translate_segment(prompt_text, &request.model, &request.api_key)
                .await?;
            parts.push(prompt::clean_translation(&raw));
        }

        // The orchestrator decides what an empty result means
        Ok(parts.join("\n"))
    }

    fn supported_languages(&self) -> BTreeMap<String, String> {
        language_utils::supported_languages()
    }
}
