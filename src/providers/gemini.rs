use std::time::Duration;
use serde::{Deserialize, Serialize};
use reqwest::Client;
use log::error;
use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Gemini client for interacting with the Google Gemini API
#[derive(Debug)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API endpoint URL (optional, defaults to the public API)
    endpoint: String,
}

/// Gemini content generation request
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    /// The model to use; part of the request URL, not the body
    #[serde(skip_serializing)]
    model: String,

    /// The contents of the conversation
    contents: Vec<GeminiContent>,
}

/// A single content block in a Gemini request
#[derive(Debug, Serialize)]
pub struct GeminiContent {
    /// The parts making up this content block
    parts: Vec<GeminiPart>,
}

/// A text part of a content block
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// The text payload
    #[serde(default)]
    pub text: String,
}

/// Gemini response
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    /// Generated candidates, usually exactly one
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// A single response candidate
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// The content of the candidate
    pub content: Option<GeminiCandidateContent>,
}

/// Content of a response candidate
#[derive(Debug, Deserialize)]
pub struct GeminiCandidateContent {
    /// The parts of the candidate content
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiRequest {
    /// Create a new Gemini request for a model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            contents: Vec::new(),
        }
    }

    /// Add a text content block to the request
    pub fn add_text(mut self, text: impl Into<String>) -> Self {
        self.contents.push(GeminiContent {
            parts: vec![GeminiPart { text: text.into() }],
        });
        self
    }

    /// The model this request targets
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    fn request_url(&self, model: &str, api_key: &str) -> String {
        let base = if self.endpoint.is_empty() {
            "https://generativelanguage.googleapis.com/v1beta"
        } else {
            self.endpoint.trim_end_matches('/')
        };

        format!("{}/models/{}:generateContent?key={}", base, model, api_key)
    }
}

#[async_trait]
impl Provider for Gemini {
    type Request = GeminiRequest;
    type Response = GeminiResponse;

    async fn complete(
        &self,
        request: Self::Request,
        api_key: &str,
    ) -> Result<Self::Response, ProviderError> {
        let api_url = self.request_url(request.model(), api_key);

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::RequestFailed(format!("Failed to send request to Gemini API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::AuthenticationError(error_text));
            }

            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response.json::<GeminiResponse>().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Gemini API response: {}", e))
        })
    }

    async fn test_connection(&self, model: &str, api_key: &str) -> Result<(), ProviderError> {
        let request = GeminiRequest::new(model).add_text("Hello");
        self.complete(request, api_key).await?;
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}
