use std::time::Duration;
use serde::{Deserialize, Serialize};
use reqwest::Client;
use log::error;
use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Together client for interacting with the Together AI API
#[derive(Debug)]
pub struct Together {
    /// HTTP client for API requests
    client: Client,
    /// API endpoint URL (optional, defaults to the public API)
    endpoint: String,
}

/// Together chat completion request
#[derive(Debug, Serialize)]
pub struct TogetherRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<TogetherMessage>,

    /// Temperature for generation
    temperature: f32,

    /// Top probability mass to consider (nucleus sampling)
    top_p: f32,

    /// Top k tokens to consider
    top_k: u32,

    /// Repetition penalty
    repetition_penalty: f32,

    /// Stop sequences
    stop: Vec<String>,

    /// Maximum number of tokens to generate
    max_tokens: u32,

    /// Whether to stream the response
    stream: bool,
}

/// Together message format
#[derive(Debug, Serialize, Deserialize)]
pub struct TogetherMessage {
    /// Role of the message sender (user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Together response
#[derive(Debug, Deserialize)]
pub struct TogetherResponse {
    /// Generated choices, usually exactly one
    #[serde(default)]
    pub choices: Vec<TogetherChoice>,
}

/// A single response choice
#[derive(Debug, Deserialize)]
pub struct TogetherChoice {
    /// The message of the choice
    pub message: TogetherResponseMessage,
}

/// Message content of a response choice
#[derive(Debug, Deserialize)]
pub struct TogetherResponseMessage {
    /// The generated text
    #[serde(default)]
    pub content: String,
}

impl Default for TogetherRequest {
    fn default() -> Self {
        Self {
            model: String::new(),
            messages: Vec::new(),
            temperature: 0.6,
            top_p: 0.95,
            top_k: 55,
            repetition_penalty: 1.2,
            stop: vec!["</s>".to_string(), "[/INST]".to_string()],
            max_tokens: 4096,
            stream: false,
        }
    }
}

impl TogetherRequest {
    /// Create a new Together request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(TogetherMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Together {
    /// Create a new Together client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    fn request_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api.together.xyz/v1"
        } else {
            self.endpoint.trim_end_matches('/')
        };

        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl Provider for Together {
    type Request = TogetherRequest;
    type Response = TogetherResponse;

    async fn complete(
        &self,
        request: Self::Request,
        api_key: &str,
    ) -> Result<Self::Response, ProviderError> {
        let api_url = self.request_url();

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::RequestFailed(format!(
                    "Failed to send request to Together API: {}",
                    e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Together API error ({}): {}", status, error_text);

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::AuthenticationError(error_text));
            }

            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response.json::<TogetherResponse>().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Together API response: {}", e))
        })
    }

    async fn test_connection(&self, model: &str, api_key: &str) -> Result<(), ProviderError> {
        let request = TogetherRequest::new(model)
            .add_message("user", "Hello")
            .max_tokens(10);

        self.complete(request, api_key).await?;
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
