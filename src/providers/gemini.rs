// Google Gemini API provider implementation
//
// Sends one user-role content block per call to the generateContent endpoint
// and concatenates the text parts of the first candidate.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::background::with_background;
use super::TextGenerator;
use crate::config::constants::{DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::errors::GatewayError;

const PROVIDER_NAME: &str = "Gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini API provider
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    background: String,
}

impl GeminiProvider {
    /// Create a provider with the default model and request timeout
    pub fn new(api_key: String) -> Result<Self, GatewayError> {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Create a provider whose requests give up after `timeout`
    pub fn with_timeout(api_key: String, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            background: String::new(),
        })
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a different API root (mock servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Prepend static background context to every prompt
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    fn to_gemini_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: Some(with_background(&self.background, prompt)),
                }],
            }],
        }
    }

    fn from_gemini_response(response: GeminiResponse) -> Result<String, GatewayError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            return Err(GatewayError::EmptyResponse {
                provider: PROVIDER_NAME.to_string(),
            });
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if !text.is_empty() {
            return Ok(text);
        }

        // A non-STOP finish reason (SAFETY, RECITATION, ...) says why the text is missing
        match candidate.finish_reason {
            Some(reason) if reason != "STOP" => Err(GatewayError::Blocked {
                provider: PROVIDER_NAME.to_string(),
                reason,
            }),
            _ => Err(GatewayError::EmptyResponse {
                provider: PROVIDER_NAME.to_string(),
            }),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let request = self.to_gemini_request(prompt);
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        tracing::debug!("Sending request to Gemini API (model {})", self.model);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                provider: PROVIDER_NAME.to_string(),
                source: source.without_url(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GatewayError::Transport {
                provider: PROVIDER_NAME.to_string(),
                source: source.without_url(),
            })?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                provider: PROVIDER_NAME.to_string(),
                status,
                body,
            });
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::Malformed {
                provider: PROVIDER_NAME.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!("Received response: {:?}", gemini_response);

        Self::from_gemini_response(gemini_response)
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Gemini API types

#[derive(Debug, Clone, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String, // "user" or "model"
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}
