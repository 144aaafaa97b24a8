use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{check_length, request_error, status_error, Translator};

/// LibreTranslate client
#[derive(Debug)]
pub struct LibreTranslate {
    /// Base URL of the server
    base_url: String,
    /// Optional API key, sent only when non-empty
    api_key: String,
    /// HTTP client for making requests
    client: Client,
    /// Longest text accepted in one request
    max_chars: usize,
}

/// Request body for `POST /translate`
#[derive(Debug, Serialize, Deserialize)]
pub struct LibreTranslateRequest {
    pub q: String,
    pub source: String,
    pub target: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Response body; the server sets exactly one of the fields
#[derive(Debug, Serialize, Deserialize)]
pub struct LibreTranslateResponse {
    #[serde(rename = "translatedText", default)]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LibreTranslate {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration, max_chars: usize) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
            max_chars,
        })
    }

    /// Build the request body
    pub fn request(&self, text: &str, source_language: &str, target_language: &str) -> LibreTranslateRequest {
        LibreTranslateRequest {
            q: text.to_string(),
            source: source_language.to_string(),
            target: target_language.to_string(),
            format: "text".to_string(),
            api_key: (!self.api_key.is_empty()).then(|| self.api_key.clone()),
        }
    }
}

#[async_trait]
impl Translator for LibreTranslate {
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String, ProviderError> {
        check_length(text, self.max_chars)?;

        let url = format!("{}/translate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&self.request(text, source_language, target_language))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(request_error)?;
        let parsed: Option<LibreTranslateResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed.and_then(|r| r.error).unwrap_or(body);
            return Err(status_error(status, message));
        }

        let parsed = parsed.ok_or_else(|| ProviderError::ParseError(format!("unexpected response: {}", body)))?;
        match (parsed.translated_text, parsed.error) {
            (Some(text), _) => Ok(text),
            (None, Some(error)) => Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error,
            }),
            (None, None) => Err(ProviderError::ParseError("response has no translatedText".to_string())),
        }
    }

    fn name(&self) -> &str {
        "libretranslate"
    }
}
