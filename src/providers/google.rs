use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{check_length, request_error, status_error, Translator};

/// Client for the public Google Translate `gtx` endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// Endpoint URL, e.g. `https://translate.googleapis.com/translate_a/single`
    endpoint: Url,
    /// HTTP client for making requests
    client: Client,
    /// Longest text accepted in one request
    max_chars: usize,
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(endpoint: impl AsRef<str>, timeout: Duration, max_chars: usize) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(endpoint.as_ref())
            .map_err(|e| ProviderError::RequestFailed(format!("invalid endpoint: {}", e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            endpoint,
            client,
            max_chars,
        })
    }

    /// URL of one translation request
    pub fn request_url(&self, text: &str, source_language: &str, target_language: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", &service_language_code(source_language))
            .append_pair("tl", &service_language_code(target_language))
            .append_pair("dt", "t")
            .append_pair("q", text);
        url
    }
}

/// Google expects region variants for Chinese
fn service_language_code(code: &str) -> String {
    match code.trim().to_lowercase().as_str() {
        "zh" => "zh-CN".to_string(),
        other => other.to_string(),
    }
}

/// Concatenate the translated segments of a `gtx` response
///
/// The body is a nested array: `[[["Hola","Hello",...], ...], ..., "en", ...]`.
pub fn parse_response(body: &str) -> Result<String, ProviderError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))?;

    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::ParseError("response has no translation segments".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(ProviderError::ParseError("response contains an empty translation".to_string()));
    }
    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String, ProviderError> {
        check_length(text, self.max_chars)?;

        let url = self.request_url(text, source_language, target_language);
        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(request_error)?;
        if !status.is_success() {
            return Err(status_error(status, body));
        }

        let translated = parse_response(&body)?;
        debug!("google: {} chars -> {} chars", text.chars().count(), translated.chars().count());
        Ok(translated)
    }

    fn name(&self) -> &str {
        "google"
    }
}
