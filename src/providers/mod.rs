/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported services:
 * - Google: public Google Translate endpoint
 * - LibreTranslate: self-hosted or public LibreTranslate server
 * - Mock: scripted translator for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

pub mod google;
pub mod libretranslate;
pub mod mock;

/// Common trait for all translation services
///
/// Implementations translate one string at a time and are shared between
/// runs, so they must be usable from several tasks.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` from `source_language` to `target_language`
    ///
    /// # Arguments
    /// * `text` - Text to translate, never empty
    /// * `source_language` - ISO code of the text, or `auto`
    /// * `target_language` - ISO code to translate into
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String, ProviderError>;

    /// Short provider name for log lines
    fn name(&self) -> &str;
}

/// Build the translator selected in the configuration
pub fn create_translator(config: &TranslationConfig) -> Result<Arc<dyn Translator>, ProviderError> {
    let timeout = Duration::from_secs(config.get_timeout_secs());
    let translator: Arc<dyn Translator> = match config.provider {
        TranslationProvider::Google => Arc::new(google::GoogleTranslate::new(
            config.get_endpoint(),
            timeout,
            config.get_max_chars_per_request(),
        )?),
        TranslationProvider::LibreTranslate => Arc::new(libretranslate::LibreTranslate::new(
            config.get_endpoint(),
            config.get_api_key(),
            timeout,
            config.get_max_chars_per_request(),
        )?),
    };
    Ok(translator)
}

/// Map a transport error from reqwest onto the provider taxonomy
pub(crate) fn request_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() || error.is_connect() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

/// Map a non-success HTTP status onto the provider taxonomy
pub(crate) fn status_error(status: reqwest::StatusCode, message: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(message),
        429 => ProviderError::RateLimitExceeded(message),
        status_code => ProviderError::ApiError { status_code, message },
    }
}

/// Reject texts longer than the provider accepts in one request
pub(crate) fn check_length(text: &str, max_chars: usize) -> Result<(), ProviderError> {
    let length = text.chars().count();
    if max_chars > 0 && length > max_chars {
        return Err(ProviderError::RequestFailed(format!(
            "text of {} characters exceeds the limit of {}",
            length, max_chars
        )));
    }
    Ok(())
}
