use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::TranslationCommonConfig;
use crate::errors::TranslationError;
use crate::language_utils;
use crate::providers::Translator;
use crate::translation::cache::TranslationCache;

/// Retry, pacing and caching settings of a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Retries after a retryable failure
    pub retry_count: u32,
    /// First retry delay, doubled on each further retry
    pub retry_backoff_ms: u64,
    /// Minimum delay between two requests
    pub rate_limit_delay_ms: u64,
    pub cache_enabled: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::from(&TranslationCommonConfig::default())
    }
}

impl From<&TranslationCommonConfig> for ClientSettings {
    fn from(config: &TranslationCommonConfig) -> Self {
        Self {
            retry_count: config.retry_count,
            retry_backoff_ms: config.retry_backoff_ms,
            rate_limit_delay_ms: config.rate_limit_delay_ms,
            cache_enabled: config.cache_enabled,
        }
    }
}

/// A translator bound to one source and target language
///
/// Surrounding whitespace is kept out of the request and put back on the
/// result, so spacing between text runs survives translation.
#[derive(Debug)]
pub struct TranslationClient {
    translator: Arc<dyn Translator>,
    source_language: String,
    target_language: String,
    settings: ClientSettings,
    cache: TranslationCache,
    last_request: Mutex<Option<Instant>>,
}

impl TranslationClient {
    /// Bind `translator` to a language pair
    pub fn new(
        translator: Arc<dyn Translator>,
        source_language: &str,
        target_language: &str,
        settings: ClientSettings,
    ) -> Result<Self, TranslationError> {
        language_utils::validate_source_language(source_language)
            .map_err(|_| TranslationError::UnsupportedLanguage(source_language.to_string()))?;
        language_utils::validate_language_code(target_language)
            .map_err(|_| TranslationError::UnsupportedLanguage(target_language.to_string()))?;

        let cache = TranslationCache::new(settings.cache_enabled);
        Ok(Self {
            translator,
            source_language: source_language.trim().to_lowercase(),
            target_language: target_language.trim().to_lowercase(),
            settings,
            cache,
            last_request: Mutex::new(None),
        })
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translate one segment
    ///
    /// Whitespace-only input is returned unchanged without a request.
    pub async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let core = text.trim();
        if core.is_empty() {
            return Ok(text.to_string());
        }
        let leading = &text[..text.len() - text.trim_start().len()];
        let trailing = &text[text.trim_end().len()..];

        let translated = match self.cache.get(core, &self.source_language, &self.target_language) {
            Some(cached) => cached,
            None => {
                let translated = self.request_with_retry(core).await?;
                self.cache.store(core, &self.source_language, &self.target_language, &translated);
                translated
            }
        };

        Ok(format!("{}{}{}", leading, translated.trim(), trailing))
    }

    async fn request_with_retry(&self, text: &str) -> Result<String, TranslationError> {
        let mut attempt: u32 = 0;
        loop {
            self.pace().await;

            match self
                .translator
                .translate(text, &self.source_language, &self.target_language)
                .await
            {
                Ok(translated) => return Ok(translated),
                Err(e) if e.is_retryable() && attempt < self.settings.retry_count => {
                    let delay = self.settings.retry_backoff_ms.saturating_mul(1 << attempt.min(16));
                    attempt += 1;
                    warn!(
                        "{} request failed (attempt {}/{}): {}. Retrying in {} ms",
                        self.translator.name(),
                        attempt,
                        self.settings.retry_count,
                        e,
                        delay
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(TranslationError::Provider(e)),
            }
        }
    }

    /// Wait until the configured delay since the previous request has passed
    async fn pace(&self) {
        let delay = Duration::from_millis(self.settings.rate_limit_delay_ms);
        if delay.is_zero() {
            return;
        }

        let wait = {
            let mut last = self.last_request.lock();
            let now = Instant::now();
            let wait = last
                .map(|previous| delay.saturating_sub(now.duration_since(previous)))
                .unwrap_or_default();
            *last = Some(now + wait);
            wait
        };

        if !wait.is_zero() {
            debug!("Pacing requests: waiting {} ms", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }
}
