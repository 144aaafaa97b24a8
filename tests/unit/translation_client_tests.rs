/*!
 * Tests for the translation client: retries, pacing, caching and whitespace
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use pptx_translator::errors::{ProviderError, TranslationError};
use pptx_translator::providers::mock::MockTranslator;
use pptx_translator::translation::{ClientSettings, TranslationClient};

fn fast_settings() -> ClientSettings {
    ClientSettings {
        retry_count: 3,
        retry_backoff_ms: 1,
        rate_limit_delay_ms: 0,
        cache_enabled: true,
    }
}

fn client(mock: &MockTranslator, settings: ClientSettings) -> TranslationClient {
    TranslationClient::new(Arc::new(mock.clone()), "en", "es", settings).unwrap()
}

#[test]
fn test_new_withUnknownTarget_shouldFail() {
    let mock = MockTranslator::working();
    let result = TranslationClient::new(Arc::new(mock), "en", "xx", fast_settings());
    assert!(matches!(result, Err(TranslationError::UnsupportedLanguage(code)) if code == "xx"));
}

#[test]
fn test_new_withAutoSource_shouldSucceed() {
    let mock = MockTranslator::working();
    let client = TranslationClient::new(Arc::new(mock), "AUTO", "ES", fast_settings()).unwrap();
    assert_eq!(client.source_language(), "auto");
    assert_eq!(client.target_language(), "es");
}

#[tokio::test]
async fn test_translate_shouldPassLanguagesToProvider() {
    let mock = MockTranslator::dictionary([("Hello", "Hola")]);
    let client = client(&mock, fast_settings());

    assert_eq!(client.translate("Hello").await.unwrap(), "Hola");
    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].source_language, "en");
    assert_eq!(requests[0].target_language, "es");
}

#[tokio::test]
async fn test_translate_withSurroundingWhitespace_shouldKeepIt() {
    let mock = MockTranslator::dictionary([("Hello", "Hola")]);
    let client = client(&mock, fast_settings());

    assert_eq!(client.translate("  Hello \n").await.unwrap(), "  Hola \n");
    assert_eq!(mock.requested_texts(), ["Hello"]);
}

#[tokio::test]
async fn test_translate_withWhitespaceOnly_shouldSkipProvider() {
    let mock = MockTranslator::working();
    let client = client(&mock, fast_settings());

    assert_eq!(client.translate("   ").await.unwrap(), "   ");
    assert_eq!(client.translate("").await.unwrap(), "");
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translate_withRepeatedText_shouldUseCache() {
    let mock = MockTranslator::working();
    let client = client(&mock, fast_settings());

    let first = client.translate("Footer").await.unwrap();
    let second = client.translate(" Footer ").await.unwrap();

    assert_eq!(first, "[es] Footer");
    assert_eq!(second, " [es] Footer ");
    assert_eq!(mock.request_count(), 1);
    assert_eq!(client.cache().stats().0, 1);
}

#[tokio::test]
async fn test_translate_withCacheDisabled_shouldRequestEveryTime() {
    let mock = MockTranslator::working();
    let settings = ClientSettings {
        cache_enabled: false,
        ..fast_settings()
    };
    let client = client(&mock, settings);

    client.translate("Footer").await.unwrap();
    client.translate("Footer").await.unwrap();
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_translate_withTransientFailure_shouldRetry() {
    // Every request fails with a 503
    let mock = MockTranslator::intermittent(1);
    let client = client(&mock, fast_settings());

    let result = client.translate("Hello").await;
    assert!(result.is_err());
    // One attempt plus three retries
    assert_eq!(mock.request_count(), 4);
}

#[tokio::test]
async fn test_translate_withOneTransientFailure_shouldSucceedOnRetry() {
    let mock = MockTranslator::intermittent(2);
    let client = client(&mock, fast_settings());

    assert_eq!(client.translate("one").await.unwrap(), "[es] one");
    // Second request fails, retry succeeds
    assert_eq!(client.translate("two").await.unwrap(), "[es] two");
    assert_eq!(mock.requested_texts(), ["one", "two", "two"]);
}

#[tokio::test]
async fn test_translate_withPermanentFailure_shouldNotRetry() {
    let mock = MockTranslator::failing();
    let client = client(&mock, fast_settings());

    let result = client.translate("Hello").await;
    assert!(matches!(
        result,
        Err(TranslationError::Provider(ProviderError::ApiError { status_code: 400, .. }))
    ));
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_translate_withRateLimitDelay_shouldSpaceRequests() {
    let mock = MockTranslator::working();
    let settings = ClientSettings {
        rate_limit_delay_ms: 40,
        cache_enabled: false,
        ..fast_settings()
    };
    let client = client(&mock, settings);

    let started = Instant::now();
    for _ in 0..3 {
        client.translate("tick").await.unwrap();
    }
    assert!(started.elapsed() >= Duration::from_millis(80));
}
