/*!
 * Tests for application configuration
 */

use anyhow::Result;
use pptx_translator::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};
use std::str::FromStr;

use crate::common;

#[test]
fn test_default_config_shouldUseEnglishToSpanish() {
    let config = Config::default();
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "es");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_config_shouldListBothProviders() {
    let config = Config::default();
    assert!(config.translation.get_provider_config(&TranslationProvider::Google).is_some());
    assert!(config.translation.get_provider_config(&TranslationProvider::LibreTranslate).is_some());
    assert_eq!(
        config.translation.get_endpoint(),
        "https://translate.googleapis.com/translate_a/single"
    );
    assert_eq!(config.translation.get_max_chars_per_request(), 5000);
    assert_eq!(config.translation.get_timeout_secs(), 30);
}

#[test]
fn test_common_defaults_shouldRetryThreeTimesWithCache() {
    let common = Config::default().translation.common;
    assert_eq!(common.retry_count, 3);
    assert_eq!(common.retry_backoff_ms, 1000);
    assert_eq!(common.rate_limit_delay_ms, 0);
    assert!(common.cache_enabled);
}

#[test]
fn test_validate_withInvalidTargetLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "xx".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withAutoSource_shouldSucceed() {
    let mut config = Config::default();
    config.source_language = "auto".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withAutoTarget_shouldFail() {
    let mut config = Config::default();
    config.target_language = "auto".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_provider_fromStr_shouldAcceptKnownNames() {
    assert_eq!(TranslationProvider::from_str("Google").unwrap(), TranslationProvider::Google);
    assert_eq!(
        TranslationProvider::from_str("libretranslate").unwrap(),
        TranslationProvider::LibreTranslate
    );
    assert!(TranslationProvider::from_str("deepl").is_err());
    assert_eq!(TranslationProvider::LibreTranslate.to_string(), "libretranslate");
}

#[test]
fn test_partialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "target_language": "fr",
        "translation": {
            "provider": "libretranslate",
            "available_providers": [
                { "type": "libretranslate", "endpoint": "https://libre.example.com", "api_key": "secret" }
            ]
        }
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.translation.provider, TranslationProvider::LibreTranslate);
    assert_eq!(config.translation.get_endpoint(), "https://libre.example.com");
    assert_eq!(config.translation.get_api_key(), "secret");
    assert_eq!(config.translation.get_timeout_secs(), 30);
    assert_eq!(config.translation.common.retry_count, 3);
    Ok(())
}

#[test]
fn test_providerConfig_withEmptyEndpoint_shouldFallBackToDefault() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LibreTranslate;
    config.translation.available_providers = vec![ProviderConfig {
        endpoint: String::new(),
        ..ProviderConfig::new(TranslationProvider::LibreTranslate)
    }];
    assert_eq!(config.translation.get_endpoint(), "http://localhost:5000");
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("nested").join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.target_language, "es");

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(written["translation"]["provider"], "google");
    assert_eq!(written["translation"]["available_providers"][0]["type"], "google");
    Ok(())
}

#[test]
fn test_saveThenLoad_shouldKeepValues() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.source_language = "de".to_string();
    config.log_level = LogLevel::Debug;
    config.translation.common.rate_limit_delay_ms = 250;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.source_language, "de");
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.translation.common.rate_limit_delay_ms, 250);
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_logLevel_toLevelFilter_shouldMatch() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
