/*!
 * Language utilities for ISO language code handling.
 *
 * This module holds the closed set of languages offered in the window and
 * validates the ISO 639-1 (2-letter) and ISO 639-3 (3-letter) codes
 * passed to translation providers.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Languages offered in the window, in display order
pub const SUPPORTED_LANGUAGES: [&str; 10] = ["en", "es", "fr", "de", "it", "pt", "ru", "ja", "ko", "zh"];

/// Default source language
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

/// Default target language
pub const DEFAULT_TARGET_LANGUAGE: &str = "es";

/// Pseudo code asking the provider to detect the source language
pub const AUTO_DETECT: &str = "auto";

/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-3 (3-letter) code
    Part3,
}

/// Whether a code belongs to the set offered in the window
pub fn is_supported(code: &str) -> bool {
    let normalized = code.trim().to_lowercase();
    SUPPORTED_LANGUAGES.contains(&normalized.as_str())
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-3 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 if Language::from_639_1(&normalized_code).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&normalized_code).is_some() => Ok(LanguageCodeType::Part3),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Validate a source language code, which may also ask for auto detection
pub fn validate_source_language(code: &str) -> Result<()> {
    if code.trim().eq_ignore_ascii_case(AUTO_DETECT) {
        return Ok(());
    }
    validate_language_code(code).map(|_| ())
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    let lang = match validate_language_code(&normalized)? {
        LanguageCodeType::Part1 => Language::from_639_1(&normalized),
        LanguageCodeType::Part3 => Language::from_639_3(&normalized),
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Label shown in the language pickers, e.g. `en - English`
pub fn display_label(code: &str) -> String {
    match get_language_name(code) {
        Ok(name) => format!("{} - {}", code, name),
        Err(_) => code.to_string(),
    }
}
