/*!
 * Tests for error types
 */

use pptx_translator::errors::{AppError, DocumentError, ProviderError, TranslationError, ValidationError};

#[test]
fn test_providerError_isRetryable_shouldCoverTransientFailures() {
    assert!(ProviderError::ConnectionError("reset".into()).is_retryable());
    assert!(ProviderError::RateLimitExceeded("slow down".into()).is_retryable());
    assert!(ProviderError::ApiError { status_code: 503, message: "busy".into() }.is_retryable());

    assert!(!ProviderError::ApiError { status_code: 400, message: "bad".into() }.is_retryable());
    assert!(!ProviderError::AuthenticationError("key".into()).is_retryable());
    assert!(!ProviderError::ParseError("json".into()).is_retryable());
    assert!(!ProviderError::RequestFailed("builder".into()).is_retryable());
}

#[test]
fn test_validationError_missingPaths_shouldUseDialogText() {
    assert_eq!(
        ValidationError::MissingPaths.to_string(),
        "Please select both input and output files."
    );
}

#[test]
fn test_appError_fromDocument_shouldKeepMessageUnprefixed() {
    let error: AppError = DocumentError::Open {
        path: "deck.pptx".into(),
        message: "No such file or directory".into(),
    }
    .into();
    assert_eq!(
        error.to_string(),
        "Cannot open presentation deck.pptx: No such file or directory"
    );
}

#[test]
fn test_translationError_fromProvider_shouldWrapMessage() {
    let error: TranslationError = ProviderError::ApiError { status_code: 429, message: "quota".into() }.into();
    assert_eq!(error.to_string(), "Provider error: API responded with error: 429 - quota");

    let app: AppError = error.into();
    assert!(matches!(app, AppError::Translation(TranslationError::Provider(_))));
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldConvert() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    assert!(matches!(AppError::from(io), AppError::File(_)));

    let other = anyhow::anyhow!("something odd");
    assert_eq!(AppError::from(other).to_string(), "Unknown error: something odd");
}
