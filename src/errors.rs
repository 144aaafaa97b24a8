/*!
 * Error types for the pptx-translator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with translation provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether a retry of the same request has a chance to succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Errors raised while opening, editing or saving a presentation
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input file could not be read
    #[error("Cannot open presentation {path}: {message}")]
    Open {
        /// Path that was being opened
        path: String,
        /// Underlying I/O or archive message
        message: String,
    },

    /// The package or one of its parts is not valid PresentationML
    #[error("Malformed presentation: {0}")]
    Malformed(String),

    /// Text could not be written back into a shape
    #[error("Cannot update shape text: {0}")]
    Edit(String),

    /// The output file could not be written
    #[error("Cannot save presentation to {path}: {message}")]
    Persist {
        /// Destination path
        path: String,
        /// Underlying I/O or archive message
        message: String,
    },
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error writing translated text back into the document
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// The language code is not a known ISO 639 code
    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),
}

/// Errors detected synchronously before any run starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Input or output path is not selected
    #[error("Please select both input and output files.")]
    MissingPaths,

    /// A run is already active for this window
    #[error("A translation is already in progress.")]
    RunInProgress,

    /// Language outside the offered set
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the presentation layer
    #[error("{0}")]
    Document(#[from] DocumentError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
