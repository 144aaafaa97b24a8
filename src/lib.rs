/*!
 * # PPTX Translator
 *
 * A desktop tool that translates the text of PowerPoint presentations.
 *
 * ## Features
 *
 * - Translate every text-bearing shape of a `.pptx` file, slide by slide
 * - Tables and other text frames are translated paragraph by paragraph
 * - Formatting of the first run of each paragraph is kept
 * - Translation providers:
 *   - Google Translate public endpoint
 *   - LibreTranslate (self-hosted or public instance)
 * - Retries with exponential backoff, request pacing and caching
 * - Background worker reporting progress to the window over a channel
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `presentation`: PPTX package reading, shape text editing and saving
 * - `providers`: Clients for the translation services
 * - `translation`: Per-run translation client with retries and caching
 * - `worker`: Background run emitting `Progress`, `Finished` and `Error`
 * - `app_controller`: Window state and actions, independent of the toolkit
 * - `ui`: eframe/egui window
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod presentation;
pub mod providers;
pub mod translation;
pub mod ui;
pub mod worker;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, JobLauncher, Notice, NoticeLevel};
pub use errors::{AppError, DocumentError, ProviderError, TranslationError, ValidationError};
pub use presentation::Presentation;
pub use providers::Translator;
pub use translation::TranslationClient;
pub use worker::{TranslationJob, TranslationWorker, WorkerEvent, WorkerHandle};
