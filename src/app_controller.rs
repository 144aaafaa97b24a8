use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc::TryRecvError;
use std::sync::Arc;
use tokio::runtime::Handle;
use uuid::Uuid;

use crate::app_config::Config;
use crate::errors::ValidationError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::worker::{TranslationJob, TranslationWorker, WorkerEvent, WorkerHandle};

// @module: Application controller for the translator window

/// Placeholder shown while no input file is selected
pub const NO_INPUT_SELECTED: &str = "No input file selected";

/// Placeholder shown while no output file is selected
pub const NO_OUTPUT_SELECTED: &str = "No output file selected";

/// Message used when a worker disappears without a terminal event
pub const WORKER_STOPPED: &str = "translation worker stopped unexpectedly";

/// Severity of a notice shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Information,
    Critical,
}

/// Blocking message for the window to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, "Error", message)
    }

    pub fn success(output_path: &Path) -> Self {
        Self::new(
            NoticeLevel::Information,
            "Success",
            format!("Translation completed. File saved as: {}", output_path.display()),
        )
    }

    pub fn failure(message: &str) -> Self {
        Self::new(
            NoticeLevel::Critical,
            "Error",
            format!("An error occurred during translation: {}", message),
        )
    }
}

/// Starts worker runs for the controller
pub trait JobLauncher {
    fn launch(&self, job: TranslationJob) -> WorkerHandle;
}

/// Launches runs on a tokio runtime
pub struct RuntimeLauncher {
    // @field: Runtime the runs are spawned on
    runtime: Handle,
    // @field: Shared worker
    worker: Arc<TranslationWorker>,
    // @field: Called after every event, e.g. to repaint the window
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl RuntimeLauncher {
    pub fn new(runtime: Handle, worker: Arc<TranslationWorker>) -> Self {
        Self {
            runtime,
            worker,
            waker: None,
        }
    }

    pub fn with_waker(mut self, waker: Arc<dyn Fn() + Send + Sync>) -> Self {
        self.waker = Some(waker);
        self
    }
}

impl JobLauncher for RuntimeLauncher {
    fn launch(&self, job: TranslationJob) -> WorkerHandle {
        self.worker.spawn(&self.runtime, job, self.waker.clone())
    }
}

/// Window state and the actions applied to it
///
/// The controller is the only owner of this state. Workers reach it only
/// through the events drained by `poll`.
pub struct Controller {
    // @field: Starts runs
    launcher: Box<dyn JobLauncher>,
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    source_language: String,
    target_language: String,
    progress: u8,
    // @field: Run in flight, if any
    active: Option<WorkerHandle>,
    // @field: Notice waiting to be shown
    notice: Option<Notice>,
    // @field: Output path of the active run
    pending_output: Option<PathBuf>,
}

impl Controller {
    /// Create a controller with the given initial languages
    ///
    /// Unsupported codes fall back to the defaults.
    pub fn new(launcher: Box<dyn JobLauncher>, source_language: &str, target_language: &str) -> Self {
        Self {
            launcher,
            input_path: None,
            output_path: None,
            source_language: supported_or(source_language, language_utils::DEFAULT_SOURCE_LANGUAGE),
            target_language: supported_or(target_language, language_utils::DEFAULT_TARGET_LANGUAGE),
            progress: 0,
            active: None,
            notice: None,
            pending_output: None,
        }
    }

    // @method: Create a controller preselecting the configured languages
    pub fn with_config(launcher: Box<dyn JobLauncher>, config: &Config) -> Self {
        Self::new(launcher, &config.source_language, &config.target_language)
    }

    /// Record the chosen input file; `None` (cancelled dialog) keeps the current one
    pub fn select_input(&mut self, path: Option<PathBuf>) {
        if let Some(path) = path {
            if !FileManager::is_presentation_file(&path) {
                warn!("Selected input does not look like a presentation: {:?}", path);
            }
            debug!("Input file selected: {:?}", path);
            self.input_path = Some(path);
        }
    }

    /// Record the chosen output file; `None` (cancelled dialog) keeps the current one
    pub fn select_output(&mut self, path: Option<PathBuf>) {
        if let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) {
            let path = FileManager::with_presentation_extension(path);
            debug!("Output file selected: {:?}", path);
            self.output_path = Some(path);
        }
    }

    pub fn set_source_language(&mut self, code: &str) -> Result<(), ValidationError> {
        self.source_language = checked_language(code)?;
        Ok(())
    }

    pub fn set_target_language(&mut self, code: &str) -> Result<(), ValidationError> {
        self.target_language = checked_language(code)?;
        Ok(())
    }

    /// Validate the state and launch one run
    ///
    /// On a validation failure a warning notice is queued and nothing else
    /// happens: no file is touched and no run is created.
    pub fn start_translation(&mut self) -> Result<Uuid, ValidationError> {
        match self.build_job() {
            Ok(job) => {
                info!(
                    "Starting translation of {:?} ({} -> {})",
                    job.input_path, job.source_language, job.target_language
                );
                self.progress = 0;
                self.pending_output = Some(job.output_path.clone());
                let handle = self.launcher.launch(job);
                let run_id = handle.run_id();
                self.active = Some(handle);
                Ok(run_id)
            }
            Err(e) => {
                warn!("Translation not started: {}", e);
                self.notice = Some(Notice::warning(e.to_string()));
                Err(e)
            }
        }
    }

    fn build_job(&self) -> Result<TranslationJob, ValidationError> {
        if self.is_running() {
            return Err(ValidationError::RunInProgress);
        }

        let input = selected(&self.input_path).ok_or(ValidationError::MissingPaths)?;
        let output = selected(&self.output_path).ok_or(ValidationError::MissingPaths)?;

        Ok(TranslationJob::new(
            input,
            output,
            self.source_language.clone(),
            self.target_language.clone(),
        ))
    }

    /// Apply every event the active run has sent so far
    ///
    /// Returns the number of events applied.
    pub fn poll(&mut self) -> usize {
        let mut events = Vec::new();
        if let Some(handle) = &self.active {
            loop {
                match handle.receiver().try_recv() {
                    Ok(event) => {
                        let terminal = event.is_terminal();
                        events.push(event);
                        if terminal {
                            break;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!("Worker channel closed without a final event");
                        events.push(WorkerEvent::Error(WORKER_STOPPED.to_string()));
                        break;
                    }
                }
            }
        }

        let applied = events.len();
        for event in events {
            self.apply(event);
        }
        applied
    }

    fn apply(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Progress(value) => self.progress = value.min(100),
            WorkerEvent::Finished => {
                self.active = None;
                let output = self.pending_output.take().unwrap_or_default();
                info!("Translation completed: {:?}", output);
                self.notice = Some(Notice::success(&output));
            }
            WorkerEvent::Error(message) => {
                self.active = None;
                self.pending_output = None;
                self.notice = Some(Notice::failure(&message));
            }
        }
    }

    /// Abort the active run, if any
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.active.take() {
            info!("Aborting translation run {}", handle.run_id());
            handle.abort();
        }
        self.pending_output = None;
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the translate action is currently available
    pub fn can_translate(&self) -> bool {
        !self.is_running()
    }

    pub fn active_run(&self) -> Option<Uuid> {
        self.active.as_ref().map(WorkerHandle::run_id)
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Remove the pending notice once it has been acknowledged
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn input_path(&self) -> Option<&Path> {
        self.input_path.as_deref()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn input_label(&self) -> String {
        label(&self.input_path, NO_INPUT_SELECTED)
    }

    pub fn output_label(&self) -> String {
        label(&self.output_path, NO_OUTPUT_SELECTED)
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn selected(path: &Option<PathBuf>) -> Option<PathBuf> {
    path.as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .filter(|p| {
            let shown = p.to_string_lossy();
            shown != NO_INPUT_SELECTED && shown != NO_OUTPUT_SELECTED
        })
        .cloned()
}

fn label(path: &Option<PathBuf>, placeholder: &str) -> String {
    selected(path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| placeholder.to_string())
}

fn checked_language(code: &str) -> Result<String, ValidationError> {
    if language_utils::is_supported(code) {
        Ok(code.trim().to_lowercase())
    } else {
        Err(ValidationError::UnsupportedLanguage(code.to_string()))
    }
}

fn supported_or(code: &str, fallback: &str) -> String {
    checked_language(code).unwrap_or_else(|_| {
        warn!("Language {:?} is not offered, using {}", code, fallback);
        fallback.to_string()
    })
}
