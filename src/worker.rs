/*!
 * Background translation worker.
 *
 * A run takes one `TranslationJob`, translates every text-bearing shape of
 * the presentation and reports through a channel of `WorkerEvent`s: zero or
 * more `Progress` values, then exactly one `Finished` or `Error`. The worker
 * never touches window state and never returns an error to its caller.
 */

use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::errors::{AppError, TranslationError};
use crate::presentation::{Presentation, ShapeMut};
use crate::providers::Translator;
use crate::translation::{ClientSettings, TranslationClient};

/// Input of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub source_language: String,
    pub target_language: String,
}

impl TranslationJob {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Notification sent from a run to the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Percentage of shapes processed, 0..=100
    Progress(u8),
    /// The output file was written
    Finished,
    /// The run failed; carries the message to show
    Error(String),
}

impl WorkerEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerEvent::Progress(_))
    }
}

/// `floor(processed / total * 100)`, 100 when there is nothing to process
pub fn progress_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let processed = processed.min(total) as u128;
    (processed * 100 / total as u128) as u8
}

/// Sending side of a run's notifications
///
/// Drops everything after the terminal event and never lets progress go
/// backwards. A closed receiver is ignored: the window may be gone.
pub struct EventSender {
    sender: Sender<WorkerEvent>,
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
    last_progress: Option<u8>,
    terminated: bool,
}

impl EventSender {
    pub fn new(sender: Sender<WorkerEvent>) -> Self {
        Self {
            sender,
            waker: None,
            last_progress: None,
            terminated: false,
        }
    }

    /// Call `waker` after every delivered event, e.g. to request a repaint
    pub fn with_waker(mut self, waker: Arc<dyn Fn() + Send + Sync>) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn progress(&mut self, value: u8) {
        let value = value.min(100).max(self.last_progress.unwrap_or(0));
        self.last_progress = Some(value);
        self.send(WorkerEvent::Progress(value));
    }

    pub fn finished(&mut self) {
        self.send(WorkerEvent::Finished);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.send(WorkerEvent::Error(message.into()));
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn send(&mut self, event: WorkerEvent) {
        if self.terminated {
            debug!("Dropping event after terminal notification: {:?}", event);
            return;
        }
        self.terminated = event.is_terminal();
        if self.sender.send(event).is_ok() {
            if let Some(waker) = &self.waker {
                waker();
            }
        }
    }
}

/// Counters of one run, logged at the end
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub slides: usize,
    pub shapes: usize,
    pub translated_segments: usize,
    pub failed_shapes: usize,
    pub cache_hits: usize,
}

/// What happened to one shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeOutcome {
    Translated(usize),
    Skipped,
}

/// Runs translation jobs against one translator
#[derive(Debug, Clone)]
pub struct TranslationWorker {
    translator: Arc<dyn Translator>,
    settings: ClientSettings,
}

impl TranslationWorker {
    pub fn new(translator: Arc<dyn Translator>, settings: ClientSettings) -> Self {
        Self { translator, settings }
    }

    /// Run a job to completion, reporting through `events`
    pub async fn run(&self, job: TranslationJob, events: &mut EventSender) {
        let run_id = Uuid::new_v4();
        self.run_with_id(run_id, job, events).await;
    }

    async fn run_with_id(&self, run_id: Uuid, job: TranslationJob, events: &mut EventSender) {
        info!(
            "[{}] Translating {:?} -> {:?} ({} -> {})",
            run_id, job.input_path, job.output_path, job.source_language, job.target_language
        );
        let started = Instant::now();

        match self.execute(&job, events).await {
            Ok(summary) => {
                info!(
                    "[{}] Finished in {:.1}s: {} slides, {} shapes, {} segments translated, {} shapes failed, {} cache hits",
                    run_id,
                    started.elapsed().as_secs_f64(),
                    summary.slides,
                    summary.shapes,
                    summary.translated_segments,
                    summary.failed_shapes,
                    summary.cache_hits
                );
                events.finished();
            }
            Err(e) => {
                error!("[{}] Translation failed: {}", run_id, e);
                events.error(e.to_string());
            }
        }
    }

    async fn execute(&self, job: &TranslationJob, events: &mut EventSender) -> Result<RunSummary, AppError> {
        let client = TranslationClient::new(
            self.translator.clone(),
            &job.source_language,
            &job.target_language,
            self.settings.clone(),
        )?;

        let input = job.input_path.clone();
        let mut presentation = tokio::task::spawn_blocking(move || Presentation::open(input))
            .await
            .map_err(|e| AppError::Unknown(e.to_string()))??;

        let total = presentation.total_shape_count();
        let mut summary = RunSummary {
            slides: presentation.slide_count(),
            shapes: total,
            ..RunSummary::default()
        };
        debug!("{} shapes across {} slides", total, summary.slides);

        let mut processed = 0;
        for (slide_index, slide) in presentation.slides_mut().iter_mut().enumerate() {
            for mut shape in slide.shapes_mut() {
                match translate_shape(&client, &mut shape).await {
                    Ok(ShapeOutcome::Translated(segments)) => summary.translated_segments += segments,
                    Ok(ShapeOutcome::Skipped) => {}
                    Err(e) => {
                        summary.failed_shapes += 1;
                        warn!(
                            "Error processing shape {:?} on slide {}: {}",
                            shape.view().name().unwrap_or("<unnamed>"),
                            slide_index + 1,
                            e
                        );
                    }
                }

                processed += 1;
                events.progress(progress_percent(processed, total));
            }
        }

        summary.cache_hits = client.cache().stats().0;

        let output = job.output_path.clone();
        tokio::task::spawn_blocking(move || presentation.save(output))
            .await
            .map_err(|e| AppError::Unknown(e.to_string()))??;

        Ok(summary)
    }

    /// Start a run on `runtime`; events arrive on the returned handle
    pub fn spawn(&self, runtime: &Handle, job: TranslationJob, waker: Option<Arc<dyn Fn() + Send + Sync>>) -> WorkerHandle {
        let (sender, receiver) = mpsc::channel();
        let mut events = EventSender::new(sender);
        if let Some(waker) = waker {
            events = events.with_waker(waker);
        }

        let run_id = Uuid::new_v4();
        let worker = self.clone();
        let task = runtime.spawn(async move {
            worker.run_with_id(run_id, job, &mut events).await;
        });

        WorkerHandle::new(run_id, receiver, Some(task))
    }
}

/// Translate one shape: direct text first, otherwise its paragraphs
async fn translate_shape(client: &TranslationClient, shape: &mut ShapeMut<'_>) -> Result<ShapeOutcome, TranslationError> {
    if let Some(text) = shape.view().text() {
        if text.trim().is_empty() {
            return Ok(ShapeOutcome::Skipped);
        }
        let translated = client.translate(&text).await?;
        shape.set_text(&translated)?;
        return Ok(ShapeOutcome::Translated(1));
    }

    let mut segments = 0;
    for mut paragraph in shape.paragraphs_mut() {
        let text = paragraph.text();
        if text.trim().is_empty() {
            continue;
        }
        let translated = client.translate(&text).await?;
        paragraph.set_text(&translated);
        segments += 1;
    }

    Ok(if segments > 0 {
        ShapeOutcome::Translated(segments)
    } else {
        ShapeOutcome::Skipped
    })
}

/// Receiving side of one run
pub struct WorkerHandle {
    run_id: Uuid,
    events: Receiver<WorkerEvent>,
    task: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn new(run_id: Uuid, events: Receiver<WorkerEvent>, task: Option<JoinHandle<()>>) -> Self {
        Self { run_id, events, task }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn receiver(&self) -> &Receiver<WorkerEvent> {
        &self.events
    }

    /// Abort the run; no further events will arrive
    pub fn abort(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl std::fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerHandle").field("run_id", &self.run_id).finish()
    }
}
