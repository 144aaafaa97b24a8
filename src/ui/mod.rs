/*!
 * Desktop window.
 *
 * `run` owns the tokio runtime the workers execute on and blocks on the
 * eframe event loop until the window closes. Closing the window drops the
 * controller, which aborts a run still in flight.
 */

use anyhow::{anyhow, Context, Result};
use log::info;
use std::sync::Arc;

use crate::app_config::Config;
use crate::app_controller::{Controller, RuntimeLauncher};
use crate::providers;
use crate::translation::ClientSettings;
use crate::worker::TranslationWorker;

mod app;

pub use app::TranslatorApp;

/// Window title
pub const WINDOW_TITLE: &str = "PPTX Translator";

/// Open the translator window and block until it is closed
pub fn run(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("translation-worker")
        .build()
        .context("Failed to start the async runtime")?;

    let translator = providers::create_translator(&config.translation)
        .context("Failed to create the translation provider")?;
    info!(
        "Using {} provider at {}",
        config.translation.provider.display_name(),
        config.translation.get_endpoint()
    );
    let worker = Arc::new(TranslationWorker::new(
        translator,
        ClientSettings::from(&config.translation.common),
    ));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([500.0, 250.0])
            .with_min_inner_size([420.0, 230.0])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    let result = eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let launcher = RuntimeLauncher::new(handle, worker)
                .with_waker(Arc::new(move || ctx.request_repaint()));
            let controller = Controller::with_config(Box::new(launcher), &config);
            Ok(Box::new(TranslatorApp::new(controller)))
        }),
    );

    runtime.shutdown_background();
    result.map_err(|e| anyhow!("Window error: {}", e))
}
