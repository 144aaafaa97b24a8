use eframe::egui;
use log::warn;
use std::time::Duration;

use crate::app_controller::{Controller, Notice, NoticeLevel};
use crate::language_utils::{self, SUPPORTED_LANGUAGES};

const PPTX_FILTER_NAME: &str = "PPTX files";
const PPTX_EXTENSIONS: &[&str] = &["pptx"];

/// eframe front end over a `Controller`
pub struct TranslatorApp {
    controller: Controller,
}

impl TranslatorApp {
    pub fn new(controller: Controller) -> Self {
        Self { controller }
    }

    fn file_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Select Input File").clicked() {
                let picked = rfd::FileDialog::new()
                    .add_filter(PPTX_FILTER_NAME, PPTX_EXTENSIONS)
                    .pick_file();
                self.controller.select_input(picked);
            }
            ui.label(self.controller.input_label());
        });

        ui.horizontal(|ui| {
            if ui.button("Select Output File").clicked() {
                let mut dialog = rfd::FileDialog::new().add_filter(PPTX_FILTER_NAME, PPTX_EXTENSIONS);
                if let Some(dir) = self.controller.input_path().and_then(|p| p.parent()) {
                    dialog = dialog.set_directory(dir);
                }
                self.controller.select_output(dialog.save_file());
            }
            ui.label(self.controller.output_label());
        });
    }

    fn language_row(&mut self, ui: &mut egui::Ui) {
        let mut source = self.controller.source_language().to_string();
        let mut target = self.controller.target_language().to_string();

        ui.horizontal(|ui| {
            language_combo(ui, "Source Language:", "source_language", &mut source);
            ui.add_space(12.0);
            language_combo(ui, "Target Language:", "target_language", &mut target);
        });

        if source != self.controller.source_language() {
            if let Err(e) = self.controller.set_source_language(&source) {
                warn!("Source language not applied: {}", e);
            }
        }
        if target != self.controller.target_language() {
            if let Err(e) = self.controller.set_target_language(&target) {
                warn!("Target language not applied: {}", e);
            }
        }
    }

    fn notice_modal(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.notice().cloned() else {
            return;
        };

        let response = egui::Modal::new(egui::Id::new("notice")).show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.heading(egui::RichText::new(&notice.title).color(notice_color(&notice)));
            ui.add_space(6.0);
            ui.label(&notice.message);
            ui.add_space(10.0);
            ui.button("OK").clicked()
        });

        if response.inner || response.should_close() {
            self.controller.take_notice();
        }
    }
}

impl eframe::App for TranslatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 8.0;
            self.file_row(ui);
            self.language_row(ui);

            let progress = f32::from(self.controller.progress()) / 100.0;
            ui.add(egui::ProgressBar::new(progress).show_percentage());

            let translate = ui.add_enabled(
                self.controller.can_translate(),
                egui::Button::new("Translate").min_size(egui::vec2(120.0, 28.0)),
            );
            if translate.clicked() {
                // Validation failures queue a warning notice
                let _ = self.controller.start_translation();
            }
        });

        self.notice_modal(ctx);

        if self.controller.is_running() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

fn language_combo(ui: &mut egui::Ui, label: &str, id: &str, selected: &mut String) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.clone())
        .show_ui(ui, |ui| {
            for code in SUPPORTED_LANGUAGES {
                ui.selectable_value(selected, code.to_string(), language_utils::display_label(code));
            }
        });
}

fn notice_color(notice: &Notice) -> egui::Color32 {
    match notice.level {
        NoticeLevel::Information => egui::Color32::from_rgb(70, 160, 90),
        NoticeLevel::Warning => egui::Color32::from_rgb(210, 160, 40),
        NoticeLevel::Critical => egui::Color32::from_rgb(200, 60, 60),
    }
}
