//! Document upload panel
//!
//! File picker button, active document display and upload progress. Files
//! dropped on the window are routed here through the same state entry point.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};
use std::path::{Path, PathBuf};

/// File extensions the picker and the drop handler accept.
pub const ALLOWED_EXTENSIONS: [&str; 8] =
    ["pdf", "docx", "xls", "xlsx", "txt", "png", "jpg", "jpeg"];

/// Caption listing the supported formats.
pub const FORMATS_CAPTION: &str = "Supported formats: PDF, DOCX, XLSX, TXT, PNG, JPG";

/// True when the file's extension is on the allow-list, case-insensitive.
pub fn extension_allowed(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .map_or(false, |e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
}

/// Upload panel component
pub struct UploadPanel<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> UploadPanel<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_document_chip(ui);

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.show_upload_control(ui);
                    });
                });

                ui.label(
                    RichText::new(FORMATS_CAPTION)
                        .size(11.0)
                        .color(self.theme.text_muted),
                );
            });
    }

    fn show_document_chip(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("📄").size(18.0));

        match &self.state.document {
            Some(document) => {
                ui.label(
                    RichText::new(&document.name)
                        .strong()
                        .color(self.theme.text_primary),
                );
            }
            None => {
                ui.label(RichText::new("No document uploaded").color(self.theme.text_muted));
            }
        }
    }

    fn show_upload_control(&mut self, ui: &mut egui::Ui) {
        if self.state.is_uploading() {
            ui.label(RichText::new("Processing document...").color(self.theme.text_secondary));
            ui.add(egui::Spinner::new().size(18.0));
            return;
        }

        let button = egui::Button::new(
            RichText::new("Upload Document").color(egui::Color32::WHITE),
        )
        .fill(self.theme.primary)
        .rounding(self.theme.button_rounding);

        let response = ui.add(button).on_hover_text("Choose a document to upload");
        if response.clicked() {
            if let Some(path) = pick_document() {
                self.state.upload_document(path);
            }
        }
    }
}

/// Open the native file picker, filtered to the allow-list.
fn pick_document() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Documents", &ALLOWED_EXTENSIONS)
        .pick_file()
}
