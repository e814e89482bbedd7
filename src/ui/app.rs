//! Main application struct and eframe integration
//!
//! This module contains the main DocChatApp that implements eframe::App.

use crate::backend::{BackendClient, BackendPipeline};
use crate::config::AppConfig;
use crate::speech;
use crate::ui::components::upload_panel::extension_allowed;
use crate::ui::components::{InputBar, MessageList, UploadPanel};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use std::time::Duration;
use tracing::error;

/// Main DocChat application
pub struct DocChatApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
}

impl DocChatApp {
    /// Create a new DocChat application
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let theme = Theme::light();
        theme.apply(&cc.egui_ctx);

        let mut state = AppState::new(config.clone());

        match BackendClient::new(&config.server_url) {
            Ok(client) => {
                let pipeline = BackendPipeline::new(client.clone());
                let command_tx = pipeline.command_sender();
                let event_rx = pipeline.event_receiver();

                match pipeline.start_worker() {
                    Ok(()) => state.connect_backend(command_tx, event_rx),
                    Err(e) => {
                        error!("Failed to start backend worker: {}", e);
                        state.last_error = Some(e.user_message());
                    }
                }

                state.set_recognizer(speech::platform_recognizer(client, config.speech.clone()));
            }
            Err(e) => {
                error!("Invalid server URL {:?}: {}", config.server_url, e);
                state.last_error = Some(e.user_message());
            }
        }

        Self { state, theme }
    }

    /// Route files dropped on the window into the upload flow. Only the
    /// first file counts; off-list extensions surface in the status line.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        if let Some(file) = dropped.into_iter().next() {
            if let Some(path) = file.path {
                if extension_allowed(&path) {
                    self.state.upload_document(path);
                } else {
                    let name = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("file")
                        .to_string();
                    self.state.last_error = Some(format!("Unsupported file type: {name}"));
                }
            }
        }
    }

    /// Show the top header bar
    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.primary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("DocChat")
                            .size(20.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );

                    ui.label(
                        RichText::new("Document Q&A")
                            .size(14.0)
                            .color(egui::Color32::from_white_alpha(180)),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.state.is_processing() {
                            ui.add(egui::Spinner::new().size(16.0));
                        }

                        ui.label(
                            RichText::new(&self.state.config.server_url)
                                .size(11.0)
                                .family(egui::FontFamily::Monospace)
                                .color(egui::Color32::from_white_alpha(160)),
                        );
                    });
                });
            });
    }

    /// Show the status line when a non-conversational error is pending
    fn show_status_line(&mut self, ctx: &egui::Context) {
        if self.state.last_error.is_none() {
            return;
        }

        TopBottomPanel::top("status_line")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.error_bubble)
                    .inner_margin(8.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").color(self.theme.error));
                    if let Some(error) = &self.state.last_error {
                        ui.label(RichText::new(error).size(13.0).color(self.theme.error));
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").on_hover_text("Dismiss").clicked() {
                            self.state.last_error = None;
                        }
                    });
                });
            });
    }

    /// Show the document upload panel
    fn show_upload_panel(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("upload_panel")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                UploadPanel::new(&mut self.state, &self.theme).show(ui);
            });
    }

    /// Show the bottom input area
    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                InputBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    /// Show the main content area (message list)
    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                MessageList::new(&mut self.state, &self.theme).show(ui);
            });
    }

    /// Darken the window and invite the drop while a file hovers over it
    fn show_drop_overlay(&self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if !hovering {
            return;
        }

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("file_drop_overlay"),
        ));
        let rect = ctx.screen_rect();
        painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(128));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drop a document to upload",
            egui::FontId::proportional(22.0),
            egui::Color32::WHITE,
        );
    }
}

impl eframe::App for DocChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply worker events before building widgets.
        self.state.poll_events();

        self.handle_dropped_files(ctx);

        self.show_header(ctx);
        self.show_status_line(ctx);
        self.show_upload_panel(ctx);
        self.show_input_area(ctx);
        self.show_content(ctx);
        self.show_drop_overlay(ctx);

        // Worker events arrive between frames; keep polling even when idle.
        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.shutdown();
    }
}
