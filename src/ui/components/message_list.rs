//! Message list component
//!
//! Displays the conversation transcript: user and assistant bubbles, system
//! notices, inline errors and per-reply audio playback.

use crate::messages::{Message, MessageKind};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, RichText, Vec2};

/// Message list component
pub struct MessageList<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let mut play_request: Option<String> = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if self.state.log.is_empty() && !self.state.awaiting_reply() {
                        self.show_empty_state(ui);
                    } else {
                        for (index, message) in self.state.log.entries().iter().enumerate() {
                            if index > 0 {
                                ui.separator();
                            }
                            self.show_message(ui, message, &mut play_request);
                            ui.add_space(self.theme.spacing_sm);
                        }

                        if self.state.awaiting_reply() {
                            self.show_typing_indicator(ui);
                        }
                    }

                    ui.add_space(self.theme.spacing);
                });
            });

        if let Some(url) = play_request {
            self.state.request_audio(&url);
        }
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.label(
                RichText::new("Chat with your documents")
                    .size(24.0)
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing);

            ui.label(
                RichText::new("Upload a document, then ask questions about its content.")
                    .size(14.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(self.theme.spacing_lg);

            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::splat(self.theme.spacing);

                self.show_hint_card(ui, "Upload", "PDF, DOCX, spreadsheets, images");
                self.show_hint_card(ui, "Ask", "Type or dictate your question");
                self.show_hint_card(ui, "Listen", "Replies can be played back aloud");
            });
        });
    }

    fn show_hint_card(&self, ui: &mut egui::Ui, title: &str, description: &str) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_width(150.0);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(title)
                            .size(14.0)
                            .strong()
                            .color(self.theme.primary),
                    );
                    ui.label(
                        RichText::new(description)
                            .size(12.0)
                            .color(self.theme.text_muted),
                    );
                });
            });
    }

    fn show_message(
        &self,
        ui: &mut egui::Ui,
        message: &Message,
        play_request: &mut Option<String>,
    ) {
        let is_user = message.kind == MessageKind::User;
        let bubble_color = self.theme.bubble_fill(&message.kind);
        let text_color = self.theme.bubble_text(&message.kind);

        // User messages align right, everything else left.
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(kind_label(&message.kind))
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);

                    ui.horizontal_wrapped(|ui| {
                        if let Some(icon) = kind_icon(&message.kind) {
                            ui.label(RichText::new(icon).size(16.0).color(text_color));
                        }
                        ui.label(RichText::new(&message.content).color(text_color));
                    });

                    if let Some(url) = &message.audio_url {
                        self.show_play_control(ui, url, play_request);
                    }

                    if let Some(context) = &message.context {
                        self.show_context(ui, message, context);
                    }
                });

            let time_str = message.timestamp.format("%H:%M").to_string();
            ui.label(
                RichText::new(time_str)
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_play_control(
        &self,
        ui: &mut egui::Ui,
        url: &str,
        play_request: &mut Option<String>,
    ) {
        ui.horizontal(|ui| {
            let button = egui::Button::new(
                RichText::new("▶").size(14.0).color(self.theme.primary),
            )
            .min_size(Vec2::splat(28.0))
            .rounding(self.theme.button_rounding);

            if ui.add(button).on_hover_text("Play audio reply").clicked() {
                *play_request = Some(url.to_string());
            }

            ui.label(
                RichText::new("Audio reply")
                    .size(12.0)
                    .color(self.theme.text_secondary),
            );
        });
    }

    fn show_context(&self, ui: &mut egui::Ui, message: &Message, context: &serde_json::Value) {
        let pretty = serde_json::to_string_pretty(context).unwrap_or_default();

        egui::CollapsingHeader::new(
            RichText::new("Context")
                .size(12.0)
                .color(self.theme.text_secondary),
        )
        .id_salt(message.id)
        .show(ui, |ui| {
            ui.label(
                RichText::new(pretty)
                    .size(11.0)
                    .family(egui::FontFamily::Monospace)
                    .color(self.theme.text_secondary),
            );
        });
    }

    fn show_typing_indicator(&self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            ui.label(
                RichText::new("Assistant")
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            egui::Frame::none()
                .fill(self.theme.assistant_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for i in 0..3 {
                            let t = ui.ctx().input(|i| i.time);
                            let alpha = ((t * 3.0 + i as f64 * 0.5).sin() * 0.5 + 0.5) as f32;
                            ui.label(
                                RichText::new("●")
                                    .size(10.0)
                                    .color(self.theme.text_muted.gamma_multiply(alpha)),
                            );
                        }
                    });
                });
        });

        ui.ctx().request_repaint();
    }
}

fn kind_label(kind: &MessageKind) -> &str {
    match kind {
        MessageKind::User => "You",
        MessageKind::Assistant => "Assistant",
        MessageKind::System => "System",
        MessageKind::Error => "Error",
        MessageKind::Other(name) => name.as_str(),
    }
}

fn kind_icon(kind: &MessageKind) -> Option<&'static str> {
    match kind {
        MessageKind::System => Some("ℹ"),
        MessageKind::Error => Some("⚠"),
        _ => None,
    }
}
