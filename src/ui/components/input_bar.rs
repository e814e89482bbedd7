//! Input bar component
//!
//! Text entry, microphone toggle and send control for queries.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

/// Input bar component for typed and dictated queries
pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
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
                    self.show_mic_button(ui);

                    ui.add_space(self.theme.spacing_sm);

                    self.show_text_input(ui);

                    ui.add_space(self.theme.spacing_sm);

                    self.show_send_button(ui);
                });

                if self.state.is_listening() {
                    ui.label(
                        RichText::new("Listening...")
                            .size(12.0)
                            .color(self.theme.listening),
                    );
                }
            });
    }

    fn show_mic_button(&mut self, ui: &mut egui::Ui) {
        // No capability: a fixed notice stands in for the microphone control.
        // Typing and sending keep working.
        if !self.state.speech_available() {
            ui.label(
                RichText::new("Speech input is not available on this system")
                    .size(11.0)
                    .color(self.theme.text_muted),
            );
            return;
        }

        let listening = self.state.is_listening();

        let (icon, color) = if listening {
            ("⏹", self.theme.listening)
        } else {
            ("🎤", self.theme.text_secondary)
        };

        let button = egui::Button::new(RichText::new(icon).size(20.0).color(color))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);

        let button = if listening {
            button.fill(self.theme.listening.gamma_multiply(0.2))
        } else {
            button
        };

        let response = ui.add(button);
        let button_rect = response.rect;

        let tooltip = if listening {
            "Stop voice input"
        } else {
            "Start voice input"
        };
        let response = response.on_hover_text(tooltip);

        if response.clicked() {
            self.state.toggle_listening();
        }

        // Pulsing ring while the microphone is live.
        if listening {
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

            let painter = ui.painter();
            let center = button_rect.center();
            let radius = button_rect.width() / 2.0 + 2.0 + pulse * 3.0;

            painter.circle_stroke(
                center,
                radius,
                egui::Stroke::new(
                    2.0 * pulse,
                    self.theme.listening.gamma_multiply(1.0 - pulse * 0.5),
                ),
            );

            ui.ctx().request_repaint();
        }
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        // Reserve space for the send button.
        let available_width = ui.available_width() - 60.0;

        let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
            .hint_text("Ask a question about your document...")
            .desired_width(available_width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(12.0, 8.0));

        let response = ui.add(text_edit);

        // Typing by hand pauses live transcription updates.
        if response.changed() {
            self.state.note_manual_edit();
        }

        if response.has_focus() && !self.state.input_text.trim().is_empty() {
            let enter_pressed = ui.input(|i| i.key_pressed(Key::Enter));
            let modifiers = ui.input(|i| i.modifiers);

            if enter_pressed && plain_enter(modifiers) {
                self.state.submit_query();
            }
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send =
            !self.state.input_text.trim().is_empty() && !self.state.is_processing();

        let button_color = if can_send {
            self.theme.primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(RichText::new("➤").size(18.0).color(egui::Color32::WHITE))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding)
            .fill(button_color);

        let response = ui.add_enabled(can_send, button);

        if response.clicked() {
            self.state.submit_query();
        }

        response.on_hover_text("Send (Enter)");
    }
}

/// Enter submits only when pressed bare; any held modifier suppresses it.
fn plain_enter(modifiers: egui::Modifiers) -> bool {
    !modifiers.any()
}
