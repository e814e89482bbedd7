//! Theme and styling for the DocChat UI
//!
//! This module provides colors, fonts, and visual styling for the application.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Whether this is a dark theme (picks the egui visuals base)
    pub dark: bool,

    /// Primary accent color
    pub primary: Color32,
    /// Success color (green)
    pub success: Color32,
    /// Warning color (orange)
    pub warning: Color32,
    /// Error color (red)
    pub error: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Microphone indicator color while listening
    pub listening: Color32,

    /// Bubble fills per message kind
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,
    pub system_bubble: Color32,
    pub error_bubble: Color32,

    /// Border radius for buttons
    pub button_rounding: Rounding,
    /// Border radius for cards/panels
    pub card_rounding: Rounding,
    /// Border radius for message bubbles
    pub bubble_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Large spacing
    pub spacing_lg: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Create a light theme
    pub fn light() -> Self {
        Self {
            dark: false,

            primary: Color32::from_rgb(25, 118, 210),  // Blue
            success: Color32::from_rgb(46, 125, 50),   // Green
            warning: Color32::from_rgb(237, 108, 2),   // Orange
            error: Color32::from_rgb(211, 47, 47),     // Red

            bg_primary: Color32::from_rgb(255, 255, 255),   // White
            bg_secondary: Color32::from_rgb(245, 245, 245), // Light gray
            bg_tertiary: Color32::from_rgb(238, 238, 238),  // Lighter gray

            text_primary: Color32::from_rgb(33, 33, 33),     // Near black
            text_secondary: Color32::from_rgb(97, 97, 97),   // Gray
            text_muted: Color32::from_rgb(158, 158, 158),    // Medium gray

            listening: Color32::from_rgb(211, 47, 47), // Red

            user_bubble: Color32::from_rgb(25, 118, 210),      // Blue (matches primary)
            assistant_bubble: Color32::from_rgb(234, 234, 234), // Gray
            system_bubble: Color32::from_rgb(227, 242, 253),    // Pale blue
            error_bubble: Color32::from_rgb(253, 237, 237),     // Pale red

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),
            bubble_rounding: Rounding::same(10.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Create a dark theme. Not yet selectable at runtime; the app starts
    /// with [`Theme::light`] and nothing toggles it.
    pub fn dark() -> Self {
        Self {
            dark: true,

            primary: Color32::from_rgb(144, 202, 249), // Light blue
            success: Color32::from_rgb(102, 187, 106), // Green
            warning: Color32::from_rgb(255, 167, 38),  // Orange
            error: Color32::from_rgb(244, 67, 54),     // Red

            bg_primary: Color32::from_rgb(18, 18, 18),  // Near black
            bg_secondary: Color32::from_rgb(30, 30, 30), // Dark gray
            bg_tertiary: Color32::from_rgb(45, 45, 45),  // Lighter gray

            text_primary: Color32::from_rgb(245, 245, 245),  // Almost white
            text_secondary: Color32::from_rgb(189, 189, 189), // Light gray
            text_muted: Color32::from_rgb(140, 140, 140),     // Medium gray

            listening: Color32::from_rgb(244, 67, 54), // Red

            user_bubble: Color32::from_rgb(25, 118, 210),   // Blue
            assistant_bubble: Color32::from_rgb(45, 45, 45), // Gray
            system_bubble: Color32::from_rgb(19, 47, 76),    // Deep blue
            error_bubble: Color32::from_rgb(42, 18, 18),     // Deep red

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),
            bubble_rounding: Rounding::same(10.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.dark {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        // Panel backgrounds
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;

        // Widget colors
        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Text selection
        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        // Hyperlinks
        visuals.hyperlink_color = self.primary;

        // Window styling
        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);

        // Set default style
        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        // Text styles
        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(24.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(13.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }

    /// Bubble fill for a message kind.
    pub fn bubble_fill(&self, kind: &crate::messages::MessageKind) -> Color32 {
        use crate::messages::MessageKind;
        match kind {
            MessageKind::User => self.user_bubble,
            MessageKind::Assistant => self.assistant_bubble,
            MessageKind::System => self.system_bubble,
            MessageKind::Error => self.error_bubble,
            MessageKind::Other(_) => self.assistant_bubble,
        }
    }

    /// Text color that stays readable on the given kind's bubble.
    pub fn bubble_text(&self, kind: &crate::messages::MessageKind) -> Color32 {
        use crate::messages::MessageKind;
        match kind {
            MessageKind::User => Color32::WHITE,
            MessageKind::Error => self.error,
            _ => self.text_primary,
        }
    }
}
