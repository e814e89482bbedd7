//! egui user interface
//!
//! Panels and components stay thin; conversation semantics live in
//! [`state::AppState`] so they can be tested without a window.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;

pub use app::DocChatApp;
pub use state::AppState;
pub use theme::Theme;
