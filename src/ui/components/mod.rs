//! Reusable UI components

pub mod input_bar;
pub mod message_list;
pub mod upload_panel;

pub use input_bar::InputBar;
pub use message_list::MessageList;
pub use upload_panel::UploadPanel;
