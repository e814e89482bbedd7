pub mod audio;
pub mod backend;
pub mod config;
pub mod messages;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocChatError {
    /// The backend answered with a non-success status. `detail` already holds
    /// the best message the response body offered (body `detail`, then body
    /// `message`, then a generic status line).
    #[error("backend error ({status}): {detail}")]
    Backend { status: u16, detail: String },

    /// The request went out but no usable response came back.
    #[error("no response from server")]
    NoResponse,

    /// The request could not be constructed or completed locally
    /// (unreadable file, invalid URL, malformed success body).
    #[error("request error: {0}")]
    Request(String),

    #[error("audio device error: {0}")]
    AudioDevice(String),

    #[error("audio processing error: {0}")]
    AudioProcessing(String),

    #[error("playback error: {0}")]
    Playback(String),

    #[error("channel error: {0}")]
    Channel(String),
}

impl From<std::io::Error> for DocChatError {
    fn from(e: std::io::Error) -> Self {
        DocChatError::Request(e.to_string())
    }
}

impl DocChatError {
    /// The text shown to the user when this error reaches the conversation
    /// log or the status line.
    pub fn user_message(&self) -> String {
        match self {
            DocChatError::Backend { detail, .. } => detail.clone(),
            DocChatError::NoResponse => {
                "No response from server. Please check if the backend is running.".to_string()
            }
            DocChatError::Request(msg) => msg.clone(),
            DocChatError::AudioDevice(_) => {
                "Audio device error. Please check your microphone.".to_string()
            }
            DocChatError::AudioProcessing(_) => "Audio processing failed.".to_string(),
            DocChatError::Playback(_) => "Audio playback failed.".to_string(),
            DocChatError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DocChatError>;
