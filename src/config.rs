//! Application configuration.

use crate::speech::SpeechConfig;

/// Configuration for the whole client.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the document-QA backend.
    pub server_url: String,

    /// Speech recognition settings.
    pub speech: SpeechConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            speech: SpeechConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults with the `DOCCHAT_SERVER_URL` environment override applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("DOCCHAT_SERVER_URL") {
            if !url.trim().is_empty() {
                config.server_url = url;
            }
        }
        config
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server_url.trim().is_empty() {
            return Err("server URL is required".to_string());
        }
        if self.speech.chunk_seconds <= 0.0 {
            return Err("speech chunk duration must be positive".to_string());
        }
        Ok(())
    }
}
