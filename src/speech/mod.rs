//! Speech input.
//!
//! Recognition itself is backend-owned; this module captures microphone
//! audio, ships it to the backend's `/speech-to-text`, and maintains the
//! session transcript that feeds the input bar.

pub mod recognizer;

pub use recognizer::{Recognizer, RecognizerCommand, SpeechConfig, TranscriptEvent};

#[cfg(feature = "audio-io")]
use crate::backend::BackendClient;
#[cfg(feature = "audio-io")]
use tracing::info;

/// Build the platform recognizer when speech capability exists: the
/// `audio-io` feature compiled in and a default input device present.
/// `None` makes the input bar fall back to its incompatibility notice.
#[cfg(feature = "audio-io")]
pub fn platform_recognizer(client: BackendClient, config: SpeechConfig) -> Option<Recognizer> {
    if !crate::audio::capture::input_available() {
        info!("No input device found; speech capability disabled");
        return None;
    }
    Some(Recognizer::with_microphone(client, config))
}

#[cfg(not(feature = "audio-io"))]
pub fn platform_recognizer(
    _client: crate::backend::BackendClient,
    _config: SpeechConfig,
) -> Option<Recognizer> {
    None
}
