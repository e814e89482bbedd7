use crate::{DocChatError, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::io::Cursor;
use tracing::debug;

/// Plays fetched reply audio.
///
/// Each `play_bytes` call decodes into its own sink; activating several play
/// controls in quick succession overlays their audio. There is no shared
/// playback state across messages.
pub struct Player {
    output: Option<(OutputStream, OutputStreamHandle)>,
    sinks: Vec<Sink>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            output: None,
            sinks: Vec::new(),
        }
    }

    /// Decode `bytes` and start playing immediately.
    pub fn play_bytes(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.prune();

        let handle = self.output_handle()?;
        let source = Decoder::new(Cursor::new(bytes))
            .map_err(|e| DocChatError::Playback(format!("undecodable audio: {e}")))?;
        let sink = Sink::try_new(&handle).map_err(|e| DocChatError::Playback(e.to_string()))?;
        sink.append(source);
        self.sinks.push(sink);

        debug!("Started playback ({} active)", self.sinks.len());
        Ok(())
    }

    /// Drop sinks that have finished playing.
    pub fn prune(&mut self) {
        self.sinks.retain(|sink| !sink.empty());
    }

    pub fn active(&self) -> usize {
        self.sinks.len()
    }

    // The output stream is opened on first use and kept for the lifetime of
    // the player; dropping it would silence every active sink.
    fn output_handle(&mut self) -> Result<OutputStreamHandle> {
        if self.output.is_none() {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| DocChatError::Playback(format!("no audio output: {e}")))?;
            self.output = Some((stream, handle));
        }
        self.output
            .as_ref()
            .map(|(_, handle)| handle.clone())
            .ok_or_else(|| DocChatError::Playback("audio output unavailable".into()))
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_no_active_sinks() {
        let mut player = Player::new();
        player.prune();
        assert_eq!(player.active(), 0);
    }

    #[test]
    fn garbage_bytes_report_a_playback_error() {
        // Fails during output setup on headless machines, during decode
        // elsewhere; both paths are Playback errors.
        let mut player = Player::new();
        let err = player.play_bytes(vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, DocChatError::Playback(_)));
    }
}
