use crate::{DocChatError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

/// True when the host exposes a default input device. Gates the microphone
/// control the same way the capability check gates it in a browser.
pub fn input_available() -> bool {
    cpal::default_host().default_input_device().is_some()
}

/// Microphone capture feeding mono f32 chunks into a channel.
///
/// The stream callback runs on the audio thread; `active` is the only state
/// shared with it. Chunks are sent with `try_send` so a stalled consumer
/// drops audio instead of blocking the audio thread.
pub struct MicCapture {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    active: Arc<Mutex<bool>>,
    chunk_tx: Sender<Vec<f32>>,
}

impl MicCapture {
    pub fn open(chunk_tx: Sender<Vec<f32>>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| DocChatError::AudioDevice("no input device available".into()))?;

        info!(
            "Capturing from input device: {}",
            device.name().unwrap_or_else(|_| "unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| DocChatError::AudioDevice(format!("no input config: {e}")))?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
            active: Arc::new(Mutex::new(false)),
            chunk_tx,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn start(&mut self) -> Result<()> {
        if *self.active.lock() {
            return Ok(());
        }

        let channels = self.config.channels as usize;
        let active = Arc::clone(&self.active);
        let chunk_tx = self.chunk_tx.clone();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !*active.lock() {
                        return;
                    }
                    if let Err(e) = chunk_tx.try_send(downmix(data, channels)) {
                        debug!("Dropping capture chunk: {}", e);
                    }
                },
                |err| error!("Capture stream error: {}", err),
                None,
            )
            .map_err(|e| DocChatError::AudioDevice(format!("input stream: {e}")))?;

        stream
            .play()
            .map_err(|e| DocChatError::AudioDevice(format!("start capture: {e}")))?;

        *self.active.lock() = true;
        self.stream = Some(stream);
        info!("Microphone capture started");
        Ok(())
    }

    pub fn stop(&mut self) {
        *self.active.lock() = false;
        if self.stream.take().is_some() {
            info!("Microphone capture stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        *self.active.lock()
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

fn downmix(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn downmix_averages_interleaved_frames() {
        let stereo = vec![0.5, 0.3, 0.7, 0.1];
        let mono = downmix(&stereo, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.4).abs() < 0.001);
        assert!((mono[1] - 0.4).abs() < 0.001);
    }

    #[test]
    fn downmix_passes_mono_through() {
        let mono = vec![0.25, -0.25];
        assert_eq!(downmix(&mono, 1), mono);
    }

    #[test]
    fn capture_toggles_active_state() {
        // Skipped silently on machines without an input device.
        let (tx, _rx) = bounded(16);
        if let Ok(mut capture) = MicCapture::open(tx) {
            assert!(!capture.is_active());
            assert!(capture.sample_rate() > 0);

            if capture.start().is_ok() {
                assert!(capture.is_active());
                capture.stop();
                assert!(!capture.is_active());
            }
        }
    }
}
