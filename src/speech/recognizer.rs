use crate::DocChatError;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::info;

#[cfg(feature = "audio-io")]
use crate::audio::capture::MicCapture;
#[cfg(feature = "audio-io")]
use crate::audio::encode_wav;
#[cfg(feature = "audio-io")]
use crate::backend::BackendClient;
#[cfg(feature = "audio-io")]
use tokio::runtime::Runtime;
#[cfg(feature = "audio-io")]
use tracing::{error, warn};

/// Settings for backend-delegated speech recognition.
#[derive(Clone, Debug)]
pub struct SpeechConfig {
    /// Seconds of audio accumulated before a chunk is sent for transcription.
    pub chunk_seconds: f32,

    /// Chunks shorter than this on stop are discarded instead of transcribed.
    pub min_chunk_seconds: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            chunk_seconds: 2.5,
            min_chunk_seconds: 0.5,
        }
    }
}

/// Commands accepted by a recognizer worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerCommand {
    /// Begin continuous capture.
    Start,
    /// Stop capture; remaining buffered audio is transcribed if long enough.
    Stop,
    /// Clear the session transcript.
    Reset,
    Shutdown,
}

/// Events emitted by a recognizer worker.
#[derive(Debug, Clone)]
pub enum TranscriptEvent {
    /// The full transcript accumulated since the last reset.
    Transcript(String),
    /// Capture actually started or stopped.
    Listening(bool),
    Error(DocChatError),
    Shutdown,
}

/// Handle to a recognizer worker. The worker owns capture and transcription;
/// the handle sends commands, drains events, and mirrors the listening flag
/// for the UI.
pub struct Recognizer {
    command_tx: Sender<RecognizerCommand>,
    event_rx: Receiver<TranscriptEvent>,
    listening: bool,
}

impl Recognizer {
    fn new(command_tx: Sender<RecognizerCommand>, event_rx: Receiver<TranscriptEvent>) -> Self {
        Self {
            command_tx,
            event_rx,
            listening: false,
        }
    }

    /// Continuous microphone recognition: capture chunks, WAV-encode them,
    /// post each to the backend's `/speech-to-text`, and accumulate the
    /// returned text into the session transcript.
    #[cfg(feature = "audio-io")]
    pub fn with_microphone(client: BackendClient, config: SpeechConfig) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(100);
        spawn_microphone_worker(client, config, command_rx, event_tx);
        Self::new(command_tx, event_rx)
    }

    /// Deterministic transcript source: while listening, appends one of
    /// `lines` to the transcript every `interval`. Used by tests and demos
    /// in place of live capture.
    pub fn scripted(lines: Vec<String>, interval: Duration) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(100);
        spawn_scripted_worker(lines, interval, command_rx, event_tx);
        Self::new(command_tx, event_rx)
    }

    pub fn start(&self) {
        let _ = self.command_tx.send(RecognizerCommand::Start);
    }

    pub fn stop(&self) {
        let _ = self.command_tx.send(RecognizerCommand::Stop);
    }

    pub fn reset(&self) {
        let _ = self.command_tx.send(RecognizerCommand::Reset);
    }

    pub fn shutdown(&self) {
        let _ = self.command_tx.send(RecognizerCommand::Shutdown);
    }

    /// Drain pending events, updating the listening flag as they pass.
    pub fn poll(&mut self) -> Vec<TranscriptEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            if let TranscriptEvent::Listening(on) = &event {
                self.listening = *on;
            }
            events.push(event);
        }
        events
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }
}

#[cfg(feature = "audio-io")]
fn spawn_microphone_worker(
    client: BackendClient,
    config: SpeechConfig,
    command_rx: Receiver<RecognizerCommand>,
    event_tx: Sender<TranscriptEvent>,
) {
    std::thread::spawn(move || {
        info!("Recognizer worker starting");

        let runtime = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to create tokio runtime: {}", e);
                let _ = event_tx.send(TranscriptEvent::Error(DocChatError::Channel(
                    format!("runtime creation failed: {e}"),
                )));
                let _ = event_tx.send(TranscriptEvent::Shutdown);
                return;
            }
        };

        let (chunk_tx, chunk_rx) = bounded::<Vec<f32>>(256);
        let mut worker = MicrophoneWorker {
            client,
            config,
            runtime,
            event_tx,
            chunk_tx,
            chunk_rx,
            capture: None,
            buffer: Vec::new(),
            transcript: String::new(),
            chunks_sent: 0,
        };
        worker.run(command_rx);

        info!("Recognizer worker stopped");
    });
}

#[cfg(feature = "audio-io")]
struct MicrophoneWorker {
    client: BackendClient,
    config: SpeechConfig,
    runtime: Runtime,
    event_tx: Sender<TranscriptEvent>,
    chunk_tx: Sender<Vec<f32>>,
    chunk_rx: Receiver<Vec<f32>>,
    // The capture stream stays on this thread; it is opened lazily on the
    // first Start so construction never touches the device.
    capture: Option<MicCapture>,
    buffer: Vec<f32>,
    transcript: String,
    chunks_sent: u64,
}

#[cfg(feature = "audio-io")]
impl MicrophoneWorker {
    fn run(&mut self, command_rx: Receiver<RecognizerCommand>) {
        loop {
            match command_rx.recv_timeout(Duration::from_millis(50)) {
                Ok(RecognizerCommand::Start) => self.handle_start(),
                Ok(RecognizerCommand::Stop) => self.handle_stop(),
                Ok(RecognizerCommand::Reset) => {
                    self.transcript.clear();
                    let _ = self
                        .event_tx
                        .send(TranscriptEvent::Transcript(String::new()));
                }
                Ok(RecognizerCommand::Shutdown) => {
                    let _ = self.event_tx.send(TranscriptEvent::Shutdown);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            self.drain_audio();
            self.flush_ready_chunk();
        }
    }

    fn handle_start(&mut self) {
        if self.capture.is_none() {
            match MicCapture::open(self.chunk_tx.clone()) {
                Ok(capture) => self.capture = Some(capture),
                Err(e) => {
                    let _ = self.event_tx.send(TranscriptEvent::Error(e));
                    return;
                }
            }
        }

        if let Some(capture) = self.capture.as_mut() {
            match capture.start() {
                Ok(()) => {
                    self.buffer.clear();
                    let _ = self.event_tx.send(TranscriptEvent::Listening(true));
                }
                Err(e) => {
                    let _ = self.event_tx.send(TranscriptEvent::Error(e));
                }
            }
        }
    }

    fn handle_stop(&mut self) {
        if let Some(capture) = self.capture.as_mut() {
            capture.stop();
        }
        self.drain_audio();

        // Transcribe whatever is left, unless it is too short to be speech.
        let min_samples = (self.config.min_chunk_seconds * self.sample_rate() as f32) as usize;
        if self.buffer.len() >= min_samples && !self.buffer.is_empty() {
            let samples: Vec<f32> = self.buffer.drain(..).collect();
            self.transcribe(samples);
        } else {
            self.buffer.clear();
        }

        let _ = self.event_tx.send(TranscriptEvent::Listening(false));
    }

    fn drain_audio(&mut self) {
        while let Ok(chunk) = self.chunk_rx.try_recv() {
            self.buffer.extend_from_slice(&chunk);
        }
    }

    fn flush_ready_chunk(&mut self) {
        let threshold = (self.config.chunk_seconds * self.sample_rate() as f32) as usize;
        if threshold > 0 && self.buffer.len() >= threshold {
            let samples: Vec<f32> = self.buffer.drain(..).collect();
            self.transcribe(samples);
        }
    }

    fn transcribe(&mut self, samples: Vec<f32>) {
        let sample_rate = self.sample_rate();
        let wav = match encode_wav(&samples, sample_rate, 1) {
            Ok(wav) => wav,
            Err(e) => {
                let _ = self.event_tx.send(TranscriptEvent::Error(e));
                return;
            }
        };

        self.chunks_sent += 1;
        let file_name = format!("chunk_{}.wav", self.chunks_sent);

        match self.runtime.block_on(self.client.transcribe(wav, &file_name)) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    if !self.transcript.is_empty() {
                        self.transcript.push(' ');
                    }
                    self.transcript.push_str(text);
                    let _ = self
                        .event_tx
                        .send(TranscriptEvent::Transcript(self.transcript.clone()));
                }
            }
            Err(e) => {
                warn!("Transcription failed: {}", e);
                let _ = self.event_tx.send(TranscriptEvent::Error(e));
            }
        }
    }

    fn sample_rate(&self) -> u32 {
        self.capture.as_ref().map(|c| c.sample_rate()).unwrap_or(16000)
    }
}

fn spawn_scripted_worker(
    lines: Vec<String>,
    interval: Duration,
    command_rx: Receiver<RecognizerCommand>,
    event_tx: Sender<TranscriptEvent>,
) {
    std::thread::spawn(move || {
        let mut listening = false;
        let mut next_line = 0;
        let mut transcript = String::new();

        loop {
            match command_rx.recv_timeout(interval) {
                Ok(RecognizerCommand::Start) => {
                    listening = true;
                    let _ = event_tx.send(TranscriptEvent::Listening(true));
                }
                Ok(RecognizerCommand::Stop) => {
                    listening = false;
                    let _ = event_tx.send(TranscriptEvent::Listening(false));
                }
                Ok(RecognizerCommand::Reset) => {
                    transcript.clear();
                    let _ = event_tx.send(TranscriptEvent::Transcript(String::new()));
                }
                Ok(RecognizerCommand::Shutdown) => {
                    let _ = event_tx.send(TranscriptEvent::Shutdown);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if listening && next_line < lines.len() {
                        if !transcript.is_empty() {
                            transcript.push(' ');
                        }
                        transcript.push_str(&lines[next_line]);
                        next_line += 1;
                        let _ = event_tx.send(TranscriptEvent::Transcript(transcript.clone()));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn latest_transcript(recognizer: &mut Recognizer) -> Option<String> {
        let mut latest = None;
        for event in recognizer.poll() {
            if let TranscriptEvent::Transcript(text) = event {
                latest = Some(text);
            }
        }
        latest
    }

    fn wait_for_transcript(recognizer: &mut Recognizer, expected: &str) -> String {
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut current = String::new();
        while Instant::now() < deadline {
            if let Some(text) = latest_transcript(recognizer) {
                current = text;
            }
            if current == expected {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        current
    }

    #[test]
    fn scripted_transcript_accumulates_while_listening() {
        let mut recognizer = Recognizer::scripted(
            vec!["what is".to_string(), "the total".to_string()],
            Duration::from_millis(10),
        );
        recognizer.start();

        let transcript = wait_for_transcript(&mut recognizer, "what is the total");
        assert_eq!(transcript, "what is the total");
        assert!(recognizer.is_listening());

        recognizer.stop();
        let deadline = Instant::now() + Duration::from_secs(2);
        while recognizer.is_listening() && Instant::now() < deadline {
            recognizer.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!recognizer.is_listening());
        recognizer.shutdown();
    }

    #[test]
    fn reset_clears_the_session_transcript() {
        let mut recognizer =
            Recognizer::scripted(vec!["hello".to_string()], Duration::from_millis(10));
        recognizer.start();
        wait_for_transcript(&mut recognizer, "hello");

        recognizer.reset();
        let transcript = wait_for_transcript(&mut recognizer, "");
        assert_eq!(transcript, "");
        recognizer.shutdown();
    }

    #[test]
    fn idle_recognizer_emits_nothing() {
        let mut recognizer =
            Recognizer::scripted(vec!["hello".to_string()], Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(60));
        assert!(latest_transcript(&mut recognizer).is_none());
        assert!(!recognizer.is_listening());
        recognizer.shutdown();
    }
}
