//! Application state and orchestration.
//!
//! `AppState` is the single owner of the document slot, the conversation log
//! and the input buffer. Components call its action methods; workers answer
//! through channels that `poll_events` drains once per frame. Nothing outside
//! this type mutates conversation state.

use crate::audio::Player;
use crate::backend::{BackendCommand, BackendEvent, Document, QueryReply, RequestId};
use crate::config::AppConfig;
use crate::messages::{ConversationLog, Message, MessageKind};
use crate::speech::{Recognizer, TranscriptEvent};
use crate::DocChatError;
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// System message installed when an upload succeeds. Replaces the whole log.
pub const UPLOAD_SUCCESS_TEXT: &str =
    "Document uploaded successfully. You can now ask questions about it.";

/// Error entry for a query attempted before any document exists.
pub const NO_DOCUMENT_TEXT: &str = "Please upload a document first.";

/// Central application state.
pub struct AppState {
    /// Static configuration the app was started with.
    pub config: AppConfig,

    /// Ordered conversation transcript.
    pub log: ConversationLog,

    /// The active document, if an upload has succeeded this session.
    pub document: Option<Document>,

    /// Current text input buffer.
    pub input_text: String,

    /// Reply audio playback.
    pub player: Player,

    /// Last non-conversational error (playback, speech, channels), shown in
    /// the status line rather than the log.
    pub last_error: Option<String>,

    /// Speech recognizer, when the platform has the capability.
    recognizer: Option<Recognizer>,

    /// True after a manual edit while speech is available; transcript sync
    /// stays paused until the next transcript reset.
    transcript_paused: bool,

    /// Uploads currently in flight.
    pending_uploads: usize,

    /// Queries currently in flight.
    pending_queries: usize,

    /// Source for the next query's RequestId.
    next_request: u64,

    /// Submissions whose completion should clear the input buffer.
    pending_clear: HashSet<RequestId>,

    backend_tx: Option<Sender<BackendCommand>>,
    backend_rx: Option<Receiver<BackendEvent>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            log: ConversationLog::new(),
            document: None,
            input_text: String::new(),
            player: Player::new(),
            last_error: None,
            recognizer: None,
            transcript_paused: false,
            pending_uploads: 0,
            pending_queries: 0,
            next_request: 0,
            pending_clear: HashSet::new(),
            backend_tx: None,
            backend_rx: None,
        }
    }

    /// Attach the backend worker's channels.
    pub fn connect_backend(
        &mut self,
        command_tx: Sender<BackendCommand>,
        event_rx: Receiver<BackendEvent>,
    ) {
        self.backend_tx = Some(command_tx);
        self.backend_rx = Some(event_rx);
    }

    /// Install the speech recognizer (`None` when the platform lacks one).
    pub fn set_recognizer(&mut self, recognizer: Option<Recognizer>) {
        self.recognizer = recognizer;
    }

    /// True while any upload or query is in flight.
    pub fn is_processing(&self) -> bool {
        self.pending_uploads + self.pending_queries > 0
    }

    /// True while an upload is in flight.
    pub fn is_uploading(&self) -> bool {
        self.pending_uploads > 0
    }

    /// True while at least one query awaits its reply.
    pub fn awaiting_reply(&self) -> bool {
        self.pending_queries > 0
    }

    pub fn speech_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.recognizer
            .as_ref()
            .map_or(false, |r| r.is_listening())
    }

    /// Send a file to the backend and make it the active document on
    /// success. Validation of the file type is the upload panel's job; this
    /// trusts its caller.
    ///
    /// The busy counter only rises once the command is actually with the
    /// worker; with no worker the operation fails immediately, like any
    /// other upload failure.
    pub fn upload_document(&mut self, path: PathBuf) {
        debug!("Uploading {:?}", path);
        let sent = self
            .backend_tx
            .as_ref()
            .map_or(false, |tx| tx.send(BackendCommand::Upload { path }).is_ok());

        if sent {
            self.pending_uploads += 1;
        } else {
            let error = DocChatError::Channel("backend worker unavailable".to_string());
            self.log.append(Message::error(format!(
                "Error uploading document: {}",
                error.user_message()
            )));
        }
    }

    /// Submit the current input buffer as a query.
    ///
    /// Empty or whitespace-only input is a complete no-op. Without a
    /// document, exactly one error entry is appended and no network request
    /// is made. Otherwise the user message is appended synchronously, tagged
    /// with a fresh RequestId, and the query goes to the backend worker.
    pub fn submit_query(&mut self) {
        let text = self.input_text.trim().to_string();
        if text.is_empty() {
            return;
        }

        let document_id = match &self.document {
            Some(document) => document.id.clone(),
            None => {
                self.log.append(Message::error(NO_DOCUMENT_TEXT));
                self.clear_input();
                return;
            }
        };

        let request = self.next_request_id();
        self.log.append(Message::user(text.clone()).with_request(request));

        let sent = match &self.backend_tx {
            Some(tx) => {
                let command = BackendCommand::Query {
                    text,
                    document_id,
                    request,
                };
                tx.send(command).is_ok()
            }
            None => false,
        };

        if sent {
            self.pending_queries += 1;
            self.pending_clear.insert(request);
        } else {
            // No worker means no reply will ever arrive; complete the pair
            // right away so busy never sticks.
            let error = DocChatError::Channel("backend worker unavailable".to_string());
            self.log.insert_reply(
                request,
                Message::error(format!("Error processing query: {}", error.user_message()))
                    .with_request(request),
            );
            self.clear_input();
        }
    }

    /// Ask the backend worker for a reply's audio; playback starts when the
    /// bytes arrive.
    pub fn request_audio(&mut self, url: &str) {
        if let Some(tx) = &self.backend_tx {
            let command = BackendCommand::FetchAudio {
                url: url.to_string(),
            };
            if tx.send(command).is_err() {
                self.last_error = Some("Backend worker unavailable".to_string());
            }
        }
    }

    pub fn toggle_listening(&mut self) {
        if let Some(recognizer) = &self.recognizer {
            if recognizer.is_listening() {
                recognizer.stop();
            } else {
                // Each listening session starts with a fresh transcript.
                recognizer.reset();
                self.transcript_paused = false;
                recognizer.start();
            }
        }
    }

    /// Record that the user edited the buffer by hand. While speech is
    /// available this pauses transcript sync until the next reset, so live
    /// transcription stops clobbering the edit.
    pub fn note_manual_edit(&mut self) {
        if self.speech_available() {
            self.transcript_paused = true;
        }
    }

    /// Drain worker events and apply them. Called once per frame.
    pub fn poll_events(&mut self) {
        let backend_events: Vec<BackendEvent> = if let Some(rx) = &self.backend_rx {
            let mut events = Vec::new();
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
            events
        } else {
            Vec::new()
        };
        for event in backend_events {
            self.apply_backend_event(event);
        }

        let transcript_events: Vec<TranscriptEvent> = match self.recognizer.as_mut() {
            Some(recognizer) => recognizer.poll(),
            None => Vec::new(),
        };
        for event in transcript_events {
            self.apply_transcript_event(event);
        }

        self.player.prune();
    }

    /// Tell the workers to shut down.
    pub fn shutdown(&mut self) {
        if let Some(tx) = &self.backend_tx {
            let _ = tx.send(BackendCommand::Shutdown);
        }
        if let Some(recognizer) = &self.recognizer {
            recognizer.shutdown();
        }
    }

    fn apply_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::UploadFinished { document } => {
                self.pending_uploads = self.pending_uploads.saturating_sub(1);
                info!("Document installed: {} ({})", document.name, document.id);
                self.document = Some(document);
                self.log.replace_with(Message::system(UPLOAD_SUCCESS_TEXT));
            }

            BackendEvent::UploadFailed { error } => {
                self.pending_uploads = self.pending_uploads.saturating_sub(1);
                self.log.append(Message::error(format!(
                    "Error uploading document: {}",
                    error.user_message()
                )));
            }

            BackendEvent::QueryAnswered { request, reply } => {
                self.pending_queries = self.pending_queries.saturating_sub(1);
                self.log.insert_reply(request, reply_message(request, reply));
                self.finish_submission(request);
            }

            BackendEvent::QueryFailed { request, error } => {
                self.pending_queries = self.pending_queries.saturating_sub(1);
                self.log.insert_reply(
                    request,
                    Message::error(format!("Error processing query: {}", error.user_message()))
                        .with_request(request),
                );
                self.finish_submission(request);
            }

            BackendEvent::AudioFetched { url, bytes } => {
                debug!("Starting playback for {}", url);
                if let Err(e) = self.player.play_bytes(bytes) {
                    warn!("Playback failed: {}", e);
                    self.last_error = Some(e.user_message());
                }
            }

            BackendEvent::AudioFailed { error, .. } => {
                self.last_error = Some(error.user_message());
            }

            BackendEvent::Shutdown => {
                debug!("Backend worker shut down");
            }
        }
    }

    fn apply_transcript_event(&mut self, event: TranscriptEvent) {
        match event {
            TranscriptEvent::Transcript(text) => {
                if !self.transcript_paused {
                    self.input_text = text;
                }
            }
            // The recognizer handle already mirrors the listening flag.
            TranscriptEvent::Listening(_) => {}
            TranscriptEvent::Error(error) => {
                warn!("Speech error: {}", error);
                self.last_error = Some(error.user_message());
            }
            TranscriptEvent::Shutdown => {
                debug!("Recognizer shut down");
            }
        }
    }

    fn finish_submission(&mut self, request: RequestId) {
        if self.pending_clear.remove(&request) {
            self.clear_input();
        }
    }

    fn clear_input(&mut self) {
        self.input_text.clear();
        self.transcript_paused = false;
        if let Some(recognizer) = &self.recognizer {
            recognizer.reset();
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId::new(self.next_request)
    }
}

/// Build the log entry for a successful query reply. The kind defaults to
/// assistant when the backend omits it; audio URL and context carry over
/// verbatim.
fn reply_message(request: RequestId, reply: QueryReply) -> Message {
    let kind = MessageKind::from_wire(reply.kind.as_deref());
    let mut message = Message::new(kind, reply.response).with_request(request);
    if let Some(url) = reply.audio_url {
        message = message.with_audio_url(url);
    }
    if let Some(context) = reply.context {
        message = message.with_context(context);
    }
    message
}
