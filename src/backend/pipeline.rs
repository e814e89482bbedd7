//! Backend worker for network I/O.
//!
//! The UI thread never performs HTTP itself; it sends commands here and
//! drains events each frame. Each command runs as its own task on the
//! worker's runtime, so an upload and a query (or two queries) genuinely
//! overlap rather than queueing behind one another.

use super::client::BackendClient;
use super::types::{Document, QueryReply, RequestId};
use crate::Result;
use crate::DocChatError;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

/// Commands accepted by the backend worker.
#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// Upload the file at `path` and make it the active document.
    Upload { path: PathBuf },

    /// Ask a question about the active document.
    Query {
        text: String,
        document_id: String,
        request: RequestId,
    },

    /// Download the audio behind a reply for playback.
    FetchAudio { url: String },

    /// Shut the worker down.
    Shutdown,
}

/// Events emitted by the backend worker.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    UploadFinished { document: Document },
    UploadFailed { error: DocChatError },
    QueryAnswered { request: RequestId, reply: QueryReply },
    QueryFailed { request: RequestId, error: DocChatError },
    AudioFetched { url: String, bytes: Vec<u8> },
    AudioFailed { url: String, error: DocChatError },
    Shutdown,
}

/// Channel-based pipeline owning all HTTP traffic to the backend.
pub struct BackendPipeline {
    client: BackendClient,
    command_tx: Sender<BackendCommand>,
    command_rx: Receiver<BackendCommand>,
    event_tx: Sender<BackendEvent>,
    event_rx: Receiver<BackendEvent>,
}

impl BackendPipeline {
    pub fn new(client: BackendClient) -> Self {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        Self {
            client,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a sender for commands.
    pub fn command_sender(&self) -> Sender<BackendCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events.
    pub fn event_receiver(&self) -> Receiver<BackendEvent> {
        self.event_rx.clone()
    }

    /// Start the worker thread. It owns a tokio runtime and spawns one task
    /// per command.
    pub fn start_worker(self) -> Result<()> {
        let client = self.client.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::spawn(move || {
            info!("Backend worker starting");

            let runtime = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    let _ = event_tx.send(BackendEvent::Shutdown);
                    return;
                }
            };

            loop {
                match command_rx.recv() {
                    Ok(BackendCommand::Shutdown) => {
                        info!("Backend worker shutting down");
                        let _ = event_tx.send(BackendEvent::Shutdown);
                        break;
                    }
                    Ok(command) => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let event = handle_command(&client, command).await;
                            if event_tx.send(event).is_err() {
                                debug!("Event receiver dropped, discarding result");
                            }
                        });
                    }
                    Err(e) => {
                        error!("Command channel closed: {}", e);
                        break;
                    }
                }
            }

            info!("Backend worker stopped");
        });

        Ok(())
    }
}

async fn handle_command(client: &BackendClient, command: BackendCommand) -> BackendEvent {
    match command {
        BackendCommand::Upload { path } => match client.upload_document(&path).await {
            Ok(document) => {
                info!("Upload finished: {} ({})", document.name, document.id);
                BackendEvent::UploadFinished { document }
            }
            Err(error) => {
                error!("Upload failed: {}", error);
                BackendEvent::UploadFailed { error }
            }
        },

        BackendCommand::Query {
            text,
            document_id,
            request,
        } => match client.query(&text, &document_id).await {
            Ok(reply) => {
                debug!("Query {} answered", request);
                BackendEvent::QueryAnswered { request, reply }
            }
            Err(error) => {
                error!("Query {} failed: {}", request, error);
                BackendEvent::QueryFailed { request, error }
            }
        },

        BackendCommand::FetchAudio { url } => match client.fetch_audio(&url).await {
            Ok(bytes) => BackendEvent::AudioFetched { url, bytes },
            Err(error) => {
                error!("Audio fetch failed for {}: {}", url, error);
                BackendEvent::AudioFailed { url, error }
            }
        },

        // Handled by the worker loop before spawning; kept for exhaustiveness.
        BackendCommand::Shutdown => BackendEvent::Shutdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_creation_wires_channels() {
        let client = BackendClient::new("http://localhost:8000").unwrap();
        let pipeline = BackendPipeline::new(client);

        let cmd_tx = pipeline.command_sender();
        let _event_rx = pipeline.event_receiver();
        assert!(cmd_tx.capacity().is_some());
    }
}
