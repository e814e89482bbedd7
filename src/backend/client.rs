use super::types::{Document, ErrorBody, QueryReply, QueryRequest, TranscriptionResponse, UploadResponse};
use crate::{DocChatError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use std::path::Path;
use tracing::{debug, info};

/// HTTP client for the document-QA backend. Cheap to clone; all clones share
/// the same connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base: Url,
}

impl BackendClient {
    pub fn new(server_url: &str) -> Result<Self> {
        let base = Url::parse(server_url.trim_end_matches('/')).map_err(|e| {
            DocChatError::Request(format!("invalid server URL {server_url:?}: {e}"))
        })?;
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    pub fn server_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Resolve a reply's audio URL. The backend returns server-relative paths
    /// (`audio_output/tts_x.wav`); absolute URLs pass through unchanged.
    pub fn resolve_audio_url(&self, audio_url: &str) -> Result<Url> {
        self.base.join(audio_url).map_err(|e| {
            DocChatError::Request(format!("invalid audio URL {audio_url:?}: {e}"))
        })
    }

    /// Upload the file at `path` as multipart field `file`. The returned
    /// Document pairs the backend's id with the file's own name.
    pub async fn upload_document(&self, path: &Path) -> Result<Document> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        info!("Uploading {} ({} bytes)", name, bytes.len());

        let part = Part::bytes(bytes).file_name(name.clone());
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let body: UploadResponse = response.json().await.map_err(transport_error)?;

        Ok(Document::new(body.document_id, name))
    }

    /// Ask a question about a document. JSON in, JSON out.
    pub async fn query(&self, text: &str, document_id: &str) -> Result<QueryReply> {
        debug!("Querying document {}: {}", document_id, text);
        let body = QueryRequest { text, document_id };
        let response = self
            .http
            .post(self.endpoint("query"))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        response.json().await.map_err(transport_error)
    }

    /// Send a WAV-encoded audio chunk to the backend recognizer and return
    /// the transcribed text.
    pub async fn transcribe(&self, wav_bytes: Vec<u8>, file_name: &str) -> Result<String> {
        debug!("Transcribing {} bytes of audio", wav_bytes.len());
        let part = Part::bytes(wav_bytes)
            .file_name(file_name.to_string())
            .mime_str("audio/wav")
            .map_err(transport_error)?;
        let form = Form::new().part("audio_file", part);
        let response = self
            .http
            .post(self.endpoint("speech-to-text"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let body: TranscriptionResponse = response.json().await.map_err(transport_error)?;
        Ok(body.text)
    }

    /// Download reply audio for playback.
    pub async fn fetch_audio(&self, audio_url: &str) -> Result<Vec<u8>> {
        let url = self.resolve_audio_url(audio_url)?;
        debug!("Fetching audio from {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }
}

/// Split reqwest failures along the taxonomy line: errors raised before or
/// while building the request (and while decoding a success body) describe a
/// local problem and keep their own text; everything else means the server
/// never usably answered.
fn transport_error(e: reqwest::Error) -> DocChatError {
    if e.is_builder() || e.is_decode() {
        DocChatError::Request(e.to_string())
    } else {
        debug!("Transport failure: {}", e);
        DocChatError::NoResponse
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DocChatError::Backend {
        status: status.as_u16(),
        detail: error_detail(status.as_u16(), &body),
    })
}

/// Pick the message for a non-success response: body `detail`, then body
/// `message`, then a generic status line.
pub(crate) fn error_detail(status: u16, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .detail
        .or(parsed.message)
        .unwrap_or_else(|| format!("Error: {status}"))
}
