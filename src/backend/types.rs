use serde::{Deserialize, Serialize};

/// Monotonically increasing identifier assigned to each query at submission
/// time. Replies are placed in the conversation by this id, not by arrival
/// order, so overlapping queries cannot shuffle the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The currently active uploaded document. Replaced wholesale by each new
/// successful upload; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Success body of `POST /upload`.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub document_id: String,
}

/// JSON body of `POST /query`.
#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub text: &'a str,
    pub document_id: &'a str,
}

/// Success body of `POST /query`. `kind` is optional on the wire; a missing
/// value means an assistant reply.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryReply {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub response: String,
    pub audio_url: Option<String>,
    pub context: Option<serde_json::Value>,
}

/// Success body of `POST /speech-to-text`.
#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptionResponse {
    pub text: String,
}

/// Error body the backend attaches to non-success statuses. Some deployments
/// use `detail`, some `message`; both are optional here and resolved in order.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
    pub message: Option<String>,
}
