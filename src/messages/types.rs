use crate::backend::RequestId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Origin/kind tag for a conversation entry. The backend is free to send
/// kinds outside the closed set; those are preserved as `Other` and render
/// with default styling rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
    System,
    Error,
    #[serde(untagged)]
    Other(String),
}

impl MessageKind {
    /// Map the optional `type` field of a query reply onto a kind.
    /// A missing field means `Assistant`.
    pub fn from_wire(kind: Option<&str>) -> Self {
        match kind {
            None => MessageKind::Assistant,
            Some("user") => MessageKind::User,
            Some("assistant") => MessageKind::Assistant,
            Some("system") => MessageKind::System,
            Some("error") => MessageKind::Error,
            Some(other) => MessageKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub kind: MessageKind,
    pub content: String,
    pub audio_url: Option<String>,
    pub context: Option<serde_json::Value>,
    /// Set on user messages (and their replies) to tie a reply back to the
    /// question that caused it.
    pub request: Option<RequestId>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content: content.into(),
            audio_url: None,
            context: None,
            request: None,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageKind::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageKind::System, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, content)
    }

    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_request(mut self, request: RequestId) -> Self {
        self.request = Some(request);
        self
    }
}
