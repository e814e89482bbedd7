pub mod client;
pub mod pipeline;
pub mod types;

pub use client::BackendClient;
pub use pipeline::{BackendCommand, BackendEvent, BackendPipeline};
pub use types::{Document, QueryReply, RequestId};
