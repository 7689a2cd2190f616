use serde::{Deserialize, Serialize};

use super::models::{Blob, Setup};

/// Streamed input frames. Each chunk is either PCM audio or an inline image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeInput {
    pub media_chunks: Vec<Blob>,
}

/// Messages sent to the live endpoint; serialized as `{"<kind>": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessage {
    Setup(Box<Setup>),
    RealtimeInput(RealtimeInput),
}

impl ClientMessage {
    #[must_use]
    pub fn setup(setup: Setup) -> Self {
        Self::Setup(Box::new(setup))
    }

    #[must_use]
    pub fn media(blob: Blob) -> Self {
        Self::RealtimeInput(RealtimeInput {
            media_chunks: vec![blob],
        })
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Setup(_) => "setup",
            Self::RealtimeInput(_) => "realtimeInput",
        }
    }
}
