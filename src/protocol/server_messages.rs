use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::models::{Blob, Content};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcription {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_turn: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_transcription: Option<Transcription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_transcription: Option<Transcription>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub turn_complete: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub interrupted: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub generation_complete: bool,
}

impl ServerContent {
    /// Inline audio payloads of the model turn, in part order.
    pub fn audio_blobs(&self) -> impl Iterator<Item = &Blob> {
        self.model_turn
            .iter()
            .flat_map(|turn| turn.parts.iter())
            .filter_map(|part| part.inline_data.as_ref())
            .filter(|blob| blob.is_audio())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoAway {
    #[serde(default)]
    pub time_left: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetupComplete {}

/// One frame from the live endpoint. Any subset of the fields may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_complete: Option<SetupComplete>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_content: Option<ServerContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_away: Option<GoAway>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<Value>,
}

impl ServerMessage {
    #[must_use]
    pub fn content(content: ServerContent) -> Self {
        Self {
            server_content: Some(content),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn audio(blob: Blob) -> Self {
        Self::content(ServerContent {
            model_turn: Some(Content {
                role: None,
                parts: vec![super::models::Part::inline(blob)],
            }),
            ..ServerContent::default()
        })
    }

    #[must_use]
    pub fn input_transcript(text: impl Into<String>) -> Self {
        Self::content(ServerContent {
            input_transcription: Some(Transcription { text: text.into() }),
            ..ServerContent::default()
        })
    }

    #[must_use]
    pub fn output_transcript(text: impl Into<String>) -> Self {
        Self::content(ServerContent {
            output_transcription: Some(Transcription { text: text.into() }),
            ..ServerContent::default()
        })
    }

    #[must_use]
    pub fn turn_complete() -> Self {
        Self::content(ServerContent {
            turn_complete: true,
            ..ServerContent::default()
        })
    }

    #[must_use]
    pub fn interrupted() -> Self {
        Self::content(ServerContent {
            interrupted: true,
            ..ServerContent::default()
        })
    }
}
