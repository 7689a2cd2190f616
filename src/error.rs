use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Error body returned by the REST completion endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    /// Canonical status string, e.g. `INVALID_ARGUMENT`.
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiError,
}

/// Coarse classification used to pick a user-facing indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Permission,
    Connection,
    Decode,
    Request,
    Usage,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("HTTP protocol error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse or serialize JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Header error: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Inference API error {}: {}", .0.code, .0.message)]
    Api(ApiError),

    #[error("The connection was closed unexpectedly")]
    ConnectionClosed,

    #[error("Connection lost (close code {code}): {reason}")]
    ConnectionLost { code: u16, reason: String },

    #[error("Timed out after {0:?} waiting for the live endpoint")]
    ConnectTimeout(Duration),

    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Malformed audio payload: {0}")]
    Decode(String),

    #[error("A voice session is already connecting or active")]
    SessionActive,

    #[error("Session start was cancelled")]
    Cancelled,

    #[error("A text request is already in flight")]
    FallbackBusy,

    #[error("The completion endpoint returned no text")]
    EmptyResponse,

    #[error("Invalid client message: {0}")]
    InvalidClientMessage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied(_) => ErrorKind::Permission,
            Self::WebSocket(_)
            | Self::Url(_)
            | Self::Header(_)
            | Self::Io(_)
            | Self::ConnectionClosed
            | Self::ConnectionLost { .. }
            | Self::ConnectTimeout(_)
            | Self::AudioDevice(_) => ErrorKind::Connection,
            Self::Decode(_) | Self::Base64(_) => ErrorKind::Decode,
            Self::Http(_) | Self::Api(_) | Self::EmptyResponse | Self::Serialization(_) => {
                ErrorKind::Request
            }
            Self::SessionActive
            | Self::Cancelled
            | Self::FallbackBusy
            | Self::InvalidClientMessage(_)
            | Self::InvalidInput(_) => ErrorKind::Usage,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
