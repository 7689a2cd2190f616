#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod transport;

pub use config::{EngineConfig, Language, PersonaConfig};
pub use engine::{
    AttachedImage, AudioDevice, AudioOutput, CaptureConfig, CompletionService, Connector,
    EVENT_QUEUE_CAPACITY, EngineEvent, EngineSnapshot, EntryOrigin, EventStream, Microphone, PcmBuffer,
    PlaybackScheduler, SessionHandle, SessionState, SessionStatus, SourceId, Speaker,
    TranscriptEntry, TranscriptLog, Transport, VoiceEngine, VoiceEngineBuilder, VoiceSession,
    WsConnector,
};
pub use error::{ApiError, Error, ErrorKind, Result};
pub use protocol::client_messages::ClientMessage;
pub use protocol::server_messages::ServerMessage;

use futures::{SinkExt, StreamExt};
use serde_json::from_str;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::tungstenite::protocol::frame::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use transport::ws::WsStream;

const TRACE_LOG_MAX_BYTES: usize = 1024;
const MAX_MEDIA_CHUNK_BYTES: usize = 15 * 1024 * 1024;
const TRACE_TRUNCATE_SUFFIX: &str = "... (truncated)";

/// Low-level client for the live endpoint.
///
/// Thread safety: `LiveClient` is `Send` but not `Sync` because the underlying
/// WebSocket stream is not `Sync`.
#[must_use]
pub struct LiveClient {
    stream: WsStream,
}

impl LiveClient {
    /// Connect to the live endpoint at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the connection fails or if the URL is invalid.
    pub async fn connect(base_url: &str, api_key: &str) -> Result<Self> {
        let stream = transport::ws::connect(base_url, api_key).await?;
        Ok(Self { stream })
    }

    /// Send a client message to the server.
    ///
    /// # Errors
    /// Returns an error if validation or serialization fails or if the WebSocket send fails.
    pub async fn send(&mut self, message: ClientMessage) -> Result<()> {
        validate_client_message(&message)?;
        let json = serde_json::to_string(&message)?;
        tracing::trace!("Sending message: {}", safe_truncate(&json, TRACE_LOG_MAX_BYTES));
        self.stream.send(Message::Text(json.into())).await?;
        Ok(())
    }

    /// Receive the next server message.
    ///
    /// `Ok(None)` means the server closed the connection normally. Frames
    /// that do not parse as a server message are logged and skipped.
    ///
    /// # Errors
    /// Returns an error if the WebSocket fails or the server closes with an
    /// abnormal close code.
    pub async fn next_message(&mut self) -> Result<Option<ServerMessage>> {
        while let Some(msg) = self.stream.next().await {
            let text = match msg? {
                Message::Text(text) => text.as_str().to_owned(),
                // The live endpoint frames JSON as binary as often as text.
                Message::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Message::Close(frame) => return close_outcome(frame.as_ref()),
                Message::Ping(payload) => {
                    tracing::debug!("Received Ping, sending Pong");
                    self.stream.send(Message::Pong(payload)).await?;
                    continue;
                }
                _ => continue,
            };
            if let Some(message) = parse_server_frame(&text) {
                return Ok(Some(message));
            }
        }
        Ok(None)
    }

    /// Send a close frame.
    ///
    /// # Errors
    /// Returns an error if the WebSocket close handshake fails.
    pub async fn close(&mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

fn parse_server_frame(text: &str) -> Option<ServerMessage> {
    tracing::trace!("Received message: {}", safe_truncate(text, TRACE_LOG_MAX_BYTES));
    match from_str::<ServerMessage>(text) {
        Ok(message) => Some(message),
        Err(err) => {
            tracing::warn!(error = %err, frame = %safe_truncate(text, TRACE_LOG_MAX_BYTES), "Skipping malformed server frame");
            None
        }
    }
}

#[allow(clippy::result_large_err)]
fn close_outcome(frame: Option<&CloseFrame>) -> Result<Option<ServerMessage>> {
    match frame {
        Some(frame) if !matches!(frame.code, CloseCode::Normal | CloseCode::Away) => {
            tracing::warn!(code = u16::from(frame.code), reason = frame.reason.as_str(), "Live connection closed abnormally");
            Err(Error::ConnectionLost {
                code: frame.code.into(),
                reason: frame.reason.as_str().to_owned(),
            })
        }
        _ => {
            tracing::info!("WebSocket connection closed by server");
            Ok(None)
        }
    }
}

fn safe_truncate(s: &str, max_bytes: usize) -> std::borrow::Cow<'_, str> {
    if s.len() <= max_bytes {
        return std::borrow::Cow::Borrowed(s);
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    std::borrow::Cow::Owned(format!(
        "{} {} {} bytes",
        &s[..end],
        TRACE_TRUNCATE_SUFFIX,
        s.len() - end
    ))
}

/// Check a message before it goes on the wire.
///
/// Media chunks must be audio PCM or an image, carry well-formed base64, and
/// decode to at most 15 MiB.
///
/// # Errors
/// Returns [`Error::InvalidClientMessage`] describing the first violation.
#[allow(clippy::result_large_err)]
pub fn validate_client_message(message: &ClientMessage) -> Result<()> {
    match message {
        ClientMessage::RealtimeInput(input) => {
            if input.media_chunks.is_empty() {
                return Err(Error::InvalidClientMessage(
                    "realtimeInput carries no media chunks".to_string(),
                ));
            }
            for chunk in &input.media_chunks {
                validate_media_chunk(chunk)?;
            }
        }
        ClientMessage::Setup(setup) => {
            if setup.model.trim_start_matches("models/").is_empty() {
                return Err(Error::InvalidClientMessage("setup.model is empty".to_string()));
            }
        }
    }
    Ok(())
}

#[allow(clippy::result_large_err)]
fn validate_media_chunk(chunk: &protocol::models::Blob) -> Result<()> {
    let mime = chunk.mime_type.to_ascii_lowercase();
    if !(mime.starts_with("audio/pcm") || mime.starts_with("image/")) {
        return Err(Error::InvalidClientMessage(format!(
            "unsupported media type {}",
            chunk.mime_type
        )));
    }
    let size = estimate_base64_decoded_len(&chunk.data)?;
    if size > MAX_MEDIA_CHUNK_BYTES {
        return Err(Error::InvalidClientMessage(format!(
            "media chunk exceeds 15MB ({size} bytes)",
        )));
    }
    Ok(())
}

#[allow(clippy::result_large_err)]
fn estimate_base64_decoded_len(s: &str) -> Result<usize> {
    let bytes = s.as_bytes();
    if bytes.len() % 4 != 0 {
        return Err(Error::InvalidClientMessage(
            "media chunk invalid base64 length".to_string(),
        ));
    }

    let mut padding = 0;
    let mut seen_padding = false;
    for &b in bytes {
        if b == b'=' {
            seen_padding = true;
            padding += 1;
            continue;
        }
        if seen_padding {
            return Err(Error::InvalidClientMessage(
                "media chunk invalid base64 padding".to_string(),
            ));
        }
        let is_valid = matches!(b,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/'
        );
        if !is_valid {
            return Err(Error::InvalidClientMessage(
                "media chunk invalid base64 character".to_string(),
            ));
        }
    }

    if padding > 2 {
        return Err(Error::InvalidClientMessage(
            "media chunk invalid base64 padding length".to_string(),
        ));
    }

    Ok(bytes.len() / 4 * 3 - padding)
}
