use super::audio::SourceId;
use super::state::SessionStatus;
use super::transcript::{Speaker, TranscriptEntry};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Events buffered for a host that is not reading them; later ones are dropped.
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Notifications for whatever renders the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    StateChanged(SessionStatus),
    /// Provisional text for the turn in progress, accumulated so far.
    LiveTranscript {
        speaker: Speaker,
        text: String,
    },
    LiveTranscriptCleared,
    EntryAppended(TranscriptEntry),
    PlaybackScheduled {
        source: SourceId,
        start: f64,
        duration: f64,
    },
    PlaybackInterrupted {
        stopped: usize,
    },
    /// A server audio frame was dropped because it could not be decoded.
    DecodeError {
        message: String,
    },
    ImageForwarded {
        mime_type: String,
    },
    /// The typed-question path started (`true`) or finished (`false`).
    TextRequestPending(bool),
}

/// Queue `event` without waiting for the host to catch up.
pub(crate) fn publish(events: &mpsc::Sender<EngineEvent>, event: EngineEvent) {
    if let Err(TrySendError::Full(_)) = events.try_send(event) {
        tracing::debug!("Event queue full, dropping event");
    }
}

pub struct EventStream<'a> {
    rx: &'a mut mpsc::Receiver<EngineEvent>,
}

impl<'a> EventStream<'a> {
    #[must_use]
    pub const fn new(rx: &'a mut mpsc::Receiver<EngineEvent>) -> Self {
        Self { rx }
    }
}

impl Stream for EventStream<'_> {
    type Item = EngineEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        this.rx.poll_recv(cx)
    }
}
