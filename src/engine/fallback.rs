//! The typed (non-streaming) question path.
//!
//! Independent of the live session: it only shares the transcript log and
//! the staged image with it.

use super::events::{EngineEvent, publish};
use super::image::{AttachedImage, ImageSlot};
use super::transcript::{EntryOrigin, Speaker, TranscriptEntry, TranscriptLog};
use crate::protocol::models::{Content, GenerateContentRequest, Part};
use crate::transport::rest::RestAdapter;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

pub const EMPTY_REPLY_TEXT: &str = "I apologize, I couldn't process that request.";
pub const FAILURE_REPLY_TEXT: &str =
    "Sorry, I'm having trouble connecting to my knowledge base right now.";

/// A one-shot completion endpoint.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Return the model's text for `request`.
    async fn complete(&self, model: &str, request: GenerateContentRequest) -> Result<String>;
}

#[async_trait]
impl CompletionService for RestAdapter {
    async fn complete(&self, model: &str, request: GenerateContentRequest) -> Result<String> {
        self.generate_text(model, &request).await
    }
}

pub(crate) struct TextFallback {
    service: Arc<dyn CompletionService>,
    model: String,
    instruction: String,
    log: TranscriptLog,
    staged: ImageSlot,
    events: mpsc::Sender<EngineEvent>,
    in_flight: AtomicBool,
}

struct InFlight<'a> {
    flag: &'a AtomicBool,
    events: &'a mpsc::Sender<EngineEvent>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        publish(self.events, EngineEvent::TextRequestPending(false));
    }
}

impl TextFallback {
    pub(crate) fn new(
        service: Arc<dyn CompletionService>,
        model: String,
        instruction: String,
        log: TranscriptLog,
        staged: ImageSlot,
        events: mpsc::Sender<EngineEvent>,
    ) -> Self {
        Self {
            service,
            model,
            instruction,
            log,
            staged,
            events,
            in_flight: AtomicBool::new(false),
        }
    }

    pub(crate) async fn send(
        &self,
        text: &str,
        image: Option<AttachedImage>,
    ) -> Result<TranscriptEntry> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("message text is empty".to_string()));
        }
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(Error::FallbackBusy);
        }
        let _in_flight = InFlight {
            flag: &self.in_flight,
            events: &self.events,
        };
        publish(&self.events, EngineEvent::TextRequestPending(true));

        let question = TranscriptEntry::new(Speaker::User, text, EntryOrigin::Typed);
        self.record(question).await;

        let image = match image {
            Some(image) => Some(image),
            None => self.staged.take().await,
        };
        let mut parts = vec![Part::text(text)];
        if let Some(image) = &image {
            parts.push(Part::inline(image.to_blob()));
        }
        let request = GenerateContentRequest::new(vec![Content::user(parts)])
            .system_instruction(self.instruction.clone());

        let reply = match self.service.complete(&self.model, request).await {
            Ok(answer) if !answer.trim().is_empty() => {
                TranscriptEntry::new(Speaker::Model, answer, EntryOrigin::Completion)
            }
            Ok(_) | Err(Error::EmptyResponse) => {
                tracing::warn!("Completion returned no text");
                TranscriptEntry::new(Speaker::Model, EMPTY_REPLY_TEXT, EntryOrigin::Apology)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Completion request failed");
                TranscriptEntry::new(Speaker::Model, FAILURE_REPLY_TEXT, EntryOrigin::Apology)
            }
        };
        self.record(reply.clone()).await;
        Ok(reply)
    }

    async fn record(&self, entry: TranscriptEntry) {
        self.log.append(entry.clone()).await;
        publish(&self.events, EngineEvent::EntryAppended(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted {
        reply: fn() -> Result<String>,
        seen: Mutex<Vec<GenerateContentRequest>>,
    }

    #[async_trait]
    impl CompletionService for Scripted {
        async fn complete(&self, _model: &str, request: GenerateContentRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request);
            (self.reply)()
        }
    }

    fn fallback(reply: fn() -> Result<String>) -> (TextFallback, Arc<Scripted>, ImageSlot, TranscriptLog) {
        let service = Arc::new(Scripted { reply, seen: Mutex::new(Vec::new()) });
        let log = TranscriptLog::new();
        let staged = ImageSlot::new();
        let (tx, _rx) = mpsc::channel(16);
        let fallback = TextFallback::new(
            service.clone(),
            "m".to_string(),
            "be helpful".to_string(),
            log.clone(),
            staged.clone(),
            tx,
        );
        (fallback, service, staged, log)
    }

    #[tokio::test]
    async fn empty_answer_becomes_apology() {
        let (fallback, _, _, log) = fallback(|| Ok("   ".to_string()));
        let reply = fallback.send("hi", None).await.unwrap();
        assert_eq!(reply.text, EMPTY_REPLY_TEXT);
        assert_eq!(reply.origin, EntryOrigin::Apology);
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn staged_image_is_sent_and_consumed() {
        let (fallback, service, staged, _) = fallback(|| Ok("scab".to_string()));
        staged
            .stage(AttachedImage::new(vec![9, 9], "image/png").unwrap())
            .await;
        fallback.send("what is this?", None).await.unwrap();

        let seen = service.seen.lock().unwrap();
        let parts = &seen[0].contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text.as_deref(), Some("what is this?"));
        assert_eq!(parts[1].inline_data.as_ref().unwrap().mime_type, "image/png");
        assert_eq!(
            seen[0].system_instruction.as_ref().unwrap().text(),
            "be helpful"
        );
        drop(seen);
        assert!(staged.peek().await.is_none());
    }

    #[tokio::test]
    async fn blank_text_is_rejected_without_logging() {
        let (fallback, _, _, log) = fallback(|| Ok("x".to_string()));
        assert!(matches!(fallback.send("  ", None).await, Err(Error::InvalidInput(_))));
        assert!(log.is_empty().await);
    }
}
