use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shown for the user side of a turn when no transcription arrived in time.
pub const PENDING_USER_TEXT: &str = "Analyzing...";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Model,
}

/// How an entry's text came to be.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Accumulated transcription fragments of a live turn.
    Voice,
    /// No input transcription fragment arrived before the turn ended.
    Untranscribed,
    /// Fragments arrived but concatenated to nothing.
    BlankTranscript,
    /// Typed by the user on the text path.
    Typed,
    /// Answer from the one-shot completion endpoint.
    Completion,
    /// Canned reply substituted when the completion failed or was empty.
    Apology,
}

impl EntryOrigin {
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        matches!(self, Self::Untranscribed | Self::BlankTranscript)
    }
}

/// A finalized conversation turn. Never modified after it is logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub origin: EntryOrigin,
}

impl TranscriptEntry {
    #[must_use]
    pub fn new(role: Speaker, text: impl Into<String>, origin: EntryOrigin) -> Self {
        Self::at(role, text, origin, Utc::now())
    }

    #[must_use]
    pub fn at(
        role: Speaker,
        text: impl Into<String>,
        origin: EntryOrigin,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp,
            origin,
        }
    }
}

/// Per-direction fragment buffers for the turn in progress.
///
/// `None` means no fragment has arrived for that direction since the last
/// turn boundary, which is distinct from fragments that were all empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TurnBuffer {
    user: Option<String>,
    model: Option<String>,
}

impl TurnBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input fragment and return the user text so far.
    pub fn push_user(&mut self, fragment: &str) -> &str {
        let text = self.user.get_or_insert_with(String::new);
        text.push_str(fragment);
        text
    }

    /// Append an output fragment and return the model text so far.
    pub fn push_model(&mut self, fragment: &str) -> &str {
        let text = self.model.get_or_insert_with(String::new);
        text.push_str(fragment);
        text
    }

    #[must_use]
    pub fn user_text(&self) -> &str {
        self.user.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn model_text(&self) -> &str {
        self.model.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user.is_none() && self.model.is_none()
    }

    /// Close the turn: produce the user entry then the model entry and reset
    /// both buffers. Both entries are produced even if a side saw nothing.
    pub fn flush(&mut self, timestamp: DateTime<Utc>) -> [TranscriptEntry; 2] {
        let (user_text, user_origin) = match self.user.take() {
            None => (PENDING_USER_TEXT.to_string(), EntryOrigin::Untranscribed),
            Some(text) if text.is_empty() => {
                (PENDING_USER_TEXT.to_string(), EntryOrigin::BlankTranscript)
            }
            Some(text) => (text, EntryOrigin::Voice),
        };
        let model_text = self.model.take().unwrap_or_default();
        [
            TranscriptEntry::at(Speaker::User, user_text, user_origin, timestamp),
            TranscriptEntry::at(Speaker::Model, model_text, EntryOrigin::Voice, timestamp),
        ]
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.model = None;
    }
}

/// Append-only, ordered conversation log shared by the live and text paths.
#[derive(Debug, Clone, Default)]
pub struct TranscriptLog {
    entries: Arc<RwLock<Vec<TranscriptEntry>>>,
}

impl TranscriptLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, entry: TranscriptEntry) {
        self.entries.write().await.push(entry);
    }

    /// Append several entries with no other writer interleaving.
    pub async fn extend(&self, entries: impl IntoIterator<Item = TranscriptEntry>) {
        self.entries.write().await.extend(entries);
    }

    pub async fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_concatenate_in_arrival_order() {
        let mut turn = TurnBuffer::new();
        assert_eq!(turn.push_user("My apple"), "My apple");
        assert_eq!(turn.push_user(" tree has spots"), "My apple tree has spots");
        turn.push_model("Looks like ");
        turn.push_model("apple scab.");

        let [user, model] = turn.flush(Utc::now());
        assert_eq!(user.role, Speaker::User);
        assert_eq!(user.text, "My apple tree has spots");
        assert_eq!(user.origin, EntryOrigin::Voice);
        assert_eq!(model.role, Speaker::Model);
        assert_eq!(model.text, "Looks like apple scab.");
        assert!(turn.is_empty());
        assert_eq!(turn.user_text(), "");
    }

    #[test]
    fn missing_user_transcript_gets_placeholder() {
        let mut turn = TurnBuffer::new();
        turn.push_model("Hello");
        let [user, model] = turn.flush(Utc::now());
        assert_eq!(user.text, PENDING_USER_TEXT);
        assert_eq!(user.origin, EntryOrigin::Untranscribed);
        assert!(user.origin.is_placeholder());
        assert_eq!(model.text, "Hello");
    }

    #[test]
    fn blank_user_transcript_is_distinguished() {
        let mut turn = TurnBuffer::new();
        turn.push_user("");
        let [user, model] = turn.flush(Utc::now());
        assert_eq!(user.text, PENDING_USER_TEXT);
        assert_eq!(user.origin, EntryOrigin::BlankTranscript);
        assert_eq!(model.text, "");
    }

    #[tokio::test]
    async fn log_preserves_insertion_order() {
        let log = TranscriptLog::new();
        log.append(TranscriptEntry::new(Speaker::User, "a", EntryOrigin::Typed)).await;
        log.extend([
            TranscriptEntry::new(Speaker::User, "b", EntryOrigin::Voice),
            TranscriptEntry::new(Speaker::Model, "c", EntryOrigin::Voice),
        ])
        .await;
        let texts: Vec<String> = log.entries().await.into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(log.len().await, 3);
    }
}
