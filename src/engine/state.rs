use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the live session. The engine starts `Idle` and can cycle
/// through these states indefinitely.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    #[default]
    Idle,
    Connecting,
    Active,
    Error,
}

/// What happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Opened,
    Failed,
    Stop,
    Closed,
}

impl SessionState {
    /// Next state for `transition`, or `None` when it does not apply here.
    #[must_use]
    pub const fn apply(self, transition: Transition) -> Option<Self> {
        match (self, transition) {
            (Self::Idle | Self::Error, Transition::Start) => Some(Self::Connecting),
            (Self::Connecting, Transition::Opened) => Some(Self::Active),
            (Self::Connecting | Self::Active, Transition::Failed) => Some(Self::Error),
            (Self::Active, Transition::Closed) => Some(Self::Idle),
            (_, Transition::Stop) => Some(Self::Idle),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Connecting | Self::Active)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Active => "active",
            Self::Error => "error",
        })
    }
}

/// State plus the human-readable message shown alongside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStatus {
    pub state: SessionState,
    pub message: Option<String>,
}

impl SessionStatus {
    #[must_use]
    pub const fn new(state: SessionState) -> Self {
        Self { state, message: None }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            state: SessionState::Error,
            message: Some(message.into()),
        }
    }
}
