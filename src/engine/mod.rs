mod audio;
mod builder;
mod events;
mod fallback;
mod image;
mod instructions;
mod pcm;
mod scheduler;
mod session;
mod state;
mod transcript;
mod transport;

pub use audio::{AudioDevice, AudioOutput, CaptureConfig, Microphone, SourceId};
pub use builder::{VoiceEngine, VoiceEngineBuilder};
pub use events::{EVENT_QUEUE_CAPACITY, EngineEvent, EventStream};
pub use fallback::{CompletionService, EMPTY_REPLY_TEXT, FAILURE_REPLY_TEXT};
pub use image::AttachedImage;
pub use instructions::{DEFAULT_USER_CONTEXT, live_instruction, text_instruction};
pub use pcm::{PcmBuffer, capture_blob, decode_audio_blob, encode_pcm16};
pub use scheduler::{PlaybackScheduler, ScheduledSlot};
pub use session::{
    CONNECT_TIMEOUT_MESSAGE, CONNECTION_ERROR_MESSAGE, EngineSnapshot, PERMISSION_DENIED_MESSAGE,
    START_FAILURE_MESSAGE, SessionHandle, VoiceSession,
};
pub use state::{SessionState, SessionStatus, Transition};
pub use transcript::{
    EntryOrigin, PENDING_USER_TEXT, Speaker, TranscriptEntry, TranscriptLog, TurnBuffer,
};
pub use transport::{BoxFuture, Connector, Transport, WsConnector};
