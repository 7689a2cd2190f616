//! Seams to the host's audio hardware.
//!
//! The engine never touches a sound card directly. A host supplies an
//! [`AudioDevice`] that hands out a capture stream and a playback context;
//! both are closed by the engine when a session ends or when the connection
//! attempt they were opened for fails or is cancelled.

use super::pcm::PcmBuffer;
use super::transport::BoxFuture;
use crate::Result;
use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc;

/// Identifies one scheduled playback unit on an [`AudioOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    /// Samples per delivered frame.
    pub frame_size: usize,
    pub channels: u16,
}

#[async_trait]
pub trait AudioDevice: Send + Sync {
    /// Ask for microphone access and begin capturing.
    ///
    /// Implementations return [`crate::Error::PermissionDenied`] when the user
    /// or platform refuses access.
    async fn open_microphone(&self, config: CaptureConfig) -> Result<Box<dyn Microphone>>;

    /// Open a playback context running at `sample_rate`.
    ///
    /// Sources that finish on their own must be reported on `ended`. Sources
    /// stopped through [`AudioOutput::stop`] need not be.
    fn open_output(
        &self,
        sample_rate: u32,
        ended: mpsc::UnboundedSender<SourceId>,
    ) -> Result<Box<dyn AudioOutput>>;
}

pub trait Microphone: Send {
    /// Next frame of mono samples in `[-1.0, 1.0]`; `None` once capture has ended.
    fn next_frame(&mut self) -> BoxFuture<'_, Option<Vec<f32>>>;
    fn close(&mut self);
}

pub trait AudioOutput: Send {
    /// Clock of this context in seconds.
    fn current_time(&self) -> f64;

    /// Queue `buffer` to begin playing at `at` on this context's clock.
    ///
    /// # Errors
    /// Returns an error if the context is closed or rejects the buffer.
    #[allow(clippy::result_large_err)]
    fn start(&mut self, id: SourceId, buffer: PcmBuffer, at: f64) -> Result<()>;

    /// Silence a source immediately. Unknown ids are ignored.
    fn stop(&mut self, id: SourceId);

    fn close(&mut self);
}
