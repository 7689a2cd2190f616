use crate::config::EngineConfig;
use crate::protocol::client_messages::ClientMessage;
use crate::protocol::models::{Blob, Setup};
use crate::protocol::server_messages::{ServerContent, ServerMessage};
use crate::{Error, Result};

use super::audio::{AudioDevice, AudioOutput, CaptureConfig, Microphone, SourceId};
use super::events::{EVENT_QUEUE_CAPACITY, EngineEvent, EventStream, publish};
use super::fallback::{CompletionService, TextFallback};
use super::image::{AttachedImage, ImageSlot};
use super::instructions::{live_instruction, text_instruction};
use super::pcm::{capture_blob, decode_audio_blob};
use super::scheduler::PlaybackScheduler;
use super::state::{SessionState, SessionStatus, Transition};
use super::transcript::{Speaker, TranscriptEntry, TranscriptLog, TurnBuffer};
use super::transport::{BoxFuture, Connector, Transport};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};

pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error. Check your internet.";
pub const START_FAILURE_MESSAGE: &str = "Initialization failed.";
pub const PERMISSION_DENIED_MESSAGE: &str = "Microphone access was denied.";
pub const CONNECT_TIMEOUT_MESSAGE: &str = "The voice service did not answer in time.";

const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Point-in-time view of the engine's internals.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub status: SessionStatus,
    pub next_start_time: f64,
    pub pending_sources: usize,
    pub connecting: bool,
    pub connected: bool,
    pub capture_open: bool,
    pub output_open: bool,
    pub live_user_text: String,
    pub live_model_text: String,
}

/// Cloneable control half of a [`VoiceSession`].
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<SessionStatus>,
    log: TranscriptLog,
    staged: ImageSlot,
    fallback: Arc<TextFallback>,
}

/// A live voice conversation engine.
///
/// All session state is owned by one background task; this handle only
/// sends it commands, so every method is safe to call at any time.
pub struct VoiceSession {
    handle: SessionHandle,
    events: mpsc::Receiver<EngineEvent>,
}

impl VoiceSession {
    /// Spawn the engine task. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn spawn(
        config: EngineConfig,
        connector: Arc<dyn Connector>,
        device: Arc<dyn AudioDevice>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(64);
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>(EVENT_QUEUE_CAPACITY);
        let (ended_tx, ended_rx) = mpsc::unbounded_channel::<SourceId>();
        let (status_tx, status_rx) = watch::channel(SessionStatus::default());
        let log = TranscriptLog::new();
        let staged = ImageSlot::new();

        let fallback = Arc::new(TextFallback::new(
            completion,
            config.text_model.clone(),
            text_instruction(&config.persona, config.language),
            log.clone(),
            staged.clone(),
            event_tx.clone(),
        ));

        let driver = Driver {
            config,
            connector,
            device,
            commands: cmd_rx,
            ended_tx,
            ended_rx,
            pending: None,
            transport: None,
            microphone: None,
            output: None,
            scheduler: PlaybackScheduler::new(),
            turn: TurnBuffer::new(),
            log: log.clone(),
            staged: staged.clone(),
            status: status_tx,
            events: event_tx,
            last_context: None,
        };
        tokio::spawn(driver.run());

        Self {
            handle: SessionHandle {
                commands: cmd_tx,
                status: status_rx,
                log,
                staged,
                fallback,
            },
            events: event_rx,
        }
    }

    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Open a live session. See [`SessionHandle::start`].
    ///
    /// # Errors
    /// Returns an error if a session is already live or opening it fails.
    pub async fn start(&self, initial_context: Option<&str>, image: Option<AttachedImage>) -> Result<()> {
        self.handle.start(initial_context, image).await
    }

    /// Close the live session, if any.
    ///
    /// # Errors
    /// Returns an error only if the engine task has gone away.
    pub async fn stop(&self) -> Result<()> {
        self.handle.stop().await
    }

    /// Stop when active, start when idle or failed, ignore while connecting.
    ///
    /// # Errors
    /// Returns an error if starting fails.
    pub async fn toggle_mic(&self) -> Result<SessionState> {
        self.handle.toggle_mic().await
    }

    /// Stage an image, forwarding it right away when a session is active.
    ///
    /// # Errors
    /// Returns an error if the image is invalid or forwarding fails.
    pub async fn attach_image(&self, bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<()> {
        self.handle.attach_image(bytes, mime_type).await
    }

    pub async fn clear_attached_image(&self) {
        self.handle.clear_attached_image().await;
    }

    pub async fn staged_image(&self) -> Option<AttachedImage> {
        self.handle.staged_image().await
    }

    /// Ask a typed question over the one-shot completion endpoint.
    ///
    /// # Errors
    /// Returns an error only for blank input or a request already in flight.
    pub async fn send_text_fallback(&self, text: &str, image: Option<AttachedImage>) -> Result<TranscriptEntry> {
        self.handle.send_text_fallback(text, image).await
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.handle.status()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
        self.handle.watch_status()
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.handle.transcript().await
    }

    /// # Errors
    /// Returns an error if the engine task has gone away.
    pub async fn snapshot(&self) -> Result<EngineSnapshot> {
        self.handle.snapshot().await
    }

    /// Await the next engine event.
    ///
    /// Events are queued up to [`EVENT_QUEUE_CAPACITY`]; while the queue is
    /// full, new events are dropped.
    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.events.recv().await
    }

    /// Stream engine events.
    #[must_use]
    pub fn events(&mut self) -> EventStream<'_> {
        EventStream::new(&mut self.events)
    }
}

impl SessionHandle {
    /// Open a live session.
    ///
    /// `image`, when given, replaces any staged image and is sent as the first
    /// input frame once the connection opens. A rejected start leaves the
    /// staged image untouched. Resolves once the session is active or has
    /// failed.
    ///
    /// # Errors
    /// [`Error::SessionActive`] if a session is connecting or active,
    /// [`Error::PermissionDenied`] if the microphone is refused,
    /// [`Error::ConnectTimeout`] or a transport error if the endpoint cannot be reached,
    /// [`Error::Cancelled`] if `stop` was called while connecting.
    pub async fn start(&self, initial_context: Option<&str>, image: Option<AttachedImage>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Start {
            context: initial_context.map(str::to_owned),
            image,
            respond: tx,
        })
        .await?;
        rx.await.map_err(|_| Error::ConnectionClosed)?
    }

    /// Close the live session and release its audio resources. Idempotent.
    ///
    /// # Errors
    /// Returns an error only if the engine task has gone away.
    pub async fn stop(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Stop { respond: tx }).await?;
        rx.await.map_err(|_| Error::ConnectionClosed)
    }

    /// Returns the state the engine settled in.
    ///
    /// # Errors
    /// Returns an error if starting fails.
    pub async fn toggle_mic(&self) -> Result<SessionState> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Toggle { respond: tx }).await?;
        rx.await.map_err(|_| Error::ConnectionClosed)?
    }

    /// # Errors
    /// Returns an error if the image is invalid or forwarding it fails.
    pub async fn attach_image(&self, bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<()> {
        let image = AttachedImage::new(bytes, mime_type)?;
        let (tx, rx) = oneshot::channel();
        self.send(Command::AttachImage { image, respond: tx }).await?;
        rx.await.map_err(|_| Error::ConnectionClosed)?
    }

    pub async fn clear_attached_image(&self) {
        self.staged.clear().await;
    }

    pub async fn staged_image(&self) -> Option<AttachedImage> {
        self.staged.peek().await
    }

    /// Appends the question to the transcript immediately, then the answer
    /// (or an apology if the request fails). Uses `image` if given, otherwise
    /// consumes the staged image.
    ///
    /// # Errors
    /// [`Error::InvalidInput`] for blank text, [`Error::FallbackBusy`] while
    /// another typed question is outstanding.
    pub async fn send_text_fallback(&self, text: &str, image: Option<AttachedImage>) -> Result<TranscriptEntry> {
        self.fallback.send(text, image).await
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.status.borrow().state
    }

    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.log.entries().await
    }

    /// # Errors
    /// Returns an error if the engine task has gone away.
    pub async fn snapshot(&self) -> Result<EngineSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot { respond: tx }).await?;
        rx.await.map_err(|_| Error::ConnectionClosed)
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::ConnectionClosed)
    }
}

enum Command {
    Start {
        context: Option<String>,
        image: Option<AttachedImage>,
        respond: oneshot::Sender<Result<()>>,
    },
    Toggle { respond: oneshot::Sender<Result<SessionState>> },
    Stop { respond: oneshot::Sender<()> },
    AttachImage { image: AttachedImage, respond: oneshot::Sender<Result<()>> },
    Snapshot { respond: oneshot::Sender<EngineSnapshot> },
}

/// Who is waiting on a connection attempt.
enum StartReply {
    Start(oneshot::Sender<Result<()>>),
    Toggle(oneshot::Sender<Result<SessionState>>),
}

impl StartReply {
    fn succeed(self, state: SessionState) {
        match self {
            Self::Start(tx) => {
                let _ = tx.send(Ok(()));
            }
            Self::Toggle(tx) => {
                let _ = tx.send(Ok(state));
            }
        }
    }

    fn fail(self, err: Error) {
        match self {
            Self::Start(tx) => {
                let _ = tx.send(Err(err));
            }
            Self::Toggle(tx) => {
                let _ = tx.send(Err(err));
            }
        }
    }
}

/// Devices opened for a connection attempt. Whatever is still held when
/// this drops is closed, so an abandoned attempt releases the hardware.
#[derive(Default)]
struct OpenedDevices {
    microphone: Option<Box<dyn Microphone>>,
    output: Option<Box<dyn AudioOutput>>,
}

impl Drop for OpenedDevices {
    fn drop(&mut self) {
        if let Some(mut microphone) = self.microphone.take() {
            microphone.close();
        }
        if let Some(mut output) = self.output.take() {
            output.close();
        }
    }
}

struct Connected {
    transport: Box<dyn Transport>,
    devices: OpenedDevices,
}

struct PendingConnect {
    future: BoxFuture<'static, Result<Connected>>,
    reply: StartReply,
}

struct Driver {
    config: EngineConfig,
    connector: Arc<dyn Connector>,
    device: Arc<dyn AudioDevice>,
    commands: mpsc::Receiver<Command>,
    ended_tx: mpsc::UnboundedSender<SourceId>,
    ended_rx: mpsc::UnboundedReceiver<SourceId>,
    pending: Option<PendingConnect>,
    transport: Option<Box<dyn Transport>>,
    microphone: Option<Box<dyn Microphone>>,
    output: Option<Box<dyn AudioOutput>>,
    scheduler: PlaybackScheduler,
    turn: TurnBuffer,
    log: TranscriptLog,
    staged: ImageSlot,
    status: watch::Sender<SessionStatus>,
    events: mpsc::Sender<EngineEvent>,
    last_context: Option<String>,
}

impl Driver {
    async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("Session handle dropped, shutting down engine");
                        self.stop().await;
                        break;
                    };
                    self.handle_command(command).await;
                }
                result = wait_connect(&mut self.pending) => {
                    self.finish_connect(result).await;
                }
                message = next_message(&mut self.transport) => {
                    self.handle_transport(message).await;
                }
                frame = next_frame(&mut self.microphone) => {
                    self.handle_capture(frame).await;
                }
                Some(id) = self.ended_rx.recv() => {
                    self.scheduler.release(id);
                }
            }
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start { context, image, respond } => {
                if self.state().is_live() {
                    let _ = respond.send(Err(Error::SessionActive));
                    return;
                }
                if let Some(image) = image {
                    self.staged.stage(image).await;
                }
                self.last_context = context;
                self.begin(StartReply::Start(respond));
            }
            Command::Toggle { respond } => match self.state() {
                SessionState::Active => {
                    self.stop().await;
                    let _ = respond.send(Ok(self.state()));
                }
                SessionState::Idle | SessionState::Error => self.begin(StartReply::Toggle(respond)),
                SessionState::Connecting => {
                    tracing::debug!("Ignoring mic toggle while connecting");
                    let _ = respond.send(Ok(SessionState::Connecting));
                }
            },
            Command::Stop { respond } => {
                self.stop().await;
                let _ = respond.send(());
            }
            Command::AttachImage { image, respond } => {
                let _ = respond.send(self.attach_image(image).await);
            }
            Command::Snapshot { respond } => {
                let _ = respond.send(self.snapshot());
            }
        }
    }

    fn state(&self) -> SessionState {
        self.status.borrow().state
    }

    fn set_status(&self, status: SessionStatus) {
        if *self.status.borrow() == status {
            return;
        }
        tracing::debug!(from = %self.state(), to = %status.state, "Session state change");
        self.status.send_replace(status.clone());
        self.emit(EngineEvent::StateChanged(status));
    }

    /// Move along the lifecycle table. Returns `false` if `transition` does
    /// not apply to the current state, which is then left as is.
    fn transition(&self, transition: Transition, message: Option<&str>) -> bool {
        let from = self.state();
        let Some(state) = from.apply(transition) else {
            tracing::debug!(%from, ?transition, "Ignoring session transition");
            return false;
        };
        self.set_status(SessionStatus {
            state,
            message: message.map(str::to_owned),
        });
        true
    }

    fn emit(&self, event: EngineEvent) {
        publish(&self.events, event);
    }

    fn begin(&mut self, reply: StartReply) {
        if !self.transition(Transition::Start, None) {
            reply.fail(Error::SessionActive);
            return;
        }
        tracing::info!(context = ?self.last_context, "Starting voice session");
        let future = self.connect_future();
        self.pending = Some(PendingConnect { future, reply });
    }

    fn connect_future(&self) -> BoxFuture<'static, Result<Connected>> {
        let config = &self.config;
        let setup = Setup::voice(
            &config.live_model,
            &config.voice,
            live_instruction(&config.persona, config.language, self.last_context.as_deref()),
        );
        let capture = CaptureConfig {
            sample_rate: config.capture_sample_rate,
            frame_size: config.capture_frame_size,
            channels: 1,
        };
        let playback_rate = config.playback_sample_rate;
        let timeout = config.connect_timeout();
        let device = Arc::clone(&self.device);
        let connector = Arc::clone(&self.connector);
        let ended = self.ended_tx.clone();

        Box::pin(async move {
            let mut devices = OpenedDevices::default();
            devices.output = Some(device.open_output(playback_rate, ended)?);
            devices.microphone = Some(device.open_microphone(capture).await?);
            let connecting = connector.connect(setup);
            let transport = match timeout {
                Some(limit) => tokio::time::timeout(limit, connecting)
                    .await
                    .unwrap_or(Err(Error::ConnectTimeout(limit)))?,
                None => connecting.await?,
            };
            Ok(Connected { transport, devices })
        })
    }

    async fn finish_connect(&mut self, result: Result<Connected>) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match result {
            Ok(mut connected) => {
                self.transport = Some(connected.transport);
                self.microphone = connected.devices.microphone.take();
                self.output = connected.devices.output.take();
                self.transition(Transition::Opened, None);
                tracing::info!("Voice session active");

                if let Some(image) = self.staged.take().await {
                    if let Err(err) = self.forward_image(&image).await {
                        self.fail(&err).await;
                        pending.reply.fail(err);
                        return;
                    }
                }
                pending.reply.succeed(SessionState::Active);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Voice session failed to start");
                let message = match &err {
                    Error::PermissionDenied(_) => PERMISSION_DENIED_MESSAGE,
                    Error::ConnectTimeout(_) => CONNECT_TIMEOUT_MESSAGE,
                    _ => START_FAILURE_MESSAGE,
                };
                self.transition(Transition::Failed, Some(message));
                pending.reply.fail(err);
            }
        }
    }

    async fn handle_transport(&mut self, message: Result<Option<ServerMessage>>) {
        match message {
            Ok(Some(message)) => self.handle_message(message).await,
            Ok(None) => {
                tracing::info!("Live connection closed");
                self.release().await;
                self.transition(Transition::Closed, None);
            }
            Err(err) => self.fail(&err).await,
        }
    }

    async fn handle_message(&mut self, message: ServerMessage) {
        if message.setup_complete.is_some() {
            tracing::debug!("Live setup acknowledged");
        }
        if let Some(go_away) = &message.go_away {
            tracing::warn!(time_left = ?go_away.time_left, "Live endpoint will disconnect soon");
        }
        if let Some(content) = message.server_content {
            self.handle_content(content).await;
        }
    }

    async fn handle_content(&mut self, content: ServerContent) {
        for blob in content.audio_blobs() {
            self.schedule_audio(blob);
        }
        if let Some(fragment) = &content.input_transcription {
            let text = self.turn.push_user(&fragment.text).to_string();
            self.emit(EngineEvent::LiveTranscript { speaker: Speaker::User, text });
        }
        if let Some(fragment) = &content.output_transcription {
            let text = self.turn.push_model(&fragment.text).to_string();
            self.emit(EngineEvent::LiveTranscript { speaker: Speaker::Model, text });
        }
        if content.turn_complete {
            self.complete_turn().await;
        }
        if content.interrupted {
            self.interrupt_playback();
        }
    }

    fn schedule_audio(&mut self, blob: &Blob) {
        if self.output.is_none() {
            return;
        }
        let buffer = match decode_audio_blob(blob, self.config.playback_sample_rate) {
            Ok(buffer) => buffer,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping malformed audio frame");
                self.emit(EngineEvent::DecodeError { message: err.to_string() });
                return;
            }
        };
        let Some(output) = self.output.as_mut() else {
            return;
        };
        let slot = self.scheduler.plan(output.current_time(), buffer.duration());
        let started = output.start(slot.id, buffer, slot.start);
        match started {
            Ok(()) => {
                tracing::trace!(source = %slot.id, start = slot.start, duration = slot.duration, "Scheduled playback");
                self.emit(EngineEvent::PlaybackScheduled {
                    source: slot.id,
                    start: slot.start,
                    duration: slot.duration,
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, source = %slot.id, "Output rejected audio chunk");
                self.scheduler.release(slot.id);
            }
        }
    }

    async fn complete_turn(&mut self) {
        let entries = self.turn.flush(Utc::now());
        tracing::debug!(user = %entries[0].text, model = %entries[1].text, "Turn complete");
        self.log.extend(entries.clone()).await;
        for entry in entries {
            self.emit(EngineEvent::EntryAppended(entry));
        }
        self.emit(EngineEvent::LiveTranscriptCleared);
    }

    fn interrupt_playback(&mut self) {
        let stopped = self.stop_sources();
        tracing::debug!(stopped, "Playback interrupted");
        self.emit(EngineEvent::PlaybackInterrupted { stopped });
    }

    /// Silence every pending source and rewind the playback cursor.
    fn stop_sources(&mut self) -> usize {
        let stopped = self.scheduler.interrupt();
        if let Some(output) = self.output.as_mut() {
            for id in &stopped {
                output.stop(*id);
            }
        }
        stopped.len()
    }

    async fn handle_capture(&mut self, frame: Option<Vec<f32>>) {
        let Some(samples) = frame else {
            tracing::warn!("Microphone stream ended");
            if let Some(mut microphone) = self.microphone.take() {
                microphone.close();
            }
            return;
        };
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        let blob = capture_blob(&samples, self.config.capture_sample_rate);
        let sent = transport.send(ClientMessage::media(blob)).await;
        if let Err(err) = sent {
            self.fail(&err).await;
        }
    }

    async fn attach_image(&mut self, image: AttachedImage) -> Result<()> {
        self.staged.stage(image).await;
        if self.state() != SessionState::Active {
            return Ok(());
        }
        let Some(image) = self.staged.take().await else {
            return Ok(());
        };
        let forwarded = self.forward_image(&image).await;
        if let Err(err) = &forwarded {
            self.fail(err).await;
        }
        forwarded
    }

    async fn forward_image(&mut self, image: &AttachedImage) -> Result<()> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(Error::ConnectionClosed);
        };
        transport.send(ClientMessage::media(image.to_blob())).await?;
        tracing::debug!(mime_type = image.mime_type(), bytes = image.bytes().len(), "Forwarded image");
        self.emit(EngineEvent::ImageForwarded {
            mime_type: image.mime_type().to_string(),
        });
        Ok(())
    }

    /// Fatal session error: release everything, surface the message.
    async fn fail(&mut self, err: &Error) {
        tracing::warn!(error = %err, "Live session error");
        self.release().await;
        self.transition(Transition::Failed, Some(CONNECTION_ERROR_MESSAGE));
    }

    async fn stop(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::info!("Cancelling pending connection");
            pending.reply.fail(Error::Cancelled);
        }
        if self.transport.is_some() || self.output.is_some() || self.microphone.is_some() {
            tracing::info!("Stopping voice session");
        }
        self.release().await;
        self.transition(Transition::Stop, None);
    }

    /// Tear down the connection, capture, and playback. Safe to repeat.
    async fn release(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            match tokio::time::timeout(CLOSE_GRACE, transport.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::debug!(error = %err, "Error closing live connection"),
                Err(_) => tracing::debug!("Timed out closing live connection"),
            }
        }
        if let Some(mut microphone) = self.microphone.take() {
            microphone.close();
        }
        self.stop_sources();
        if let Some(mut output) = self.output.take() {
            output.close();
        }
        if !self.turn.is_empty() {
            self.turn.clear();
            self.emit(EngineEvent::LiveTranscriptCleared);
        }
    }

    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            status: self.status.borrow().clone(),
            next_start_time: self.scheduler.next_start_time(),
            pending_sources: self.scheduler.pending_len(),
            connecting: self.pending.is_some(),
            connected: self.transport.is_some(),
            capture_open: self.microphone.is_some(),
            output_open: self.output.is_some(),
            live_user_text: self.turn.user_text().to_string(),
            live_model_text: self.turn.model_text().to_string(),
        }
    }
}

async fn wait_connect(pending: &mut Option<PendingConnect>) -> Result<Connected> {
    match pending {
        Some(pending) => pending.future.as_mut().await,
        None => std::future::pending().await,
    }
}

async fn next_message(transport: &mut Option<Box<dyn Transport>>) -> Result<Option<ServerMessage>> {
    match transport {
        Some(transport) => transport.next_message().await,
        None => std::future::pending().await,
    }
}

async fn next_frame(microphone: &mut Option<Box<dyn Microphone>>) -> Option<Vec<f32>> {
    match microphone {
        Some(microphone) => microphone.next_frame().await,
        None => std::future::pending().await,
    }
}
