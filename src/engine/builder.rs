use crate::config::{EngineConfig, Language, PersonaConfig};
use crate::transport::rest::RestAdapter;
use crate::{Error, Result};

use super::audio::AudioDevice;
use super::fallback::CompletionService;
use super::session::VoiceSession;
use super::transport::{Connector, WsConnector};
use std::sync::Arc;
use std::time::Duration;

pub struct VoiceEngine;

impl VoiceEngine {
    #[must_use]
    pub fn builder() -> VoiceEngineBuilder {
        VoiceEngineBuilder::new()
    }
}

pub struct VoiceEngineBuilder {
    config: EngineConfig,
}

impl VoiceEngineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Start from an existing configuration instead of the defaults.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    #[must_use]
    pub fn live_model(mut self, model: impl Into<String>) -> Self {
        self.config.live_model = model.into();
        self
    }

    #[must_use]
    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.config.text_model = model.into();
        self
    }

    #[must_use]
    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.config.voice = voice.into();
        self
    }

    #[must_use]
    pub const fn language(mut self, language: Language) -> Self {
        self.config.language = language;
        self
    }

    #[must_use]
    pub fn persona(mut self, persona: PersonaConfig) -> Self {
        self.config.persona = persona;
        self
    }

    /// `None` waits for the endpoint indefinitely.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.connect_timeout_ms =
            timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Spawn an engine talking to the hosted endpoints.
    ///
    /// # Errors
    /// Returns an error if no API key is configured or the HTTP client cannot be built.
    #[allow(clippy::result_large_err)]
    pub fn spawn(self, device: Arc<dyn AudioDevice>) -> Result<VoiceSession> {
        if self.config.api_key.trim().is_empty() {
            return Err(Error::InvalidInput("api_key required".to_string()));
        }
        let connector = WsConnector::new(&self.config.live_url, &self.config.api_key);
        let rest = RestAdapter::with_base_url(&self.config.api_key, &self.config.rest_base_url)?;
        Ok(self.spawn_with(Arc::new(connector), device, Arc::new(rest)))
    }

    /// Spawn an engine over caller-supplied connection and completion seams.
    #[must_use]
    pub fn spawn_with(
        self,
        connector: Arc<dyn Connector>,
        device: Arc<dyn AudioDevice>,
        completion: Arc<dyn CompletionService>,
    ) -> VoiceSession {
        tracing::debug!(config = ?self.config, "Spawning voice engine");
        VoiceSession::spawn(self.config, connector, device, completion)
    }
}

impl Default for VoiceEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
