use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::protocol::models::{DEFAULT_LIVE_MODEL, DEFAULT_TEXT_MODEL, DEFAULT_VOICE};
use crate::transport::rest::REST_BASE_URL;
use crate::transport::ws::LIVE_WS_URL;

pub const CAPTURE_SAMPLE_RATE: u32 = 16_000;
pub const PLAYBACK_SAMPLE_RATE: u32 = 24_000;
pub const CAPTURE_FRAME_SIZE: usize = 4096;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;

/// Spoken/written language the assistant should answer in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ur")]
    Urdu,
    #[serde(rename = "ks")]
    Kashmiri,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Urdu => "ur",
            Self::Kashmiri => "ks",
            Self::Hindi => "hi",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Urdu => "Urdu",
            Self::Kashmiri => "Kashmiri",
            Self::Hindi => "Hindi",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::English),
            "ur" => Some(Self::Urdu),
            "ks" => Some(Self::Kashmiri),
            "hi" => Some(Self::Hindi),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn default_brand() -> String {
    "Farmers Corner Kashmir".to_string()
}

fn default_audience() -> String {
    "Apple growers in Kashmir, HP, and Uttarakhand".to_string()
}

fn default_expert_name() -> String {
    "DAR TOWSEEF".to_string()
}

/// Who the assistant speaks for and to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonaConfig {
    #[serde(default = "default_brand")]
    pub brand: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Lead expert the assistant refers appointment requests to.
    #[serde(default = "default_expert_name")]
    pub expert_name: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            audience: default_audience(),
            expert_name: default_expert_name(),
        }
    }
}

fn default_live_model() -> String {
    DEFAULT_LIVE_MODEL.to_string()
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

const fn default_capture_sample_rate() -> u32 {
    CAPTURE_SAMPLE_RATE
}

const fn default_playback_sample_rate() -> u32 {
    PLAYBACK_SAMPLE_RATE
}

const fn default_capture_frame_size() -> usize {
    CAPTURE_FRAME_SIZE
}

#[allow(clippy::unnecessary_wraps)]
const fn default_connect_timeout_ms() -> Option<u64> {
    Some(DEFAULT_CONNECT_TIMEOUT_MS)
}

fn default_live_url() -> String {
    LIVE_WS_URL.to_string()
}

fn default_rest_base_url() -> String {
    REST_BASE_URL.to_string()
}

/// Everything the engine needs to open sessions and answer typed questions.
#[derive(Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_live_model")]
    pub live_model: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_capture_sample_rate")]
    pub capture_sample_rate: u32,
    #[serde(default = "default_playback_sample_rate")]
    pub playback_sample_rate: u32,
    #[serde(default = "default_capture_frame_size")]
    pub capture_frame_size: usize,
    /// `None` waits for the endpoint indefinitely.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: Option<u64>,
    #[serde(default = "default_live_url")]
    pub live_url: String,
    #[serde(default = "default_rest_base_url")]
    pub rest_base_url: String,
    #[serde(default)]
    pub persona: PersonaConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            live_model: default_live_model(),
            text_model: default_text_model(),
            voice: default_voice(),
            language: Language::default(),
            capture_sample_rate: default_capture_sample_rate(),
            playback_sample_rate: default_playback_sample_rate(),
            capture_frame_size: default_capture_frame_size(),
            connect_timeout_ms: default_connect_timeout_ms(),
            live_url: default_live_url(),
            rest_base_url: default_rest_base_url(),
            persona: PersonaConfig::default(),
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("api_key", &"[REDACTED]")
            .field("live_model", &self.live_model)
            .field("text_model", &self.text_model)
            .field("voice", &self.voice)
            .field("language", &self.language)
            .field("capture_sample_rate", &self.capture_sample_rate)
            .field("playback_sample_rate", &self.playback_sample_rate)
            .field("capture_frame_size", &self.capture_frame_size)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("live_url", &self.live_url)
            .field("rest_base_url", &self.rest_base_url)
            .field("persona", &self.persona)
            .finish()
    }
}

impl EngineConfig {
    /// Defaults with the API key taken from `GEMINI_API_KEY`, then `API_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .unwrap_or_default();
        Self {
            api_key,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}
