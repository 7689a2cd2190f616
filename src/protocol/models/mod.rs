pub mod content;
pub mod generate;
pub mod setup;

pub use content::{Blob, Content, ContentRole, Part};
pub use generate::{Candidate, GenerateContentRequest, GenerateContentResponse, GoogleSearch, Tool};
pub use setup::{
    AudioTranscriptionConfig, GenerationConfig, Modality, PrebuiltVoiceConfig, Setup, SpeechConfig,
    VoiceConfig,
};

pub const DEFAULT_LIVE_MODEL: &str = "gemini-2.5-flash-native-audio-preview-12-2025";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_VOICE: &str = "Zephyr";

/// Prefix the API expects on model names in setup payloads.
#[must_use]
pub fn qualified_model_name(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}
