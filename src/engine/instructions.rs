//! System instructions handed to the model on each path.

use crate::config::{Language, PersonaConfig};

pub const DEFAULT_USER_CONTEXT: &str = "General consultation";

const SUPPORTED_LANGUAGES: &str = "English, Hindi, Urdu, and Kashmiri";

/// Instruction for the live voice session.
///
/// `context` is free text describing what the user was looking at before
/// opening voice mode, e.g. a disease they tapped on.
#[must_use]
pub fn live_instruction(persona: &PersonaConfig, language: Language, context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_USER_CONTEXT);
    format!(
        "You are a multimodal agricultural expert for \"{brand}\".\n\
         Target Audience: {audience}.\n\
         Languages: Fluently handle {SUPPORTED_LANGUAGES}. Respond in {lang}.\n\
         Lead Expert: Your colleague is {expert}, a famous lead expert. If the user asks for a \
         professional appointment, recommend they click the \"Book {expert}\" button on the dashboard.\n\
         Tone: Reassuring, friendly, and expert.\n\
         User Context: {context}.\n\
         If an image is provided, diagnose the crop issue and suggest weather-based sprays.",
        brand = persona.brand,
        audience = persona.audience,
        lang = language.display_name(),
        expert = persona.expert_name,
    )
}

/// Instruction for the one-shot typed path.
#[must_use]
pub fn text_instruction(persona: &PersonaConfig, language: Language) -> String {
    format!(
        "You are a textual agricultural expert for \"{brand}\".\n\
         Target Audience: {audience}.\n\
         Languages: Fluently handle {SUPPORTED_LANGUAGES}. Respond in {lang}.\n\
         Tone: Reassuring, friendly, and expert. Provide concise but high-quality agricultural advice.",
        brand = persona.brand,
        audience = persona.audience,
        lang = language.display_name(),
    )
}
