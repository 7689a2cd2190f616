use base64::Engine as _;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};

/// Inline binary payload: base64 data tagged with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

impl Blob {
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode the base64 payload.
    ///
    /// # Errors
    /// Returns an error if `data` is not valid standard base64.
    #[allow(clippy::result_large_err)]
    pub fn decode(&self) -> crate::Result<Vec<u8>> {
        Ok(general_purpose::STANDARD.decode(self.data.as_bytes())?)
    }

    #[must_use]
    pub fn is_audio(&self) -> bool {
        self.essence().starts_with("audio/")
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.essence().starts_with("image/")
    }

    /// Sample rate from a `rate=` MIME parameter, e.g. `audio/pcm;rate=24000`.
    #[must_use]
    pub fn sample_rate(&self) -> Option<u32> {
        self.mime_type
            .split(';')
            .skip(1)
            .filter_map(|param| param.trim().split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("rate"))
            .and_then(|(_, value)| value.trim().parse().ok())
    }

    fn essence(&self) -> String {
        self.mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
}

/// One piece of a content turn. Exactly one field is expected to be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    #[must_use]
    pub const fn inline(blob: Blob) -> Self {
        Self {
            text: None,
            inline_data: Some(blob),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ContentRole>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    #[must_use]
    pub const fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some(ContentRole::User),
            parts,
        }
    }

    /// A role-less content block, as used for system instructions.
    #[must_use]
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of every text part.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_is_read_from_mime_parameters() {
        let blob = Blob {
            mime_type: "audio/pcm;rate=24000".to_string(),
            data: String::new(),
        };
        assert_eq!(blob.sample_rate(), Some(24_000));
        assert!(blob.is_audio());

        let blob = Blob {
            mime_type: "audio/pcm".to_string(),
            data: String::new(),
        };
        assert_eq!(blob.sample_rate(), None);
    }

    #[test]
    fn image_detection_ignores_case() {
        let blob = Blob::from_bytes("Image/JPEG", &[1, 2, 3]);
        assert!(blob.is_image());
        assert!(!blob.is_audio());
        assert_eq!(blob.decode().unwrap(), vec![1, 2, 3]);
    }
}
