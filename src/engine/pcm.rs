use crate::protocol::models::Blob;
use crate::{Error, Result};

/// Decoded audio ready for an output context.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    /// Interleaved samples in `[-1.0, 1.0)`.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmBuffer {
    #[must_use]
    pub const fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    #[must_use]
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Playback length in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Convert float capture samples to little-endian signed 16-bit PCM.
///
/// Samples are clamped to `[-1.0, 1.0]` first so hot input saturates rather
/// than wrapping around.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = if sample.is_nan() { 0.0 } else { sample.clamp(-1.0, 1.0) };
        let value = (clamped * 32768.0).clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16;
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Wrap one capture frame as a realtime media chunk.
#[must_use]
pub fn capture_blob(samples: &[f32], sample_rate: u32) -> Blob {
    Blob::from_bytes(format!("audio/pcm;rate={sample_rate}"), &encode_pcm16(samples))
}

/// Decode an inline audio payload into a mono playback buffer.
///
/// The rate comes from the blob's `rate=` parameter when present.
///
/// # Errors
/// Returns [`Error::Decode`] for bad base64, an empty payload, or an odd byte count.
#[allow(clippy::result_large_err)]
pub fn decode_audio_blob(blob: &Blob, default_rate: u32) -> Result<PcmBuffer> {
    let bytes = blob
        .decode()
        .map_err(|err| Error::Decode(err.to_string()))?;
    if bytes.is_empty() {
        return Err(Error::Decode("empty audio payload".to_string()));
    }
    if bytes.len() % 2 != 0 {
        return Err(Error::Decode(format!(
            "PCM16 payload has odd length {}",
            bytes.len()
        )));
    }
    let samples = bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect();
    Ok(PcmBuffer::mono(samples, blob.sample_rate().unwrap_or(default_rate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_input_saturates_instead_of_wrapping() {
        let bytes = encode_pcm16(&[1.0, -1.0, 2.5, 0.0]);
        let values: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        assert_eq!(values, vec![i16::MAX, i16::MIN, i16::MAX, 0]);
    }

    #[test]
    fn capture_blob_is_tagged_with_rate() {
        let blob = capture_blob(&[0.0; 4], 16_000);
        assert_eq!(blob.mime_type, "audio/pcm;rate=16000");
        assert_eq!(blob.decode().unwrap().len(), 8);
    }

    #[test]
    fn decode_uses_rate_from_mime() {
        let blob = Blob::from_bytes("audio/pcm;rate=8000", &[0, 0x40, 0, 0xC0]);
        let buffer = decode_audio_blob(&blob, 24_000).unwrap();
        assert_eq!(buffer.sample_rate, 8_000);
        assert_eq!(buffer.samples, vec![0.5, -0.5]);
        assert!((buffer.duration() - 2.0 / 8_000.0).abs() < 1e-12);
    }

    #[test]
    fn decode_falls_back_to_default_rate() {
        let blob = Blob::from_bytes("audio/pcm", &[0; 48_000]);
        let buffer = decode_audio_blob(&blob, 24_000).unwrap();
        assert!((buffer.duration() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn malformed_payloads_are_decode_errors() {
        let odd = Blob::from_bytes("audio/pcm", &[1, 2, 3]);
        assert!(matches!(decode_audio_blob(&odd, 24_000), Err(Error::Decode(_))));

        let empty = Blob::from_bytes("audio/pcm", &[]);
        assert!(matches!(decode_audio_blob(&empty, 24_000), Err(Error::Decode(_))));

        let garbage = Blob {
            mime_type: "audio/pcm".to_string(),
            data: "!!!".to_string(),
        };
        assert!(matches!(decode_audio_blob(&garbage, 24_000), Err(Error::Decode(_))));
    }
}
