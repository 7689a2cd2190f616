use crate::protocol::models::Blob;
use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A photo the user staged to go along with their next input.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachedImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl AttachedImage {
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the payload is empty or the MIME type is not `image/*`.
    #[allow(clippy::result_large_err)]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self> {
        let mime_type = mime_type.into();
        if !mime_type.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(Error::InvalidInput(format!("{mime_type} is not an image type")));
        }
        if bytes.is_empty() {
            return Err(Error::InvalidInput("image payload is empty".to_string()));
        }
        Ok(Self { bytes, mime_type })
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn to_blob(&self) -> Blob {
        Blob::from_bytes(self.mime_type.clone(), &self.bytes)
    }
}

impl std::fmt::Debug for AttachedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Holds at most one staged image; a newer one replaces the older.
#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    inner: Arc<Mutex<Option<AttachedImage>>>,
}

impl ImageSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `image`, returning whatever it displaced.
    pub async fn stage(&self, image: AttachedImage) -> Option<AttachedImage> {
        self.inner.lock().await.replace(image)
    }

    pub async fn take(&self) -> Option<AttachedImage> {
        self.inner.lock().await.take()
    }

    pub async fn peek(&self) -> Option<AttachedImage> {
        self.inner.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.inner.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_images() {
        assert!(matches!(
            AttachedImage::new(vec![1], "audio/pcm"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            AttachedImage::new(Vec::new(), "image/png"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn staging_replaces_previous_image() {
        let slot = ImageSlot::new();
        let first = AttachedImage::new(vec![1], "image/jpeg").unwrap();
        let second = AttachedImage::new(vec![2], "image/png").unwrap();
        assert!(slot.stage(first.clone()).await.is_none());
        assert_eq!(slot.stage(second.clone()).await, Some(first));
        assert_eq!(slot.peek().await, Some(second.clone()));
        assert_eq!(slot.take().await, Some(second));
        assert!(slot.peek().await.is_none());
    }
}
