//! Recorded audio artifact.

use bytes::{Bytes, BytesMut};

/// Content type declared by the local capture adapter.
///
/// The evaluator decodes whatever the capture side declares; the pairing is
/// fixed to 16-bit PCM mono WAV.
pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// One captured recording take.
///
/// Immutable once built. Sessions share it as `Arc<AudioArtifact>` and
/// playback holds only a `Weak` to it, so dropping the session's copy
/// invalidates every derived playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    payload: Bytes,
    content_type: String,
}

impl AudioArtifact {
    /// Create an artifact from a complete payload.
    pub fn new(payload: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            content_type: content_type.into(),
        }
    }

    /// Concatenate captured chunks in arrival order.
    ///
    /// Returns `None` when the chunks carry no data at all.
    pub fn from_chunks<I>(chunks: I, content_type: impl Into<String>) -> Option<Self>
    where
        I: IntoIterator<Item = Bytes>,
    {
        let mut payload = BytesMut::new();
        for chunk in chunks {
            payload.extend_from_slice(&chunk);
        }
        if payload.is_empty() {
            return None;
        }
        Some(Self::new(payload.freeze(), content_type))
    }

    /// The binary payload.
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// The declared content type (e.g. `audio/wav`).
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// File name used when the artifact is uploaded as a form part.
    pub fn file_name(&self) -> &'static str {
        match self.content_type.split(';').next().map(str::trim) {
            Some("audio/wav" | "audio/x-wav" | "audio/wave") => "recording.wav",
            Some("audio/webm") => "recording.webm",
            Some("audio/ogg") => "recording.ogg",
            _ => "recording.bin",
        }
    }
}
