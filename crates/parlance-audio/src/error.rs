//! Audio adapter error types.

use parlance_core::{CaptureError, LocatorId, PlaybackError, SynthesisError};

/// Errors that can occur in the local audio adapters.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// No audio input device found.
    #[error("No audio input device found")]
    NoInputDevice,

    /// Microphone permission denied.
    #[error("Microphone permission denied")]
    MicrophonePermissionDenied,

    /// Failed to open audio input stream.
    #[error("Failed to open audio input stream: {0}")]
    InputStreamError(String),

    /// Failed to open audio output stream.
    #[error("Failed to open audio output stream: {0}")]
    OutputStreamError(String),

    /// Capture was used before the microphone was opened.
    #[error("Microphone is not open")]
    CaptureNotOpen,

    /// Audio resampling error.
    #[error("Audio resampling failed: {0}")]
    ResampleError(String),

    /// WAV encoding error.
    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    /// The payload could not be decoded for playback.
    #[error("Unsupported audio payload: {0}")]
    Decode(String),

    /// The locator was revoked or never issued.
    #[error("Unknown audio locator {0}")]
    UnknownLocator(LocatorId),

    /// The speech program could not be started.
    #[error("Failed to start speech program '{program}': {source}")]
    SpeechProgram {
        program: String,
        source: std::io::Error,
    },

    /// The dedicated audio thread is gone.
    #[error("Audio thread terminated unexpectedly")]
    AudioThreadDied,
}

impl From<AudioError> for CaptureError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::MicrophonePermissionDenied => Self::PermissionDenied,
            AudioError::NoInputDevice => Self::DeviceUnavailable(err.to_string()),
            other => Self::Stream(other.to_string()),
        }
    }
}

impl From<AudioError> for PlaybackError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::UnknownLocator(id) => Self::UnknownLocator(id),
            AudioError::Decode(msg) => Self::Decode(msg),
            other => Self::Device(other.to_string()),
        }
    }
}

impl From<AudioError> for SynthesisError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::SpeechProgram { .. } => Self::EngineUnavailable(err.to_string()),
            other => Self::Failed(other.to_string()),
        }
    }
}
