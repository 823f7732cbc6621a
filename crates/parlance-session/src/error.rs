//! Session error types.
//!
//! Every variant is local and recoverable: after any of them the session is
//! in a state from which the user can retry without losing the recording.

use parlance_core::{Activity, CaptureError, SessionState};

/// Shown when an evaluation is refused without a server message.
pub const EVALUATION_FAILED_MESSAGE: &str = "Evaluation failed";

/// Shown when no response was received from the evaluator.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// Shown when evaluation or playback is attempted without a recording.
pub const RECORD_FIRST_MESSAGE: &str = "Please record your voice first.";

/// Shown when the reference or practice text is blank.
pub const ENTER_TEXT_MESSAGE: &str = "Please enter text to speak.";

/// Shown when no user is logged in at evaluation time.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to evaluate your recording.";

/// Errors that can occur in a practice session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Microphone access was refused.
    #[error("Microphone permission denied")]
    PermissionDenied,

    /// No usable microphone, or the stream failed.
    #[error("Audio input device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A required input is missing or blank. Nothing was sent.
    #[error("{0}")]
    EmptyInput(String),

    /// The capture produced no audio.
    #[error("No audio was captured. Please try recording again.")]
    EmptyRecording,

    /// Playback was requested with no recording available.
    #[error("Please record your voice first.")]
    NoRecording,

    /// Text-to-speech failed. Carries the synthesizer's message.
    #[error("{0}")]
    SynthesisFailure(String),

    /// The audio player failed. Carries the player's message.
    #[error("{0}")]
    PlaybackFailure(String),

    /// The evaluator answered with an error. `message` is the server's
    /// text, or [`EVALUATION_FAILED_MESSAGE`].
    #[error("{message}")]
    ServerRejected { message: String },

    /// No response was received from the evaluator.
    #[error("Network error")]
    NetworkFailure,

    /// Another activity holds the session.
    #[error("Cannot start while {0} is in progress")]
    Busy(Activity),

    /// The operation is not valid from the current state.
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },
}

impl SessionError {
    /// Whether the caller should keep the current recording and retry.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ServerRejected { .. } | Self::NetworkFailure)
    }
}

impl From<CaptureError> for SessionError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::PermissionDenied => Self::PermissionDenied,
            CaptureError::DeviceUnavailable(msg) | CaptureError::Stream(msg) => {
                Self::DeviceUnavailable(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(SessionError::NetworkFailure.to_string(), "Network error");
        assert_eq!(
            SessionError::NoRecording.to_string(),
            "Please record your voice first."
        );
        assert_eq!(
            SessionError::ServerRejected {
                message: "bad audio".to_string()
            }
            .to_string(),
            "bad audio"
        );
        assert_eq!(
            SessionError::EmptyInput(ENTER_TEXT_MESSAGE.to_string()).to_string(),
            "Please enter text to speak."
        );
    }

    #[test]
    fn test_busy_names_activity() {
        let msg = SessionError::Busy(Activity::Evaluating).to_string();
        assert!(msg.contains("evaluation"));
    }

    #[test]
    fn test_capture_error_mapping() {
        assert_eq!(
            SessionError::from(CaptureError::PermissionDenied),
            SessionError::PermissionDenied
        );
        assert!(matches!(
            SessionError::from(CaptureError::DeviceUnavailable("none".into())),
            SessionError::DeviceUnavailable(_)
        ));
    }

    #[test]
    fn test_retryable() {
        assert!(SessionError::NetworkFailure.is_retryable());
        assert!(!SessionError::PermissionDenied.is_retryable());
    }
}
