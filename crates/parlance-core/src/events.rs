//! Events emitted by a practice session.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "state_changed", "state": "loading" }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{
    EvaluationResult, Outcome, PlaybackState, ProgressUpdate, RecordingState, ReferenceState,
    SessionState,
};

/// Everything a session reports to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session's render state changed.
    StateChanged { state: SessionState },

    /// The recording controller changed state.
    RecordingChanged { state: RecordingState },

    /// The reference playback controller changed state.
    ReferenceChanged { state: ReferenceState },

    /// The recorded-audio playback controller changed state.
    PlaybackChanged { state: PlaybackState },

    /// An evaluation succeeded.
    EvaluationCompleted {
        result: EvaluationResult,
        outcome: Outcome,
    },

    /// An evaluation failed; the recording is retained.
    EvaluationFailed { message: String },

    /// The progress owner should apply this update.
    ProgressUpdated { update: ProgressUpdate },

    /// A user-visible message (validation failure, device error, …).
    Notice { message: String },

    /// A late evaluation response was dropped because the session moved on.
    StaleResponseDiscarded { token: u64 },
}

impl SessionEvent {
    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice {
            message: message.into(),
        }
    }
}
