//! Discrete states of a practice session and its controllers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Render state of a practice session.
///
/// ```text
///   Idle → Recording → Stopped → Loading → Result
///    ▲                   ▲  │                 │
///    │                   └──┘ (failure)       │
///    └──── start-recording from Stopped/Result┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No recording, no result.
    #[default]
    Idle,
    /// Microphone acquisition or capture in progress.
    Recording,
    /// A recording is held and ready to evaluate.
    Stopped,
    /// Evaluation request in flight.
    Loading,
    /// An evaluation result is held.
    Result,
}

impl SessionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
            Self::Loading => "loading",
            Self::Result => "result",
        }
    }

    /// Whether playback activities may start from this state.
    pub const fn allows_playback(self) -> bool {
        matches!(self, Self::Idle | Self::Stopped | Self::Result)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of the recording controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    #[default]
    Idle,
    /// Waiting for the microphone to be granted.
    Acquiring,
    /// Capturing chunks.
    Recording,
    /// An artifact was produced.
    Stopped,
    /// Capture finished without a usable artifact.
    Error,
}

/// State of the reference (text-to-speech) playback controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceState {
    #[default]
    Idle,
    Speaking,
}

/// State of the recorded-audio playback controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
}

/// The four mutually exclusive activities of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Recording,
    Speaking,
    Playing,
    Evaluating,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Recording => "recording",
            Self::Speaking => "reference playback",
            Self::Playing => "recording playback",
            Self::Evaluating => "evaluation",
        })
    }
}
