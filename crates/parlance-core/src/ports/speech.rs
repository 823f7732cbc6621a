//! Speech synthesizer port: reference pronunciation via text-to-speech.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors reported by a speech synthesizer.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynthesisError {
    /// The speech engine could not be started.
    #[error("Speech engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine started but the utterance failed.
    #[error("Speech synthesis failed: {0}")]
    Failed(String),
}

/// Lifecycle of one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SynthesisEvent {
    /// Audio output began.
    Started,
    /// The utterance played to the end.
    Finished,
    /// The utterance failed; no further events follow.
    Failed { error: SynthesisError },
}

impl SynthesisEvent {
    /// Whether this event ends the utterance.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed { .. })
    }
}

/// Capability to speak text aloud.
pub trait SpeechSynthesizerPort: Send + Sync {
    /// Start speaking `text` and return the utterance's event stream.
    ///
    /// Errors are delivered as [`SynthesisEvent::Failed`], never as a
    /// panic or a dropped future.
    fn speak(&self, text: &str) -> mpsc::UnboundedReceiver<SynthesisEvent>;

    /// Cancel any utterance in progress.
    fn cancel(&self);
}
