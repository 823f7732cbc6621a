//! Completion plumbing between spawned tasks and the session.
//!
//! Every asynchronous step (acquisition, finalization, speech, playback,
//! network) runs in its own task and reports back with a [`Completion`].
//! Only the session applies completions, so controller state is never
//! touched from two places at once.

use parlance_core::{
    CaptureError, CaptureStream, EvaluationError, EvaluationResult, PlaybackError,
    SessionEvent, SynthesisEvent,
};
use tokio::sync::mpsc;

/// Result of one asynchronous step, tagged with the generation it belongs to.
pub(crate) enum Completion {
    /// `MicrophonePort::request_stream` resolved.
    StreamAcquired {
        attempt: u64,
        result: Result<Box<dyn CaptureStream>, CaptureError>,
    },

    /// `CaptureStream::finish` resolved and the stream was released.
    CaptureFinished {
        attempt: u64,
        result: Result<(), CaptureError>,
    },

    /// An utterance reported progress.
    Speech { utterance: u64, event: SynthesisEvent },

    /// A recorded-audio playback ended.
    PlaybackEnded {
        epoch: u64,
        result: Result<(), PlaybackError>,
    },

    /// An evaluation request resolved.
    EvaluationFinished {
        token: u64,
        result: Result<EvaluationResult, EvaluationError>,
    },
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StreamAcquired { attempt, result } => f
                .debug_struct("StreamAcquired")
                .field("attempt", attempt)
                .field("ok", &result.is_ok())
                .finish(),
            Self::CaptureFinished { attempt, result } => f
                .debug_struct("CaptureFinished")
                .field("attempt", attempt)
                .field("result", result)
                .finish(),
            Self::Speech { utterance, event } => f
                .debug_struct("Speech")
                .field("utterance", utterance)
                .field("event", event)
                .finish(),
            Self::PlaybackEnded { epoch, result } => f
                .debug_struct("PlaybackEnded")
                .field("epoch", epoch)
                .field("result", result)
                .finish(),
            Self::EvaluationFinished { token, result } => f
                .debug_struct("EvaluationFinished")
                .field("token", token)
                .field("ok", &result.is_ok())
                .finish(),
        }
    }
}

pub(crate) type CompletionTx = mpsc::UnboundedSender<Completion>;
pub(crate) type EventTx = mpsc::UnboundedSender<SessionEvent>;

/// Report a completion (best-effort; the session may already be gone).
pub(crate) fn complete(tx: &CompletionTx, completion: Completion) {
    if tx.send(completion).is_err() {
        tracing::debug!("Session dropped before completion arrived");
    }
}

/// Emit a session event (best-effort).
pub(crate) fn emit(tx: &EventTx, event: SessionEvent) {
    if tx.send(event).is_err() {
        tracing::warn!("Session event receiver dropped");
    }
}
