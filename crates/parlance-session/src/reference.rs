//! Reference playback controller. Speaks the target text.

use std::sync::Arc;

use parlance_core::{
    Activity, ReferenceState, SessionEvent, SpeechSynthesizerPort, SynthesisError, SynthesisEvent,
};

use crate::error::{ENTER_TEXT_MESSAGE, SessionError};
use crate::signal::{Completion, CompletionTx, EventTx, complete, emit};

/// What applying a speech completion did.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ReferenceUpdate {
    Ignored,
    Started,
    Finished,
    Failed(SessionError),
}

pub struct ReferencePlayback {
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    state: ReferenceState,
    utterance: u64,
    /// Text of the utterance in progress.
    text: Option<String>,
    completions: CompletionTx,
    events: EventTx,
}

impl ReferencePlayback {
    pub(crate) fn new(
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        completions: CompletionTx,
        events: EventTx,
    ) -> Self {
        Self {
            synthesizer,
            state: ReferenceState::Idle,
            utterance: 0,
            text: None,
            completions,
            events,
        }
    }

    pub const fn state(&self) -> ReferenceState {
        self.state
    }

    /// The text currently being spoken.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Start speaking `text`.
    pub(crate) fn speak(&mut self, text: &str) -> Result<(), SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput(ENTER_TEXT_MESSAGE.to_string()));
        }
        if self.state == ReferenceState::Speaking {
            return Err(SessionError::Busy(Activity::Speaking));
        }

        self.utterance += 1;
        self.text = Some(text.to_string());
        self.set_state(ReferenceState::Speaking);

        let mut stream = self.synthesizer.speak(text);
        let tx = self.completions.clone();
        let utterance = self.utterance;
        tokio::spawn(async move {
            while let Some(event) = stream.recv().await {
                let terminal = event.is_terminal();
                complete(&tx, Completion::Speech { utterance, event });
                if terminal {
                    return;
                }
            }
            // Stream closed without an end event.
            complete(
                &tx,
                Completion::Speech {
                    utterance,
                    event: SynthesisEvent::Failed {
                        error: SynthesisError::Failed("speech stream ended unexpectedly".into()),
                    },
                },
            );
        });

        Ok(())
    }

    /// Apply one utterance event.
    pub(crate) fn apply(&mut self, utterance: u64, event: SynthesisEvent) -> ReferenceUpdate {
        if utterance != self.utterance || self.state != ReferenceState::Speaking {
            return ReferenceUpdate::Ignored;
        }
        match event {
            SynthesisEvent::Started => {
                tracing::debug!(utterance, "Reference speech started");
                ReferenceUpdate::Started
            }
            SynthesisEvent::Finished => {
                self.finish();
                ReferenceUpdate::Finished
            }
            SynthesisEvent::Failed { error } => {
                tracing::warn!(%error, "Reference speech failed");
                self.finish();
                ReferenceUpdate::Failed(SessionError::SynthesisFailure(error.to_string()))
            }
        }
    }

    /// Cancel the utterance in progress, if any.
    pub(crate) fn cancel(&mut self) {
        if self.state == ReferenceState::Speaking {
            self.synthesizer.cancel();
            self.utterance += 1;
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.text = None;
        self.set_state(ReferenceState::Idle);
    }

    fn set_state(&mut self, new_state: ReferenceState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "Reference state transition");
            self.state = new_state;
            emit(&self.events, SessionEvent::ReferenceChanged { state: new_state });
        }
    }
}
