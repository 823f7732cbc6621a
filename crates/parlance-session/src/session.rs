//! Practice session view model.
//!
//! ```text
//!   Idle ──start──▶ Recording ──stop──▶ Stopped ──evaluate──▶ Loading ──ok──▶ Result
//!    ▲                  │                 ▲  ▲                   │              │
//!    └──── failed ──────┘                 │  └───── failure ─────┘              │
//!                                         └──────────── start-recording ◀───────┘
//! ```
//!
//! All operations are synchronous and return immediately; the asynchronous
//! work they start reports back through [`PracticeSession::pump`]. Only the
//! caller's task ever mutates the session.

use std::sync::Arc;

use parlance_core::{
    Activity, AudioArtifact, AudioPlayerPort, Challenge, EvaluationContext, EvaluationResult,
    EvaluatorPort, MicrophonePort, Outcome, PlaybackState, ProgressSink, RecordingState,
    ReferenceState, SessionEvent, SessionState, SpeechSynthesizerPort, UserId,
};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::SessionError;
use crate::playback::{PlaybackUpdate, RecordedPlayback};
use crate::recording::{RecordingController, RecordingUpdate};
use crate::reference::{ReferencePlayback, ReferenceUpdate};
use crate::signal::{Completion, EventTx, emit};
use crate::submission::{SubmissionController, SubmissionUpdate};

/// Which practice flow a session runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PracticeFlow {
    /// Free practice of user-supplied text.
    FreePractice { target_text: String },
    /// A catalog challenge; the word is fixed.
    Challenge { challenge: Challenge },
}

impl PracticeFlow {
    pub fn free_practice(target_text: impl Into<String>) -> Self {
        Self::FreePractice {
            target_text: target_text.into(),
        }
    }

    /// Text spoken by the reference playback.
    pub fn reference_text(&self) -> &str {
        match self {
            Self::FreePractice { target_text } => target_text,
            Self::Challenge { challenge } => &challenge.word,
        }
    }

    /// What the evaluator is told about this flow.
    pub fn context(&self) -> EvaluationContext {
        match self {
            Self::FreePractice { target_text } => EvaluationContext::TargetText {
                target_text: target_text.trim().to_string(),
            },
            Self::Challenge { challenge } => EvaluationContext::Challenge {
                challenge_id: challenge.id,
            },
        }
    }
}

/// The injected ports a session runs against.
#[derive(Clone)]
pub struct SessionPorts {
    pub microphone: Arc<dyn MicrophonePort>,
    pub synthesizer: Arc<dyn SpeechSynthesizerPort>,
    pub player: Arc<dyn AudioPlayerPort>,
    pub evaluator: Arc<dyn EvaluatorPort>,
    pub progress: Arc<dyn ProgressSink>,
}

/// Snapshot of everything a front end renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub state: SessionState,
    pub flow: PracticeFlow,
    pub has_recording: bool,
    pub result: Option<EvaluationResult>,
    pub outcome: Option<Outcome>,
    pub message: Option<String>,
    pub recording: RecordingState,
    pub reference: ReferenceState,
    pub playback: PlaybackState,
}

pub struct PracticeSession {
    flow: PracticeFlow,
    user_id: Option<UserId>,
    state: SessionState,

    recorder: RecordingController,
    reference: ReferencePlayback,
    playback: RecordedPlayback,
    submission: SubmissionController,
    progress: Arc<dyn ProgressSink>,

    result: Option<EvaluationResult>,
    /// Last user-visible message.
    message: Option<String>,

    completions: mpsc::UnboundedReceiver<Completion>,
    events: EventTx,
}

impl PracticeSession {
    /// Create a session and the receiver for its events.
    pub fn new(
        flow: PracticeFlow,
        ports: SessionPorts,
        user_id: Option<UserId>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let (events, event_rx) = mpsc::unbounded_channel();

        let session = Self {
            flow,
            user_id,
            state: SessionState::Idle,
            recorder: RecordingController::new(
                ports.microphone,
                completion_tx.clone(),
                events.clone(),
            ),
            reference: ReferencePlayback::new(
                ports.synthesizer,
                completion_tx.clone(),
                events.clone(),
            ),
            playback: RecordedPlayback::new(ports.player, completion_tx.clone(), events.clone()),
            submission: SubmissionController::new(ports.evaluator, completion_tx),
            progress: ports.progress,
            result: None,
            message: None,
            completions,
            events,
        };
        (session, event_rx)
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn flow(&self) -> &PracticeFlow {
        &self.flow
    }

    /// The recording currently held, if any.
    pub fn artifact(&self) -> Option<&Arc<AudioArtifact>> {
        self.recorder.artifact()
    }

    pub const fn result(&self) -> Option<&EvaluationResult> {
        self.result.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub const fn recording_state(&self) -> RecordingState {
        self.recorder.state()
    }

    pub const fn reference_state(&self) -> ReferenceState {
        self.reference.state()
    }

    pub const fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Token of the most recent evaluation request.
    pub const fn submission_token(&self) -> u64 {
        self.submission.token()
    }

    pub fn set_user_id(&mut self, user_id: Option<UserId>) {
        self.user_id = user_id;
    }

    /// Register a callback fired once per finished recording.
    pub fn on_recording_stopped(
        &mut self,
        callback: impl FnMut(&Arc<AudioArtifact>) + Send + 'static,
    ) {
        self.recorder.set_on_stop(Box::new(callback));
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            state: self.state,
            flow: self.flow.clone(),
            has_recording: self.recorder.artifact().is_some(),
            result: self.result.clone(),
            outcome: self.result.as_ref().map(EvaluationResult::outcome),
            message: self.message.clone(),
            recording: self.recorder.state(),
            reference: self.reference.state(),
            playback: self.playback.state(),
        }
    }

    // ── Operations ─────────────────────────────────────────────────────

    /// Replace the free-practice text.
    pub fn set_target_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Recording | SessionState::Loading) {
            return Err(SessionError::InvalidTransition {
                action: "change the practice text",
                state: self.state,
            });
        }
        match &mut self.flow {
            PracticeFlow::FreePractice { target_text } => {
                *target_text = text.into();
                Ok(())
            }
            PracticeFlow::Challenge { .. } => Err(SessionError::InvalidTransition {
                action: "change the practice text of a challenge",
                state: self.state,
            }),
        }
    }

    /// Begin a new take.
    ///
    /// The held recording and result are discarded only once the microphone
    /// is capturing; a denied or abandoned request leaves them in place.
    pub fn start_recording(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Recording => return Err(SessionError::Busy(Activity::Recording)),
            SessionState::Loading => return Err(SessionError::Busy(Activity::Evaluating)),
            SessionState::Idle | SessionState::Stopped | SessionState::Result => {}
        }
        self.ensure_no_playback()?;

        self.recorder.start()?;
        self.message = None;
        self.set_state(SessionState::Recording);
        Ok(())
    }

    /// Stop the current take. A no-op unless recording.
    pub fn stop_recording(&mut self) {
        if self.state != SessionState::Recording {
            tracing::debug!(state = %self.state, "Ignoring stop outside recording");
            return;
        }
        match self.recorder.state() {
            RecordingState::Acquiring => {
                // Stopped before the microphone was granted.
                self.recorder.abandon();
                self.settle();
            }
            RecordingState::Recording => {
                self.recorder.stop();
            }
            _ => {}
        }
    }

    /// Submit the held recording. Returns the submission token.
    pub fn evaluate(&mut self) -> Result<u64, SessionError> {
        match self.state {
            SessionState::Loading => return Err(SessionError::Busy(Activity::Evaluating)),
            SessionState::Recording => return Err(SessionError::Busy(Activity::Recording)),
            SessionState::Result => {
                return Err(SessionError::InvalidTransition {
                    action: "evaluate",
                    state: self.state,
                });
            }
            SessionState::Idle | SessionState::Stopped => {}
        }
        self.ensure_no_playback()?;

        let token = self.submission.submit(
            self.recorder.artifact(),
            self.flow.context(),
            self.user_id.as_ref(),
        )?;
        self.message = None;
        self.set_state(SessionState::Loading);
        Ok(token)
    }

    /// Speak the reference text.
    pub fn play_reference(&mut self) -> Result<(), SessionError> {
        self.ensure_playback_allowed()?;
        if self.playback.state() == PlaybackState::Playing {
            return Err(SessionError::Busy(Activity::Playing));
        }
        self.reference.speak(self.flow.reference_text())
    }

    pub fn stop_reference(&mut self) {
        self.reference.cancel();
    }

    /// Play the held recording from the start.
    pub fn play_recording(&mut self) -> Result<(), SessionError> {
        self.ensure_playback_allowed()?;
        if self.reference.state() == ReferenceState::Speaking {
            return Err(SessionError::Busy(Activity::Speaking));
        }
        self.playback.play()
    }

    pub fn stop_playback(&mut self) {
        self.playback.stop();
    }

    /// Return to Idle, abandoning every activity.
    pub fn reset(&mut self) {
        self.reference.cancel();
        self.playback.unbind();
        self.recorder.release();
        self.submission.invalidate();
        self.result = None;
        self.message = None;
        self.set_state(SessionState::Idle);
        tracing::info!("Session reset");
    }

    // ── Completions ────────────────────────────────────────────────────

    /// Wait for the next completion and apply it.
    ///
    /// Cancel-safe: if the future is dropped before a completion arrives,
    /// nothing is lost. Returns `false` if no completion can ever arrive.
    pub async fn pump(&mut self) -> bool {
        match self.completions.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Apply every completion that is already available. Returns how many.
    pub fn try_pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, completion: Completion) {
        tracing::trace!(?completion, "Applying completion");
        match completion {
            Completion::StreamAcquired { attempt, result } => {
                match self.recorder.apply_acquired(attempt, result) {
                    RecordingUpdate::Started => {
                        self.playback.unbind();
                        self.submission.invalidate();
                        self.result = None;
                    }
                    RecordingUpdate::Failed(e) => {
                        self.settle();
                        self.notify(&e);
                    }
                    RecordingUpdate::Ignored | RecordingUpdate::Finished(_) => {}
                }
            }
            Completion::CaptureFinished { attempt, result } => {
                match self.recorder.apply_finished(attempt, result) {
                    RecordingUpdate::Finished(artifact) => {
                        self.playback.bind(&artifact);
                        self.set_state(SessionState::Stopped);
                    }
                    RecordingUpdate::Failed(e) => {
                        self.set_state(SessionState::Idle);
                        self.notify(&e);
                    }
                    RecordingUpdate::Started | RecordingUpdate::Ignored => {}
                }
            }
            Completion::Speech { utterance, event } => {
                if let ReferenceUpdate::Failed(e) = self.reference.apply(utterance, event) {
                    self.notify(&e);
                }
            }
            Completion::PlaybackEnded { epoch, result } => {
                if let PlaybackUpdate::Failed(e) = self.playback.apply_ended(epoch, result) {
                    self.notify(&e);
                }
            }
            Completion::EvaluationFinished { token, result } => {
                self.apply_evaluation(token, result);
            }
        }
    }

    fn apply_evaluation(
        &mut self,
        token: u64,
        result: Result<EvaluationResult, parlance_core::EvaluationError>,
    ) {
        match self.submission.apply(token, result) {
            SubmissionUpdate::Stale => {
                emit(&self.events, SessionEvent::StaleResponseDiscarded { token });
            }
            SubmissionUpdate::Evaluated { result, progress } => {
                self.progress.apply(progress);
                emit(&self.events, SessionEvent::ProgressUpdated { update: progress });

                let outcome = result.outcome();
                self.message = Some(outcome.headline().to_string());
                self.result = Some(result.clone());
                self.set_state(SessionState::Result);
                emit(
                    &self.events,
                    SessionEvent::EvaluationCompleted { result, outcome },
                );
            }
            SubmissionUpdate::Failed(e) => {
                let message = e.to_string();
                self.message = Some(message.clone());
                // The recording is kept so the user can retry.
                self.set_state(SessionState::Stopped);
                emit(&self.events, SessionEvent::EvaluationFailed { message });
            }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Resting state for whatever the session still holds.
    fn settle(&mut self) {
        let resting = if self.result.is_some() {
            SessionState::Result
        } else if self.recorder.artifact().is_some() {
            SessionState::Stopped
        } else {
            SessionState::Idle
        };
        self.set_state(resting);
    }

    fn ensure_playback_allowed(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Recording => Err(SessionError::Busy(Activity::Recording)),
            SessionState::Loading => Err(SessionError::Busy(Activity::Evaluating)),
            state => {
                debug_assert!(state.allows_playback());
                Ok(())
            }
        }
    }

    fn ensure_no_playback(&self) -> Result<(), SessionError> {
        if self.reference.state() == ReferenceState::Speaking {
            return Err(SessionError::Busy(Activity::Speaking));
        }
        if self.playback.state() == PlaybackState::Playing {
            return Err(SessionError::Busy(Activity::Playing));
        }
        Ok(())
    }

    fn notify(&mut self, err: &SessionError) {
        let message = err.to_string();
        self.message = Some(message.clone());
        emit(&self.events, SessionEvent::notice(message));
    }

    fn set_state(&mut self, new_state: SessionState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "Session state transition");
            self.state = new_state;
            emit(&self.events, SessionEvent::StateChanged { state: new_state });
        }
    }
}

impl Drop for PracticeSession {
    fn drop(&mut self) {
        // Stream and locator guards release themselves; speech must be told.
        self.reference.cancel();
    }
}

impl std::fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticeSession")
            .field("flow", &self.flow)
            .field("state", &self.state)
            .field("recording", &self.recorder.state())
            .field("reference", &self.reference.state())
            .field("playback", &self.playback.state())
            .field("loading", &self.submission.is_loading())
            .finish_non_exhaustive()
    }
}
