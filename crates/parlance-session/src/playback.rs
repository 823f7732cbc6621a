//! Recorded-audio playback controller.
//!
//! Replays the current artifact through a [`Locator`] scoped to exactly one
//! playback. The controller only ever holds a `Weak` to the artifact; once
//! the session drops its copy (a new recording started), playback reports
//! `NoRecording` instead of resurrecting stale audio.

use std::sync::{Arc, Weak};

use parlance_core::{
    AudioArtifact, AudioPlayerPort, LocatorId, PlaybackError, PlaybackState, SessionEvent,
};

use crate::error::SessionError;
use crate::signal::{Completion, CompletionTx, EventTx, complete, emit};

/// A registered payload handle, revoked exactly once when dropped.
pub struct Locator {
    id: LocatorId,
    player: Arc<dyn AudioPlayerPort>,
}

impl Locator {
    fn create(
        player: &Arc<dyn AudioPlayerPort>,
        artifact: &AudioArtifact,
    ) -> Result<Self, PlaybackError> {
        let id = player.create_locator(artifact)?;
        tracing::debug!(%id, "Locator created");
        Ok(Self {
            id,
            player: Arc::clone(player),
        })
    }

    pub const fn id(&self) -> LocatorId {
        self.id
    }
}

impl Drop for Locator {
    fn drop(&mut self) {
        self.player.revoke_locator(self.id);
        tracing::debug!(id = %self.id, "Locator revoked");
    }
}

/// What applying a playback completion did.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PlaybackUpdate {
    Ignored,
    Ended,
    Failed(SessionError),
}

pub struct RecordedPlayback {
    player: Arc<dyn AudioPlayerPort>,
    state: PlaybackState,
    artifact: Weak<AudioArtifact>,
    locator: Option<Locator>,
    /// Bumped on every start and stop; end events from older epochs are ignored.
    epoch: u64,
    completions: CompletionTx,
    events: EventTx,
}

impl RecordedPlayback {
    pub(crate) fn new(
        player: Arc<dyn AudioPlayerPort>,
        completions: CompletionTx,
        events: EventTx,
    ) -> Self {
        Self {
            player,
            state: PlaybackState::Idle,
            artifact: Weak::new(),
            locator: None,
            epoch: 0,
            completions,
            events,
        }
    }

    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Id of the outstanding locator, if a playback is running.
    pub fn locator_id(&self) -> Option<LocatorId> {
        self.locator.as_ref().map(Locator::id)
    }

    /// Point the controller at a new artifact, stopping any playback of the old one.
    pub(crate) fn bind(&mut self, artifact: &Arc<AudioArtifact>) {
        self.stop();
        self.artifact = Arc::downgrade(artifact);
    }

    /// Forget the artifact, stopping any playback of it.
    pub(crate) fn unbind(&mut self) {
        self.stop();
        self.artifact = Weak::new();
    }

    /// Play the bound artifact from the start.
    pub(crate) fn play(&mut self) -> Result<(), SessionError> {
        let Some(artifact) = self.artifact.upgrade() else {
            return Err(SessionError::NoRecording);
        };
        // Replay never reuses the previous locator.
        self.stop();

        let locator = Locator::create(&self.player, &artifact)
            .map_err(|e| SessionError::PlaybackFailure(e.to_string()))?;
        let id = locator.id();
        self.locator = Some(locator);
        self.epoch += 1;
        self.set_state(PlaybackState::Playing);

        let player = Arc::clone(&self.player);
        let tx = self.completions.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let result = player.play(id).await;
            complete(&tx, Completion::PlaybackEnded { epoch, result });
        });

        Ok(())
    }

    /// Apply the end of a playback.
    pub(crate) fn apply_ended(
        &mut self,
        epoch: u64,
        result: Result<(), PlaybackError>,
    ) -> PlaybackUpdate {
        if epoch != self.epoch || self.state != PlaybackState::Playing {
            return PlaybackUpdate::Ignored;
        }
        self.locator = None;
        self.set_state(PlaybackState::Idle);
        match result {
            Ok(()) => PlaybackUpdate::Ended,
            Err(e) => {
                tracing::warn!(error = %e, "Recorded playback failed");
                PlaybackUpdate::Failed(SessionError::PlaybackFailure(e.to_string()))
            }
        }
    }

    /// Stop playback and revoke the locator. No-op when idle.
    pub(crate) fn stop(&mut self) {
        if let Some(locator) = self.locator.take() {
            self.player.stop(locator.id());
            self.epoch += 1;
        }
        self.set_state(PlaybackState::Idle);
    }

    fn set_state(&mut self, new_state: PlaybackState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "Playback state transition");
            self.state = new_state;
            emit(&self.events, SessionEvent::PlaybackChanged { state: new_state });
        }
    }
}
