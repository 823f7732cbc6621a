//! Recording controller: microphone acquisition and capture lifecycle.
//!
//! ```text
//!   Idle/Stopped/Error → Acquiring → Recording ─stop─▶ (finalizing) → Stopped
//!                           │                                 └──────▶ Error (no audio)
//!                           └── denied/unavailable ──▶ Stopped (previous take held) / Idle
//! ```
//!
//! A previous take survives until the new stream is actually capturing.
//!
//! The controller exclusively owns the capture stream from acquisition to
//! stop. The stream sits in a [`StreamGuard`] that releases it on drop, so
//! every exit path (stop, failure, teardown, dropping the controller) gives
//! the hardware back.

use std::sync::Arc;

use bytes::Bytes;
use parlance_core::{
    Activity, AudioArtifact, CaptureError, CaptureStream, MicrophonePort, RecordingState,
    SessionEvent,
};
use tokio::sync::mpsc;

use crate::error::SessionError;
use crate::signal::{Completion, CompletionTx, EventTx, complete, emit};

/// Callback invoked once per successful stop with the new artifact.
pub type StopCallback = Box<dyn FnMut(&Arc<AudioArtifact>) + Send + 'static>;

/// What applying a recording completion did.
#[derive(Debug)]
pub(crate) enum RecordingUpdate {
    /// The completion belonged to an abandoned attempt.
    Ignored,
    /// Acquisition succeeded and capture is running.
    Started,
    /// Acquisition or finalization failed.
    Failed(SessionError),
    /// A new artifact was produced.
    Finished(Arc<AudioArtifact>),
}

/// Owns a capture stream and releases it exactly once.
struct StreamGuard {
    stream: Option<Box<dyn CaptureStream>>,
}

impl StreamGuard {
    fn new(stream: Box<dyn CaptureStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    fn stream_mut(&mut self) -> Option<&mut Box<dyn CaptureStream>> {
        self.stream.as_mut()
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            tracing::debug!("Capture stream released");
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Single recording controller shared by every practice flow.
pub struct RecordingController {
    microphone: Arc<dyn MicrophonePort>,
    state: RecordingState,

    /// Generation counter; completions from older attempts are ignored.
    attempt: u64,

    stream: Option<StreamGuard>,
    chunks: Option<mpsc::UnboundedReceiver<Bytes>>,
    content_type: String,

    /// `stop()` was accepted and finalization is running.
    finalizing: bool,

    artifact: Option<Arc<AudioArtifact>>,
    on_stop: Option<StopCallback>,

    completions: CompletionTx,
    events: EventTx,
}

impl RecordingController {
    pub(crate) fn new(
        microphone: Arc<dyn MicrophonePort>,
        completions: CompletionTx,
        events: EventTx,
    ) -> Self {
        Self {
            microphone,
            state: RecordingState::Idle,
            attempt: 0,
            stream: None,
            chunks: None,
            content_type: String::new(),
            finalizing: false,
            artifact: None,
            on_stop: None,
            completions,
            events,
        }
    }

    /// Current controller state.
    pub const fn state(&self) -> RecordingState {
        self.state
    }

    /// The artifact produced by the last stop, if still held.
    pub fn artifact(&self) -> Option<&Arc<AudioArtifact>> {
        self.artifact.as_ref()
    }

    /// Whether a stop was accepted and the take is being finalized.
    pub const fn is_finalizing(&self) -> bool {
        self.finalizing
    }

    /// Register the callback fired with each new artifact.
    pub(crate) fn set_on_stop(&mut self, callback: StopCallback) {
        self.on_stop = Some(callback);
    }

    /// Request the microphone and begin a new take.
    ///
    /// A previously held artifact is kept until capture starts.
    pub(crate) fn start(&mut self) -> Result<(), SessionError> {
        if matches!(
            self.state,
            RecordingState::Acquiring | RecordingState::Recording
        ) {
            return Err(SessionError::Busy(Activity::Recording));
        }

        self.attempt += 1;
        self.set_state(RecordingState::Acquiring);

        let microphone = Arc::clone(&self.microphone);
        let tx = self.completions.clone();
        let attempt = self.attempt;
        tokio::spawn(async move {
            let result = microphone.request_stream().await;
            complete(&tx, Completion::StreamAcquired { attempt, result });
        });

        Ok(())
    }

    /// Apply the outcome of a microphone request.
    pub(crate) fn apply_acquired(
        &mut self,
        attempt: u64,
        result: Result<Box<dyn CaptureStream>, CaptureError>,
    ) -> RecordingUpdate {
        if attempt != self.attempt || self.state != RecordingState::Acquiring {
            // Granted after teardown: give it straight back.
            if let Ok(stream) = result {
                drop(StreamGuard::new(stream));
                tracing::debug!(attempt, "Released capture stream acquired after teardown");
            }
            return RecordingUpdate::Ignored;
        }

        let stream = match result {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "Microphone acquisition failed");
                self.settle();
                return RecordingUpdate::Failed(e.into());
            }
        };

        let mut guard = StreamGuard::new(stream);
        let (tx, rx) = mpsc::unbounded_channel();
        let started = match guard.stream_mut() {
            Some(stream) => {
                self.content_type = stream.content_type().to_string();
                stream.start(tx)
            }
            None => Err(CaptureError::Stream("stream already released".to_string())),
        };
        if let Err(e) = started {
            tracing::warn!(error = %e, "Capture stream failed to start");
            drop(guard);
            self.settle();
            return RecordingUpdate::Failed(e.into());
        }

        self.artifact = None;
        self.stream = Some(guard);
        self.chunks = Some(rx);
        self.set_state(RecordingState::Recording);
        RecordingUpdate::Started
    }

    /// Stop capturing and finalize the take.
    ///
    /// Valid only while recording; a no-op otherwise. Returns whether
    /// finalization was started.
    pub(crate) fn stop(&mut self) -> bool {
        if self.state != RecordingState::Recording || self.finalizing {
            return false;
        }
        let Some(mut guard) = self.stream.take() else {
            return false;
        };
        self.finalizing = true;

        let tx = self.completions.clone();
        let attempt = self.attempt;
        tokio::spawn(async move {
            let result = match guard.stream_mut() {
                Some(stream) => stream.finish().await,
                None => Ok(()),
            };
            // Released whether or not finish succeeded.
            guard.release();
            complete(&tx, Completion::CaptureFinished { attempt, result });
        });

        true
    }

    /// Apply the outcome of finalization.
    pub(crate) fn apply_finished(
        &mut self,
        attempt: u64,
        result: Result<(), CaptureError>,
    ) -> RecordingUpdate {
        if attempt != self.attempt || !self.finalizing {
            return RecordingUpdate::Ignored;
        }
        self.finalizing = false;

        let mut chunks = Vec::new();
        if let Some(mut rx) = self.chunks.take() {
            rx.close();
            while let Ok(chunk) = rx.try_recv() {
                chunks.push(chunk);
            }
        }

        if let Err(e) = result {
            tracing::warn!(error = %e, "Capture finalization failed");
            self.set_state(RecordingState::Error);
            return RecordingUpdate::Failed(e.into());
        }

        let Some(artifact) = AudioArtifact::from_chunks(chunks, self.content_type.as_str()) else {
            tracing::warn!("Capture produced no audio");
            self.set_state(RecordingState::Error);
            return RecordingUpdate::Failed(SessionError::EmptyRecording);
        };

        let artifact = Arc::new(artifact);
        tracing::info!(
            bytes = artifact.len(),
            content_type = artifact.content_type(),
            "Recording finalized"
        );
        self.artifact = Some(Arc::clone(&artifact));
        self.set_state(RecordingState::Stopped);
        if let Some(on_stop) = self.on_stop.as_mut() {
            on_stop(&artifact);
        }
        RecordingUpdate::Finished(artifact)
    }

    /// Abandon a pending acquisition, keeping any previously held artifact.
    ///
    /// A stream granted afterwards is released as soon as it arrives.
    pub(crate) fn abandon(&mut self) {
        if self.state != RecordingState::Acquiring {
            return;
        }
        self.attempt += 1;
        self.settle();
    }

    /// Abandon any attempt in progress, release the stream, and drop the artifact.
    pub(crate) fn release(&mut self) {
        self.attempt += 1;
        self.finalizing = false;
        self.chunks = None;
        if let Some(mut guard) = self.stream.take() {
            guard.release();
        }
        self.artifact = None;
        self.set_state(RecordingState::Idle);
    }

    /// Resting state after a take that never started.
    fn settle(&mut self) {
        let resting = if self.artifact.is_some() {
            RecordingState::Stopped
        } else {
            RecordingState::Idle
        };
        self.set_state(resting);
    }

    fn set_state(&mut self, new_state: RecordingState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "Recording state transition");
            self.state = new_state;
            emit(
                &self.events,
                SessionEvent::RecordingChanged { state: new_state },
            );
        }
    }
}
