//! Playback of encoded payloads via `rodio`.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use bytes::Bytes;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tokio::sync::oneshot;

use crate::error::AudioError;

/// Resolved once a payload stops playing, whether it drained or was stopped.
pub type PlaybackDone = oneshot::Sender<Result<(), AudioError>>;

/// Set once a play request has been stopped or revoked.
pub type PlaybackCancel = Arc<AtomicBool>;

/// Output device handle.
///
/// Owns the rodio output stream; must stay on the thread that created it.
pub struct AudioPlayback {
    /// rodio output stream (must be kept alive).
    _stream: OutputStream,

    /// Handle used to create sinks.
    stream_handle: OutputStreamHandle,

    /// Current playback sink (if any).
    sink: Option<Arc<Sink>>,
}

impl AudioPlayback {
    /// Open the default output device.
    pub fn new() -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::OutputStreamError(e.to_string()))?;

        tracing::info!("Audio playback initialized on default output device");

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
        })
    }

    /// Decode `payload` and start playing it, replacing any current sound.
    ///
    /// `done` is resolved from a watcher thread when the sink drains or
    /// [`AudioPlayback::stop`] is called.
    pub fn play(&mut self, payload: Bytes, done: PlaybackDone) -> Result<(), AudioError> {
        self.stop();

        let source =
            Decoder::new(Cursor::new(payload)).map_err(|e| AudioError::Decode(e.to_string()))?;
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::OutputStreamError(e.to_string()))?;
        sink.append(source);

        let sink = Arc::new(sink);
        self.sink = Some(Arc::clone(&sink));
        tracing::debug!("Audio playback started");

        // `sleep_until_end` returns once the queue drains or `stop()` empties it.
        std::thread::spawn(move || {
            sink.sleep_until_end();
            let _ = done.send(Ok(()));
        });
        Ok(())
    }

    /// Stop any active playback immediately.
    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            tracing::debug!("Audio playback stopped");
        }
    }
}
