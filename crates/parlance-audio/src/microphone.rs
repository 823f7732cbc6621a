//! `MicrophonePort` implementation backed by the audio thread.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parlance_core::{CaptureError, CaptureStream, MicrophonePort, WAV_CONTENT_TYPE};
use tokio::sync::mpsc;

use crate::audio_thread::AudioThreadHandle;
use crate::capture::CAPTURE_SAMPLE_RATE;
use crate::error::AudioError;
use crate::wav::encode_wav;

/// Default-input-device microphone.
pub struct CpalMicrophone {
    audio: Arc<AudioThreadHandle>,
}

impl CpalMicrophone {
    pub const fn new(audio: Arc<AudioThreadHandle>) -> Self {
        Self { audio }
    }
}

#[async_trait]
impl MicrophonePort for CpalMicrophone {
    async fn request_stream(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
        let audio = Arc::clone(&self.audio);
        tokio::task::spawn_blocking(move || audio.open_capture())
            .await
            .map_err(|_| AudioError::AudioThreadDied)??;

        Ok(Box::new(CpalCaptureStream {
            audio: Arc::clone(&self.audio),
            chunks: None,
            released: false,
        }))
    }
}

/// A held microphone. Delivers the whole take as one WAV chunk on finish.
pub struct CpalCaptureStream {
    audio: Arc<AudioThreadHandle>,
    chunks: Option<mpsc::UnboundedSender<Bytes>>,
    released: bool,
}

#[async_trait]
impl CaptureStream for CpalCaptureStream {
    fn content_type(&self) -> &str {
        WAV_CONTENT_TYPE
    }

    fn start(&mut self, chunks: mpsc::UnboundedSender<Bytes>) -> Result<(), CaptureError> {
        if self.released {
            return Err(AudioError::CaptureNotOpen.into());
        }
        self.audio.start_capture()?;
        self.chunks = Some(chunks);
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), CaptureError> {
        let Some(chunks) = self.chunks.take() else {
            return Err(AudioError::CaptureNotOpen.into());
        };

        let audio = Arc::clone(&self.audio);
        let samples = tokio::task::spawn_blocking(move || audio.stop_capture())
            .await
            .map_err(|_| AudioError::AudioThreadDied)??;

        tracing::debug!(samples = samples.len(), "Encoding take");
        if samples.is_empty() {
            return Ok(());
        }

        let wav = encode_wav(&samples, CAPTURE_SAMPLE_RATE)?;
        // A closed receiver means the take was abandoned.
        let _ = chunks.send(Bytes::from(wav));
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.chunks = None;
        self.audio.release_capture();
    }
}

impl Drop for CpalCaptureStream {
    fn drop(&mut self) {
        self.release();
    }
}
