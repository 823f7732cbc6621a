//! Dedicated audio I/O thread.
//!
//! `cpal::Stream` and `rodio::OutputStream` are `!Send` on some platforms.
//! Both live on one OS thread for their whole lifetime; the async side talks
//! to it through [`AudioThreadHandle`], a `Send + Sync` proxy that routes
//! every call through an [`AudioCommand`].
//!
//! Devices are opened lazily: spawning the thread touches no hardware, the
//! microphone is opened on [`AudioThreadHandle::open_capture`] and the output
//! device on the first [`AudioThreadHandle::play`].

use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::thread;

use bytes::Bytes;

use crate::capture::AudioCapture;
use crate::error::AudioError;
use crate::playback::{AudioPlayback, PlaybackCancel, PlaybackDone};

// ── Commands ───────────────────────────────────────────────────────

enum AudioCommand {
    /// Acquire the default input device.
    OpenCapture {
        reply: mpsc::Sender<Result<(), AudioError>>,
    },

    /// Begin recording on the opened device.
    StartCapture {
        reply: mpsc::Sender<Result<(), AudioError>>,
    },

    /// Stop recording and return the 16 kHz mono take.
    StopCapture {
        reply: mpsc::Sender<Result<Vec<f32>, AudioError>>,
    },

    /// Drop the input device (fire-and-forget).
    ReleaseCapture,

    /// Decode and play a payload, replacing any current sound.
    /// Skipped when `cancelled` is already set.
    Play {
        payload: Bytes,
        cancelled: PlaybackCancel,
        done: PlaybackDone,
        reply: mpsc::Sender<Result<(), AudioError>>,
    },

    /// Stop any active playback (fire-and-forget).
    StopPlayback,

    Shutdown,
}

// ── Handle ─────────────────────────────────────────────────────────

/// `Send + Sync` handle to the dedicated audio I/O thread.
///
/// Request–reply methods block the caller until the audio thread answers;
/// call them from `spawn_blocking` when on the async runtime.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread.
    pub fn spawn() -> Result<Self, AudioError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();

        let thread = thread::Builder::new()
            .name("parlance-audio".into())
            .spawn(move || Self::run(&cmd_rx))
            .map_err(|e| {
                AudioError::InputStreamError(format!("failed to spawn audio thread: {e}"))
            })?;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    // ── Capture ────────────────────────────────────────────────────

    /// Acquire the microphone. Fails if it is already held.
    pub fn open_capture(&self) -> Result<(), AudioError> {
        self.send_and_recv(|reply| AudioCommand::OpenCapture { reply })
    }

    pub fn start_capture(&self) -> Result<(), AudioError> {
        self.send_and_recv(|reply| AudioCommand::StartCapture { reply })
    }

    /// Stop recording and return captured 16 kHz mono PCM samples.
    pub fn stop_capture(&self) -> Result<Vec<f32>, AudioError> {
        self.send_and_recv(|reply| AudioCommand::StopCapture { reply })
    }

    /// Release the microphone. Safe to call when nothing is held.
    pub fn release_capture(&self) {
        let _ = self.cmd_tx.send(AudioCommand::ReleaseCapture);
    }

    // ── Playback ───────────────────────────────────────────────────

    /// Start playing `payload`; `done` resolves when it ends or is stopped.
    ///
    /// If `cancelled` is set by the time the audio thread picks the command
    /// up, nothing is played and `done` resolves at once. A stop that sets the
    /// flag later is ordered after this command by [`Self::stop_playback`].
    pub fn play(
        &self,
        payload: Bytes,
        cancelled: PlaybackCancel,
        done: PlaybackDone,
    ) -> Result<(), AudioError> {
        self.send_and_recv(|reply| AudioCommand::Play {
            payload,
            cancelled,
            done,
            reply,
        })
    }

    pub fn stop_playback(&self) {
        let _ = self.cmd_tx.send(AudioCommand::StopPlayback);
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Send a command and block on its reply. Channel failures map to
    /// [`AudioError::AudioThreadDied`].
    fn send_and_recv<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<Result<T, AudioError>>) -> AudioCommand,
    ) -> Result<T, AudioError> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| AudioError::AudioThreadDied)?;
        rx.recv().map_err(|_| AudioError::AudioThreadDied)?
    }

    // ── Audio thread event loop ────────────────────────────────────

    fn run(cmd_rx: &mpsc::Receiver<AudioCommand>) {
        let mut capture: Option<AudioCapture> = None;
        let mut playback: Option<AudioPlayback> = None;

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::OpenCapture { reply } => {
                    let result = if capture.is_some() {
                        Err(AudioError::InputStreamError(
                            "microphone is already in use".to_string(),
                        ))
                    } else {
                        AudioCapture::open().map(|opened| capture = Some(opened))
                    };
                    let _ = reply.send(result);
                }

                AudioCommand::StartCapture { reply } => {
                    let result = capture
                        .as_mut()
                        .ok_or(AudioError::CaptureNotOpen)
                        .and_then(AudioCapture::start_recording);
                    let _ = reply.send(result);
                }

                AudioCommand::StopCapture { reply } => {
                    let result = capture
                        .as_mut()
                        .ok_or(AudioError::CaptureNotOpen)
                        .and_then(AudioCapture::stop_recording);
                    let _ = reply.send(result);
                }

                AudioCommand::ReleaseCapture => {
                    if capture.take().is_some() {
                        tracing::debug!("Microphone released");
                    }
                }

                AudioCommand::Play {
                    payload,
                    cancelled,
                    done,
                    reply,
                } => {
                    if cancelled.load(Ordering::SeqCst) {
                        tracing::debug!("Skipping playback stopped before it started");
                        let _ = done.send(Ok(()));
                        let _ = reply.send(Ok(()));
                        continue;
                    }
                    if playback.is_none() {
                        match AudioPlayback::new() {
                            Ok(opened) => playback = Some(opened),
                            Err(e) => {
                                let _ = reply.send(Err(e));
                                continue;
                            }
                        }
                    }
                    let result = playback
                        .as_mut()
                        .ok_or(AudioError::AudioThreadDied)
                        .and_then(|p| p.play(payload, done));
                    let _ = reply.send(result);
                }

                AudioCommand::StopPlayback => {
                    if let Some(p) = playback.as_mut() {
                        p.stop();
                    }
                }

                AudioCommand::Shutdown => break,
            }
        }

        // `capture` and `playback` are dropped here, on the audio thread.
        tracing::debug!("Audio thread shutting down");
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_touches_no_device() {
        let handle = AudioThreadHandle::spawn().unwrap();
        handle.release_capture();
        handle.stop_playback();
    }

    #[tokio::test]
    async fn test_cancelled_play_is_skipped() {
        let handle = AudioThreadHandle::spawn().unwrap();
        let cancelled = PlaybackCancel::default();
        cancelled.store(true, Ordering::SeqCst);
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();

        // Not a decodable payload: reaching the decoder would fail.
        handle
            .play(Bytes::from_static(b"not audio"), cancelled, done_tx)
            .unwrap();
        assert!(done_rx.await.unwrap().is_ok());
    }

    #[test]
    fn test_capture_requires_open() {
        let handle = AudioThreadHandle::spawn().unwrap();
        assert!(matches!(
            handle.start_capture(),
            Err(AudioError::CaptureNotOpen)
        ));
        assert!(matches!(
            handle.stop_capture(),
            Err(AudioError::CaptureNotOpen)
        ));
    }
}
