//! `AudioPlayerPort` implementation: a locator registry over the audio thread.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use parlance_core::{AudioArtifact, AudioPlayerPort, LocatorId, PlaybackError};
use tokio::sync::oneshot;

use crate::audio_thread::AudioThreadHandle;
use crate::error::AudioError;
use crate::playback::PlaybackCancel;

/// The play request currently owning the output device.
struct ActivePlay {
    id: LocatorId,
    cancelled: PlaybackCancel,
}

/// Plays registered WAV payloads on the default output device.
pub struct RodioPlayer {
    audio: Arc<AudioThreadHandle>,
    registry: Mutex<HashMap<LocatorId, Bytes>>,
    next_id: AtomicU64,
    /// Set before the audio thread is asked to play, so an early stop is seen.
    current: Mutex<Option<ActivePlay>>,
}

impl RodioPlayer {
    pub fn new(audio: Arc<AudioThreadHandle>) -> Self {
        Self {
            audio,
            registry: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            current: Mutex::new(None),
        }
    }

    /// Number of live registrations.
    pub fn registered(&self) -> usize {
        lock(&self.registry).len()
    }

    fn payload(&self, id: LocatorId) -> Result<Bytes, AudioError> {
        lock(&self.registry)
            .get(&id)
            .cloned()
            .ok_or(AudioError::UnknownLocator(id))
    }

    /// Claim the output device for `id`, cancelling any earlier request.
    fn begin(&self, id: LocatorId) -> PlaybackCancel {
        let cancelled = Arc::new(AtomicBool::new(false));
        let previous = lock(&self.current).replace(ActivePlay {
            id,
            cancelled: Arc::clone(&cancelled),
        });
        if let Some(previous) = previous {
            previous.cancelled.store(true, Ordering::SeqCst);
        }
        cancelled
    }

    /// Release the claim taken by [`Self::begin`], unless a newer one replaced it.
    fn end(&self, cancelled: &PlaybackCancel) {
        let mut current = lock(&self.current);
        if current
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(&active.cancelled, cancelled))
        {
            *current = None;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_wav(content_type: &str) -> bool {
    matches!(
        content_type.split(';').next().map(str::trim),
        Some("audio/wav" | "audio/x-wav" | "audio/wave")
    )
}

#[async_trait]
impl AudioPlayerPort for RodioPlayer {
    fn create_locator(&self, artifact: &AudioArtifact) -> Result<LocatorId, PlaybackError> {
        if !is_wav(artifact.content_type()) {
            return Err(AudioError::Decode(format!(
                "cannot play {}",
                artifact.content_type()
            ))
            .into());
        }
        let id = LocatorId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.registry).insert(id, artifact.payload().clone());
        tracing::debug!(%id, bytes = artifact.len(), "Locator created");
        Ok(id)
    }

    fn revoke_locator(&self, id: LocatorId) {
        self.stop(id);
        if lock(&self.registry).remove(&id).is_some() {
            tracing::debug!(%id, "Locator revoked");
        }
    }

    async fn play(&self, id: LocatorId) -> Result<(), PlaybackError> {
        let payload = self.payload(id)?;
        let cancelled = self.begin(id);
        let (done_tx, done_rx) = oneshot::channel();

        let audio = Arc::clone(&self.audio);
        let flag = Arc::clone(&cancelled);
        let started = tokio::task::spawn_blocking(move || audio.play(payload, flag, done_tx))
            .await
            .map_err(|_| AudioError::AudioThreadDied)
            .and_then(|result| result);
        let result = match started {
            Ok(()) => done_rx
                .await
                .map_err(|_| AudioError::AudioThreadDied)
                .and_then(|result| result),
            Err(e) => Err(e),
        };

        self.end(&cancelled);
        result?;
        Ok(())
    }

    fn stop(&self, id: LocatorId) {
        let current = lock(&self.current);
        if let Some(active) = current.as_ref().filter(|active| active.id == id) {
            // The flag covers a play not yet picked up by the audio thread;
            // the stop command covers one already playing.
            active.cancelled.store(true, Ordering::SeqCst);
            self.audio.stop_playback();
            tracing::debug!(%id, "Playback stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use parlance_core::WAV_CONTENT_TYPE;

    use super::*;

    fn player() -> RodioPlayer {
        RodioPlayer::new(Arc::new(AudioThreadHandle::spawn().unwrap()))
    }

    #[test]
    fn test_locators_are_unique() {
        let player = player();
        let artifact = AudioArtifact::new(&b"RIFF"[..], WAV_CONTENT_TYPE);
        let a = player.create_locator(&artifact).unwrap();
        let b = player.create_locator(&artifact).unwrap();
        assert_ne!(a, b);
        assert_eq!(player.registered(), 2);
    }

    #[test]
    fn test_revoke_drops_registration() {
        let player = player();
        let id = player
            .create_locator(&AudioArtifact::new(&b"RIFF"[..], WAV_CONTENT_TYPE))
            .unwrap();
        player.revoke_locator(id);
        player.revoke_locator(id);
        assert_eq!(player.registered(), 0);
    }

    #[test]
    fn test_non_wav_is_rejected() {
        let player = player();
        let err = player
            .create_locator(&AudioArtifact::new(&b"\x1aE"[..], "audio/webm"))
            .unwrap_err();
        assert!(matches!(err, PlaybackError::Decode(_)));
        assert_eq!(player.registered(), 0);
    }

    #[test]
    fn test_wav_content_type_variants() {
        assert!(is_wav("audio/wav"));
        assert!(is_wav("audio/x-wav"));
        assert!(is_wav("audio/wave; codecs=1"));
        assert!(!is_wav("audio/ogg"));
    }

    #[tokio::test]
    async fn test_stop_before_audio_thread_plays_skips_sound() {
        let player = player();
        let id = player
            .create_locator(&AudioArtifact::new(&b"RIFF"[..], WAV_CONTENT_TYPE))
            .unwrap();

        // Claimed but the Play command has not reached the audio thread yet.
        let cancelled = player.begin(id);
        player.stop(id);
        assert!(cancelled.load(Ordering::SeqCst));

        let (done_tx, done_rx) = oneshot::channel();
        player
            .audio
            .play(player.payload(id).unwrap(), Arc::clone(&cancelled), done_tx)
            .unwrap();
        assert!(done_rx.await.unwrap().is_ok());

        player.end(&cancelled);
        assert!(lock(&player.current).is_none());
    }

    #[test]
    fn test_stop_ignores_other_locators() {
        let player = player();
        let cancelled = player.begin(LocatorId(1));
        player.stop(LocatorId(2));
        assert!(!cancelled.load(Ordering::SeqCst));

        player.revoke_locator(LocatorId(1));
        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn test_new_play_cancels_previous_claim() {
        let player = player();
        let first = player.begin(LocatorId(1));
        let second = player.begin(LocatorId(2));
        assert!(first.load(Ordering::SeqCst));
        assert!(!second.load(Ordering::SeqCst));

        // A stale end leaves the newer claim in place.
        player.end(&first);
        assert_eq!(lock(&player.current).as_ref().map(|a| a.id), Some(LocatorId(2)));
    }

    #[tokio::test]
    async fn test_play_revoked_locator() {
        let player = player();
        let id = player
            .create_locator(&AudioArtifact::new(&b"RIFF"[..], WAV_CONTENT_TYPE))
            .unwrap();
        player.revoke_locator(id);
        assert_eq!(
            player.play(id).await.unwrap_err(),
            PlaybackError::UnknownLocator(id)
        );
    }
}
