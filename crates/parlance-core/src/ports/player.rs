//! Audio player port: playback of in-memory audio through revocable locators.
//!
//! A locator is the player's handle to a registered payload. It must be
//! revoked once the playback it was created for ends, or the registered
//! bytes stay alive for the life of the player.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::AudioArtifact;

/// Handle to a payload registered with an [`AudioPlayerPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocatorId(pub u64);

impl fmt::Display for LocatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "locator#{}", self.0)
    }
}

/// Errors raised by an audio player.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// The locator was never created or has already been revoked.
    #[error("Unknown or revoked {0}")]
    UnknownLocator(LocatorId),

    /// The payload could not be decoded.
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// The output device failed.
    #[error("Audio output failed: {0}")]
    Device(String),
}

/// Capability to play in-memory audio.
#[async_trait]
pub trait AudioPlayerPort: Send + Sync {
    /// Register `artifact` and return a locator addressing it.
    fn create_locator(&self, artifact: &AudioArtifact) -> Result<LocatorId, PlaybackError>;

    /// Drop the registration behind `id`.
    fn revoke_locator(&self, id: LocatorId);

    /// Play the payload behind `id`, resolving when playback ends or is stopped.
    async fn play(&self, id: LocatorId) -> Result<(), PlaybackError>;

    /// Stop playback of `id` if it is playing.
    fn stop(&self, id: LocatorId);
}
