#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod audio_thread;
mod capture;
mod error;
mod microphone;
mod player;
mod playback;
mod synth;
mod wav;

// ============================================================================
// Public API
// ============================================================================

// Audio thread (shared by the microphone and the player)
pub use audio_thread::AudioThreadHandle;

// Port implementations
pub use microphone::{CpalCaptureStream, CpalMicrophone};
pub use player::RodioPlayer;
pub use synth::CommandSynthesizer;

// Errors and encoding
pub use capture::CAPTURE_SAMPLE_RATE;
pub use error::AudioError;
pub use wav::encode_wav;
