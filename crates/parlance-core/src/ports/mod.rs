//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the capabilities a practice session expects from
//! infrastructure. They contain no implementation details and use only
//! domain types, so every session can run against substitute
//! implementations with no hardware or network.
//!
//! # Design Rules
//!
//! - No `cpal`, `rodio` or `reqwest` types in any signature
//! - Traits are `Send + Sync` and object-safe (`Arc<dyn Port>`)
//! - Each port owns its error enum; adapters map into it at the boundary

pub mod catalog;
pub mod evaluator;
pub mod microphone;
pub mod player;
pub mod progress;
pub mod speech;

pub use catalog::{CatalogError, ChallengeCatalogPort};
pub use evaluator::{EvaluationError, EvaluatorPort};
pub use microphone::{CaptureError, CaptureStream, MicrophonePort};
pub use player::{AudioPlayerPort, LocatorId, PlaybackError};
pub use progress::{NoopProgressSink, ProgressSink};
pub use speech::{SpeechSynthesizerPort, SynthesisError, SynthesisEvent};
