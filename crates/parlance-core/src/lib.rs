#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod ports;
pub mod progress;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    Activity, AudioArtifact, Challenge, ChallengeId, Difficulty, EvaluationContext,
    EvaluationRequest, EvaluationResult, Outcome, PlaybackState, ProgressUpdate, RecordingState,
    ReferenceState, SessionState, UserId, UserProgress, WAV_CONTENT_TYPE,
};
pub use events::SessionEvent;
pub use ports::{
    AudioPlayerPort, CaptureError, CaptureStream, CatalogError, ChallengeCatalogPort,
    EvaluationError, EvaluatorPort, LocatorId, MicrophonePort, NoopProgressSink, PlaybackError,
    ProgressSink, SpeechSynthesizerPort, SynthesisError, SynthesisEvent,
};
pub use progress::ProgressLedger;
pub use settings::{ClientSettings, DEFAULT_API_BASE_URL, SettingsError, validate_settings};
