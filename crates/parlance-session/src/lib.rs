#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod playback;
pub mod recording;
pub mod reference;
pub mod session;
mod signal;
pub mod submission;

// Re-export key types for convenience
pub use error::{
    ENTER_TEXT_MESSAGE, EVALUATION_FAILED_MESSAGE, LOGIN_REQUIRED_MESSAGE, NETWORK_ERROR_MESSAGE,
    RECORD_FIRST_MESSAGE, SessionError,
};
pub use playback::{Locator, RecordedPlayback};
pub use recording::{RecordingController, StopCallback};
pub use reference::ReferencePlayback;
pub use session::{PracticeFlow, PracticeSession, SessionPorts, SessionView};
pub use submission::SubmissionController;
