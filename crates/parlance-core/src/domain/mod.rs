//! Core domain types.
//!
//! These types represent the pure practice domain, independent of any
//! infrastructure concerns (audio devices, HTTP, terminal).
//!
//! # Structure
//!
//! - `artifact` - The immutable recorded take (`AudioArtifact`)
//! - `evaluation` - Requests to and results from the remote evaluator
//! - `challenge` - Fixed challenge words and difficulty tiers
//! - `progress` - User identity and points/level progress
//! - `state` - Discrete states of the session and its controllers

mod artifact;
mod challenge;
mod evaluation;
mod progress;
mod state;

pub use artifact::{AudioArtifact, WAV_CONTENT_TYPE};
pub use challenge::{Challenge, ChallengeId, Difficulty};
pub use evaluation::{EvaluationContext, EvaluationRequest, EvaluationResult, Outcome};
pub use progress::{ProgressUpdate, UserId, UserProgress};
pub use state::{Activity, PlaybackState, RecordingState, ReferenceState, SessionState};
