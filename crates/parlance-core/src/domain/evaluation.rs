//! Evaluation request and result types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::artifact::AudioArtifact;
use super::challenge::ChallengeId;
use super::progress::{ProgressUpdate, UserId};

/// Accuracy at or above which an attempt counts as a success.
pub const SUCCESS_THRESHOLD: u8 = 80;

/// Accuracy at or above which an attempt counts as partial.
pub const PARTIAL_THRESHOLD: u8 = 60;

/// Flow-specific context forwarded with a recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationContext {
    /// Free practice: the user typed the phrase to pronounce.
    TargetText { target_text: String },
    /// Challenge practice: the server resolves the word from the id.
    Challenge { challenge_id: ChallengeId },
}

impl EvaluationContext {
    /// Whether the context carries everything the evaluator needs.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::TargetText { target_text } => !target_text.trim().is_empty(),
            Self::Challenge { .. } => true,
        }
    }
}

/// One submission to the evaluator.
///
/// Construct through [`EvaluationRequest::new`], which enforces that the
/// artifact, the required context, and the user id are all present.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub artifact: Arc<AudioArtifact>,
    pub context: EvaluationContext,
    pub user_id: UserId,
}

impl EvaluationRequest {
    /// Build a request, returning `None` when any precondition is missing.
    pub fn new(
        artifact: Option<Arc<AudioArtifact>>,
        context: EvaluationContext,
        user_id: Option<UserId>,
    ) -> Option<Self> {
        let artifact = artifact.filter(|a| !a.is_empty())?;
        if !context.is_complete() {
            return None;
        }
        Some(Self {
            artifact,
            context,
            user_id: user_id?,
        })
    }
}

/// Score and progress returned by a successful evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Pronunciation accuracy, 0–100.
    pub accuracy: u8,
    /// What the recognizer heard.
    pub transcript: String,
    pub points_earned: i64,
    pub new_total_points: i64,
    pub new_level: u32,
}

impl EvaluationResult {
    /// Presentation banding of the accuracy score.
    pub const fn outcome(&self) -> Outcome {
        Outcome::classify(self.accuracy)
    }

    /// The progress effect carried by this result. Applied regardless of
    /// the accuracy band.
    pub const fn progress_update(&self) -> ProgressUpdate {
        ProgressUpdate {
            new_total_points: self.new_total_points,
            new_level: self.new_level,
        }
    }
}

/// Banding of an accuracy score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Partial,
    Failed,
}

impl Outcome {
    pub const fn classify(accuracy: u8) -> Self {
        if accuracy >= SUCCESS_THRESHOLD {
            Self::Success
        } else if accuracy >= PARTIAL_THRESHOLD {
            Self::Partial
        } else {
            Self::Failed
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    /// Message shown to the user alongside the score.
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Success => "Great job! Challenge completed successfully!",
            Self::Partial => "Good effort! Keep practicing to improve.",
            Self::Failed => "Keep practicing! Try again to improve your score.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WAV_CONTENT_TYPE;

    fn artifact() -> Arc<AudioArtifact> {
        Arc::new(AudioArtifact::new(&b"RIFF"[..], WAV_CONTENT_TYPE))
    }

    fn text(s: &str) -> EvaluationContext {
        EvaluationContext::TargetText {
            target_text: s.to_string(),
        }
    }

    #[test]
    fn test_outcome_bands() {
        assert_eq!(Outcome::classify(100), Outcome::Success);
        assert_eq!(Outcome::classify(85), Outcome::Success);
        assert_eq!(Outcome::classify(80), Outcome::Success);
        assert_eq!(Outcome::classify(79), Outcome::Partial);
        assert_eq!(Outcome::classify(65), Outcome::Partial);
        assert_eq!(Outcome::classify(60), Outcome::Partial);
        assert_eq!(Outcome::classify(59), Outcome::Failed);
        assert_eq!(Outcome::classify(0), Outcome::Failed);
    }

    #[test]
    fn test_request_requires_all_parts() {
        let user = UserId::new("7");
        assert!(EvaluationRequest::new(None, text("hello"), user.clone()).is_none());
        assert!(EvaluationRequest::new(Some(artifact()), text("  "), user.clone()).is_none());
        assert!(EvaluationRequest::new(Some(artifact()), text("hello"), None).is_none());
        assert!(EvaluationRequest::new(Some(artifact()), text("hello"), user).is_some());
    }

    #[test]
    fn test_request_rejects_empty_artifact() {
        let empty = Arc::new(AudioArtifact::new(Vec::<u8>::new(), WAV_CONTENT_TYPE));
        assert!(EvaluationRequest::new(Some(empty), text("hello"), UserId::new("7")).is_none());
    }

    #[test]
    fn test_challenge_context_is_complete() {
        let ctx = EvaluationContext::Challenge {
            challenge_id: ChallengeId(3),
        };
        assert!(ctx.is_complete());
    }

    #[test]
    fn test_progress_update_independent_of_accuracy() {
        let result = EvaluationResult {
            accuracy: 40,
            transcript: "helo".to_string(),
            points_earned: 0,
            new_total_points: 100,
            new_level: 2,
        };
        assert_eq!(result.outcome(), Outcome::Failed);
        assert_eq!(result.progress_update().new_total_points, 100);
        assert_eq!(result.progress_update().new_level, 2);
    }
}
