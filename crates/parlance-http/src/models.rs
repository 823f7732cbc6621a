//! Wire types of the evaluation service.
//!
//! These mirror the JSON the server sends and are converted into core
//! domain types before leaving the crate.

use parlance_core::{Challenge, EvaluationResult};
use serde::Deserialize;

use crate::error::{HttpError, HttpResult};

/// Success body of `POST /practice` and `POST /challenge/practice`.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeResponse {
    /// Score 0-100. The server sends a float rounded to two decimals.
    pub accuracy: f64,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub points_earned: i64,
    pub new_points: i64,
    pub new_level: u32,
}

impl PracticeResponse {
    /// Convert into a domain result.
    pub fn into_result(self) -> HttpResult<EvaluationResult> {
        Ok(EvaluationResult {
            accuracy: round_accuracy(self.accuracy)?,
            transcript: self.transcript,
            points_earned: self.points_earned,
            new_total_points: self.new_points,
            new_level: self.new_level,
        })
    }
}

/// Body of any non-success response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Body of `GET /challenges`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengesResponse {
    #[serde(default)]
    pub challenges: Vec<Challenge>,
}

/// Body of `GET /challenge/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeResponse {
    pub challenge: Challenge,
}

/// Round a float accuracy to the nearest integer percentage, clamped to 0-100.
pub fn round_accuracy(accuracy: f64) -> HttpResult<u8> {
    if !accuracy.is_finite() {
        return Err(HttpError::InvalidResponse {
            message: format!("accuracy is not a number: {accuracy}"),
        });
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100
    let rounded = accuracy.round().clamp(0.0, 100.0) as u8;
    Ok(rounded)
}

/// Extract the server message from an error body, if there is one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use parlance_core::{ChallengeId, Difficulty};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_practice_response_conversion() {
        let body = json!({
            "accuracy": 84.62,
            "target_text": "hello world",
            "transcript": "hello word",
            "points_earned": 8,
            "new_points": 108,
            "new_level": 2
        });
        let response: PracticeResponse = serde_json::from_value(body).unwrap();
        let result = response.into_result().unwrap();
        assert_eq!(result.accuracy, 85);
        assert_eq!(result.transcript, "hello word");
        assert_eq!(result.new_total_points, 108);
        assert_eq!(result.new_level, 2);
    }

    #[test]
    fn test_accuracy_rounding_and_clamping() {
        assert_eq!(round_accuracy(79.5).unwrap(), 80);
        assert_eq!(round_accuracy(59.49).unwrap(), 59);
        assert_eq!(round_accuracy(-12.0).unwrap(), 0);
        assert_eq!(round_accuracy(140.0).unwrap(), 100);
        assert!(round_accuracy(f64::NAN).is_err());
    }

    #[test]
    fn test_missing_progress_fields_is_an_error() {
        let body = json!({ "accuracy": 90.0, "transcript": "hi" });
        assert!(serde_json::from_value::<PracticeResponse>(body).is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error":"bad audio"}"#),
            Some("bad audio".to_string())
        );
        assert_eq!(error_message(r#"{"error":"  "}"#), None);
        assert_eq!(error_message(r#"{"detail":"x"}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_challenge_list_ignores_extra_columns() {
        let body = json!({
            "challenges": [
                {"id": 3, "word": "rhythm", "difficulty": "hard", "points": 30,
                 "description": "No vowels", "created_at": "2024-01-01"}
            ]
        });
        let response: ChallengesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.challenges.len(), 1);
        assert_eq!(response.challenges[0].id, ChallengeId(3));
        assert_eq!(response.challenges[0].difficulty, Difficulty::Hard);
    }
}
