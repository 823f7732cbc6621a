//! Challenge types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned challenge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(pub i64);

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Difficulty tier of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers, easiest first.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Wire label used in query strings.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!(
                "unknown difficulty '{other}' (expected easy, medium or hard)"
            )),
        }
    }
}

/// A fixed target word with a difficulty tier and point value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    /// The word or phrase the user must pronounce.
    pub word: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Base points awarded by the server for this challenge.
    #[serde(default)]
    pub points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trips_labels() {
        for tier in Difficulty::ALL {
            assert_eq!(tier.as_str().parse::<Difficulty>().unwrap(), tier);
        }
        assert_eq!(" Hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    }

    #[test]
    fn test_difficulty_rejects_unknown() {
        let err = "extreme".parse::<Difficulty>().unwrap_err();
        assert!(err.contains("extreme"));
    }

    #[test]
    fn test_challenge_deserializes_server_row() {
        let json = r#"{"id": 7, "word": "squirrel", "difficulty": "hard", "points": 30,
                       "description": "Tricky r and l sounds"}"#;
        let challenge: Challenge = serde_json::from_str(json).unwrap();
        assert_eq!(challenge.id, ChallengeId(7));
        assert_eq!(challenge.word, "squirrel");
        assert_eq!(challenge.difficulty, Difficulty::Hard);
        assert_eq!(challenge.points, 30);
    }

    #[test]
    fn test_challenge_tolerates_missing_description() {
        let json = r#"{"id": 1, "word": "cat", "difficulty": "easy", "points": 10, "description": null}"#;
        let challenge: Challenge = serde_json::from_str(json).unwrap();
        assert!(challenge.description.is_none());
    }
}
