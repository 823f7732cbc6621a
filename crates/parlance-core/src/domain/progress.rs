//! User identity and progress.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the logged-in user, as issued by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user id. Returns `None` for blank input.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Points and level of a user.
///
/// Owned by a single collaborator (see [`ProgressLedger`](crate::ProgressLedger));
/// sessions never write it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProgress {
    pub points: i64,
    pub level: u32,
}

/// The effect emitted after a successful evaluation: replace the user's
/// points and level with the server-computed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub new_total_points: i64,
    pub new_level: u32,
}

impl ProgressUpdate {
    /// The progress this update produces.
    pub const fn progress(self) -> UserProgress {
        UserProgress {
            points: self.new_total_points,
            level: self.new_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::new("").is_none());
        assert!(UserId::new("   ").is_none());
        assert_eq!(UserId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn test_progress_update_maps_fields() {
        let update = ProgressUpdate {
            new_total_points: 110,
            new_level: 2,
        };
        assert_eq!(
            update.progress(),
            UserProgress {
                points: 110,
                level: 2
            }
        );
    }
}
