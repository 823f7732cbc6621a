//! Challenge catalog port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Challenge, ChallengeId, Difficulty};

/// Errors raised by a challenge catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Challenge not found: {0}")]
    NotFound(ChallengeId),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Read-only access to the server's challenges.
#[async_trait]
pub trait ChallengeCatalogPort: Send + Sync {
    /// List challenges of one difficulty tier.
    async fn list(&self, difficulty: Difficulty) -> Result<Vec<Challenge>, CatalogError>;

    /// Fetch a single challenge.
    async fn get(&self, id: ChallengeId) -> Result<Challenge, CatalogError>;
}
