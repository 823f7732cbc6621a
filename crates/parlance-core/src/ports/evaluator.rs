//! Evaluator port: remote pronunciation scoring.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{EvaluationRequest, EvaluationResult};

/// Errors raised by an evaluator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvaluationError {
    /// The evaluator answered with a non-success status.
    #[error("Evaluation rejected with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        /// Server-supplied message, if the body carried one.
        message: Option<String>,
    },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// A success response could not be understood.
    #[error("Invalid evaluation response: {0}")]
    InvalidResponse(String),
}

/// Capability to score one recording.
///
/// Exactly one request is issued per call. Implementations must not retry.
#[async_trait]
pub trait EvaluatorPort: Send + Sync {
    async fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<EvaluationResult, EvaluationError>;
}
