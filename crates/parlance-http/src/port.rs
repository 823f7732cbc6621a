//! Port trait implementations for `ApiClient`.
//!
//! Maps internal `HttpError`s to the core port errors.

use async_trait::async_trait;
use parlance_core::{
    CatalogError, Challenge, ChallengeCatalogPort, ChallengeId, Difficulty, EvaluationError,
    EvaluationRequest, EvaluationResult, EvaluatorPort,
};

use crate::client::ApiClient;
use crate::error::HttpError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert an internal error to an evaluation error.
fn map_evaluation_error(err: HttpError) -> EvaluationError {
    match err {
        HttpError::Status { status, message } => EvaluationError::Rejected { status, message },
        HttpError::Network(e) => EvaluationError::Network(e.to_string()),
        HttpError::InvalidUrl(e) => EvaluationError::Network(format!("invalid URL: {e}")),
        HttpError::JsonParse(e) => EvaluationError::InvalidResponse(e.to_string()),
        HttpError::InvalidResponse { message } => EvaluationError::InvalidResponse(message),
    }
}

/// Convert an internal error to a catalog error.
fn map_catalog_error(err: HttpError, id: Option<ChallengeId>) -> CatalogError {
    match (err, id) {
        (HttpError::Status { status: 404, .. }, Some(id)) => CatalogError::NotFound(id),
        (HttpError::Status { status, message }, _) => CatalogError::Network(format!(
            "request failed with status {status}: {}",
            message.as_deref().unwrap_or("no message")
        )),
        (HttpError::Network(e), _) => CatalogError::Network(e.to_string()),
        (HttpError::InvalidUrl(e), _) => CatalogError::Network(format!("invalid URL: {e}")),
        (HttpError::JsonParse(e), _) => CatalogError::InvalidResponse(e.to_string()),
        (HttpError::InvalidResponse { message }, _) => CatalogError::InvalidResponse(message),
    }
}

// ============================================================================
// Port Implementations
// ============================================================================

#[async_trait]
impl<B: HttpBackend> EvaluatorPort for ApiClient<B> {
    async fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<EvaluationResult, EvaluationError> {
        match self.submit_evaluation(&request).await {
            Ok(result) => {
                tracing::info!(
                    accuracy = result.accuracy,
                    points_earned = result.points_earned,
                    "Evaluation received"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Evaluation request failed");
                Err(map_evaluation_error(e))
            }
        }
    }
}

#[async_trait]
impl<B: HttpBackend> ChallengeCatalogPort for ApiClient<B> {
    async fn list(&self, difficulty: Difficulty) -> Result<Vec<Challenge>, CatalogError> {
        self.list_challenges(difficulty)
            .await
            .map_err(|e| map_catalog_error(e, None))
    }

    async fn get(&self, id: ChallengeId) -> Result<Challenge, CatalogError> {
        self.get_challenge(id)
            .await
            .map_err(|e| map_catalog_error(e, Some(id)))
    }
}
