//! Evaluation submission controller.
//!
//! Validates the request locally, issues exactly one evaluator call, and
//! tags it with a monotonically increasing token. A response is applied only
//! if its token still matches the request in flight; anything else is a
//! stale response and is dropped.

use std::sync::Arc;

use parlance_core::{
    Activity, AudioArtifact, EvaluationContext, EvaluationError, EvaluationRequest,
    EvaluationResult, EvaluatorPort, ProgressUpdate, UserId,
};

use crate::error::{
    ENTER_TEXT_MESSAGE, EVALUATION_FAILED_MESSAGE, LOGIN_REQUIRED_MESSAGE, RECORD_FIRST_MESSAGE,
    SessionError,
};
use crate::signal::{Completion, CompletionTx, complete};

/// What applying an evaluation completion did.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SubmissionUpdate {
    /// The response belonged to an abandoned submission.
    Stale,
    /// The evaluation succeeded. The progress update must be applied.
    Evaluated {
        result: EvaluationResult,
        progress: ProgressUpdate,
    },
    /// The evaluation failed; no progress update.
    Failed(SessionError),
}

pub struct SubmissionController {
    evaluator: Arc<dyn EvaluatorPort>,
    /// Token of the most recent submission.
    token: u64,
    in_flight: Option<u64>,
    completions: CompletionTx,
}

impl SubmissionController {
    pub(crate) fn new(evaluator: Arc<dyn EvaluatorPort>, completions: CompletionTx) -> Self {
        Self {
            evaluator,
            token: 0,
            in_flight: None,
            completions,
        }
    }

    /// Whether a request is in flight.
    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Token of the most recent submission.
    pub const fn token(&self) -> u64 {
        self.token
    }

    /// Validate and send one evaluation request. Returns its token.
    ///
    /// Every precondition is checked before the evaluator is touched.
    pub(crate) fn submit(
        &mut self,
        artifact: Option<&Arc<AudioArtifact>>,
        context: EvaluationContext,
        user_id: Option<&UserId>,
    ) -> Result<u64, SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::Busy(Activity::Evaluating));
        }
        if artifact.is_none_or(|a| a.is_empty()) {
            return Err(SessionError::EmptyInput(RECORD_FIRST_MESSAGE.to_string()));
        }
        if !context.is_complete() {
            return Err(SessionError::EmptyInput(ENTER_TEXT_MESSAGE.to_string()));
        }
        if user_id.is_none() {
            return Err(SessionError::EmptyInput(LOGIN_REQUIRED_MESSAGE.to_string()));
        }
        let Some(request) = EvaluationRequest::new(artifact.cloned(), context, user_id.cloned())
        else {
            return Err(SessionError::EmptyInput(RECORD_FIRST_MESSAGE.to_string()));
        };

        self.token += 1;
        let token = self.token;
        self.in_flight = Some(token);
        tracing::info!(token, bytes = request.artifact.len(), "Submitting recording for evaluation");

        let evaluator = Arc::clone(&self.evaluator);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = evaluator.evaluate(request).await;
            complete(&tx, Completion::EvaluationFinished { token, result });
        });

        Ok(token)
    }

    /// Abandon the request in flight. Its response will be discarded.
    pub(crate) fn invalidate(&mut self) {
        if let Some(token) = self.in_flight.take() {
            tracing::debug!(token, "Evaluation abandoned");
        }
        self.token += 1;
    }

    /// Apply an evaluator response.
    pub(crate) fn apply(
        &mut self,
        token: u64,
        result: Result<EvaluationResult, EvaluationError>,
    ) -> SubmissionUpdate {
        if self.in_flight != Some(token) {
            tracing::debug!(token, current = self.token, "Discarding stale evaluation response");
            return SubmissionUpdate::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(result) => {
                tracing::info!(token, accuracy = result.accuracy, "Evaluation completed");
                SubmissionUpdate::Evaluated {
                    progress: result.progress_update(),
                    result,
                }
            }
            Err(e) => {
                tracing::warn!(token, error = %e, "Evaluation failed");
                SubmissionUpdate::Failed(failure_for(e))
            }
        }
    }
}

/// Map an evaluator error to what the user sees.
fn failure_for(err: EvaluationError) -> SessionError {
    match err {
        EvaluationError::Rejected { message, .. } => SessionError::ServerRejected {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| EVALUATION_FAILED_MESSAGE.to_string()),
        },
        EvaluationError::InvalidResponse(_) => SessionError::ServerRejected {
            message: EVALUATION_FAILED_MESSAGE.to_string(),
        },
        EvaluationError::Network(_) => SessionError::NetworkFailure,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;
    use parlance_core::{ChallengeId, WAV_CONTENT_TYPE};
    use tokio::sync::mpsc;
    use tokio_test::assert_err;

    use super::*;

    mock! {
        Evaluator {}

        #[async_trait]
        impl EvaluatorPort for Evaluator {
            async fn evaluate(
                &self,
                request: EvaluationRequest,
            ) -> Result<EvaluationResult, EvaluationError>;
        }
    }

    fn artifact() -> Arc<AudioArtifact> {
        Arc::new(AudioArtifact::new(&b"RIFF"[..], WAV_CONTENT_TYPE))
    }

    fn text(s: &str) -> EvaluationContext {
        EvaluationContext::TargetText {
            target_text: s.to_string(),
        }
    }

    fn result(accuracy: u8) -> EvaluationResult {
        EvaluationResult {
            accuracy,
            transcript: "hello".to_string(),
            points_earned: 10,
            new_total_points: 110,
            new_level: 2,
        }
    }

    fn controller(evaluator: MockEvaluator) -> (SubmissionController, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SubmissionController::new(Arc::new(evaluator), tx), rx)
    }

    #[tokio::test]
    async fn test_missing_inputs_never_reach_evaluator() {
        let mut evaluator = MockEvaluator::new();
        evaluator.expect_evaluate().times(0);
        let (mut sub, _rx) = controller(evaluator);
        let user = UserId::new("7");

        let err = assert_err!(sub.submit(None, text("hello"), user.as_ref()));
        assert_eq!(err, SessionError::EmptyInput(RECORD_FIRST_MESSAGE.to_string()));

        let err = assert_err!(sub.submit(Some(&artifact()), text(" "), user.as_ref()));
        assert_eq!(err, SessionError::EmptyInput(ENTER_TEXT_MESSAGE.to_string()));

        let err = assert_err!(sub.submit(Some(&artifact()), text("hello"), None));
        assert!(matches!(err, SessionError::EmptyInput(_)));
        assert!(!sub.is_loading());
    }

    #[tokio::test]
    async fn test_challenge_submission_forwards_id() {
        let mut evaluator = MockEvaluator::new();
        evaluator
            .expect_evaluate()
            .withf(|req| {
                req.context
                    == EvaluationContext::Challenge {
                        challenge_id: ChallengeId(4),
                    }
                    && req.user_id.as_str() == "7"
            })
            .times(1)
            .returning(|_| Ok(result(85)));
        let (mut sub, mut rx) = controller(evaluator);

        let ctx = EvaluationContext::Challenge {
            challenge_id: ChallengeId(4),
        };
        let token = sub
            .submit(Some(&artifact()), ctx, UserId::new("7").as_ref())
            .unwrap();

        let Some(Completion::EvaluationFinished { token: got, result }) = rx.recv().await else {
            panic!("expected evaluation completion");
        };
        assert_eq!(got, token);
        let update = sub.apply(got, result);
        assert!(matches!(update, SubmissionUpdate::Evaluated { .. }));
    }

    #[tokio::test]
    async fn test_second_submit_while_loading_is_busy() {
        let mut evaluator = MockEvaluator::new();
        evaluator
            .expect_evaluate()
            .times(1)
            .returning(|_| Ok(result(85)));
        let (mut sub, _rx) = controller(evaluator);
        let user = UserId::new("7");

        sub.submit(Some(&artifact()), text("hello"), user.as_ref())
            .unwrap();
        let err = sub
            .submit(Some(&artifact()), text("hello"), user.as_ref())
            .unwrap_err();
        assert_eq!(err, SessionError::Busy(Activity::Evaluating));
    }

    #[tokio::test]
    async fn test_invalidated_response_is_stale() {
        let mut evaluator = MockEvaluator::new();
        evaluator
            .expect_evaluate()
            .returning(|_| Ok(result(85)));
        let (mut sub, mut rx) = controller(evaluator);

        let token = sub
            .submit(Some(&artifact()), text("hello"), UserId::new("7").as_ref())
            .unwrap();
        sub.invalidate();
        assert!(!sub.is_loading());

        let Some(Completion::EvaluationFinished { token: got, result }) = rx.recv().await else {
            panic!("expected evaluation completion");
        };
        assert_eq!(got, token);
        assert_eq!(sub.apply(got, result), SubmissionUpdate::Stale);
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            failure_for(EvaluationError::Rejected {
                status: 400,
                message: Some("bad audio".to_string())
            }),
            SessionError::ServerRejected {
                message: "bad audio".to_string()
            }
        );
        assert_eq!(
            failure_for(EvaluationError::Rejected {
                status: 500,
                message: None
            }),
            SessionError::ServerRejected {
                message: "Evaluation failed".to_string()
            }
        );
        assert_eq!(
            failure_for(EvaluationError::InvalidResponse("eof".to_string())),
            SessionError::ServerRejected {
                message: "Evaluation failed".to_string()
            }
        );
        assert_eq!(
            failure_for(EvaluationError::Network("connection refused".to_string())),
            SessionError::NetworkFailure
        );
    }
}
