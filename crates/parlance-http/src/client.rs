//! Client for the evaluation service.

use parlance_core::{
    Challenge, ChallengeId, Difficulty, EvaluationContext, EvaluationRequest, EvaluationResult,
};
use url::Url;

use crate::config::ApiClientConfig;
use crate::error::HttpResult;
use crate::http::{FilePart, HttpBackend, ReqwestBackend, UploadForm};
use crate::models::{ChallengeResponse, ChallengesResponse, PracticeResponse};
use crate::url::{build_challenge_url, build_challenges_url, build_practice_url, parse_base_url};

/// Default client using the reqwest HTTP backend.
pub type DefaultApiClient = ApiClient<ReqwestBackend>;

/// Client for the evaluation service.
///
/// Generic over an HTTP backend for testing; use [`DefaultApiClient`] in
/// production. It implements both `EvaluatorPort` and `ChallengeCatalogPort`.
pub struct ApiClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) base_url: Url,
}

impl DefaultApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &ApiClientConfig) -> HttpResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let backend = ReqwestBackend::new(config)?;
        tracing::debug!(%base_url, "API client ready");
        Ok(Self { backend, base_url })
    }
}

impl<B: HttpBackend> ApiClient<B> {
    /// Create a client with a custom backend.
    #[cfg(test)]
    pub(crate) fn with_backend(base_url: &str, backend: B) -> Self {
        Self {
            backend,
            base_url: parse_base_url(base_url).unwrap(),
        }
    }

    /// Base URL requests are resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Upload a recording for scoring.
    pub async fn submit_evaluation(
        &self,
        request: &EvaluationRequest,
    ) -> HttpResult<EvaluationResult> {
        let url = build_practice_url(&self.base_url, &request.context)?;
        let response: PracticeResponse = self
            .backend
            .post_form(&url, build_upload_form(request))
            .await?;
        response.into_result()
    }

    /// List the challenges of one difficulty tier.
    pub async fn list_challenges(&self, difficulty: Difficulty) -> HttpResult<Vec<Challenge>> {
        let url = build_challenges_url(&self.base_url, difficulty)?;
        let response: ChallengesResponse = self.backend.get_json(&url).await?;
        Ok(response.challenges)
    }

    /// Fetch one challenge.
    pub async fn get_challenge(&self, id: ChallengeId) -> HttpResult<Challenge> {
        let url = build_challenge_url(&self.base_url, id)?;
        let response: ChallengeResponse = self.backend.get_json(&url).await?;
        Ok(response.challenge)
    }
}

/// Build the multipart payload for an evaluation.
pub(crate) fn build_upload_form(request: &EvaluationRequest) -> UploadForm {
    let mut fields = Vec::with_capacity(2);
    match &request.context {
        EvaluationContext::TargetText { target_text } => {
            fields.push(("target_text", target_text.clone()));
        }
        EvaluationContext::Challenge { challenge_id } => {
            fields.push(("challenge_id", challenge_id.to_string()));
        }
    }
    fields.push(("user_id", request.user_id.as_str().to_string()));

    let artifact = &request.artifact;
    UploadForm {
        fields,
        file: FilePart {
            name: "audio",
            file_name: artifact.file_name().to_string(),
            content_type: artifact.content_type().to_string(),
            bytes: artifact.payload().clone(),
        },
    }
}
