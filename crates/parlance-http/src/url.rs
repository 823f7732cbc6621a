//! URL construction helpers for the evaluation service.

use parlance_core::{ChallengeId, Difficulty, EvaluationContext};
use url::Url;

use crate::error::HttpResult;

/// Parse a base URL so that relative joins append to its path.
pub fn parse_base_url(base: &str) -> HttpResult<Url> {
    let trimmed = base.trim();
    let url = if trimmed.ends_with('/') {
        Url::parse(trimmed)?
    } else {
        Url::parse(&format!("{trimmed}/"))?
    };
    Ok(url)
}

/// Endpoint for an evaluation: `/practice` or `/challenge/practice`.
pub fn build_practice_url(base: &Url, context: &EvaluationContext) -> HttpResult<Url> {
    let path = match context {
        EvaluationContext::TargetText { .. } => "practice",
        EvaluationContext::Challenge { .. } => "challenge/practice",
    };
    Ok(base.join(path)?)
}

/// `GET /challenges?difficulty=...`
pub fn build_challenges_url(base: &Url, difficulty: Difficulty) -> HttpResult<Url> {
    let mut url = base.join("challenges")?;
    url.query_pairs_mut()
        .append_pair("difficulty", difficulty.as_str());
    Ok(url)
}

/// `GET /challenge/{id}`
pub fn build_challenge_url(base: &Url, id: ChallengeId) -> HttpResult<Url> {
    Ok(base.join(&format!("challenge/{id}"))?)
}
