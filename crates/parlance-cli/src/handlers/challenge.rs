//! Challenge command handler.

use anyhow::Result;
use parlance_core::ChallengeId;
use parlance_session::PracticeFlow;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::interactive;

/// Fetch a challenge and practice it interactively.
pub async fn execute(ctx: &CliContext, id: i64) -> Result<()> {
    let challenge = ctx
        .catalog()
        .get(ChallengeId(id))
        .await
        .map_err(CliError::from)?;

    println!(
        "Challenge #{}: \"{}\" ({}, {} points)",
        challenge.id, challenge.word, challenge.difficulty, challenge.points
    );
    if let Some(description) = &challenge.description {
        println!("  {description}");
    }

    interactive::run(ctx, PracticeFlow::Challenge { challenge }).await
}
