//! Challenges command handler.

use anyhow::Result;
use parlance_core::Difficulty;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::print_challenge_table;

/// List the challenges of one difficulty tier.
pub async fn execute(ctx: &CliContext, difficulty: Difficulty) -> Result<()> {
    let challenges = ctx
        .catalog()
        .list(difficulty)
        .await
        .map_err(CliError::from)?;

    if challenges.is_empty() {
        println!("No {difficulty} challenges available.");
        return Ok(());
    }

    println!("{} {difficulty} challenge(s):\n", challenges.len());
    print_challenge_table(&challenges);
    println!();
    println!("Use 'parlance challenge <id>' to practice one.");
    Ok(())
}
