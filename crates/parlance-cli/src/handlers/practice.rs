//! Practice command handler.

use anyhow::Result;
use parlance_session::{ENTER_TEXT_MESSAGE, PracticeFlow};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::interactive;

/// Practice a free-form phrase interactively.
pub async fn execute(ctx: &CliContext, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(CliError::Arguments(ENTER_TEXT_MESSAGE.to_string()).into());
    }
    println!("Practicing: \"{}\"", text.trim());
    interactive::run(ctx, PracticeFlow::free_practice(text)).await
}
