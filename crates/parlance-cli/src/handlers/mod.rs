//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Validate CLI input, call ports or a session, format output.
//!
//! Session behavior lives in `parlance-session`; handlers only drive it.

pub mod challenge;
pub mod challenges;
pub mod interactive;
pub mod practice;
