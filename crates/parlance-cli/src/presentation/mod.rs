//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no session logic.

pub mod session_display;
pub mod tables;

pub use session_display::{format_event, format_result};
pub use tables::{print_challenge_table, print_separator, truncate_string};
