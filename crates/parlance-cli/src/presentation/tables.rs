//! Table formatting utilities for CLI output.

use parlance_core::Challenge;

/// Truncates a string to at most `max_len` characters, adding "..." if needed.
///
/// ```rust
/// use parlance_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// One table row for a challenge.
pub fn challenge_row(challenge: &Challenge) -> String {
    format!(
        "{:<5} {:<20} {:<8} {:<7} {}",
        challenge.id.to_string(),
        truncate_string(&challenge.word, 19),
        challenge.difficulty.as_str(),
        challenge.points,
        challenge.description.as_deref().unwrap_or("--")
    )
}

/// Print challenges as a table.
pub fn print_challenge_table(challenges: &[Challenge]) {
    println!(
        "{:<5} {:<20} {:<8} {:<7} Description",
        "ID", "Word", "Level", "Points"
    );
    print_separator(70);
    for challenge in challenges {
        println!("{}", challenge_row(challenge));
    }
}
