//! Rendering of session events and results.

use parlance_core::{EvaluationResult, SessionEvent};

/// Multi-line summary of an evaluation.
pub fn format_result(result: &EvaluationResult) -> String {
    let outcome = result.outcome();
    format!(
        "  Accuracy:   {}% ({})\n  Heard:      \"{}\"\n  Points:     +{} (total {}, level {})\n  {}",
        result.accuracy,
        outcome.as_str(),
        result.transcript,
        result.points_earned,
        result.new_total_points,
        result.new_level,
        outcome.headline()
    )
}

/// Line to print for an event, if it is user-facing.
pub fn format_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::StateChanged { state } => Some(format!("[{state}]")),
        SessionEvent::Notice { message } => Some(format!("! {message}")),
        SessionEvent::EvaluationCompleted { result, .. } => Some(format_result(result)),
        SessionEvent::EvaluationFailed { message } => Some(format!("x {message}")),
        SessionEvent::RecordingChanged { .. }
        | SessionEvent::ReferenceChanged { .. }
        | SessionEvent::PlaybackChanged { .. }
        | SessionEvent::ProgressUpdated { .. }
        | SessionEvent::StaleResponseDiscarded { .. } => None,
    }
}
