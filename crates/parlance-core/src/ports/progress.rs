//! Progress sink: the single writer path for user progress.

use crate::domain::ProgressUpdate;

/// Receiver of progress-update effects.
///
/// Sessions emit an update after every successful evaluation and never
/// touch progress any other way.
///
/// # Implementations
///
/// - [`ProgressLedger`](crate::ProgressLedger) - In-memory owner of `UserProgress`
/// - [`NoopProgressSink`] - For tests and contexts without a logged-in user
pub trait ProgressSink: Send + Sync {
    fn apply(&self, update: ProgressUpdate);
}

/// A sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn apply(&self, _update: ProgressUpdate) {}
}
