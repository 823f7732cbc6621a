//! In-memory owner of user progress.

use std::sync::{PoisonError, RwLock};

use crate::domain::{ProgressUpdate, UserProgress};
use crate::ports::ProgressSink;

/// The single designated owner of [`UserProgress`].
///
/// Sessions hold it only as `Arc<dyn ProgressSink>`, so the one write path
/// is [`ProgressSink::apply`].
#[derive(Debug, Default)]
pub struct ProgressLedger {
    progress: RwLock<Option<UserProgress>>,
}

impl ProgressLedger {
    /// A ledger with no known progress yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger seeded with the progress reported at login.
    pub fn with_progress(progress: UserProgress) -> Self {
        Self {
            progress: RwLock::new(Some(progress)),
        }
    }

    /// The current progress, if known.
    pub fn current(&self) -> Option<UserProgress> {
        *self
            .progress
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProgressSink for ProgressLedger {
    fn apply(&self, update: ProgressUpdate) {
        let next = update.progress();
        let mut guard = self
            .progress
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(prev) = *guard {
            if next.level < prev.level {
                tracing::warn!(
                    old = prev.level,
                    new = next.level,
                    "Server reported a lower level; applying as given"
                );
            }
        }
        tracing::debug!(points = next.points, level = next.level, "Progress updated");
        *guard = Some(next);
    }
}
