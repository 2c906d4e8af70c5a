//! Append-only feedback log backed by a repository

use chrono::{Local, Utc};
use tracing::{info, warn};

use super::{FeedbackEntry, FeedbackRepository, FeedbackStatistics, FeedbackSubmission};

/// In-memory feedback log mirrored to a repository
///
/// Every append rewrites the whole log through the repository. A failed
/// write is logged and the entry stays in memory; it is written again with
/// the next successful save.
pub struct FeedbackStore {
    repository: Box<dyn FeedbackRepository>,
    entries: Vec<FeedbackEntry>,
}

impl FeedbackStore {
    /// Open the store, loading whatever the repository holds
    ///
    /// An unreadable log is moved aside by the repository before the store
    /// starts empty, so later saves never overwrite it.
    pub fn open(repository: impl FeedbackRepository + 'static) -> Self {
        let entries = match repository.load_all() {
            Ok(entries) => entries,
            Err(e) => {
                match repository.set_aside() {
                    Ok(Some(backup)) => warn!(
                        error = %e,
                        backup = %backup.display(),
                        "Could not load feedback log; moved it aside and starting empty"
                    ),
                    Ok(None) => warn!(error = %e, "Could not load feedback log, starting empty"),
                    Err(move_err) => warn!(
                        error = %e,
                        move_error = %move_err,
                        "Could not load feedback log or move it aside, starting empty"
                    ),
                }
                Vec::new()
            }
        };

        Self {
            repository: Box::new(repository),
            entries,
        }
    }

    /// Append a feedback entry and persist the log
    pub fn record(&mut self, submission: FeedbackSubmission) -> FeedbackEntry {
        let entry = FeedbackEntry {
            timestamp: Utc::now(),
            language: submission.language,
            code_length: submission.code.chars().count(),
            review_length: submission.review_text.chars().count(),
            rating: submission.rating,
            helpful: submission.helpful,
            suggestions: submission.suggestions,
            session_id: format!("session_{}", Local::now().format("%Y%m%d_%H%M%S")),
        };

        self.entries.push(entry.clone());

        match self.repository.save_all(&self.entries) {
            Ok(()) => info!(
                language = %entry.language,
                rating = entry.rating,
                helpful = entry.helpful,
                total = self.entries.len(),
                "Recorded feedback"
            ),
            Err(e) => warn!(error = %e, "Failed to persist feedback log; entry kept in memory"),
        }

        entry
    }

    /// Aggregate statistics over all entries
    pub fn statistics(&self) -> FeedbackStatistics {
        FeedbackStatistics::from_entries(&self.entries)
    }

    /// All entries in stored order
    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no feedback has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FeedbackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackStore")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}
