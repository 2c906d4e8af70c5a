//! User feedback on reviews
//!
//! Feedback entries form an append-only log that survives restarts through a
//! [`FeedbackRepository`]. Aggregate statistics are derived on demand.

pub mod repository;
pub mod stats;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use repository::{FeedbackRepository, JsonFileRepository, MemoryRepository};
pub use stats::FeedbackStatistics;
pub use store::FeedbackStore;

/// One stored rating of a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// When the feedback was recorded
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    /// Language of the reviewed code
    pub language: String,
    /// Length of the reviewed code in characters
    pub code_length: usize,
    /// Length of the review text in characters
    pub review_length: usize,
    /// Rating from 1 to 5
    pub rating: u8,
    /// Whether the user found the review helpful
    pub helpful: bool,
    /// Free-text improvement suggestions, possibly empty
    #[serde(default)]
    pub suggestions: String,
    /// Identifier assigned when the entry was recorded
    pub session_id: String,
}

/// Feedback as submitted by a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    /// Review text the feedback is about
    pub review_text: String,
    /// Code that was reviewed
    pub code: String,
    /// Language of the code
    pub language: String,
    /// Rating from 1 to 5
    pub rating: u8,
    /// Whether the review helped
    pub helpful: bool,
    /// Free-text improvement suggestions
    pub suggestions: String,
}

impl FeedbackSubmission {
    /// Create a submission without suggestions
    pub fn new(
        review_text: impl Into<String>,
        code: impl Into<String>,
        language: impl Into<String>,
        rating: u8,
        helpful: bool,
    ) -> Self {
        Self {
            review_text: review_text.into(),
            code: code.into(),
            language: language.into(),
            rating,
            helpful,
            suggestions: String::new(),
        }
    }

    /// Attach improvement suggestions
    pub fn with_suggestions(mut self, suggestions: impl Into<String>) -> Self {
        self.suggestions = suggestions.into();
        self
    }
}

/// Timestamps in older logs carry no offset; those are local times.
mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }

        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))?;
        Ok(Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc()))
    }
}
