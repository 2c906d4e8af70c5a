//! Aggregate statistics over the feedback log

use std::collections::BTreeMap;

use serde::Serialize;

use super::FeedbackEntry;

/// How many suggestions `recent_suggestions` keeps
pub const RECENT_SUGGESTIONS: usize = 5;

/// Summary of all feedback received so far
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedbackStatistics {
    /// Number of feedback entries
    pub total_reviews: usize,
    /// Mean rating, rounded to 2 decimals; 0 when empty
    pub average_rating: f64,
    /// Share of helpful votes in percent, rounded to 2 decimals; 0 when empty
    pub helpful_percentage: f64,
    /// Entries per language
    pub language_distribution: BTreeMap<String, usize>,
    /// Last non-empty suggestions, oldest first
    pub recent_suggestions: Vec<String>,
}

impl FeedbackStatistics {
    /// Compute statistics from entries in stored order
    pub fn from_entries(entries: &[FeedbackEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let total = entries.len();
        let rating_sum: u64 = entries.iter().map(|e| u64::from(e.rating)).sum();
        let helpful = entries.iter().filter(|e| e.helpful).count();

        let mut language_distribution = BTreeMap::new();
        for entry in entries {
            *language_distribution.entry(entry.language.clone()).or_insert(0) += 1;
        }

        let mut recent_suggestions: Vec<String> = entries
            .iter()
            .rev()
            .filter(|e| !e.suggestions.is_empty())
            .take(RECENT_SUGGESTIONS)
            .map(|e| e.suggestions.clone())
            .collect();
        recent_suggestions.reverse();

        Self {
            total_reviews: total,
            average_rating: round2(rating_sum as f64 / total as f64),
            helpful_percentage: round2(helpful as f64 * 100.0 / total as f64),
            language_distribution,
            recent_suggestions,
        }
    }

    /// Most frequent language; ties go to the lexicographically smallest name
    pub fn top_language(&self) -> Option<(&str, usize)> {
        // BTreeMap iterates in name order, so keeping the first maximum breaks ties
        self.language_distribution
            .iter()
            .fold(None, |best, (name, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((name.as_str(), count)),
            })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
