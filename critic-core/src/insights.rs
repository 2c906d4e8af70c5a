//! Qualitative insights derived from feedback statistics

use serde::Serialize;

use crate::feedback::FeedbackStatistics;

/// Average rating below which satisfaction is flagged as low
pub const LOW_RATING: f64 = 3.0;
/// Average rating at or above which satisfaction is reported as high
pub const HIGH_RATING: f64 = 4.0;
/// Helpful percentage below which helpfulness is flagged as low
pub const LOW_HELPFUL: f64 = 60.0;
/// Helpful percentage at or above which helpfulness is reported as high
pub const HIGH_HELPFUL: f64 = 80.0;

/// A statement about how reviews are being received
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    /// Nothing recorded yet
    NoData,
    /// Average rating is below [`LOW_RATING`]
    LowSatisfaction { average_rating: f64 },
    /// Average rating is at least [`HIGH_RATING`]
    HighSatisfaction { average_rating: f64 },
    /// Helpful share is below [`LOW_HELPFUL`]
    LowHelpfulness { helpful_percentage: f64 },
    /// Helpful share is at least [`HIGH_HELPFUL`]
    HighHelpfulness { helpful_percentage: f64 },
    /// Language with the most feedback
    TopLanguage { language: String, count: usize },
}

impl Insight {
    /// Whether the insight calls for action
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Insight::LowSatisfaction { .. } | Insight::LowHelpfulness { .. }
        )
    }
}

impl std::fmt::Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insight::NoData => write!(f, "No feedback data yet."),
            Insight::LowSatisfaction { average_rating } => write!(
                f,
                "Average rating is low ({:.2}); review quality needs improvement.",
                average_rating
            ),
            Insight::HighSatisfaction { average_rating } => {
                write!(f, "Users are highly satisfied (average rating {:.2}).", average_rating)
            }
            Insight::LowHelpfulness { helpful_percentage } => write!(
                f,
                "Many users did not find reviews helpful ({:.2}% helpful).",
                helpful_percentage
            ),
            Insight::HighHelpfulness { helpful_percentage } => write!(
                f,
                "Most users rate reviews as helpful ({:.2}% helpful).",
                helpful_percentage
            ),
            Insight::TopLanguage { language, count } => {
                write!(f, "Most reviewed language: {} ({} reviews)", language, count)
            }
        }
    }
}

/// Derive insights from statistics, in a fixed order:
/// satisfaction, helpfulness, top language
pub fn derive(stats: &FeedbackStatistics) -> Vec<Insight> {
    if stats.total_reviews == 0 {
        return vec![Insight::NoData];
    }

    let mut insights = Vec::new();

    if stats.average_rating < LOW_RATING {
        insights.push(Insight::LowSatisfaction {
            average_rating: stats.average_rating,
        });
    } else if stats.average_rating >= HIGH_RATING {
        insights.push(Insight::HighSatisfaction {
            average_rating: stats.average_rating,
        });
    }

    if stats.helpful_percentage < LOW_HELPFUL {
        insights.push(Insight::LowHelpfulness {
            helpful_percentage: stats.helpful_percentage,
        });
    } else if stats.helpful_percentage >= HIGH_HELPFUL {
        insights.push(Insight::HighHelpfulness {
            helpful_percentage: stats.helpful_percentage,
        });
    }

    if let Some((language, count)) = stats.top_language() {
        insights.push(Insight::TopLanguage {
            language: language.to_string(),
            count,
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn stats(average: f64, helpful: f64, languages: &[(&str, usize)]) -> FeedbackStatistics {
        let language_distribution: BTreeMap<String, usize> = languages
            .iter()
            .map(|(l, c)| (l.to_string(), *c))
            .collect();
        FeedbackStatistics {
            total_reviews: language_distribution.values().sum(),
            average_rating: average,
            helpful_percentage: helpful,
            language_distribution,
            recent_suggestions: Vec::new(),
        }
    }

    #[test]
    fn test_no_data() {
        let insights = derive(&FeedbackStatistics::default());
        assert_eq!(insights, vec![Insight::NoData]);
        assert_eq!(insights[0].to_string(), "No feedback data yet.");
    }

    #[test]
    fn test_low_everything() {
        let insights = derive(&stats(2.5, 40.0, &[("Python", 3)]));
        assert_eq!(insights.len(), 3);
        assert!(matches!(insights[0], Insight::LowSatisfaction { .. }));
        assert!(matches!(insights[1], Insight::LowHelpfulness { .. }));
        assert!(insights[0].is_warning() && insights[1].is_warning());
        assert_eq!(
            insights[2],
            Insight::TopLanguage {
                language: "Python".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn test_high_everything() {
        let insights = derive(&stats(4.0, 80.0, &[("Rust", 1)]));
        assert!(matches!(insights[0], Insight::HighSatisfaction { .. }));
        assert!(matches!(insights[1], Insight::HighHelpfulness { .. }));
        assert!(!insights[0].is_warning());
    }

    #[test]
    fn test_middle_band_only_reports_language() {
        let insights = derive(&stats(3.0, 60.0, &[("Go", 2)]));
        assert_eq!(insights.len(), 1);
        assert!(matches!(insights[0], Insight::TopLanguage { .. }));

        let insights = derive(&stats(3.99, 79.99, &[("Go", 2)]));
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn test_top_language_tie_break() {
        let insights = derive(&stats(3.5, 70.0, &[("TypeScript", 2), ("C++", 2), ("PHP", 1)]));
        assert_eq!(
            insights.last().unwrap().to_string(),
            "Most reviewed language: C++ (2 reviews)"
        );
    }
}
