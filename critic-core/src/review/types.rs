//! Review requests and the results handed back to callers
//!
//! Every pipeline operation produces an [`Outcome`]: either the successful
//! record or a [`Failure`] carrying a human-readable message. Failures are
//! values, never faults crossing the pipeline boundary.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::CodeStats;
use crate::Error;

/// The type of review being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    /// Full review across bugs, style, performance, refactoring, tests and complexity
    #[default]
    Comprehensive,
    /// Generate unit tests for the snippet
    TestCases,
    /// Targeted fix for a described issue
    QuickFix,
}

impl ReviewType {
    /// All review types, in display order
    pub const ALL: [ReviewType; 3] = [
        ReviewType::Comprehensive,
        ReviewType::TestCases,
        ReviewType::QuickFix,
    ];

    /// Wire name of the review type
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::Comprehensive => "comprehensive",
            ReviewType::TestCases => "test_cases",
            ReviewType::QuickFix => "quick_fix",
        }
    }

    /// Get a human-readable description of the review type
    pub fn description(&self) -> &'static str {
        match self {
            ReviewType::Comprehensive => "Comprehensive Review",
            ReviewType::TestCases => "Test Case Generation",
            ReviewType::QuickFix => "Quick Fix",
        }
    }
}

impl std::fmt::Display for ReviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl FromStr for ReviewType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "comprehensive" => Ok(ReviewType::Comprehensive),
            "test_cases" | "tests" => Ok(ReviewType::TestCases),
            "quick_fix" | "fix" => Ok(ReviewType::QuickFix),
            other => Err(Error::Validation(format!(
                "unknown review type '{}' (expected comprehensive, test_cases or quick_fix)",
                other
            ))),
        }
    }
}

/// A review submitted to the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Code to review
    pub code: String,
    /// Language tag of the code
    pub language: String,
    /// What kind of review to run
    pub review_type: ReviewType,
    /// Issue to fix (quick fix only)
    pub issue_description: Option<String>,
}

impl ReviewRequest {
    /// Create a comprehensive review request
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            review_type: ReviewType::Comprehensive,
            issue_description: None,
        }
    }

    /// Set the review type
    pub fn with_type(mut self, review_type: ReviewType) -> Self {
        self.review_type = review_type;
        self
    }

    /// Set the issue description
    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issue_description = Some(issue.into());
        self
    }
}

/// A completed review, as stored in the session history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Text returned by the analysis service
    pub review_text: String,
    /// Code that was reviewed
    pub code: String,
    /// Language tag of the code
    pub language: String,
    /// Review type that was run
    pub review_type: ReviewType,
    /// When the review completed
    pub timestamp: DateTime<Utc>,
    /// Session the review belongs to
    pub session_id: String,
    /// Line and size statistics of the code
    pub code_stats: CodeStats,
}

/// A completed quick fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRecord {
    /// Fixed code and explanation
    pub fix_text: String,
    /// Code as submitted
    pub original_code: String,
    /// Issue the fix addresses
    pub issue: String,
    /// Language tag of the code
    pub language: String,
    /// When the fix completed
    pub timestamp: DateTime<Utc>,
}

/// A failed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Human-readable reason
    pub error: String,
    /// When the failure was produced
    pub timestamp: DateTime<Utc>,
}

impl Failure {
    /// Create a failure stamped with the current time
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Success or failure of a pipeline operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The operation completed
    Success(T),
    /// The operation failed; nothing was recorded
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// Build a failure outcome
    pub fn failed(error: impl Into<String>) -> Self {
        Outcome::Failure(Failure::new(error))
    }

    /// Whether the operation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The failure message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(f) => Some(&f.error),
        }
    }

    /// The successful value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(v) => Some(v),
            Outcome::Failure(_) => None,
        }
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Outcome::Success(v) => Ok(v),
            Outcome::Failure(f) => Err(f),
        }
    }
}

/// Result of `process_review`
pub type ReviewResult = Outcome<ReviewRecord>;

/// Result of `process_quick_fix`
pub type FixResult = Outcome<FixRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_type_parse() {
        assert_eq!(
            "comprehensive".parse::<ReviewType>().unwrap(),
            ReviewType::Comprehensive
        );
        assert_eq!(
            "test-cases".parse::<ReviewType>().unwrap(),
            ReviewType::TestCases
        );
        assert_eq!("Quick_Fix".parse::<ReviewType>().unwrap(), ReviewType::QuickFix);
    }

    #[test]
    fn test_unknown_review_type_is_validation_error() {
        let err = "security".parse::<ReviewType>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("security"));
    }

    #[test]
    fn test_review_type_names_roundtrip() {
        for review_type in ReviewType::ALL {
            assert_eq!(review_type.as_str().parse::<ReviewType>().unwrap(), review_type);
        }
    }

    #[test]
    fn test_request_builder() {
        let request = ReviewRequest::new("x = 1", "Python")
            .with_type(ReviewType::QuickFix)
            .with_issue("off by one");

        assert_eq!(request.review_type, ReviewType::QuickFix);
        assert_eq!(request.issue_description.as_deref(), Some("off by one"));
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: Outcome<u32> = Outcome::Success(7);
        assert!(ok.is_success());
        assert_eq!(ok.value(), Some(&7));
        assert!(ok.error().is_none());

        let failed: Outcome<u32> = Outcome::failed("no code provided");
        assert!(!failed.is_success());
        assert_eq!(failed.error(), Some("no code provided"));
        assert!(failed.into_result().is_err());
    }

    #[test]
    fn test_failure_serializes_with_status_tag() {
        let failed: Outcome<FixRecord> = Outcome::failed("boom");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["error"], "boom");
    }
}
