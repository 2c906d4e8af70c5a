//! Review requests, input validation and code statistics
//!
//! This module holds the value types that flow through the review pipeline
//! along with the pure checks and metrics computed before and after the
//! analysis service is called.

pub mod metrics;
pub mod types;
pub mod validate;

pub use metrics::{CodeStats, ComplexityTier};
pub use types::{
    Failure, FixRecord, FixResult, Outcome, ReviewRecord, ReviewRequest, ReviewResult, ReviewType,
};
pub use validate::{validate, validate_issue, validate_rating, MAX_CODE_CHARS};
