//! Critic Core - review pipeline and feedback analytics
//!
//! This crate validates code submissions, dispatches them to an analysis
//! service, tracks per-session review history and aggregates user feedback
//! into statistics and insights.

pub mod analysis;
pub mod config;
pub mod error;
pub mod feedback;
pub mod insights;
pub mod language;
pub mod pipeline;
pub mod review;
pub mod secrets;
pub mod session;

pub use analysis::AnalysisService;
pub use config::Config;
pub use error::{Error, Result};
pub use feedback::{
    FeedbackEntry, FeedbackRepository, FeedbackStatistics, FeedbackStore, FeedbackSubmission,
    JsonFileRepository, MemoryRepository,
};
pub use insights::Insight;
pub use pipeline::{FeedbackResult, ReviewPipeline};
pub use review::{
    CodeStats, ComplexityTier, Failure, FixRecord, FixResult, Outcome, ReviewRecord,
    ReviewRequest, ReviewResult, ReviewType,
};
pub use secrets::{ApiKey, KeySource};
pub use session::{Session, SessionStore};
