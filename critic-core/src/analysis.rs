//! Analysis service abstraction
//!
//! The review pipeline talks to a language model only through this trait.
//! Implementations return errors as values; the pipeline turns them into
//! failure outcomes.

use async_trait::async_trait;

use crate::Result;

/// Capability that turns code into review text, tests or fixes
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Get the name of this service (for logs)
    fn name(&self) -> &str;

    /// Comprehensive review of `code`
    async fn analyze(&self, code: &str, language: &str) -> Result<String>;

    /// Generate unit tests for `code`
    async fn generate_tests(&self, code: &str, language: &str) -> Result<String>;

    /// Propose a fix for `issue` in `code`
    async fn quick_fix(&self, code: &str, issue: &str, language: &str) -> Result<String>;
}
