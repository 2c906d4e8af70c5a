//! End-to-end review orchestration
//!
//! The pipeline validates input, dispatches to the analysis service by review
//! type, computes code statistics and records completed reviews in the
//! current session. Feedback is forwarded to the feedback store.
//!
//! Every operation returns an [`Outcome`]; validation and analysis errors are
//! reported as failures and never escape as `Err`. Mutating operations take
//! `&mut self`, so a pipeline shared between tasks must sit behind a mutex.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::analysis::AnalysisService;
use crate::config::Config;
use crate::feedback::{
    FeedbackEntry, FeedbackStatistics, FeedbackStore, FeedbackSubmission, JsonFileRepository,
};
use crate::insights::{self, Insight};
use crate::review::{
    metrics, validate, validate_issue, validate_rating, FixRecord, FixResult, Outcome,
    ReviewRecord, ReviewRequest, ReviewResult, ReviewType,
};
use crate::session::{new_session_id, Session, SessionStore};
use crate::Result;

/// Result of `collect_feedback`
pub type FeedbackResult = Outcome<FeedbackEntry>;

/// Review orchestrator holding one active session at a time
pub struct ReviewPipeline {
    analyzer: Arc<dyn AnalysisService>,
    feedback: FeedbackStore,
    sessions: SessionStore,
    current_session: Option<String>,
}

impl ReviewPipeline {
    /// Assemble a pipeline from its parts
    pub fn new(
        analyzer: Arc<dyn AnalysisService>,
        feedback: FeedbackStore,
        sessions: SessionStore,
    ) -> Self {
        Self {
            analyzer,
            feedback,
            sessions,
            current_session: None,
        }
    }

    /// Build a pipeline with the feedback log and session limits from `config`
    pub fn from_config(analyzer: Arc<dyn AnalysisService>, config: &Config) -> Result<Self> {
        let feedback = FeedbackStore::open(JsonFileRepository::new(&config.feedback.path));
        let sessions = SessionStore::new(config.sessions.max_sessions)?;
        Ok(Self::new(analyzer, feedback, sessions))
    }

    /// Start a fresh session and make it current
    ///
    /// Earlier sessions stay in the store until evicted or ended.
    pub fn start_new_session(&mut self) -> String {
        let id = self.sessions.start(new_session_id());
        self.current_session = Some(id.clone());
        id
    }

    /// Identifier of the current session
    pub fn current_session(&self) -> Option<&str> {
        self.current_session.as_deref()
    }

    /// Run a review and record it in the current session
    pub async fn process_review(&mut self, request: ReviewRequest) -> ReviewResult {
        let session_id = match self.current_session.clone() {
            Some(id) if self.sessions.contains(&id) => id,
            _ => self.start_new_session(),
        };

        let ReviewRequest {
            code,
            language,
            review_type,
            ..
        } = request;

        if let Err(e) = validate(&code, &language) {
            debug!(error = %e, "Rejected review request");
            return Outcome::failed(e.to_string());
        }

        debug!(
            service = self.analyzer.name(),
            review_type = review_type.as_str(),
            language = %language,
            "Dispatching review"
        );

        // Quick fixes need an issue description and go through process_quick_fix;
        // a quick-fix request arriving here gets the comprehensive review.
        let response = match review_type {
            ReviewType::TestCases => self.analyzer.generate_tests(&code, &language).await,
            ReviewType::Comprehensive | ReviewType::QuickFix => {
                self.analyzer.analyze(&code, &language).await
            }
        };

        let review_text = match response {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, session_id = %session_id, "Review failed");
                return Outcome::failed(format!("review failed: {}", e));
            }
        };

        let record = ReviewRecord {
            review_text,
            code_stats: metrics::analyze(&code),
            code,
            language,
            review_type,
            timestamp: Utc::now(),
            session_id: session_id.clone(),
        };

        self.sessions.add_review(&session_id, record.clone());
        info!(
            session_id = %session_id,
            review_type = review_type.as_str(),
            lines = record.code_stats.total_lines,
            "Review completed"
        );

        Outcome::Success(record)
    }

    /// Ask for a targeted fix; the session history is left untouched
    pub async fn process_quick_fix(&self, code: &str, issue: &str, language: &str) -> FixResult {
        if let Err(e) = validate(code, language).and_then(|_| validate_issue(issue)) {
            debug!(error = %e, "Rejected quick fix request");
            return Outcome::failed(e.to_string());
        }

        match self.analyzer.quick_fix(code, issue, language).await {
            Ok(fix_text) => {
                info!(language, "Quick fix completed");
                Outcome::Success(FixRecord {
                    fix_text,
                    original_code: code.to_string(),
                    issue: issue.to_string(),
                    language: language.to_string(),
                    timestamp: Utc::now(),
                })
            }
            Err(e) => {
                error!(error = %e, "Quick fix failed");
                Outcome::failed(format!("quick fix failed: {}", e))
            }
        }
    }

    /// Record user feedback on a review
    pub fn collect_feedback(&mut self, submission: FeedbackSubmission) -> FeedbackResult {
        if let Err(e) = validate_rating(submission.rating) {
            return Outcome::failed(format!("feedback collection failed: {}", e));
        }
        Outcome::Success(self.feedback.record(submission))
    }

    /// Aggregate statistics over all recorded feedback
    pub fn feedback_statistics(&self) -> FeedbackStatistics {
        self.feedback.statistics()
    }

    /// Insights derived from the current feedback statistics
    pub fn improvement_insights(&self) -> Vec<Insight> {
        insights::derive(&self.feedback.statistics())
    }

    /// Reviews recorded in the current session
    pub fn session_history(&self) -> &[ReviewRecord] {
        match self.current_session {
            Some(ref id) => self.sessions.history(id),
            None => &[],
        }
    }

    /// Tear down a session
    ///
    /// Ending the current session leaves the pipeline without one; the next
    /// review starts a new session.
    pub fn end_session(&mut self, session_id: &str) -> Option<Session> {
        if self.current_session.as_deref() == Some(session_id) {
            self.current_session = None;
        }
        self.sessions.remove(session_id)
    }

    /// The session store
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// The feedback store
    pub fn feedback(&self) -> &FeedbackStore {
        &self.feedback
    }
}

impl std::fmt::Debug for ReviewPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewPipeline")
            .field("analyzer", &self.analyzer.name())
            .field("current_session", &self.current_session)
            .field("sessions", &self.sessions)
            .field("feedback", &self.feedback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::MemoryRepository;
    use crate::review::MAX_CODE_CHARS;
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Analysis service that answers from fixed text and counts calls
    #[derive(Default)]
    struct ScriptedAnalyzer {
        fail: bool,
        analyze_calls: AtomicUsize,
        test_calls: AtomicUsize,
        fix_calls: AtomicUsize,
    }

    impl ScriptedAnalyzer {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn total_calls(&self) -> usize {
            self.analyze_calls.load(Ordering::SeqCst)
                + self.test_calls.load(Ordering::SeqCst)
                + self.fix_calls.load(Ordering::SeqCst)
        }

        fn answer(&self, counter: &AtomicUsize, text: &str) -> Result<String> {
            counter.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::Analysis("quota exceeded".to_string()))
            } else {
                Ok(text.to_string())
            }
        }
    }

    #[async_trait]
    impl AnalysisService for ScriptedAnalyzer {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn analyze(&self, _code: &str, _language: &str) -> Result<String> {
            self.answer(&self.analyze_calls, "looks fine")
        }

        async fn generate_tests(&self, _code: &str, _language: &str) -> Result<String> {
            self.answer(&self.test_calls, "def test_it(): pass")
        }

        async fn quick_fix(&self, _code: &str, _issue: &str, _language: &str) -> Result<String> {
            self.answer(&self.fix_calls, "fixed")
        }
    }

    fn pipeline(analyzer: Arc<ScriptedAnalyzer>) -> ReviewPipeline {
        ReviewPipeline::new(
            analyzer,
            FeedbackStore::open(MemoryRepository::new()),
            SessionStore::new(8).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_new_session_then_one_review() {
        let analyzer = Arc::new(ScriptedAnalyzer::default());
        let mut pipeline = pipeline(analyzer.clone());

        let id = pipeline.start_new_session();
        assert!(pipeline.session_history().is_empty());
        assert_eq!(pipeline.sessions().history(&id).len(), 0);

        let result = pipeline
            .process_review(ReviewRequest::new("x = 1\ny = 2", "Python"))
            .await;
        let record = result.value().unwrap();
        assert_eq!(record.review_text, "looks fine");
        assert_eq!(record.session_id, id);
        assert_eq!(record.code_stats.total_lines, 2);
        assert_eq!(pipeline.session_history().len(), 1);
        assert_eq!(analyzer.analyze_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_review_starts_session_implicitly() {
        let mut pipeline = pipeline(Arc::new(ScriptedAnalyzer::default()));
        assert!(pipeline.current_session().is_none());

        let result = pipeline.process_review(ReviewRequest::new("x", "Go")).await;
        assert!(result.is_success());
        assert!(pipeline.current_session().is_some());
        assert_eq!(pipeline.session_history().len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_code_never_reaches_analyzer() {
        let analyzer = Arc::new(ScriptedAnalyzer::default());
        let mut pipeline = pipeline(analyzer.clone());

        let code = "a".repeat(MAX_CODE_CHARS + 1);
        let result = pipeline.process_review(ReviewRequest::new(code, "Rust")).await;

        assert_eq!(result.error(), Some("code too long (max 10,000 characters)"));
        assert_eq!(analyzer.total_calls(), 0);
        assert!(pipeline.session_history().is_empty());
    }

    #[tokio::test]
    async fn test_blank_code_fails_validation() {
        let analyzer = Arc::new(ScriptedAnalyzer::default());
        let mut pipeline = pipeline(analyzer.clone());

        for code in ["", "   ", "\n\t\n"] {
            let result = pipeline.process_review(ReviewRequest::new(code, "Rust")).await;
            assert_eq!(result.error(), Some("no code provided"));
        }
        assert_eq!(analyzer.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_by_review_type() {
        let analyzer = Arc::new(ScriptedAnalyzer::default());
        let mut pipeline = pipeline(analyzer.clone());

        let tests = pipeline
            .process_review(ReviewRequest::new("fn f() {}", "Rust").with_type(ReviewType::TestCases))
            .await;
        assert_eq!(tests.value().unwrap().review_text, "def test_it(): pass");
        assert_eq!(analyzer.test_calls.load(Ordering::SeqCst), 1);

        let fallback = pipeline
            .process_review(
                ReviewRequest::new("fn f() {}", "Rust")
                    .with_type(ReviewType::QuickFix)
                    .with_issue("unused"),
            )
            .await;
        assert_eq!(fallback.value().unwrap().review_type, ReviewType::QuickFix);
        assert_eq!(analyzer.analyze_calls.load(Ordering::SeqCst), 1);
        assert_eq!(analyzer.fix_calls.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.session_history().len(), 2);
    }

    #[tokio::test]
    async fn test_analysis_error_becomes_failure() {
        let mut pipeline = pipeline(Arc::new(ScriptedAnalyzer::failing()));
        let id = pipeline.start_new_session();

        let result = pipeline.process_review(ReviewRequest::new("x", "Python")).await;
        let error = result.error().unwrap();
        assert!(error.starts_with("review failed:"));
        assert!(error.contains("quota exceeded"));
        assert!(pipeline.sessions().history(&id).is_empty());
    }

    #[tokio::test]
    async fn test_quick_fix_does_not_touch_sessions() {
        let analyzer = Arc::new(ScriptedAnalyzer::default());
        let pipeline = pipeline(analyzer.clone());

        let result = pipeline
            .process_quick_fix("let x = 1", "x is unused", "Rust")
            .await;
        let fix = result.value().unwrap();
        assert_eq!(fix.fix_text, "fixed");
        assert_eq!(fix.issue, "x is unused");
        assert!(pipeline.sessions().is_empty());
        assert!(pipeline.current_session().is_none());
    }

    #[tokio::test]
    async fn test_quick_fix_errors() {
        let pipeline = pipeline(Arc::new(ScriptedAnalyzer::failing()));

        let missing_issue = pipeline.process_quick_fix("x", " ", "Rust").await;
        assert_eq!(missing_issue.error(), Some("no issue description provided"));

        let failed = pipeline.process_quick_fix("x", "crash", "Rust").await;
        assert!(failed.error().unwrap().starts_with("quick fix failed:"));
    }

    #[test]
    fn test_feedback_statistics_after_one_entry() {
        let mut pipeline = pipeline(Arc::new(ScriptedAnalyzer::default()));
        let result =
            pipeline.collect_feedback(FeedbackSubmission::new("review", "code", "Python", 5, true));
        assert!(result.is_success());

        let stats = pipeline.feedback_statistics();
        assert_eq!(stats.average_rating, 5.0);
        assert_eq!(stats.helpful_percentage, 100.0);
    }

    #[test]
    fn test_feedback_average_of_two() {
        let mut pipeline = pipeline(Arc::new(ScriptedAnalyzer::default()));
        pipeline.collect_feedback(FeedbackSubmission::new("r", "c", "Go", 2, false));
        pipeline.collect_feedback(FeedbackSubmission::new("r", "c", "Go", 4, true));
        assert_eq!(pipeline.feedback_statistics().average_rating, 3.0);
    }

    #[test]
    fn test_out_of_range_rating_rejected() {
        let mut pipeline = pipeline(Arc::new(ScriptedAnalyzer::default()));
        let result = pipeline.collect_feedback(FeedbackSubmission::new("r", "c", "Go", 9, true));
        assert!(result.error().unwrap().contains("between 1 and 5"));
        assert_eq!(pipeline.feedback_statistics().total_reviews, 0);
    }

    #[test]
    fn test_insights_delegate_to_feedback() {
        let mut pipeline = pipeline(Arc::new(ScriptedAnalyzer::default()));
        assert_eq!(pipeline.improvement_insights(), vec![Insight::NoData]);

        pipeline.collect_feedback(FeedbackSubmission::new("r", "c", "Rust", 5, true));
        let insights = pipeline.improvement_insights();
        assert!(matches!(insights[0], Insight::HighSatisfaction { .. }));
        assert!(matches!(insights.last(), Some(Insight::TopLanguage { .. })));
    }

    #[tokio::test]
    async fn test_end_current_session() {
        let mut pipeline = pipeline(Arc::new(ScriptedAnalyzer::default()));
        let first = pipeline.start_new_session();
        pipeline.process_review(ReviewRequest::new("x", "Go")).await;

        let ended = pipeline.end_session(&first).unwrap();
        assert_eq!(ended.reviews.len(), 1);
        assert!(pipeline.current_session().is_none());
        assert!(pipeline.session_history().is_empty());

        pipeline.process_review(ReviewRequest::new("y", "Go")).await;
        let second = pipeline.current_session().unwrap().to_string();
        assert_ne!(second, first);
        assert_eq!(pipeline.session_history().len(), 1);
    }

    #[test]
    fn test_consecutive_sessions_are_distinct() {
        let mut pipeline = pipeline(Arc::new(ScriptedAnalyzer::default()));
        let a = pipeline.start_new_session();
        let b = pipeline.start_new_session();
        assert_ne!(a, b);
        assert_eq!(pipeline.sessions().len(), 2);
        assert_eq!(pipeline.current_session(), Some(b.as_str()));
    }

    #[test]
    fn test_from_config_uses_feedback_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.feedback.path = dir.path().join("feedback.json");
        config.sessions.max_sessions = 3;

        let mut pipeline =
            ReviewPipeline::from_config(Arc::new(ScriptedAnalyzer::default()), &config).unwrap();
        pipeline.collect_feedback(FeedbackSubmission::new("r", "c", "Ruby", 4, true));

        assert!(config.feedback.path.exists());
        assert_eq!(pipeline.sessions().capacity(), 3);
    }
}
