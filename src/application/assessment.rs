//! Facade wiring the orchestration services behind one API surface.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use crate::domain::models::{
    ApplicantRecord, Comment, CompletionStatus, Question, QuestionStatus, SessionState, TestType,
    TransientApplicant,
};
use crate::domain::ports::{DocumentStore, QuestionCorpus};
use crate::services::progress_tracker::ProgressTracker;
use crate::services::question_selector::QuestionSelector;
use crate::services::record_merger::RecordMerger;
use crate::services::resumption::{Resume, ResumptionResolver};
use crate::services::session_registry::SessionRegistry;

/// Orchestration engine for one assessment deployment.
///
/// Route handlers call into this facade; the session-state invariants
/// (pinned selection, per-session serialization, idempotent finalization)
/// are enforced behind it.
pub struct AssessmentEngine {
    registry: Arc<SessionRegistry>,
    selector: Arc<QuestionSelector>,
    tracker: ProgressTracker,
    resolver: ResumptionResolver,
    merger: RecordMerger,
}

impl AssessmentEngine {
    /// Builds an engine over the given corpus and document store, pinning at
    /// most `max_questions_per_test` questions per module.
    pub fn new(
        corpus: Arc<dyn QuestionCorpus>,
        store: Arc<dyn DocumentStore>,
        max_questions_per_test: usize,
    ) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let selector = Arc::new(QuestionSelector::new(
            Arc::clone(&registry),
            corpus,
            max_questions_per_test,
        ));
        Self {
            tracker: ProgressTracker::new(Arc::clone(&registry)),
            resolver: ResumptionResolver::new(Arc::clone(&registry), Arc::clone(&selector)),
            merger: RecordMerger::new(Arc::clone(&registry), store),
            selector,
            registry,
        }
    }

    /// Registry shared with background tasks (the idle sweeper).
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Current state snapshot, creating zero-valued state for an unseen id.
    pub async fn session_snapshot(&self, session_id: &str) -> SessionState {
        let handle = self.registry.get_or_create(session_id).await;
        let state = handle.lock().await;
        state.clone()
    }

    /// Questions pinned to this session for `test_type`, selecting on first
    /// access.
    ///
    /// # Errors
    /// Returns error on invalid input or a corpus failure.
    pub async fn selected_questions(
        &self,
        session_id: &str,
        test_type: TestType,
    ) -> Result<Vec<Question>> {
        self.selector.selected_questions(session_id, test_type).await
    }

    /// Restarts a module: clears its pinned selection and progress, then pins
    /// a fresh selection.
    ///
    /// # Errors
    /// Returns error on invalid input or a corpus failure.
    pub async fn reset_questions(
        &self,
        session_id: &str,
        test_type: TestType,
    ) -> Result<Vec<Question>> {
        self.selector.reset(session_id, test_type).await
    }

    /// Records that the question at `index` was answered.
    ///
    /// # Errors
    /// Returns error on invalid input or an out-of-range index.
    pub async fn mark_answered(
        &self,
        session_id: &str,
        test_type: TestType,
        index: usize,
    ) -> Result<()> {
        self.tracker.mark_answered(session_id, test_type, index).await
    }

    /// Status of the module's current question; defaults for unseen sessions.
    pub async fn question_status(&self, session_id: &str, test_type: TestType) -> QuestionStatus {
        self.tracker.status(session_id, test_type).await
    }

    /// Where the session continues in `test_type`.
    ///
    /// # Errors
    /// Returns error on invalid input or a corpus failure.
    pub async fn resume(&self, session_id: &str, test_type: TestType) -> Result<Resume> {
        self.resolver.resume(session_id, test_type).await
    }

    /// Marks the current question answered and moves to the next unanswered
    /// one.
    ///
    /// # Errors
    /// Returns error on invalid input or a corpus failure.
    pub async fn advance(&self, session_id: &str, test_type: TestType) -> Result<Resume> {
        self.resolver.advance(session_id, test_type).await
    }

    /// Per-module completion flags; all-false for unseen sessions.
    pub async fn test_completion_status(&self, session_id: &str) -> CompletionStatus {
        self.resolver.completion_status(session_id).await
    }

    /// Stores an intake submission for later consolidation.
    ///
    /// # Errors
    /// Returns error on invalid input or a store failure.
    pub async fn record_intake(&self, applicant: TransientApplicant) -> Result<()> {
        self.merger.record_intake(applicant).await
    }

    /// Appends one externally produced evaluation entry to the session's
    /// `test_type` segment.
    ///
    /// # Errors
    /// Returns error on invalid input or a store failure.
    pub async fn append_evaluation(
        &self,
        session_id: &str,
        test_type: TestType,
        entry: Value,
    ) -> Result<()> {
        self.merger.append_evaluation(session_id, test_type, entry).await
    }

    /// Consolidates the session's transient data into the permanent record.
    ///
    /// # Errors
    /// Returns `NotReady` when transient data is missing, `CorruptEvaluation`
    /// for unrecognizable evaluation documents, or a wrapped store failure.
    pub async fn finish(&self, session_id: &str) -> Result<ApplicantRecord> {
        self.merger.finish(session_id).await
    }

    /// Appends a reviewer comment to an existing permanent record.
    ///
    /// # Errors
    /// Returns `RecordNotFound` when no record exists, or a store failure.
    pub async fn add_comment(
        &self,
        session_id: &str,
        author: &str,
        text: &str,
    ) -> Result<Comment> {
        self.merger.add_comment(session_id, author, text).await
    }

    /// Permanent record for a session, if one exists.
    ///
    /// # Errors
    /// Returns error on a store failure.
    pub async fn applicant_record(&self, session_id: &str) -> Result<Option<ApplicantRecord>> {
        self.merger.applicant_record(session_id).await
    }

    /// Every permanent record, newest application first.
    ///
    /// # Errors
    /// Returns error on a store failure.
    pub async fn list_applicants(&self) -> Result<Vec<ApplicantRecord>> {
        self.merger.list_applicants().await
    }

    /// Drops in-memory state for a session without touching stored documents.
    pub async fn clear_session(&self, session_id: &str) -> bool {
        self.registry.remove(session_id).await
    }
}
