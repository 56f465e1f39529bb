//! Finalization: merging transient data into one durable applicant record.
//!
//! The merge is idempotent and comment-preserving: re-finalizing a session
//! replaces the record wholesale but never drops reviewer comments already
//! attached to it, and transient data is deleted only after the permanent
//! write is acknowledged.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domain::error::AssessmentError;
use crate::domain::models::{
    ApplicantRecord, Comment, EvaluationSegments, TestType, TransientApplicant,
    TransientEvaluation,
};
use crate::domain::ports::{collections, DocumentStore};
use crate::services::session_registry::SessionRegistry;

/// Consolidates a session's transient applicant and evaluation data into the
/// permanent applicant record.
pub struct RecordMerger {
    registry: Arc<SessionRegistry>,
    store: Arc<dyn DocumentStore>,
}

impl RecordMerger {
    /// Creates a merger over the shared registry and document store.
    pub fn new(registry: Arc<SessionRegistry>, store: Arc<dyn DocumentStore>) -> Self {
        Self { registry, store }
    }

    /// Stores an intake submission for later consolidation.
    ///
    /// # Errors
    /// Returns error on an empty session id or a store failure.
    #[instrument(skip(self, applicant), fields(session_id = %applicant.session_id), err)]
    pub async fn record_intake(&self, applicant: TransientApplicant) -> Result<()> {
        if applicant.session_id.is_empty() {
            return Err(anyhow!("session id cannot be empty"));
        }

        let value =
            serde_json::to_value(&applicant).context("failed to serialize transient applicant")?;
        self.store
            .upsert(collections::TRANSIENT_APPLICANTS, &applicant.session_id, value)
            .await
            .context("failed to store transient applicant")
    }

    /// Appends one evaluation entry to the session's `test_type` segment.
    ///
    /// The read-modify-write cycle runs under the session's own lock so
    /// duplicate submits cannot drop each other's entries. The entry payload
    /// is opaque; degraded results are recorded as given.
    ///
    /// # Errors
    /// Returns error on an empty session id, a corrupt stored document, or a
    /// store failure.
    #[instrument(skip(self, entry), err)]
    pub async fn append_evaluation(
        &self,
        session_id: &str,
        test_type: TestType,
        entry: Value,
    ) -> Result<()> {
        if session_id.is_empty() {
            return Err(anyhow!("session id cannot be empty"));
        }

        let handle = self.registry.get_or_create(session_id).await;
        let _guard = handle.lock().await;

        let mut segments = self
            .load_evaluation(session_id)
            .await?
            .unwrap_or_default();
        segments.segment_mut(test_type).push(entry);

        let value = serde_json::to_value(&segments)
            .context("failed to serialize transient evaluation")?;
        self.store
            .upsert(collections::TRANSIENT_EVALUATIONS, session_id, value)
            .await
            .context("failed to store transient evaluation")
    }

    /// Consolidates and persists the final record for `session_id`.
    ///
    /// Both transients must be present (`NotReady` otherwise); legacy flat
    /// evaluation documents migrate into the speech segment; comments on an
    /// existing record survive the replace. Transient data is deleted only
    /// after the upsert is acknowledged, so a failed write leaves the whole
    /// operation retryable.
    ///
    /// # Errors
    /// Returns `NotReady` when either transient is absent, `CorruptEvaluation`
    /// when the evaluation document is in no recognized schema, or a wrapped
    /// store failure.
    #[instrument(skip(self), err)]
    pub async fn finish(&self, session_id: &str) -> Result<ApplicantRecord> {
        if session_id.is_empty() {
            return Err(anyhow!("session id cannot be empty"));
        }

        let applicant = match self
            .store
            .get(collections::TRANSIENT_APPLICANTS, session_id)
            .await
            .context("failed to load transient applicant")?
        {
            Some(raw) => serde_json::from_value::<TransientApplicant>(raw)
                .context("failed to decode transient applicant")?,
            None => return Err(AssessmentError::NotReady(session_id.to_string()).into()),
        };

        let evaluations = match self.load_evaluation(session_id).await? {
            Some(segments) => segments,
            None => return Err(AssessmentError::NotReady(session_id.to_string()).into()),
        };

        let comments = match self.applicant_record(session_id).await? {
            Some(existing) => existing.comments,
            None => Vec::new(),
        };

        let now = Utc::now();
        let total_questions = evaluations.total_questions();
        let record = ApplicantRecord {
            id: session_id.to_string(),
            applicant_info: applicant.applicant,
            application_timestamp: applicant.submitted_at,
            evaluations,
            total_questions,
            completion_timestamp: now,
            last_updated: now,
            comments,
        };

        let value =
            serde_json::to_value(&record).context("failed to serialize applicant record")?;
        self.store
            .upsert(collections::APPLICANTS, session_id, value)
            .await
            .context("failed to persist applicant record")?;

        // The record is durable; only now may the transients go.
        self.store
            .delete(collections::TRANSIENT_APPLICANTS, session_id)
            .await
            .context("failed to delete transient applicant")?;
        self.store
            .delete(collections::TRANSIENT_EVALUATIONS, session_id)
            .await
            .context("failed to delete transient evaluation")?;

        self.registry.remove(session_id).await;

        info!(session_id, total_questions, "finalized applicant record");
        Ok(record)
    }

    /// Appends a reviewer comment to an existing permanent record.
    ///
    /// # Errors
    /// Returns `RecordNotFound` when no record exists for the session, or a
    /// wrapped store failure.
    #[instrument(skip(self, text), err)]
    pub async fn add_comment(
        &self,
        session_id: &str,
        author: &str,
        text: &str,
    ) -> Result<Comment> {
        let mut record = match self.applicant_record(session_id).await? {
            Some(record) => record,
            None => return Err(AssessmentError::RecordNotFound(session_id.to_string()).into()),
        };

        let comment = Comment::new(author, text);
        record.comments.push(comment.clone());
        record.last_updated = Utc::now();

        let value =
            serde_json::to_value(&record).context("failed to serialize applicant record")?;
        self.store
            .upsert(collections::APPLICANTS, session_id, value)
            .await
            .context("failed to persist applicant record")?;

        Ok(comment)
    }

    /// Permanent record for a session id, if one exists.
    ///
    /// # Errors
    /// Returns error on a store failure or an undecodable stored record.
    pub async fn applicant_record(&self, session_id: &str) -> Result<Option<ApplicantRecord>> {
        match self
            .store
            .get(collections::APPLICANTS, session_id)
            .await
            .context("failed to load applicant record")?
        {
            Some(raw) => Ok(Some(
                serde_json::from_value(raw).context("failed to decode applicant record")?,
            )),
            None => Ok(None),
        }
    }

    /// Every permanent record, newest application first.
    ///
    /// # Errors
    /// Returns error on a store failure or an undecodable stored record.
    pub async fn list_applicants(&self) -> Result<Vec<ApplicantRecord>> {
        let raws = self
            .store
            .list(collections::APPLICANTS)
            .await
            .context("failed to list applicant records")?;

        let mut records: Vec<ApplicantRecord> = Vec::with_capacity(raws.len());
        for raw in raws {
            records.push(serde_json::from_value(raw).context("failed to decode applicant record")?);
        }
        records.sort_by(|a, b| b.application_timestamp.cmp(&a.application_timestamp));
        Ok(records)
    }

    async fn load_evaluation(&self, session_id: &str) -> Result<Option<EvaluationSegments>> {
        let raw = match self
            .store
            .get(collections::TRANSIENT_EVALUATIONS, session_id)
            .await
            .context("failed to load transient evaluation")?
        {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let evaluation = TransientEvaluation::decode(&raw)
            .ok_or_else(|| AssessmentError::CorruptEvaluation(session_id.to_string()))?;
        Ok(Some(evaluation.normalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Mock store for testing, with switchable upsert failure.
    #[derive(Default)]
    struct MockDocumentStore {
        documents: Mutex<HashMap<(String, String), Value>>,
        fail_upserts: AtomicBool,
    }

    impl MockDocumentStore {
        fn contains(&self, collection: &str, key: &str) -> bool {
            self.documents
                .lock()
                .unwrap()
                .contains_key(&(collection.to_string(), key.to_string()))
        }

        fn insert_raw(&self, collection: &str, key: &str, value: Value) {
            self.documents
                .lock()
                .unwrap()
                .insert((collection.to_string(), key.to_string()), value);
        }
    }

    #[async_trait]
    impl DocumentStore for MockDocumentStore {
        async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
            Ok(self
                .documents
                .lock()
                .unwrap()
                .get(&(collection.to_string(), key.to_string()))
                .cloned())
        }

        async fn upsert(&self, collection: &str, key: &str, value: Value) -> Result<()> {
            if self.fail_upserts.load(Ordering::Acquire) {
                return Err(anyhow!("store unavailable"));
            }
            self.insert_raw(collection, key, value);
            Ok(())
        }

        async fn delete(&self, collection: &str, key: &str) -> Result<()> {
            self.documents
                .lock()
                .unwrap()
                .remove(&(collection.to_string(), key.to_string()));
            Ok(())
        }

        async fn list(&self, collection: &str) -> Result<Vec<Value>> {
            Ok(self
                .documents
                .lock()
                .unwrap()
                .iter()
                .filter(|((c, _), _)| c == collection)
                .map(|(_, v)| v.clone())
                .collect())
        }
    }

    fn merger() -> (Arc<SessionRegistry>, Arc<MockDocumentStore>, RecordMerger) {
        let registry = Arc::new(SessionRegistry::new());
        let store = Arc::new(MockDocumentStore::default());
        let merger = RecordMerger::new(
            Arc::clone(&registry),
            Arc::clone(&store) as Arc<dyn DocumentStore>,
        );
        (registry, store, merger)
    }

    fn intake(session_id: &str) -> TransientApplicant {
        TransientApplicant::new(
            session_id,
            json!({"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com"}),
        )
    }

    #[tokio::test]
    async fn test_finish_requires_both_transients() {
        let (_, store, merger) = merger();

        // Nothing stored at all.
        let error = merger.finish("session-1").await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AssessmentError>(),
            Some(AssessmentError::NotReady(_))
        ));

        // Applicant only.
        merger.record_intake(intake("session-1")).await.unwrap();
        let error = merger.finish("session-1").await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AssessmentError>(),
            Some(AssessmentError::NotReady(_))
        ));

        // Evaluation only.
        store
            .delete(collections::TRANSIENT_APPLICANTS, "session-1")
            .await
            .unwrap();
        merger
            .append_evaluation("session-1", TestType::Speech, json!({"score": 1}))
            .await
            .unwrap();
        let error = merger.finish("session-1").await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AssessmentError>(),
            Some(AssessmentError::NotReady(_))
        ));

        // No partial record was ever created.
        assert!(!store.contains(collections::APPLICANTS, "session-1"));
    }

    #[tokio::test]
    async fn test_finish_consolidates_and_cleans_up() {
        let (registry, store, merger) = merger();
        registry.get_or_create("session-1").await;

        merger.record_intake(intake("session-1")).await.unwrap();
        merger
            .append_evaluation("session-1", TestType::Speech, json!({"score": 80}))
            .await
            .unwrap();
        merger
            .append_evaluation("session-1", TestType::Typing, json!({"wpm": 62}))
            .await
            .unwrap();

        let record = merger.finish("session-1").await.unwrap();

        assert_eq!(record.id, "session-1");
        assert_eq!(record.total_questions, 2);
        assert_eq!(record.evaluations.speech_eval.len(), 1);
        assert_eq!(record.evaluations.typing_test.len(), 1);
        assert!(record.comments.is_empty());

        // Transients deleted, session state cleared, record persisted.
        assert!(!store.contains(collections::TRANSIENT_APPLICANTS, "session-1"));
        assert!(!store.contains(collections::TRANSIENT_EVALUATIONS, "session-1"));
        assert!(store.contains(collections::APPLICANTS, "session-1"));
        assert!(registry.get("session-1").await.is_none());
    }

    #[tokio::test]
    async fn test_second_finish_is_not_ready() {
        let (_, _, merger) = merger();

        merger.record_intake(intake("session-1")).await.unwrap();
        merger
            .append_evaluation("session-1", TestType::Written, json!({"score": 3}))
            .await
            .unwrap();
        merger.finish("session-1").await.unwrap();

        let error = merger.finish("session-1").await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AssessmentError>(),
            Some(AssessmentError::NotReady(_))
        ));
    }

    #[tokio::test]
    async fn test_refinalization_preserves_comments() {
        let (_, _, merger) = merger();

        merger.record_intake(intake("session-1")).await.unwrap();
        merger
            .append_evaluation("session-1", TestType::Listening, json!({"score": 9}))
            .await
            .unwrap();
        merger.finish("session-1").await.unwrap();

        let comment = merger
            .add_comment("session-1", "reviewer", "call back for round two")
            .await
            .unwrap();

        // Candidate retakes a module: transients exist again.
        merger.record_intake(intake("session-1")).await.unwrap();
        merger
            .append_evaluation("session-1", TestType::Listening, json!({"score": 10}))
            .await
            .unwrap();
        let record = merger.finish("session-1").await.unwrap();

        assert_eq!(record.comments.len(), 1);
        assert_eq!(record.comments[0].id, comment.id);
        assert_eq!(record.comments[0].text, "call back for round two");
        // Replace semantics: one record, latest evaluation data.
        assert_eq!(record.evaluations.listening_test.len(), 1);
        assert_eq!(
            record.evaluations.listening_test[0],
            json!({"score": 10})
        );
    }

    #[tokio::test]
    async fn test_legacy_flat_evaluation_migrates_into_speech() {
        let (_, store, merger) = merger();

        merger.record_intake(intake("session-1")).await.unwrap();
        store.insert_raw(
            collections::TRANSIENT_EVALUATIONS,
            "session-1",
            json!({"evaluations": [
                {"transcript": "a"}, {"transcript": "b"},
                {"transcript": "c"}, {"transcript": "d"}
            ]}),
        );

        let record = merger.finish("session-1").await.unwrap();

        assert_eq!(record.evaluations.speech_eval.len(), 4);
        assert!(record.evaluations.listening_test.is_empty());
        assert!(record.evaluations.written_test.is_empty());
        assert!(record.evaluations.personality_test.is_empty());
        assert!(record.evaluations.typing_test.is_empty());
        assert_eq!(record.total_questions, 4);
    }

    #[tokio::test]
    async fn test_corrupt_evaluation_is_rejected_not_dropped() {
        let (_, store, merger) = merger();

        merger.record_intake(intake("session-1")).await.unwrap();
        store.insert_raw(collections::TRANSIENT_EVALUATIONS, "session-1", json!(42));

        let error = merger.finish("session-1").await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AssessmentError>(),
            Some(AssessmentError::CorruptEvaluation(_))
        ));

        // Transients stay put for investigation.
        assert!(store.contains(collections::TRANSIENT_APPLICANTS, "session-1"));
        assert!(store.contains(collections::TRANSIENT_EVALUATIONS, "session-1"));
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_transients() {
        let (_, store, merger) = merger();

        merger.record_intake(intake("session-1")).await.unwrap();
        merger
            .append_evaluation("session-1", TestType::Speech, json!({"score": 80}))
            .await
            .unwrap();

        store.fail_upserts.store(true, Ordering::Release);
        assert!(merger.finish("session-1").await.is_err());

        // Retryable: both transients survive the aborted attempt.
        assert!(store.contains(collections::TRANSIENT_APPLICANTS, "session-1"));
        assert!(store.contains(collections::TRANSIENT_EVALUATIONS, "session-1"));

        store.fail_upserts.store(false, Ordering::Release);
        let record = merger.finish("session-1").await.unwrap();
        assert_eq!(record.total_questions, 1);
    }

    #[tokio::test]
    async fn test_append_evaluation_accumulates_per_segment() {
        let (_, _, merger) = merger();

        merger
            .append_evaluation("session-1", TestType::Written, json!({"score": 1}))
            .await
            .unwrap();
        merger
            .append_evaluation("session-1", TestType::Written, json!({"score": 2}))
            .await
            .unwrap();
        merger
            .append_evaluation("session-1", TestType::Personality, json!({"trait": "calm"}))
            .await
            .unwrap();

        let segments = merger.load_evaluation("session-1").await.unwrap().unwrap();
        assert_eq!(segments.written_test.len(), 2);
        assert_eq!(segments.personality_test.len(), 1);
        assert_eq!(segments.total_questions(), 3);
    }

    #[tokio::test]
    async fn test_append_accepts_degraded_payloads() {
        let (_, _, merger) = merger();

        // An external-service failure surfaces as an empty transcript and a
        // zero score; it still counts as an attempt.
        merger
            .append_evaluation(
                "session-1",
                TestType::Speech,
                json!({"transcript": "", "score": 0}),
            )
            .await
            .unwrap();
        merger
            .append_evaluation("session-1", TestType::Speech, json!(null))
            .await
            .unwrap();

        let segments = merger.load_evaluation("session-1").await.unwrap().unwrap();
        assert_eq!(segments.speech_eval.len(), 2);
    }

    #[tokio::test]
    async fn test_add_comment_requires_record() {
        let (_, _, merger) = merger();

        let error = merger
            .add_comment("session-1", "reviewer", "note")
            .await
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AssessmentError>(),
            Some(AssessmentError::RecordNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_applicants_sorts_newest_first() {
        let (_, _, merger) = merger();

        for (session_id, offset_minutes) in [("older", 10), ("newer", 0)] {
            let mut applicant = intake(session_id);
            applicant.submitted_at = Utc::now() - chrono::Duration::minutes(offset_minutes);
            merger.record_intake(applicant).await.unwrap();
            merger
                .append_evaluation(session_id, TestType::Speech, json!({"score": 1}))
                .await
                .unwrap();
            merger.finish(session_id).await.unwrap();
        }

        let records = merger.list_applicants().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "newer");
        assert_eq!(records[1].id, "older");
    }
}
