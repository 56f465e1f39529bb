//! Answered-question bookkeeping against the session registry.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::instrument;

use crate::domain::error::AssessmentError;
use crate::domain::models::{QuestionStatus, TestType};
use crate::services::session_registry::SessionRegistry;

/// Records which questions a session has answered and reports per-module
/// status. Pure state mutation and reads; no external I/O.
pub struct ProgressTracker {
    registry: Arc<SessionRegistry>,
}

impl ProgressTracker {
    /// Creates a tracker over the shared registry.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Adds `index` to the module's answered set.
    ///
    /// # Errors
    /// Rejects an empty session id, or an index outside the pinned selection,
    /// before touching state. When no selection is pinned yet the range is
    /// undeclared and any index is accepted.
    #[instrument(skip(self), err)]
    pub async fn mark_answered(
        &self,
        session_id: &str,
        test_type: TestType,
        index: usize,
    ) -> Result<()> {
        if session_id.is_empty() {
            return Err(anyhow!("session id cannot be empty"));
        }

        let handle = self.registry.get_or_create(session_id).await;
        let mut state = handle.lock().await;

        if let Some(selected) = &state.progress(test_type).selected {
            if index >= selected.len() {
                return Err(AssessmentError::IndexOutOfRange {
                    test_type,
                    index,
                    len: selected.len(),
                }
                .into());
            }
        }

        state.mark_answered(test_type, index);
        Ok(())
    }

    /// Whether the module's current index has been answered, and what it is.
    ///
    /// An unseen session yields the zero-valued default; a status probe is a
    /// normal condition, not an error.
    pub async fn status(&self, session_id: &str, test_type: TestType) -> QuestionStatus {
        match self.registry.get(session_id).await {
            Some(handle) => handle.lock().await.status(test_type),
            None => QuestionStatus::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Question;

    fn tracker() -> (Arc<SessionRegistry>, ProgressTracker) {
        let registry = Arc::new(SessionRegistry::new());
        (Arc::clone(&registry), ProgressTracker::new(registry))
    }

    async fn pin_selection(registry: &SessionRegistry, session_id: &str, count: usize) {
        let handle = registry.get_or_create(session_id).await;
        let mut state = handle.lock().await;
        state.progress_mut(TestType::Speech).selected = Some(
            (0..count)
                .map(|i| Question::new(format!("q{i}"), TestType::Speech, format!("prompt {i}")))
                .collect(),
        );
    }

    #[tokio::test]
    async fn test_mark_answered_records_index() {
        let (registry, tracker) = tracker();
        pin_selection(&registry, "session-1", 3).await;

        tracker
            .mark_answered("session-1", TestType::Speech, 1)
            .await
            .unwrap();

        let handle = registry.get_or_create("session-1").await;
        let state = handle.lock().await;
        assert!(state.progress(TestType::Speech).answered.contains(&1));
    }

    #[tokio::test]
    async fn test_mark_answered_rejects_out_of_range_index() {
        let (registry, tracker) = tracker();
        pin_selection(&registry, "session-1", 3).await;

        let result = tracker.mark_answered("session-1", TestType::Speech, 3).await;
        let error = result.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AssessmentError>(),
            Some(AssessmentError::IndexOutOfRange { index: 3, len: 3, .. })
        ));

        // Rejected before touching state.
        let handle = registry.get_or_create("session-1").await;
        let state = handle.lock().await;
        assert!(state.progress(TestType::Speech).answered.is_empty());
    }

    #[tokio::test]
    async fn test_mark_answered_without_selection_is_permissive() {
        let (_, tracker) = tracker();
        tracker
            .mark_answered("session-1", TestType::Speech, 7)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_status_probe_on_unseen_session_is_default() {
        let (registry, tracker) = tracker();

        let status = tracker.status("unseen", TestType::Written).await;
        assert_eq!(status, QuestionStatus::default());
        // The probe must not create the session as a side effect.
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_status_reflects_current_index() {
        let (registry, tracker) = tracker();
        pin_selection(&registry, "session-1", 3).await;

        tracker
            .mark_answered("session-1", TestType::Speech, 0)
            .await
            .unwrap();

        let status = tracker.status("session-1", TestType::Speech).await;
        assert!(status.has_answered);
        assert_eq!(status.current_index, 0);
    }

    #[tokio::test]
    async fn test_empty_session_id_is_rejected() {
        let (_, tracker) = tracker();
        assert!(tracker
            .mark_answered("", TestType::Speech, 0)
            .await
            .is_err());
    }
}
