//! Checkpoint resumption: recomputing where a returning candidate continues.
//!
//! Resumption is derived from the answered-index set, not a simple counter:
//! a candidate who reloads mid-question, or whose answers arrived out of
//! order, lands on the lowest unanswered index every time.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{debug, instrument};

use crate::domain::models::{CompletionStatus, Question, TestType};
use crate::services::question_selector::QuestionSelector;
use crate::services::session_registry::SessionRegistry;

/// Where a session continues within one module.
#[derive(Debug, Clone, PartialEq)]
pub enum Resume {
    /// The lowest unanswered question, now set as the current index
    Next {
        /// Index into the pinned selection
        index: usize,
        /// The question at that index
        question: Question,
    },

    /// Every selected question is answered; the completion flag is latched
    AllComplete,
}

/// Computes the next unanswered question for a session, latching per-module
/// completion flags as modules are exhausted.
pub struct ResumptionResolver {
    registry: Arc<SessionRegistry>,
    selector: Arc<QuestionSelector>,
}

impl ResumptionResolver {
    /// Creates a resolver over the shared registry and selector.
    pub fn new(registry: Arc<SessionRegistry>, selector: Arc<QuestionSelector>) -> Self {
        Self { registry, selector }
    }

    /// Computes where the session continues in `test_type`, pinning a
    /// selection first if none exists yet.
    ///
    /// # Errors
    /// Returns error on an empty session id or a corpus failure.
    #[instrument(skip(self), err)]
    pub async fn resume(&self, session_id: &str, test_type: TestType) -> Result<Resume> {
        if session_id.is_empty() {
            return Err(anyhow!("session id cannot be empty"));
        }

        // Ensure a selection is pinned before consulting progress.
        self.selector
            .selected_questions(session_id, test_type)
            .await?;

        let handle = self.registry.get_or_create(session_id).await;
        let mut state = handle.lock().await;
        let progress = state.progress_mut(test_type);
        let selected = progress.selected.clone().unwrap_or_default();

        match (0..selected.len()).find(|index| !progress.answered.contains(index)) {
            Some(index) => {
                progress.current_index = index;
                Ok(Resume::Next {
                    index,
                    question: selected[index].clone(),
                })
            }
            None => {
                if !progress.completed {
                    debug!(session_id, %test_type, "module complete");
                }
                progress.completed = true;
                Ok(Resume::AllComplete)
            }
        }
    }

    /// Marks the module's current index answered, then resumes by the same
    /// lowest-unanswered rule.
    ///
    /// # Errors
    /// Returns error on an empty session id or a corpus failure.
    #[instrument(skip(self), err)]
    pub async fn advance(&self, session_id: &str, test_type: TestType) -> Result<Resume> {
        if session_id.is_empty() {
            return Err(anyhow!("session id cannot be empty"));
        }

        self.selector
            .selected_questions(session_id, test_type)
            .await?;

        {
            let handle = self.registry.get_or_create(session_id).await;
            let mut state = handle.lock().await;
            let current = state.progress(test_type).current_index;
            state.mark_answered(test_type, current);
        }

        self.resume(session_id, test_type).await
    }

    /// Completion flags across all modules; unseen sessions report all-false.
    pub async fn completion_status(&self, session_id: &str) -> CompletionStatus {
        match self.registry.get(session_id).await {
            Some(handle) => handle.lock().await.completion_status(),
            None => CompletionStatus::default(),
        }
    }
}
