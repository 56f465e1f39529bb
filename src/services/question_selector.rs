//! One-time, session-pinned selection of a randomized question subset.
//!
//! Randomization is a per-(session, test type) decision made exactly once:
//! the first access draws `min(limit, active_pool)` questions and pins them,
//! and every later read returns the pinned list unchanged until an explicit
//! reset.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::domain::models::{Question, TestType};
use crate::domain::ports::QuestionCorpus;
use crate::services::session_registry::SessionRegistry;

/// Selects and caches a fixed-size randomized question subset per session.
pub struct QuestionSelector {
    registry: Arc<SessionRegistry>,
    corpus: Arc<dyn QuestionCorpus>,
    max_per_test: usize,
}

impl QuestionSelector {
    /// Creates a selector drawing at most `max_per_test` questions per module.
    pub fn new(
        registry: Arc<SessionRegistry>,
        corpus: Arc<dyn QuestionCorpus>,
        max_per_test: usize,
    ) -> Self {
        Self {
            registry,
            corpus,
            max_per_test,
        }
    }

    /// Questions pinned to this session for `test_type`, selecting them on
    /// first access. An empty pool yields an empty list, not an error.
    ///
    /// # Errors
    /// Returns error on an empty session id or a corpus failure.
    #[instrument(skip(self), err)]
    pub async fn selected_questions(
        &self,
        session_id: &str,
        test_type: TestType,
    ) -> Result<Vec<Question>> {
        if session_id.is_empty() {
            return Err(anyhow!("session id cannot be empty"));
        }

        let handle = self.registry.get_or_create(session_id).await;

        {
            let state = handle.lock().await;
            if let Some(selected) = &state.progress(test_type).selected {
                return Ok(selected.clone());
            }
        }

        // Fetch the pool without holding the session lock.
        let pool = self.corpus.list_active(test_type).await?;

        let mut state = handle.lock().await;
        let progress = state.progress_mut(test_type);
        // First writer wins: a racing call may have pinned a selection while
        // the corpus fetch was in flight.
        if let Some(selected) = &progress.selected {
            return Ok(selected.clone());
        }

        let selection = pick(pool, self.max_per_test);
        debug!(
            session_id,
            %test_type,
            count = selection.len(),
            "pinned question selection"
        );
        progress.selected = Some(selection.clone());
        Ok(selection)
    }

    /// Clears the pinned list and progress for the pair, then pins a fresh
    /// selection, which may differ from the previous one.
    ///
    /// # Errors
    /// Returns error on an empty session id or a corpus failure.
    #[instrument(skip(self), err)]
    pub async fn reset(&self, session_id: &str, test_type: TestType) -> Result<Vec<Question>> {
        if session_id.is_empty() {
            return Err(anyhow!("session id cannot be empty"));
        }

        let handle = self.registry.get_or_create(session_id).await;
        {
            let mut state = handle.lock().await;
            state.reset(test_type);
        }

        self.selected_questions(session_id, test_type).await
    }
}

/// `min(limit, active_len)` questions: a uniform random permutation prefix
/// when the active pool exceeds `limit`, pool order otherwise.
fn pick(pool: Vec<Question>, limit: usize) -> Vec<Question> {
    let mut active: Vec<Question> = pool.into_iter().filter(|q| q.active).collect();
    if active.len() > limit {
        active.shuffle(&mut rand::thread_rng());
        active.truncate(limit);
    }
    active
}
