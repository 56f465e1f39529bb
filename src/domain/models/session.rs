/// Domain models for per-session orchestration state.
///
/// A session tracks, for each of the five test modules, which questions were
/// pinned to it, which indices the candidate has answered, and whether the
/// module is complete. State lives in memory only; it is created on first
/// access and destroyed on finalization, explicit clear, or idle eviction.
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::question::Question;
use super::test_type::TestType;

/// Progress through one test module within a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestProgress {
    /// Questions pinned to this session on first access; `None` until selected.
    /// Once `Some`, the sequence never changes except through an explicit reset.
    pub selected: Option<Vec<Question>>,

    /// Index of the question currently in front of the candidate
    pub current_index: usize,

    /// Indices the candidate has answered, in whatever order they arrived
    pub answered: BTreeSet<usize>,

    /// Latched once every selected index has been answered
    pub completed: bool,
}

impl TestProgress {
    /// Lowest selected index not yet answered, or `None` when none remains.
    pub fn next_unanswered(&self) -> Option<usize> {
        let len = self.selected.as_ref().map_or(0, Vec::len);
        (0..len).find(|index| !self.answered.contains(index))
    }

    /// True once a selection exists and every index in it has been answered.
    pub fn is_exhausted(&self) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|selected| self.answered.len() >= selected.len())
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Answered/current status of one module, returned by status probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct QuestionStatus {
    /// Whether the current index is in the answered set
    pub has_answered: bool,

    /// Current question index (0-based)
    pub current_index: usize,
}

/// Per-module completion flags for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CompletionStatus {
    /// Spoken-response module complete
    pub speech: bool,
    /// Listening module complete
    pub listening: bool,
    /// Written module complete
    pub written: bool,
    /// Personality module complete
    pub personality: bool,
    /// Typing module complete
    pub typing: bool,
}

impl CompletionStatus {
    /// Flag for one module.
    pub const fn get(self, test_type: TestType) -> bool {
        match test_type {
            TestType::Speech => self.speech,
            TestType::Listening => self.listening,
            TestType::Written => self.written,
            TestType::Personality => self.personality,
            TestType::Typing => self.typing,
        }
    }

    /// True when every module is complete.
    pub const fn all_complete(self) -> bool {
        self.speech && self.listening && self.written && self.personality && self.typing
    }
}

/// Mutable orchestration state for one assessment session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Opaque session identifier (primary key)
    pub id: String,

    progress: [TestProgress; 5],

    /// Last time any module's state was touched; input to idle eviction
    pub touched_at: DateTime<Utc>,
}

impl SessionState {
    /// Creates zero-valued state for an unseen session id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            progress: Default::default(),
            touched_at: Utc::now(),
        }
    }

    /// Read-only progress for one module.
    pub fn progress(&self, test_type: TestType) -> &TestProgress {
        &self.progress[test_type.index()]
    }

    /// Mutable progress for one module; refreshes the idle timestamp.
    pub fn progress_mut(&mut self, test_type: TestType) -> &mut TestProgress {
        self.touched_at = Utc::now();
        &mut self.progress[test_type.index()]
    }

    /// Clears the pinned selection and all progress for one module.
    pub fn reset(&mut self, test_type: TestType) {
        self.progress_mut(test_type).reset();
    }

    /// Adds `index` to the module's answered set.
    pub fn mark_answered(&mut self, test_type: TestType, index: usize) {
        self.progress_mut(test_type).answered.insert(index);
    }

    /// Latches the module's completion flag.
    pub fn mark_completed(&mut self, test_type: TestType) {
        self.progress_mut(test_type).completed = true;
    }

    /// Status of the module's current question.
    pub fn status(&self, test_type: TestType) -> QuestionStatus {
        let progress = self.progress(test_type);
        QuestionStatus {
            has_answered: progress.answered.contains(&progress.current_index),
            current_index: progress.current_index,
        }
    }

    /// Completion flags across all five modules.
    pub fn completion_status(&self) -> CompletionStatus {
        CompletionStatus {
            speech: self.progress(TestType::Speech).completed,
            listening: self.progress(TestType::Listening).completed,
            written: self.progress(TestType::Written).completed,
            personality: self.progress(TestType::Personality).completed,
            typing: self.progress(TestType::Typing).completed,
        }
    }

    /// Refreshes the idle timestamp without other mutation.
    pub fn touch(&mut self) {
        self.touched_at = Utc::now();
    }
}
