use thiserror::Error;

use super::models::test_type::TestType;

/// Domain-level errors for assessment orchestration
#[derive(Error, Debug)]
pub enum AssessmentError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("question index {index} out of range for {test_type} (selection holds {len})")]
    IndexOutOfRange {
        test_type: TestType,
        index: usize,
        len: usize,
    },

    #[error("session {0} has no transient data to finalize")]
    NotReady(String),

    #[error("evaluation data for session {0} is in no recognized schema")]
    CorruptEvaluation(String),

    #[error("no applicant record for session {0}")]
    RecordNotFound(String),
}
