pub mod applicant;
pub mod config;
pub mod evaluation;
pub mod question;
pub mod session;
pub mod test_type;

pub use applicant::{ApplicantRecord, Comment, TransientApplicant};
pub use config::{Config, DatabaseConfig, LoggingConfig, SessionConfig};
pub use evaluation::{EvaluationSegments, TransientEvaluation};
pub use question::Question;
pub use session::{CompletionStatus, QuestionStatus, SessionState, TestProgress};
pub use test_type::TestType;
