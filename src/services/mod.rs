pub mod progress_tracker;
pub mod question_selector;
pub mod record_merger;
pub mod resumption;
pub mod session_registry;
pub mod session_sweeper;

pub use progress_tracker::ProgressTracker;
pub use question_selector::QuestionSelector;
pub use record_merger::RecordMerger;
pub use resumption::{Resume, ResumptionResolver};
pub use session_registry::{SessionHandle, SessionRegistry};
pub use session_sweeper::{SessionSweeper, SweeperConfig, SweeperHandle};
