use serde::{Deserialize, Serialize};

use super::test_type::TestType;

/// A corpus question served to candidates during one of the test modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique question identifier
    pub id: String,

    /// Module this question belongs to
    pub test_type: TestType,

    /// Prompt text shown (or spoken) to the candidate
    pub text: String,

    /// Keywords the external scoring service matches answers against
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Inactive questions are never selected into a session
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl Question {
    /// Creates an active question with no keywords.
    pub fn new(id: impl Into<String>, test_type: TestType, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            test_type,
            text: text.into(),
            keywords: Vec::new(),
            active: true,
        }
    }
}
