/// Question corpus port (trait) consumed by the selector.
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::question::Question;
use crate::domain::models::test_type::TestType;

/// Read access to the question corpus.
#[async_trait]
pub trait QuestionCorpus: Send + Sync {
    /// Active questions for one module, in corpus order.
    ///
    /// # Errors
    /// Returns error if the corpus backend fails.
    async fn list_active(&self, test_type: TestType) -> Result<Vec<Question>>;
}
