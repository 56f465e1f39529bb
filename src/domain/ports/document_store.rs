/// Document store port (trait) for dependency injection.
///
/// The orchestration engine treats persistence as an opaque keyed JSON store;
/// adapters own the actual storage mechanics. Services depend on this trait,
/// not concrete implementations.
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Collection names used by the orchestration engine.
pub mod collections {
    /// Intake submissions awaiting finalization
    pub const TRANSIENT_APPLICANTS: &str = "transient_applicants";

    /// In-progress evaluation documents
    pub const TRANSIENT_EVALUATIONS: &str = "transient_evaluations";

    /// Permanent applicant records
    pub const APPLICANTS: &str = "applicants";
}

/// Keyed JSON document persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document, `None` when absent.
    ///
    /// # Errors
    /// Returns error if the underlying store fails.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>>;

    /// Inserts or replaces the document under `(collection, key)`.
    ///
    /// # Errors
    /// Returns error if the write is not acknowledged; callers rely on a
    /// successful return meaning the document is durable.
    async fn upsert(&self, collection: &str, key: &str, value: Value) -> Result<()>;

    /// Deletes a document. Deleting an absent key is not an error.
    ///
    /// # Errors
    /// Returns error if the underlying store fails.
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;

    /// Lists every document in a collection.
    ///
    /// # Errors
    /// Returns error if the underlying store fails.
    async fn list(&self, collection: &str) -> Result<Vec<Value>>;
}
