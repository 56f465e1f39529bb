//! `SQLite` adapters for the domain's persistence ports.

pub mod connection;
pub mod corpus_repo;
pub mod document_store;

pub use connection::DatabaseConnection;
pub use corpus_repo::SqliteQuestionCorpus;
pub use document_store::SqliteDocumentStore;
