//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters must implement:
//! - `DocumentStore`: keyed JSON persistence for transient and permanent records
//! - `QuestionCorpus`: active-question lookup per test module
//!
//! These traits define the contracts that allow the domain to be independent
//! of specific infrastructure implementations.

pub mod document_store;
pub mod question_corpus;

pub use document_store::{collections, DocumentStore};
pub use question_corpus::QuestionCorpus;
