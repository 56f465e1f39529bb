//! Proctor - Assessment Session Orchestration Engine
//!
//! Proctor coordinates a multi-stage hiring assessment: a candidate works
//! through five independent test modules (spoken response, listening
//! comprehension, written quiz, typing test, personality inventory) inside
//! one browser session, with results consolidated into one durable applicant
//! record.
//!
//! The engine owns the per-session state machine: it pins a randomized
//! question subset to a session on first access, tracks answered-question
//! progress independently of page reloads, computes where a returning
//! candidate resumes, and performs the idempotent, comment-preserving merge
//! of transient data into the permanent record at completion.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors, and port traits
//! - **Service Layer** (`services`): session registry, question selection,
//!   progress tracking, resumption, finalization, idle sweeping
//! - **Application Layer** (`application`): the `AssessmentEngine` facade
//! - **Infrastructure Layer** (`infrastructure`): `SQLite` adapters,
//!   configuration, logging
//! - **CLI Layer** (`cli`): admin command-line interface

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::AssessmentEngine;
pub use domain::error::AssessmentError;
pub use domain::models::{
    ApplicantRecord, Comment, CompletionStatus, Config, EvaluationSegments, Question,
    QuestionStatus, SessionState, TestType, TransientApplicant, TransientEvaluation,
};
pub use domain::ports::{DocumentStore, QuestionCorpus};
pub use infrastructure::config::ConfigLoader;
pub use services::{Resume, SessionRegistry, SessionSweeper, SweeperConfig};
