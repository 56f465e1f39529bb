//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use proctor::domain::models::{Question, TestType, TransientApplicant};
use proctor::infrastructure::database::{
    DatabaseConnection, SqliteDocumentStore, SqliteQuestionCorpus,
};
use proctor::AssessmentEngine;
use serde_json::json;
use tempfile::TempDir;

/// Opens a migrated database inside a fresh temp directory.
///
/// The returned `TempDir` must stay alive as long as the connection.
pub async fn setup_test_db() -> (TempDir, DatabaseConnection) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("proctor-test.db").display());
    let db = DatabaseConnection::new(&url)
        .await
        .expect("failed to open database");
    db.migrate().await.expect("failed to run migrations");
    (dir, db)
}

/// Engine over a freshly migrated database, with its corpus repository for
/// seeding.
pub async fn setup_engine(
    max_questions_per_test: usize,
) -> (TempDir, AssessmentEngine, SqliteQuestionCorpus) {
    let (dir, db) = setup_test_db().await;
    let corpus = SqliteQuestionCorpus::new(db.pool().clone());
    let engine = AssessmentEngine::new(
        Arc::new(SqliteQuestionCorpus::new(db.pool().clone())),
        Arc::new(SqliteDocumentStore::new(db.pool().clone())),
        max_questions_per_test,
    );
    (dir, engine, corpus)
}

pub fn sample_question(id: &str, test_type: TestType) -> Question {
    Question {
        id: id.to_string(),
        test_type,
        text: format!("Prompt for {id}"),
        keywords: vec!["keyword".to_string()],
        active: true,
    }
}

pub async fn seed_corpus(corpus: &SqliteQuestionCorpus, test_type: TestType, count: usize) {
    for i in 0..count {
        corpus
            .upsert_question(&sample_question(&format!("{test_type}-q{i}"), test_type))
            .await
            .expect("failed to seed question");
    }
}

pub fn sample_intake(session_id: &str) -> TransientApplicant {
    TransientApplicant::new(
        session_id,
        json!({
            "positionApplied": "Support Specialist",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com"
        }),
    )
}
