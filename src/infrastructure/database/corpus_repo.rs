use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::models::{Question, TestType};
use crate::domain::ports::QuestionCorpus;

/// `SQLite` implementation of the `QuestionCorpus` port, plus the write
/// operations the admin tooling needs for seeding and curation.
pub struct SqliteQuestionCorpus {
    pool: SqlitePool,
}

impl SqliteQuestionCorpus {
    /// Create a new `SqliteQuestionCorpus`
    ///
    /// # Arguments
    /// * `pool` - `SQLite` connection pool
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts or replaces a corpus question.
    ///
    /// # Errors
    /// Returns error if the write fails.
    pub async fn upsert_question(&self, question: &Question) -> Result<()> {
        let keywords_json =
            serde_json::to_string(&question.keywords).context("failed to serialize keywords")?;
        let created_at_str = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO questions (id, test_type, text, keywords, active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                test_type = excluded.test_type,
                text = excluded.text,
                keywords = excluded.keywords,
                active = excluded.active
            "#,
        )
        .bind(&question.id)
        .bind(question.test_type.as_str())
        .bind(&question.text)
        .bind(&keywords_json)
        .bind(i64::from(question.active))
        .bind(&created_at_str)
        .execute(&self.pool)
        .await
        .context("failed to upsert question")?;

        Ok(())
    }

    /// Every question for a module, active or not, in corpus order.
    ///
    /// # Errors
    /// Returns error if the query fails or a stored row is undecodable.
    pub async fn list_all(&self, test_type: TestType) -> Result<Vec<Question>> {
        let rows = sqlx::query(
            r#"
            SELECT id, test_type, text, keywords, active
            FROM questions
            WHERE test_type = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(test_type.as_str())
        .fetch_all(&self.pool)
        .await
        .context("failed to query questions")?;

        rows.iter().map(Self::question_from_row).collect()
    }

    /// Flips a question's active flag; returns false when the id is unknown.
    ///
    /// # Errors
    /// Returns error if the write fails.
    pub async fn set_active(&self, id: &str, active: bool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET active = ?
            WHERE id = ?
            "#,
        )
        .bind(i64::from(active))
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to update question")?;

        Ok(result.rows_affected() > 0)
    }

    fn question_from_row(r: &SqliteRow) -> Result<Question> {
        Ok(Question {
            id: r.get("id"),
            test_type: r
                .get::<String, _>("test_type")
                .parse()
                .context("invalid test_type in database")?,
            text: r.get("text"),
            keywords: serde_json::from_str(r.get::<String, _>("keywords").as_str())
                .context("failed to deserialize keywords")?,
            active: r.get::<i64, _>("active") != 0,
        })
    }
}

#[async_trait]
impl QuestionCorpus for SqliteQuestionCorpus {
    async fn list_active(&self, test_type: TestType) -> Result<Vec<Question>> {
        let rows = sqlx::query(
            r#"
            SELECT id, test_type, text, keywords, active
            FROM questions
            WHERE test_type = ? AND active = 1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(test_type.as_str())
        .fetch_all(&self.pool)
        .await
        .context("failed to query questions")?;

        rows.iter().map(Self::question_from_row).collect()
    }
}
