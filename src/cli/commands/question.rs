//! Question corpus commands: seeding, listing, curation.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use comfy_table::Table;
use serde::Deserialize;

use crate::domain::models::{Question, TestType};
use crate::domain::ports::QuestionCorpus;
use crate::infrastructure::database::SqliteQuestionCorpus;

/// Arguments for the `question` command group.
#[derive(Args)]
pub struct QuestionArgs {
    #[command(subcommand)]
    pub command: QuestionCommands,
}

/// Question corpus subcommands.
#[derive(Subcommand)]
pub enum QuestionCommands {
    /// Seed questions from a JSON file ({"questions": [...]})
    Seed {
        /// Path to the JSON corpus file
        file: std::path::PathBuf,
    },

    /// List questions for a test module
    List {
        /// Module to list (speech|listening|written|personality|typing)
        test_type: TestType,

        /// Include inactive questions
        #[arg(long)]
        all: bool,
    },

    /// Return a question to the selectable pool
    Activate {
        /// Question id
        id: String,
    },

    /// Remove a question from the selectable pool without deleting it
    Deactivate {
        /// Question id
        id: String,
    },
}

/// Corpus seed file shape, matching the exported corpus format.
#[derive(Deserialize)]
struct SeedFile {
    questions: Vec<Question>,
}

/// Executes a question subcommand against the corpus repository.
///
/// # Errors
/// Returns error on unreadable input or repository failure.
pub async fn execute(args: QuestionArgs, corpus: &SqliteQuestionCorpus) -> Result<()> {
    match args.command {
        QuestionCommands::Seed { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let seed: SeedFile =
                serde_json::from_str(&raw).context("failed to parse corpus file")?;

            let count = seed.questions.len();
            for question in &seed.questions {
                corpus.upsert_question(question).await?;
            }
            println!("Seeded {count} questions");
            Ok(())
        }

        QuestionCommands::List { test_type, all } => {
            let questions = if all {
                corpus.list_all(test_type).await?
            } else {
                corpus.list_active(test_type).await?
            };

            let mut table = Table::new();
            table.set_header(vec!["ID", "Active", "Text"]);
            for question in &questions {
                table.add_row(vec![
                    question.id.clone(),
                    question.active.to_string(),
                    truncate(&question.text, 60),
                ]);
            }
            println!("{table}");
            println!("{} questions", questions.len());
            Ok(())
        }

        QuestionCommands::Activate { id } => set_active(corpus, &id, true).await,
        QuestionCommands::Deactivate { id } => set_active(corpus, &id, false).await,
    }
}

async fn set_active(corpus: &SqliteQuestionCorpus, id: &str, active: bool) -> Result<()> {
    if corpus.set_active(id, active).await? {
        println!("Updated {id}");
    } else {
        println!("No question with id {id}");
    }
    Ok(())
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let prefix: String = text.chars().take(limit).collect();
        format!("{prefix}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 60), "short");
        let long = "x".repeat(80);
        let truncated = truncate(&long, 60);
        assert_eq!(truncated.chars().count(), 63);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_seed_file_parses_exported_corpus_format() {
        let seed: SeedFile = serde_json::from_str(
            r#"{"questions": [
                {"id": "q1", "test_type": "speech", "text": "Introduce yourself.",
                 "keywords": ["name", "experience"], "active": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(seed.questions.len(), 1);
        assert_eq!(seed.questions[0].test_type, TestType::Speech);
    }
}
