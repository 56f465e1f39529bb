//! Proctor admin CLI entry point.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use proctor::cli::{Cli, Commands};
use proctor::infrastructure::config::ConfigLoader;
use proctor::infrastructure::database::{
    DatabaseConnection, SqliteDocumentStore, SqliteQuestionCorpus,
};
use proctor::infrastructure::logging;
use proctor::services::record_merger::RecordMerger;
use proctor::services::session_registry::SessionRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    logging::init(&config.logging);

    let db = DatabaseConnection::new(&format!("sqlite:{}", config.database.path)).await?;
    db.migrate().await?;

    let result = match cli.command {
        Commands::Question(args) => {
            let corpus = SqliteQuestionCorpus::new(db.pool().clone());
            proctor::cli::commands::question::execute(args, &corpus).await
        }
        Commands::Applicant(args) => {
            let store = Arc::new(SqliteDocumentStore::new(db.pool().clone()));
            let merger = RecordMerger::new(Arc::new(SessionRegistry::new()), store);
            proctor::cli::commands::applicant::execute(args, &merger).await
        }
    };

    db.close().await;
    result
}
