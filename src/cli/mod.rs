//! Admin command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};

/// Proctor: session and assessment orchestration engine.
#[derive(Parser)]
#[command(name = "proctor", version, about)]
pub struct Cli {
    /// Path to a configuration file (defaults to proctor.yaml + environment)
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage the question corpus
    Question(commands::question::QuestionArgs),

    /// Inspect and annotate applicant records
    Applicant(commands::applicant::ApplicantArgs),
}
