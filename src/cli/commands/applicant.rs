//! Applicant record commands: listing, inspection, review comments.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Table;

use crate::domain::models::ApplicantRecord;
use crate::services::record_merger::RecordMerger;

/// Arguments for the `applicant` command group.
#[derive(Args)]
pub struct ApplicantArgs {
    #[command(subcommand)]
    pub command: ApplicantCommands,
}

/// Applicant record subcommands.
#[derive(Subcommand)]
pub enum ApplicantCommands {
    /// List finalized applicant records, newest first
    List,

    /// Show one applicant record as JSON
    Show {
        /// Session id of the record
        session_id: String,
    },

    /// Attach a reviewer comment to a record
    Comment {
        /// Session id of the record
        session_id: String,

        /// Reviewer name
        #[arg(long)]
        author: String,

        /// Comment body
        #[arg(long)]
        text: String,
    },
}

/// Executes an applicant subcommand against the record merger.
///
/// # Errors
/// Returns error on store failure or an unknown session id.
pub async fn execute(args: ApplicantArgs, merger: &RecordMerger) -> Result<()> {
    match args.command {
        ApplicantCommands::List => {
            let records = merger.list_applicants().await?;

            let mut table = Table::new();
            table.set_header(vec![
                "Session",
                "Applicant",
                "Questions",
                "Completed",
                "Comments",
            ]);
            for record in &records {
                table.add_row(vec![
                    record.id.clone(),
                    applicant_name(record),
                    record.total_questions.to_string(),
                    record.completion_timestamp.to_rfc3339(),
                    record.comments.len().to_string(),
                ]);
            }
            println!("{table}");
            println!("{} applicants", records.len());
            Ok(())
        }

        ApplicantCommands::Show { session_id } => match merger.applicant_record(&session_id).await? {
            Some(record) => {
                println!("{}", serde_json::to_string_pretty(&record)?);
                Ok(())
            }
            None => {
                println!("No applicant record for session {session_id}");
                Ok(())
            }
        },

        ApplicantCommands::Comment {
            session_id,
            author,
            text,
        } => {
            let comment = merger.add_comment(&session_id, &author, &text).await?;
            println!("Added comment {} to {session_id}", comment.id);
            Ok(())
        }
    }
}

fn applicant_name(record: &ApplicantRecord) -> String {
    let last = record
        .applicant_info
        .get("lastName")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let first = record
        .applicant_info
        .get("firstName")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    if last.is_empty() && first.is_empty() {
        "-".to_string()
    } else {
        format!("{last}, {first}")
    }
}
