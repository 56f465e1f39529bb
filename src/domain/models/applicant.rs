/// Domain models for applicant data, transient and permanent.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::evaluation::EvaluationSegments;

/// Intake submission held until finalization consolidates it into the
/// permanent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientApplicant {
    /// Session this submission belongs to
    pub session_id: String,

    /// Raw applicant-supplied profile fields, carried opaquely; field-level
    /// validation happens at the intake boundary, not here
    pub applicant: Value,

    /// When the candidate submitted the intake form
    pub submitted_at: DateTime<Utc>,
}

impl TransientApplicant {
    /// Creates a submission stamped with the current time.
    pub fn new(session_id: impl Into<String>, applicant: Value) -> Self {
        Self {
            session_id: session_id.into(),
            applicant,
            submitted_at: Utc::now(),
        }
    }
}

/// Reviewer note attached to a permanent applicant record. Comments survive
/// re-finalization of the same session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: String,

    /// Note body
    pub text: String,

    /// Reviewer who left the note
    pub author: String,

    /// When the note was left
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment with a fresh id and the current time.
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            author: author.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Durable consolidated applicant record; exactly one exists per session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    /// Session id, reused as the unique record key
    pub id: String,

    /// Applicant profile as submitted at intake
    pub applicant_info: Value,

    /// When the candidate submitted the intake form
    pub application_timestamp: DateTime<Utc>,

    /// The five per-module result arrays, flattened into the record
    #[serde(flatten)]
    pub evaluations: EvaluationSegments,

    /// Sum of all five segment lengths
    pub total_questions: usize,

    /// When finalization produced this record
    pub completion_timestamp: DateTime<Utc>,

    /// Last write of any kind, including comment additions
    pub last_updated: DateTime<Utc>,

    /// Reviewer notes, preserved across re-finalization
    #[serde(default)]
    pub comments: Vec<Comment>,
}
