//! Uniqueness checks run before a write commits.
//!
//! # Invariants
//! - Passport data is unique across applicants.
//! - `(application_id, subject)` is unique per grades and per exam results.
//! - On update the record's own identity is excluded from the check.
//!
//! The check runs inside the caller's `BEGIN IMMEDIATE` transaction, so no
//! other writer can commit the same key between the check and the write.

use crate::model::RecordId;
use crate::repo::{applicant_repo, exam_result_repo, subject_grade_repo};
use crate::store::{StoreError, StoreResult};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};

/// Key of one uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueKey {
    Passport(String),
    SubjectGrade {
        application_id: RecordId,
        subject: String,
    },
    ExamResult {
        application_id: RecordId,
        subject: String,
    },
}

impl Display for UniqueKey {
    // Passport data stays out of messages; it ends up in logs.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passport(_) => write!(f, "applicant with the same passport data exists"),
            Self::SubjectGrade {
                application_id,
                subject,
            } => write!(
                f,
                "subject grade for application {application_id} subject `{subject}` exists"
            ),
            Self::ExamResult {
                application_id,
                subject,
            } => write!(
                f,
                "exam result for application {application_id} subject `{subject}` exists"
            ),
        }
    }
}

/// Fails with `Conflict` when another record already holds `key`.
pub fn check_unique(
    conn: &Connection,
    key: &UniqueKey,
    excluding: Option<RecordId>,
) -> StoreResult<()> {
    let holder = match key {
        UniqueKey::Passport(passport_data) => {
            applicant_repo::find_by_passport(conn, passport_data, excluding)?
        }
        UniqueKey::SubjectGrade {
            application_id,
            subject,
        } => subject_grade_repo::find_by_subject(conn, *application_id, subject, excluding)?,
        UniqueKey::ExamResult {
            application_id,
            subject,
        } => exam_result_repo::find_by_subject(conn, *application_id, subject, excluding)?,
    };

    match holder {
        Some(_) => Err(StoreError::Conflict(key.clone())),
        None => Ok(()),
    }
}
