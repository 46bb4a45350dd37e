//! Exam results enriched with applicant and application details.
//!
//! # Invariants
//! - Only committed rows are visible; each view row reflects one exam result
//!   together with its current owning application and applicant.
//! - Ordering is ascending exam result identity.

use crate::model::applicant::full_name;
use crate::model::exam_result::ExamResult;
use crate::model::{EntityKind, RecordId};
use crate::repo::exam_result_repo::parse_exam_result_row;
use crate::repo::RepoResult;
use crate::store::{StoreError, StoreResult};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

const EXAM_VIEW_SELECT_SQL: &str = "SELECT
    e.id AS id,
    e.application_id AS application_id,
    e.classroom AS classroom,
    e.subject AS subject,
    e.exam_date AS exam_date,
    e.score AS score,
    a.applicant_id AS applicant_id,
    a.faculty AS faculty,
    a.specialty AS specialty,
    p.last_name AS last_name,
    p.first_name AS first_name,
    p.patronymic AS patronymic
FROM exam_results e
INNER JOIN applications a ON a.id = e.application_id
INNER JOIN applicants p ON p.id = a.applicant_id";

/// One exam result plus who sat it and for which faculty/specialty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResultWithApplicant {
    #[serde(flatten)]
    pub result: ExamResult,
    pub applicant_id: RecordId,
    /// `last first patronymic`, blank parts omitted.
    pub applicant_name: String,
    pub faculty: String,
    pub specialty: String,
}

/// Lists every exam result with its applicant name and faculty/specialty.
pub fn list_exam_results_with_applicant(
    conn: &Connection,
) -> StoreResult<Vec<ExamResultWithApplicant>> {
    let mut stmt = conn.prepare(&format!("{EXAM_VIEW_SELECT_SQL} ORDER BY e.id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_view_row(row)?);
    }
    Ok(items)
}

/// Loads one enriched exam result.
///
/// # Errors
/// - `NotFound` when no exam result with `id` exists.
pub fn get_exam_result_with_applicant(
    conn: &Connection,
    id: RecordId,
) -> StoreResult<ExamResultWithApplicant> {
    let mut stmt = conn.prepare(&format!("{EXAM_VIEW_SELECT_SQL} WHERE e.id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(parse_view_row(row)?),
        None => Err(StoreError::NotFound {
            entity: EntityKind::ExamResult,
            id,
        }),
    }
}

fn parse_view_row(row: &Row<'_>) -> RepoResult<ExamResultWithApplicant> {
    let last_name: String = row.get("last_name")?;
    let first_name: String = row.get("first_name")?;
    let patronymic: Option<String> = row.get("patronymic")?;

    Ok(ExamResultWithApplicant {
        result: parse_exam_result_row(row)?,
        applicant_id: row.get("applicant_id")?,
        applicant_name: full_name(&last_name, &first_name, patronymic.as_deref()),
        faculty: row.get("faculty")?,
        specialty: row.get("specialty")?,
    })
}
