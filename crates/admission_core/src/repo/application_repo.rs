//! SQL for the `applications` table.
//!
//! Scores are stored as decimal text rescaled to two fractional digits.

use crate::model::application::{Application, ApplicationDraft};
use crate::model::RecordId;
use crate::repo::{decimal_to_db, parse_decimal, RepoResult};
use rusqlite::{params, Connection, Row};

const APPLICATION_SELECT_SQL: &str = "SELECT
    id,
    applicant_id,
    faculty,
    specialty,
    educational_institution,
    graduation_year,
    document_type,
    document_number,
    average_score,
    ege_score,
    group_number
FROM applications";

pub(crate) fn insert_application(
    conn: &Connection,
    draft: &ApplicationDraft,
) -> RepoResult<RecordId> {
    conn.execute(
        "INSERT INTO applications (
            applicant_id,
            faculty,
            specialty,
            educational_institution,
            graduation_year,
            document_type,
            document_number,
            average_score,
            ege_score,
            group_number
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
        params![
            draft.applicant_id,
            draft.faculty.as_str(),
            draft.specialty.as_str(),
            draft.educational_institution.as_deref(),
            draft.graduation_year,
            draft.document_type.as_deref(),
            draft.document_number.as_deref(),
            decimal_to_db(draft.average_score),
            decimal_to_db(draft.ege_score),
            draft.group_number.as_deref(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites the non-key columns; `applicant_id` is left untouched.
pub(crate) fn update_application(
    conn: &Connection,
    id: RecordId,
    draft: &ApplicationDraft,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "UPDATE applications
         SET
            faculty = ?1,
            specialty = ?2,
            educational_institution = ?3,
            graduation_year = ?4,
            document_type = ?5,
            document_number = ?6,
            average_score = ?7,
            ege_score = ?8,
            group_number = ?9
         WHERE id = ?10;",
        params![
            draft.faculty.as_str(),
            draft.specialty.as_str(),
            draft.educational_institution.as_deref(),
            draft.graduation_year,
            draft.document_type.as_deref(),
            draft.document_number.as_deref(),
            decimal_to_db(draft.average_score),
            decimal_to_db(draft.ege_score),
            draft.group_number.as_deref(),
            id,
        ],
    )?;
    Ok(changed > 0)
}

pub(crate) fn get_application(conn: &Connection, id: RecordId) -> RepoResult<Option<Application>> {
    let mut stmt = conn.prepare(&format!("{APPLICATION_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_application_row(row)?));
    }
    Ok(None)
}

pub(crate) fn list_applications(conn: &Connection) -> RepoResult<Vec<Application>> {
    let mut stmt = conn.prepare(&format!("{APPLICATION_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut applications = Vec::new();
    while let Some(row) = rows.next()? {
        applications.push(parse_application_row(row)?);
    }
    Ok(applications)
}

/// Identities of every application owned by `applicant_id`.
pub(crate) fn list_ids_for_applicant(
    conn: &Connection,
    applicant_id: RecordId,
) -> RepoResult<Vec<RecordId>> {
    let mut stmt = conn.prepare(
        "SELECT id
         FROM applications
         WHERE applicant_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([applicant_id])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}

pub(crate) fn delete_application(conn: &Connection, id: RecordId) -> RepoResult<bool> {
    let changed = conn.execute("DELETE FROM applications WHERE id = ?1;", [id])?;
    Ok(changed > 0)
}

fn parse_application_row(row: &Row<'_>) -> RepoResult<Application> {
    Ok(Application {
        id: row.get("id")?,
        data: ApplicationDraft {
            applicant_id: row.get("applicant_id")?,
            faculty: row.get("faculty")?,
            specialty: row.get("specialty")?,
            educational_institution: row.get("educational_institution")?,
            graduation_year: row.get("graduation_year")?,
            document_type: row.get("document_type")?,
            document_number: row.get("document_number")?,
            average_score: parse_decimal(row.get("average_score")?, "applications.average_score")?,
            ege_score: parse_decimal(row.get("ege_score")?, "applications.ege_score")?,
            group_number: row.get("group_number")?,
        },
    })
}
