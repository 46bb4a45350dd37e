//! SQL for the `applicants` table.

use crate::model::applicant::{Applicant, ApplicantDraft};
use crate::model::RecordId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const APPLICANT_SELECT_SQL: &str = "SELECT
    id,
    last_name,
    first_name,
    patronymic,
    gender,
    citizenship,
    birth_date,
    passport_data,
    applicant_address,
    parents_address,
    foreign_language
FROM applicants";

pub(crate) fn insert_applicant(conn: &Connection, draft: &ApplicantDraft) -> RepoResult<RecordId> {
    conn.execute(
        "INSERT INTO applicants (
            last_name,
            first_name,
            patronymic,
            gender,
            citizenship,
            birth_date,
            passport_data,
            applicant_address,
            parents_address,
            foreign_language
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
        params![
            draft.last_name.as_str(),
            draft.first_name.as_str(),
            draft.patronymic.as_deref(),
            draft.gender.as_str(),
            draft.citizenship.as_str(),
            draft.birth_date,
            draft.passport_data.as_str(),
            draft.applicant_address.as_str(),
            draft.parents_address.as_deref(),
            draft.foreign_language.as_deref(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites every mutable column; returns whether the row existed.
pub(crate) fn update_applicant(
    conn: &Connection,
    id: RecordId,
    draft: &ApplicantDraft,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "UPDATE applicants
         SET
            last_name = ?1,
            first_name = ?2,
            patronymic = ?3,
            gender = ?4,
            citizenship = ?5,
            birth_date = ?6,
            passport_data = ?7,
            applicant_address = ?8,
            parents_address = ?9,
            foreign_language = ?10
         WHERE id = ?11;",
        params![
            draft.last_name.as_str(),
            draft.first_name.as_str(),
            draft.patronymic.as_deref(),
            draft.gender.as_str(),
            draft.citizenship.as_str(),
            draft.birth_date,
            draft.passport_data.as_str(),
            draft.applicant_address.as_str(),
            draft.parents_address.as_deref(),
            draft.foreign_language.as_deref(),
            id,
        ],
    )?;
    Ok(changed > 0)
}

pub(crate) fn get_applicant(conn: &Connection, id: RecordId) -> RepoResult<Option<Applicant>> {
    let mut stmt = conn.prepare(&format!("{APPLICANT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_applicant_row(row)?));
    }
    Ok(None)
}

pub(crate) fn list_applicants(conn: &Connection) -> RepoResult<Vec<Applicant>> {
    let mut stmt = conn.prepare(&format!("{APPLICANT_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut applicants = Vec::new();
    while let Some(row) = rows.next()? {
        applicants.push(parse_applicant_row(row)?);
    }
    Ok(applicants)
}

/// Applicant holding `passport_data`, other than `excluding`.
pub(crate) fn find_by_passport(
    conn: &Connection,
    passport_data: &str,
    excluding: Option<RecordId>,
) -> RepoResult<Option<RecordId>> {
    let id = conn
        .query_row(
            "SELECT id
             FROM applicants
             WHERE passport_data = ?1
               AND (?2 IS NULL OR id <> ?2)
             LIMIT 1;",
            params![passport_data, excluding],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub(crate) fn delete_applicant(conn: &Connection, id: RecordId) -> RepoResult<bool> {
    let changed = conn.execute("DELETE FROM applicants WHERE id = ?1;", [id])?;
    Ok(changed > 0)
}

fn parse_applicant_row(row: &Row<'_>) -> RepoResult<Applicant> {
    let gender: String = row.get("gender")?;
    if gender != "m" && gender != "f" {
        return Err(RepoError::InvalidData(format!(
            "invalid gender `{gender}` in applicants.gender"
        )));
    }

    Ok(Applicant {
        id: row.get("id")?,
        data: ApplicantDraft {
            last_name: row.get("last_name")?,
            first_name: row.get("first_name")?,
            patronymic: row.get("patronymic")?,
            gender,
            citizenship: row.get("citizenship")?,
            birth_date: row.get("birth_date")?,
            passport_data: row.get("passport_data")?,
            applicant_address: row.get("applicant_address")?,
            parents_address: row.get("parents_address")?,
            foreign_language: row.get("foreign_language")?,
        },
    })
}
