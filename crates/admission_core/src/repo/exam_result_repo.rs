//! SQL for the `exam_results` table.

use crate::model::exam_result::{ExamResult, ExamResultDraft};
use crate::model::RecordId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const EXAM_RESULT_SELECT_SQL: &str = "SELECT
    id,
    application_id,
    classroom,
    subject,
    exam_date,
    score
FROM exam_results";

pub(crate) fn insert_exam_result(
    conn: &Connection,
    draft: &ExamResultDraft,
) -> RepoResult<RecordId> {
    conn.execute(
        "INSERT INTO exam_results (application_id, classroom, subject, exam_date, score)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            draft.application_id,
            draft.classroom.as_deref(),
            draft.subject.as_str(),
            draft.exam_date,
            draft.score,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites the non-key columns; the owning application is left untouched.
pub(crate) fn update_exam_result(
    conn: &Connection,
    id: RecordId,
    draft: &ExamResultDraft,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "UPDATE exam_results
         SET classroom = ?1,
             subject = ?2,
             exam_date = ?3,
             score = ?4
         WHERE id = ?5;",
        params![
            draft.classroom.as_deref(),
            draft.subject.as_str(),
            draft.exam_date,
            draft.score,
            id,
        ],
    )?;
    Ok(changed > 0)
}

pub(crate) fn get_exam_result(conn: &Connection, id: RecordId) -> RepoResult<Option<ExamResult>> {
    let mut stmt = conn.prepare(&format!("{EXAM_RESULT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_exam_result_row(row)?));
    }
    Ok(None)
}

pub(crate) fn list_exam_results(conn: &Connection) -> RepoResult<Vec<ExamResult>> {
    let mut stmt = conn.prepare(&format!("{EXAM_RESULT_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut results = Vec::new();
    while let Some(row) = rows.next()? {
        results.push(parse_exam_result_row(row)?);
    }
    Ok(results)
}

/// Result for `(application_id, subject)` other than `excluding`.
pub(crate) fn find_by_subject(
    conn: &Connection,
    application_id: RecordId,
    subject: &str,
    excluding: Option<RecordId>,
) -> RepoResult<Option<RecordId>> {
    let id = conn
        .query_row(
            "SELECT id
             FROM exam_results
             WHERE application_id = ?1
               AND subject = ?2
               AND (?3 IS NULL OR id <> ?3)
             LIMIT 1;",
            params![application_id, subject, excluding],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub(crate) fn delete_exam_result(conn: &Connection, id: RecordId) -> RepoResult<bool> {
    let changed = conn.execute("DELETE FROM exam_results WHERE id = ?1;", [id])?;
    Ok(changed > 0)
}

/// Removes every result of one application; returns the removed count.
pub(crate) fn delete_for_application(
    conn: &Connection,
    application_id: RecordId,
) -> RepoResult<usize> {
    let removed = conn.execute(
        "DELETE FROM exam_results WHERE application_id = ?1;",
        [application_id],
    )?;
    Ok(removed)
}

pub(crate) fn parse_exam_result_row(row: &Row<'_>) -> RepoResult<ExamResult> {
    let score: i32 = row.get("score")?;
    if !(0..=100).contains(&score) {
        return Err(RepoError::InvalidData(format!(
            "invalid score `{score}` in exam_results.score"
        )));
    }

    Ok(ExamResult {
        id: row.get("id")?,
        data: ExamResultDraft {
            application_id: row.get("application_id")?,
            classroom: row.get("classroom")?,
            subject: row.get("subject")?,
            exam_date: row.get("exam_date")?,
            score,
        },
    })
}
