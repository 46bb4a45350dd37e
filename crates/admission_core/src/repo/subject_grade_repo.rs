//! SQL for the `subject_grades` table.

use crate::model::subject_grade::{SubjectGrade, SubjectGradeDraft};
use crate::model::RecordId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SUBJECT_GRADE_SELECT_SQL: &str = "SELECT
    id,
    application_id,
    subject,
    grade
FROM subject_grades";

pub(crate) fn insert_subject_grade(
    conn: &Connection,
    draft: &SubjectGradeDraft,
) -> RepoResult<RecordId> {
    conn.execute(
        "INSERT INTO subject_grades (application_id, subject, grade)
         VALUES (?1, ?2, ?3);",
        params![draft.application_id, draft.subject.as_str(), draft.grade],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites subject and grade; the owning application is left untouched.
pub(crate) fn update_subject_grade(
    conn: &Connection,
    id: RecordId,
    draft: &SubjectGradeDraft,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "UPDATE subject_grades
         SET subject = ?1,
             grade = ?2
         WHERE id = ?3;",
        params![draft.subject.as_str(), draft.grade, id],
    )?;
    Ok(changed > 0)
}

pub(crate) fn get_subject_grade(
    conn: &Connection,
    id: RecordId,
) -> RepoResult<Option<SubjectGrade>> {
    let mut stmt = conn.prepare(&format!("{SUBJECT_GRADE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_subject_grade_row(row)?));
    }
    Ok(None)
}

pub(crate) fn list_subject_grades(conn: &Connection) -> RepoResult<Vec<SubjectGrade>> {
    let mut stmt = conn.prepare(&format!("{SUBJECT_GRADE_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut grades = Vec::new();
    while let Some(row) = rows.next()? {
        grades.push(parse_subject_grade_row(row)?);
    }
    Ok(grades)
}

/// Grade for `(application_id, subject)` other than `excluding`.
pub(crate) fn find_by_subject(
    conn: &Connection,
    application_id: RecordId,
    subject: &str,
    excluding: Option<RecordId>,
) -> RepoResult<Option<RecordId>> {
    let id = conn
        .query_row(
            "SELECT id
             FROM subject_grades
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

pub(crate) fn delete_subject_grade(conn: &Connection, id: RecordId) -> RepoResult<bool> {
    let changed = conn.execute("DELETE FROM subject_grades WHERE id = ?1;", [id])?;
    Ok(changed > 0)
}

/// Removes every grade of one application; returns the removed count.
pub(crate) fn delete_for_application(
    conn: &Connection,
    application_id: RecordId,
) -> RepoResult<usize> {
    let removed = conn.execute(
        "DELETE FROM subject_grades WHERE application_id = ?1;",
        [application_id],
    )?;
    Ok(removed)
}

fn parse_subject_grade_row(row: &Row<'_>) -> RepoResult<SubjectGrade> {
    let grade: i32 = row.get("grade")?;
    if !(1..=5).contains(&grade) {
        return Err(RepoError::InvalidData(format!(
            "invalid grade `{grade}` in subject_grades.grade"
        )));
    }

    Ok(SubjectGrade {
        id: row.get("id")?,
        data: SubjectGradeDraft {
            application_id: row.get("application_id")?,
            subject: row.get("subject")?,
            grade,
        },
    })
}
