//! Referential integrity: parent resolution and cascade deletion.
//!
//! # Invariants
//! - A dependent record is admitted only when its parent exists in the
//!   state visible to the running transaction.
//! - Cascade deletion is depth-first: dependents go before their owner, so
//!   foreign keys hold after every statement.
//! - Updates never cascade.

use crate::model::{EntityKind, RecordId};
use crate::repo::{
    applicant_repo, application_repo, exam_result_repo, row_exists, subject_grade_repo,
    RepoResult,
};
use crate::store::{StoreError, StoreResult};
use rusqlite::Connection;

/// Proof that a parent record existed when it was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentHandle {
    pub kind: EntityKind,
    pub id: RecordId,
}

/// Records removed together with the deleted record, excluding itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub applications: usize,
    pub subject_grades: usize,
    pub exam_results: usize,
}

impl CascadeSummary {
    /// Total number of dependent rows removed.
    pub fn total(&self) -> usize {
        self.applications + self.subject_grades + self.exam_results
    }
}

/// Resolves the `parent` record a dependent names by `parent_id`.
///
/// # Errors
/// - `ParentNotFound` when no `parent` row with `parent_id` exists.
/// - `Store` when the lookup fails.
pub fn resolve_parent(
    conn: &Connection,
    parent: EntityKind,
    parent_id: RecordId,
) -> StoreResult<ParentHandle> {
    if !row_exists(conn, table_of(parent), parent_id)? {
        return Err(StoreError::ParentNotFound {
            entity: parent,
            id: parent_id,
        });
    }

    Ok(ParentHandle {
        kind: parent,
        id: parent_id,
    })
}

/// Deletes one record and everything that depends on it.
///
/// Callers must run this inside a write transaction so the whole subtree
/// disappears together.
///
/// # Errors
/// - `NotFound` when the record itself does not exist.
pub fn cascade_delete(
    conn: &Connection,
    kind: EntityKind,
    id: RecordId,
) -> StoreResult<CascadeSummary> {
    let mut summary = CascadeSummary::default();
    if !delete_subtree(conn, kind, id, &mut summary)? {
        return Err(StoreError::NotFound { entity: kind, id });
    }
    Ok(summary)
}

fn delete_subtree(
    conn: &Connection,
    kind: EntityKind,
    id: RecordId,
    summary: &mut CascadeSummary,
) -> RepoResult<bool> {
    match kind {
        EntityKind::Applicant => {
            for application_id in application_repo::list_ids_for_applicant(conn, id)? {
                if delete_subtree(conn, EntityKind::Application, application_id, summary)? {
                    summary.applications += 1;
                }
            }
            applicant_repo::delete_applicant(conn, id)
        }
        EntityKind::Application => {
            summary.subject_grades += subject_grade_repo::delete_for_application(conn, id)?;
            summary.exam_results += exam_result_repo::delete_for_application(conn, id)?;
            application_repo::delete_application(conn, id)
        }
        EntityKind::SubjectGrade => subject_grade_repo::delete_subject_grade(conn, id),
        EntityKind::ExamResult => exam_result_repo::delete_exam_result(conn, id),
    }
}

pub(crate) fn table_of(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Applicant => "applicants",
        EntityKind::Application => "applications",
        EntityKind::SubjectGrade => "subject_grades",
        EntityKind::ExamResult => "exam_results",
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_parent, ParentHandle};
    use crate::db::open_db_in_memory;
    use crate::model::EntityKind;
    use crate::store::StoreError;

    #[test]
    fn resolve_parent_reports_missing_row_as_parent_not_found() {
        let conn = open_db_in_memory().unwrap();

        for parent in [EntityKind::Applicant, EntityKind::Application] {
            let err = resolve_parent(&conn, parent, 9).unwrap_err();
            assert!(matches!(
                err,
                StoreError::ParentNotFound { entity, id: 9 } if entity == parent
            ));
            assert_eq!(err.code(), "parent_not_found");
        }
    }

    #[test]
    fn resolve_parent_returns_handle_for_existing_row() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(
            "INSERT INTO applicants (
                last_name, first_name, gender, citizenship, birth_date,
                passport_data, applicant_address
            ) VALUES ('Orlov', 'Ilya', 'm', 'RU', '2006-01-02', '0000 111111', 'Kazan');",
        )
        .unwrap();
        let id = conn.last_insert_rowid();

        let handle = resolve_parent(&conn, EntityKind::Applicant, id).unwrap();

        assert_eq!(
            handle,
            ParentHandle {
                kind: EntityKind::Applicant,
                id
            }
        );
    }
}
