//! SQLite implementation of [`RecordStore`].
//!
//! Every mutation validates its candidate before touching storage, then runs
//! parent resolution, uniqueness checks and the write inside one
//! `BEGIN IMMEDIATE` transaction. Concurrent writers on other connections
//! wait for the write lock (see `db::BUSY_TIMEOUT`), so a check and its
//! write are never interleaved with another commit.

use crate::model::applicant::{Applicant, ApplicantDraft};
use crate::model::application::{Application, ApplicationDraft};
use crate::model::exam_result::{ExamResult, ExamResultDraft};
use crate::model::subject_grade::{SubjectGrade, SubjectGradeDraft};
use crate::model::{EntityKind, RecordId};
use crate::repo::{
    applicant_repo, application_repo, count_rows, ensure_connection_ready, exam_result_repo,
    row_exists, subject_grade_repo, RepoError,
};
use crate::store::integrity::{cascade_delete, resolve_parent, table_of, CascadeSummary};
use crate::store::uniqueness::{check_unique, UniqueKey};
use crate::store::{RecordCounts, RecordStore, StoreError, StoreResult};
use crate::validation::Operation;
use log::{error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// SQLite-backed record store over a migrated connection.
#[derive(Debug)]
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Creates the store from a connection returned by `db::open_db*`.
    ///
    /// # Errors
    /// - `Store` when the connection is not migrated to the latest schema.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn in_write_tx<T>(
        &self,
        work: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let value = work(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn delete_with_cascade(
        &self,
        entity: EntityKind,
        id: RecordId,
    ) -> StoreResult<CascadeSummary> {
        let started_at = Instant::now();
        let result = self.in_write_tx(|tx| cascade_delete(tx, entity, id));
        if let Ok(summary) = &result {
            if summary.total() > 0 {
                info!(
                    "event=cascade_delete module=store status=ok entity={} id={} applications={} subject_grades={} exam_results={}",
                    entity, id, summary.applications, summary.subject_grades, summary.exam_results
                );
            }
        }
        log_mutation("record_delete", entity, Some(id), started_at, &result);
        result
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn create_applicant(&self, draft: &ApplicantDraft) -> StoreResult<Applicant> {
        let started_at = Instant::now();
        let result = draft
            .validate(Operation::Create)
            .map_err(StoreError::from)
            .and_then(|draft| {
                self.in_write_tx(|tx| {
                    let key = UniqueKey::Passport(draft.passport_data.clone());
                    check_unique(tx, &key, None)?;
                    let id = applicant_repo::insert_applicant(tx, &draft)
                        .map_err(|err| backstop(err, Some(&key), None))?;
                    persisted(applicant_repo::get_applicant(tx, id)?, EntityKind::Applicant, id)
                })
            });
        log_mutation(
            "record_create",
            EntityKind::Applicant,
            result.as_ref().ok().map(|applicant| applicant.id),
            started_at,
            &result,
        );
        result
    }

    fn get_applicant(&self, id: RecordId) -> StoreResult<Applicant> {
        persisted(
            applicant_repo::get_applicant(self.conn, id)?,
            EntityKind::Applicant,
            id,
        )
    }

    fn list_applicants(&self) -> StoreResult<Vec<Applicant>> {
        Ok(applicant_repo::list_applicants(self.conn)?)
    }

    fn update_applicant(&self, id: RecordId, draft: &ApplicantDraft) -> StoreResult<Applicant> {
        let started_at = Instant::now();
        let result = draft
            .validate(Operation::Update)
            .map_err(StoreError::from)
            .and_then(|draft| {
                self.in_write_tx(|tx| {
                    ensure_exists(tx, EntityKind::Applicant, id)?;
                    let key = UniqueKey::Passport(draft.passport_data.clone());
                    check_unique(tx, &key, Some(id))?;
                    applicant_repo::update_applicant(tx, id, &draft)
                        .map_err(|err| backstop(err, Some(&key), None))?;
                    persisted(applicant_repo::get_applicant(tx, id)?, EntityKind::Applicant, id)
                })
            });
        log_mutation(
            "record_update",
            EntityKind::Applicant,
            Some(id),
            started_at,
            &result,
        );
        result
    }

    fn delete_applicant(&self, id: RecordId) -> StoreResult<CascadeSummary> {
        self.delete_with_cascade(EntityKind::Applicant, id)
    }

    fn create_application(&self, draft: &ApplicationDraft) -> StoreResult<Application> {
        let started_at = Instant::now();
        let result = draft
            .validate(Operation::Create)
            .map_err(StoreError::from)
            .and_then(|draft| {
                self.in_write_tx(|tx| {
                    let parent = resolve_parent(tx, EntityKind::Applicant, draft.applicant_id)?;
                    let id = application_repo::insert_application(tx, &draft)
                        .map_err(|err| backstop(err, None, Some((parent.kind, parent.id))))?;
                    persisted(
                        application_repo::get_application(tx, id)?,
                        EntityKind::Application,
                        id,
                    )
                })
            });
        log_mutation(
            "record_create",
            EntityKind::Application,
            result.as_ref().ok().map(|application| application.id),
            started_at,
            &result,
        );
        result
    }

    fn get_application(&self, id: RecordId) -> StoreResult<Application> {
        persisted(
            application_repo::get_application(self.conn, id)?,
            EntityKind::Application,
            id,
        )
    }

    fn list_applications(&self) -> StoreResult<Vec<Application>> {
        Ok(application_repo::list_applications(self.conn)?)
    }

    fn update_application(
        &self,
        id: RecordId,
        draft: &ApplicationDraft,
    ) -> StoreResult<Application> {
        let started_at = Instant::now();
        let result = draft
            .validate(Operation::Update)
            .map_err(StoreError::from)
            .and_then(|draft| {
                self.in_write_tx(|tx| {
                    ensure_exists(tx, EntityKind::Application, id)?;
                    resolve_parent(tx, EntityKind::Applicant, draft.applicant_id)?;
                    application_repo::update_application(tx, id, &draft)?;
                    persisted(
                        application_repo::get_application(tx, id)?,
                        EntityKind::Application,
                        id,
                    )
                })
            });
        log_mutation(
            "record_update",
            EntityKind::Application,
            Some(id),
            started_at,
            &result,
        );
        result
    }

    fn delete_application(&self, id: RecordId) -> StoreResult<CascadeSummary> {
        self.delete_with_cascade(EntityKind::Application, id)
    }

    fn create_subject_grade(&self, draft: &SubjectGradeDraft) -> StoreResult<SubjectGrade> {
        let started_at = Instant::now();
        let result = draft
            .validate(Operation::Create)
            .map_err(StoreError::from)
            .and_then(|draft| {
                self.in_write_tx(|tx| {
                    let parent =
                        resolve_parent(tx, EntityKind::Application, draft.application_id)?;
                    let key = UniqueKey::SubjectGrade {
                        application_id: parent.id,
                        subject: draft.subject.clone(),
                    };
                    check_unique(tx, &key, None)?;
                    let id = subject_grade_repo::insert_subject_grade(tx, &draft).map_err(
                        |err| backstop(err, Some(&key), Some((parent.kind, parent.id))),
                    )?;
                    persisted(
                        subject_grade_repo::get_subject_grade(tx, id)?,
                        EntityKind::SubjectGrade,
                        id,
                    )
                })
            });
        log_mutation(
            "record_create",
            EntityKind::SubjectGrade,
            result.as_ref().ok().map(|grade| grade.id),
            started_at,
            &result,
        );
        result
    }

    fn get_subject_grade(&self, id: RecordId) -> StoreResult<SubjectGrade> {
        persisted(
            subject_grade_repo::get_subject_grade(self.conn, id)?,
            EntityKind::SubjectGrade,
            id,
        )
    }

    fn list_subject_grades(&self) -> StoreResult<Vec<SubjectGrade>> {
        Ok(subject_grade_repo::list_subject_grades(self.conn)?)
    }

    fn update_subject_grade(
        &self,
        id: RecordId,
        draft: &SubjectGradeDraft,
    ) -> StoreResult<SubjectGrade> {
        let started_at = Instant::now();
        let result = draft
            .validate(Operation::Update)
            .map_err(StoreError::from)
            .and_then(|draft| {
                self.in_write_tx(|tx| {
                    let existing = persisted(
                        subject_grade_repo::get_subject_grade(tx, id)?,
                        EntityKind::SubjectGrade,
                        id,
                    )?;
                    let key = UniqueKey::SubjectGrade {
                        application_id: existing.data.application_id,
                        subject: draft.subject.clone(),
                    };
                    check_unique(tx, &key, Some(id))?;
                    subject_grade_repo::update_subject_grade(tx, id, &draft)
                        .map_err(|err| backstop(err, Some(&key), None))?;
                    persisted(
                        subject_grade_repo::get_subject_grade(tx, id)?,
                        EntityKind::SubjectGrade,
                        id,
                    )
                })
            });
        log_mutation(
            "record_update",
            EntityKind::SubjectGrade,
            Some(id),
            started_at,
            &result,
        );
        result
    }

    fn delete_subject_grade(&self, id: RecordId) -> StoreResult<()> {
        self.delete_with_cascade(EntityKind::SubjectGrade, id)
            .map(|_| ())
    }

    fn create_exam_result(&self, draft: &ExamResultDraft) -> StoreResult<ExamResult> {
        let started_at = Instant::now();
        let result = draft
            .validate(Operation::Create)
            .map_err(StoreError::from)
            .and_then(|draft| {
                self.in_write_tx(|tx| {
                    let parent = resolve_parent(tx, EntityKind::Application, draft.application_id)?;
                    let key = UniqueKey::ExamResult {
                        application_id: parent.id,
                        subject: draft.subject.clone(),
                    };
                    check_unique(tx, &key, None)?;
                    let id = exam_result_repo::insert_exam_result(tx, &draft).map_err(|err| {
                        backstop(err, Some(&key), Some((parent.kind, parent.id)))
                    })?;
                    persisted(
                        exam_result_repo::get_exam_result(tx, id)?,
                        EntityKind::ExamResult,
                        id,
                    )
                })
            });
        log_mutation(
            "record_create",
            EntityKind::ExamResult,
            result.as_ref().ok().map(|exam| exam.id),
            started_at,
            &result,
        );
        result
    }

    fn get_exam_result(&self, id: RecordId) -> StoreResult<ExamResult> {
        persisted(
            exam_result_repo::get_exam_result(self.conn, id)?,
            EntityKind::ExamResult,
            id,
        )
    }

    fn list_exam_results(&self) -> StoreResult<Vec<ExamResult>> {
        Ok(exam_result_repo::list_exam_results(self.conn)?)
    }

    fn update_exam_result(
        &self,
        id: RecordId,
        draft: &ExamResultDraft,
    ) -> StoreResult<ExamResult> {
        let started_at = Instant::now();
        let result = draft
            .validate(Operation::Update)
            .map_err(StoreError::from)
            .and_then(|draft| {
                self.in_write_tx(|tx| {
                    let existing = persisted(
                        exam_result_repo::get_exam_result(tx, id)?,
                        EntityKind::ExamResult,
                        id,
                    )?;
                    let key = UniqueKey::ExamResult {
                        application_id: existing.data.application_id,
                        subject: draft.subject.clone(),
                    };
                    check_unique(tx, &key, Some(id))?;
                    exam_result_repo::update_exam_result(tx, id, &draft)
                        .map_err(|err| backstop(err, Some(&key), None))?;
                    persisted(
                        exam_result_repo::get_exam_result(tx, id)?,
                        EntityKind::ExamResult,
                        id,
                    )
                })
            });
        log_mutation(
            "record_update",
            EntityKind::ExamResult,
            Some(id),
            started_at,
            &result,
        );
        result
    }

    fn delete_exam_result(&self, id: RecordId) -> StoreResult<()> {
        self.delete_with_cascade(EntityKind::ExamResult, id)
            .map(|_| ())
    }

    fn counts(&self) -> StoreResult<RecordCounts> {
        Ok(RecordCounts {
            applicants: count_rows(self.conn, "applicants")?,
            applications: count_rows(self.conn, "applications")?,
            subject_grades: count_rows(self.conn, "subject_grades")?,
            exam_results: count_rows(self.conn, "exam_results")?,
        })
    }
}

fn persisted<T>(record: Option<T>, entity: EntityKind, id: RecordId) -> StoreResult<T> {
    record.ok_or(StoreError::NotFound { entity, id })
}

fn ensure_exists(conn: &Connection, entity: EntityKind, id: RecordId) -> StoreResult<()> {
    if row_exists(conn, table_of(entity), id)? {
        Ok(())
    } else {
        Err(StoreError::NotFound { entity, id })
    }
}

/// Maps constraint failures SQLite reports on write to store categories.
fn backstop(
    err: RepoError,
    key: Option<&UniqueKey>,
    parent: Option<(EntityKind, RecordId)>,
) -> StoreError {
    if let Some(key) = key {
        if err.is_unique_violation() {
            return StoreError::Conflict(key.clone());
        }
    }
    if let Some((entity, id)) = parent {
        if err.is_foreign_key_violation() {
            return StoreError::ParentNotFound { entity, id };
        }
    }
    StoreError::Store(err)
}

fn log_mutation<T>(
    event: &'static str,
    entity: EntityKind,
    id: Option<RecordId>,
    started_at: Instant,
    result: &StoreResult<T>,
) {
    let id = id.map_or_else(|| "none".to_string(), |value| value.to_string());
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event={} module=store status=ok entity={} id={} duration_ms={}",
            event, entity, id, duration_ms
        ),
        Err(StoreError::Store(err)) => error!(
            "event={} module=store status=error entity={} id={} duration_ms={} error_code=store_failure error={}",
            event, entity, id, duration_ms, err
        ),
        Err(err) => warn!(
            "event={} module=store status=error entity={} id={} duration_ms={} error_code={}",
            event,
            entity,
            id,
            duration_ms,
            err.code()
        ),
    }
}
