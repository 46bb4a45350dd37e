//! Record store: the create/read/update/delete contracts for every
//! admission record.
//!
//! # Responsibility
//! - Compose field validation, parent resolution and uniqueness checks into
//!   one atomic operation per mutation.
//! - Classify every failure into one inspectable [`StoreError`] category.
//!
//! # Invariants
//! - A failed mutation leaves committed state exactly as it was.
//! - Identity and owning parent never change after creation.
//! - Deleting a parent removes its whole dependent subtree in the same
//!   transaction.

pub mod integrity;
mod sqlite_store;
pub mod uniqueness;

pub use integrity::{CascadeSummary, ParentHandle};
pub use sqlite_store::SqliteRecordStore;
pub use uniqueness::UniqueKey;

use crate::model::applicant::{Applicant, ApplicantDraft};
use crate::model::application::{Application, ApplicationDraft};
use crate::model::exam_result::{ExamResult, ExamResultDraft};
use crate::model::subject_grade::{SubjectGrade, SubjectGradeDraft};
use crate::model::{EntityKind, RecordId};
use crate::repo::RepoError;
use crate::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure categories of store operations.
#[derive(Debug)]
pub enum StoreError {
    /// One or more field rules were violated.
    Validation(ValidationError),
    /// The record addressed by its own identity does not exist.
    NotFound { entity: EntityKind, id: RecordId },
    /// A parent reference does not resolve. `entity` is the parent's kind.
    ParentNotFound { entity: EntityKind, id: RecordId },
    /// A uniqueness constraint would be violated.
    Conflict(UniqueKey),
    /// Persistence failed for a reason outside the categories above.
    Store(RepoError),
}

impl StoreError {
    /// Stable `error_code` used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::ParentNotFound { .. } => "parent_not_found",
            Self::Conflict(_) => "conflict",
            Self::Store(_) => "store_failure",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ParentNotFound { entity, id } => {
                write!(f, "referenced {entity} not found: {id}")
            }
            Self::Conflict(key) => write!(f, "uniqueness conflict: {key}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound { .. } | Self::ParentNotFound { .. } | Self::Conflict(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(value.into())
    }
}

/// Row counts per record type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub applicants: u64,
    pub applications: u64,
    pub subject_grades: u64,
    pub exam_results: u64,
}

/// CRUD contracts over the four admission record types.
///
/// Every create/update returns the full persisted record. Reads never
/// validate and never block on other readers.
pub trait RecordStore {
    fn create_applicant(&self, draft: &ApplicantDraft) -> StoreResult<Applicant>;
    fn get_applicant(&self, id: RecordId) -> StoreResult<Applicant>;
    fn list_applicants(&self) -> StoreResult<Vec<Applicant>>;
    fn update_applicant(&self, id: RecordId, draft: &ApplicantDraft) -> StoreResult<Applicant>;
    /// Removes the applicant with all its applications and their dependents.
    fn delete_applicant(&self, id: RecordId) -> StoreResult<CascadeSummary>;

    fn create_application(&self, draft: &ApplicationDraft) -> StoreResult<Application>;
    fn get_application(&self, id: RecordId) -> StoreResult<Application>;
    fn list_applications(&self) -> StoreResult<Vec<Application>>;
    /// `draft.applicant_id` must resolve but never re-parents the record.
    fn update_application(
        &self,
        id: RecordId,
        draft: &ApplicationDraft,
    ) -> StoreResult<Application>;
    /// Removes the application with its grades and exam results.
    fn delete_application(&self, id: RecordId) -> StoreResult<CascadeSummary>;

    fn create_subject_grade(&self, draft: &SubjectGradeDraft) -> StoreResult<SubjectGrade>;
    fn get_subject_grade(&self, id: RecordId) -> StoreResult<SubjectGrade>;
    fn list_subject_grades(&self) -> StoreResult<Vec<SubjectGrade>>;
    /// `draft.application_id` is ignored; the stored owner is kept.
    fn update_subject_grade(
        &self,
        id: RecordId,
        draft: &SubjectGradeDraft,
    ) -> StoreResult<SubjectGrade>;
    fn delete_subject_grade(&self, id: RecordId) -> StoreResult<()>;

    fn create_exam_result(&self, draft: &ExamResultDraft) -> StoreResult<ExamResult>;
    fn get_exam_result(&self, id: RecordId) -> StoreResult<ExamResult>;
    fn list_exam_results(&self) -> StoreResult<Vec<ExamResult>>;
    /// `draft.application_id` is ignored; the stored owner is kept.
    fn update_exam_result(&self, id: RecordId, draft: &ExamResultDraft)
        -> StoreResult<ExamResult>;
    fn delete_exam_result(&self, id: RecordId) -> StoreResult<()>;

    fn counts(&self) -> StoreResult<RecordCounts>;
}
