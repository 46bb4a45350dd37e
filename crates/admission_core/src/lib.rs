//! Core domain logic for the admission record store.
//! This crate is the single source of truth for admission invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod store;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::applicant::{Applicant, ApplicantDraft};
pub use model::application::{Application, ApplicationDraft};
pub use model::exam_result::{ExamResult, ExamResultDraft};
pub use model::subject_grade::{SubjectGrade, SubjectGradeDraft};
pub use model::{EntityKind, RecordId};
pub use query::exam_results::{
    get_exam_result_with_applicant, list_exam_results_with_applicant, ExamResultWithApplicant,
};
pub use repo::{RepoError, RepoResult};
pub use store::{
    CascadeSummary, ParentHandle, RecordCounts, RecordStore, SqliteRecordStore, StoreError,
    StoreResult, UniqueKey,
};
pub use validation::{FieldViolation, Operation, ValidationError, Violation};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
