//! Admission domain model.
//!
//! # Responsibility
//! - Define the four persisted records and their candidate (draft) shapes.
//! - Attach declarative field rules to every draft.
//!
//! # Invariants
//! - Records reference parents by explicit identity fields only.
//! - Identity is store-assigned and never reused after deletion.
//! - The owning parent of a dependent record never changes after creation.
//!
//! # See also
//! - crate::validation

pub mod applicant;
pub mod application;
pub mod exam_result;
pub mod subject_grade;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned integer identity shared by every record type.
pub type RecordId = i64;

/// Record type discriminator used in errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Applicant,
    Application,
    SubjectGrade,
    ExamResult,
}

impl EntityKind {
    /// Stable lower-case name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applicant => "applicant",
            Self::Application => "application",
            Self::SubjectGrade => "subject_grade",
            Self::ExamResult => "exam_result",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
