//! School-leaving subject grade attached to an application.
//!
//! # Invariants
//! - At most one grade per `(application_id, subject)`.
//! - `grade` lies in `1..=5`.

use crate::model::RecordId;
use crate::validation::{FieldChecker, IntRule, Operation, TextRule, ValidationError};
use serde::{Deserialize, Serialize};

pub const SUBJECT: TextRule = TextRule::required(100);
pub const GRADE: IntRule = IntRule::between(1, 5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGradeDraft {
    /// Owning application. Ignored on update.
    pub application_id: RecordId,
    pub subject: String,
    pub grade: i32,
}

impl SubjectGradeDraft {
    pub fn validate(&self, operation: Operation) -> Result<SubjectGradeDraft, ValidationError> {
        let mut checker = FieldChecker::new();
        if operation == Operation::Create {
            checker.reference("application_id", self.application_id);
        }
        checker.text("subject", &self.subject, SUBJECT);
        checker.int("grade", i64::from(self.grade), GRADE);
        checker.finish()?;
        Ok(self.clone())
    }
}

/// Persisted subject grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGrade {
    pub id: RecordId,
    #[serde(flatten)]
    pub data: SubjectGradeDraft,
}
