//! Entrance-exam result attached to an application.
//!
//! # Invariants
//! - At most one result per `(application_id, subject)`.
//! - `score` lies in `0..=100`.

use crate::model::RecordId;
use crate::validation::{FieldChecker, IntRule, Operation, TextRule, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CLASSROOM: TextRule = TextRule::optional(20);
pub const SUBJECT: TextRule = TextRule::required(100);
pub const SCORE: IntRule = IntRule::between(0, 100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResultDraft {
    /// Owning application. Ignored on update.
    pub application_id: RecordId,
    pub classroom: Option<String>,
    pub subject: String,
    /// Scheduled exam day, when known.
    pub exam_date: Option<NaiveDate>,
    pub score: i32,
}

impl ExamResultDraft {
    pub fn validate(&self, operation: Operation) -> Result<ExamResultDraft, ValidationError> {
        let mut checker = FieldChecker::new();
        if operation == Operation::Create {
            checker.reference("application_id", self.application_id);
        }
        checker.optional_text("classroom", self.classroom.as_deref(), CLASSROOM);
        checker.text("subject", &self.subject, SUBJECT);
        checker.int("score", i64::from(self.score), SCORE);
        checker.finish()?;
        Ok(self.clone())
    }
}

/// Persisted exam result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: RecordId,
    #[serde(flatten)]
    pub data: ExamResultDraft,
}
