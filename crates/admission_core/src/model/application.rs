//! Application record: one admission application owned by an applicant.

use crate::model::RecordId;
use crate::validation::{DecimalRule, FieldChecker, Operation, TextRule, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const FACULTY: TextRule = TextRule::required(255);
pub const SPECIALTY: TextRule = TextRule::required(255);
pub const EDUCATIONAL_INSTITUTION: TextRule = TextRule::optional(255);
pub const DOCUMENT_TYPE: TextRule = TextRule::optional(100);
pub const DOCUMENT_NUMBER: TextRule = TextRule::optional(50);
pub const GROUP_NUMBER: TextRule = TextRule::optional(10);
/// Average and entrance-exam scores are `numeric(5,2)`.
pub const SCORE: DecimalRule = DecimalRule::numeric(5, 2);

/// Candidate application fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    /// Owning applicant. Read on create; on update it must still resolve
    /// but never re-parents the record.
    pub applicant_id: RecordId,
    pub faculty: String,
    pub specialty: String,
    pub educational_institution: Option<String>,
    pub graduation_year: Option<i32>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub average_score: Option<Decimal>,
    pub ege_score: Option<Decimal>,
    pub group_number: Option<String>,
}

impl ApplicationDraft {
    /// Runs every field rule and returns the draft with scores rescaled to
    /// two fractional digits.
    pub fn validate(&self, operation: Operation) -> Result<ApplicationDraft, ValidationError> {
        let mut checker = FieldChecker::new();
        if operation == Operation::Create {
            checker.reference("applicant_id", self.applicant_id);
        }
        checker.text("faculty", &self.faculty, FACULTY);
        checker.text("specialty", &self.specialty, SPECIALTY);
        checker.optional_text(
            "educational_institution",
            self.educational_institution.as_deref(),
            EDUCATIONAL_INSTITUTION,
        );
        checker.optional_text("document_type", self.document_type.as_deref(), DOCUMENT_TYPE);
        checker.optional_text(
            "document_number",
            self.document_number.as_deref(),
            DOCUMENT_NUMBER,
        );
        let average_score = checker.decimal("average_score", self.average_score, SCORE);
        let ege_score = checker.decimal("ege_score", self.ege_score, SCORE);
        checker.optional_text("group_number", self.group_number.as_deref(), GROUP_NUMBER);
        checker.finish()?;

        Ok(ApplicationDraft {
            average_score,
            ege_score,
            ..self.clone()
        })
    }
}

/// Persisted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: RecordId,
    #[serde(flatten)]
    pub data: ApplicationDraft,
}

impl Application {
    pub fn applicant_id(&self) -> RecordId {
        self.data.applicant_id
    }
}
