//! Applicant record: the root of the admission graph.
//!
//! # Invariants
//! - `passport_data` is unique among all applicants.
//! - `gender` is exactly `m` or `f`.

use crate::model::RecordId;
use crate::validation::{FieldChecker, Operation, TextRule, ValidationError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const LAST_NAME: TextRule = TextRule::required(100);
pub const FIRST_NAME: TextRule = TextRule::required(100);
pub const PATRONYMIC: TextRule = TextRule::optional(100);
pub const CITIZENSHIP: TextRule = TextRule::required(50);
pub const PASSPORT_DATA: TextRule = TextRule::required(150);
pub const APPLICANT_ADDRESS: TextRule = TextRule::required_unbounded();
pub const PARENTS_ADDRESS: TextRule = TextRule::optional_unbounded();
pub const FOREIGN_LANGUAGE: TextRule = TextRule::optional(50);

static GENDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new("^[mf]$").expect("valid gender regex"));

/// Candidate applicant fields, everything except identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDraft {
    pub last_name: String,
    pub first_name: String,
    pub patronymic: Option<String>,
    /// `m` or `f`.
    pub gender: String,
    pub citizenship: String,
    pub birth_date: NaiveDate,
    /// Globally unique passport series/number text.
    pub passport_data: String,
    pub applicant_address: String,
    pub parents_address: Option<String>,
    pub foreign_language: Option<String>,
}

impl ApplicantDraft {
    /// Runs every field rule and returns the accepted draft.
    ///
    /// Applicant rules do not differ between create and update.
    pub fn validate(&self, _operation: Operation) -> Result<ApplicantDraft, ValidationError> {
        let mut checker = FieldChecker::new();
        checker.text("last_name", &self.last_name, LAST_NAME);
        checker.text("first_name", &self.first_name, FIRST_NAME);
        checker.optional_text("patronymic", self.patronymic.as_deref(), PATRONYMIC);
        checker.pattern("gender", &self.gender, &GENDER_RE);
        checker.text("citizenship", &self.citizenship, CITIZENSHIP);
        checker.text("passport_data", &self.passport_data, PASSPORT_DATA);
        checker.text("applicant_address", &self.applicant_address, APPLICANT_ADDRESS);
        checker.optional_text(
            "parents_address",
            self.parents_address.as_deref(),
            PARENTS_ADDRESS,
        );
        checker.optional_text(
            "foreign_language",
            self.foreign_language.as_deref(),
            FOREIGN_LANGUAGE,
        );
        checker.finish()?;
        Ok(self.clone())
    }
}

/// Persisted applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: RecordId,
    #[serde(flatten)]
    pub data: ApplicantDraft,
}

impl Applicant {
    /// Display name in `last first patronymic` order; a missing or blank
    /// patronymic is omitted.
    pub fn full_name(&self) -> String {
        full_name(
            &self.data.last_name,
            &self.data.first_name,
            self.data.patronymic.as_deref(),
        )
    }
}

pub(crate) fn full_name(last_name: &str, first_name: &str, patronymic: Option<&str>) -> String {
    [Some(last_name), Some(first_name), patronymic]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
