#![allow(dead_code)]

use admission_core::{
    ApplicantDraft, ApplicationDraft, ExamResultDraft, RecordId, SubjectGradeDraft,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn applicant_draft(passport_data: &str) -> ApplicantDraft {
    ApplicantDraft {
        last_name: "Ivanova".to_string(),
        first_name: "Anna".to_string(),
        patronymic: Some("Sergeevna".to_string()),
        gender: "f".to_string(),
        citizenship: "RU".to_string(),
        birth_date: date(2006, 3, 14),
        passport_data: passport_data.to_string(),
        applicant_address: "Kazan, Baumana 12".to_string(),
        parents_address: None,
        foreign_language: Some("English".to_string()),
    }
}

pub fn application_draft(applicant_id: RecordId) -> ApplicationDraft {
    ApplicationDraft {
        applicant_id,
        faculty: "Computer Science".to_string(),
        specialty: "Software Engineering".to_string(),
        educational_institution: Some("School 42".to_string()),
        graduation_year: Some(2024),
        document_type: Some("certificate".to_string()),
        document_number: Some("A-100200".to_string()),
        average_score: Some(dec("4.75")),
        ege_score: Some(dec("255.50")),
        group_number: Some("CS-11".to_string()),
    }
}

pub fn subject_grade_draft(
    application_id: RecordId,
    subject: &str,
    grade: i32,
) -> SubjectGradeDraft {
    SubjectGradeDraft {
        application_id,
        subject: subject.to_string(),
        grade,
    }
}

pub fn exam_result_draft(application_id: RecordId, subject: &str, score: i32) -> ExamResultDraft {
    ExamResultDraft {
        application_id,
        classroom: Some("A-204".to_string()),
        subject: subject.to_string(),
        exam_date: Some(date(2024, 7, 10)),
        score,
    }
}
