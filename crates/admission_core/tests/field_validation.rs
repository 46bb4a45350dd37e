mod common;

use admission_core::{Operation, Violation};
use common::{
    applicant_draft, application_draft, dec, exam_result_draft, subject_grade_draft,
};

#[test]
fn valid_applicant_draft_is_accepted_unchanged() {
    let draft = applicant_draft("4510 123456");
    let accepted = draft.validate(Operation::Create).unwrap();
    assert_eq!(accepted, draft);
}

#[test]
fn applicant_violations_are_collected_not_short_circuited() {
    let mut draft = applicant_draft("4510 123456");
    draft.last_name = String::new();
    draft.first_name = "   ".to_string();
    draft.gender = "x".to_string();
    draft.citizenship = "c".repeat(51);
    draft.passport_data = "p".repeat(151);
    draft.applicant_address = String::new();
    draft.foreign_language = Some("l".repeat(51));

    let err = draft.validate(Operation::Create).unwrap_err();
    let fields: Vec<_> = err.violations().iter().map(|item| item.field).collect();
    assert_eq!(
        fields,
        vec![
            "last_name",
            "first_name",
            "gender",
            "citizenship",
            "passport_data",
            "applicant_address",
            "foreign_language",
        ]
    );
    assert_eq!(
        err.for_field("citizenship").next(),
        Some(&Violation::TooLong {
            max_chars: 50,
            actual_chars: 51
        })
    );
}

#[test]
fn gender_accepts_only_lowercase_m_or_f() {
    for gender in ["m", "f"] {
        let mut draft = applicant_draft("4510 123456");
        draft.gender = gender.to_string();
        assert!(draft.validate(Operation::Create).is_ok(), "{gender} rejected");
    }
    for gender in ["M", "F", "male", "mf", ""] {
        let mut draft = applicant_draft("4510 123456");
        draft.gender = gender.to_string();
        let err = draft.validate(Operation::Create).unwrap_err();
        assert!(err.has_field("gender"), "{gender:?} accepted");
    }
}

#[test]
fn optional_applicant_fields_may_be_absent() {
    let mut draft = applicant_draft("4510 123456");
    draft.patronymic = None;
    draft.parents_address = None;
    draft.foreign_language = None;
    assert!(draft.validate(Operation::Create).is_ok());
}

#[test]
fn application_scores_are_normalized_to_two_decimals() {
    let mut draft = application_draft(1);
    draft.average_score = Some(dec("4.5"));
    draft.ege_score = Some(dec("270"));

    let accepted = draft.validate(Operation::Create).unwrap();
    assert_eq!(accepted.average_score.unwrap().to_string(), "4.50");
    assert_eq!(accepted.ege_score.unwrap().to_string(), "270.00");
}

#[test]
fn application_scores_must_fit_numeric_5_2() {
    let mut draft = application_draft(1);
    draft.average_score = Some(dec("4.555"));
    draft.ege_score = Some(dec("1000.00"));

    let err = draft.validate(Operation::Create).unwrap_err();
    assert!(err.has_field("average_score"));
    assert!(err.has_field("ege_score"));
}

#[test]
fn application_requires_positive_applicant_reference_on_create() {
    let err = application_draft(0)
        .validate(Operation::Create)
        .unwrap_err();
    assert_eq!(
        err.for_field("applicant_id").next(),
        Some(&Violation::InvalidReference { value: 0 })
    );
}

#[test]
fn application_text_limits_are_enforced() {
    let mut draft = application_draft(1);
    draft.faculty = "f".repeat(256);
    draft.group_number = Some("g".repeat(11));
    draft.document_number = Some("d".repeat(51));

    let err = draft.validate(Operation::Update).unwrap_err();
    assert!(err.has_field("faculty"));
    assert!(err.has_field("group_number"));
    assert!(err.has_field("document_number"));
    assert!(!err.has_field("applicant_id"));
}

#[test]
fn subject_grade_boundaries_are_inclusive() {
    for grade in [1, 5] {
        assert!(subject_grade_draft(1, "Math", grade)
            .validate(Operation::Create)
            .is_ok());
    }
    for grade in [0, 6] {
        let err = subject_grade_draft(1, "Math", grade)
            .validate(Operation::Create)
            .unwrap_err();
        assert_eq!(
            err.for_field("grade").next(),
            Some(&Violation::OutOfRange {
                min: 1,
                max: 5,
                actual: i64::from(grade)
            })
        );
    }
}

#[test]
fn exam_score_boundaries_are_inclusive() {
    for score in [0, 100] {
        assert!(exam_result_draft(1, "Physics", score)
            .validate(Operation::Create)
            .is_ok());
    }
    for score in [-1, 101] {
        let err = exam_result_draft(1, "Physics", score)
            .validate(Operation::Create)
            .unwrap_err();
        assert!(err.has_field("score"));
    }
}

#[test]
fn dependent_owner_reference_is_not_checked_on_update() {
    assert!(subject_grade_draft(0, "Math", 4)
        .validate(Operation::Update)
        .is_ok());
    assert!(exam_result_draft(-3, "Math", 90)
        .validate(Operation::Update)
        .is_ok());
}

#[test]
fn exam_classroom_limit_is_enforced() {
    let mut draft = exam_result_draft(1, "Physics", 70);
    draft.classroom = Some("c".repeat(21));
    draft.subject = String::new();

    let err = draft.validate(Operation::Create).unwrap_err();
    let fields: Vec<_> = err.violations().iter().map(|item| item.field).collect();
    assert_eq!(fields, vec!["classroom", "subject"]);
}

#[test]
fn persisted_applicant_serializes_flat_with_iso_dates() {
    let applicant = admission_core::Applicant {
        id: 7,
        data: applicant_draft("4510 123456"),
    };

    let json = serde_json::to_value(&applicant).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["passport_data"], "4510 123456");
    assert_eq!(json["birth_date"], "2006-03-14");
    assert_eq!(json["gender"], "f");
    assert!(json["parents_address"].is_null());
    assert!(json.get("data").is_none());
}
