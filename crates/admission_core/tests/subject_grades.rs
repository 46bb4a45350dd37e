mod common;

use admission_core::db::open_db_in_memory;
use admission_core::{EntityKind, RecordStore, SqliteRecordStore, StoreError, UniqueKey};
use common::{applicant_draft, application_draft, subject_grade_draft};
use rusqlite::Connection;

fn seeded_application(store: &SqliteRecordStore<'_>, passport: &str) -> i64 {
    let applicant = store.create_applicant(&applicant_draft(passport)).unwrap();
    store
        .create_application(&application_draft(applicant.id))
        .unwrap()
        .id
}

fn store(conn: &Connection) -> SqliteRecordStore<'_> {
    SqliteRecordStore::try_new(conn).unwrap()
}

#[test]
fn grade_boundaries_are_enforced_on_create() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);
    let application_id = seeded_application(&store, "4510 123456");

    for (subject, grade) in [("Math", 0), ("Math", 6)] {
        let err = store
            .create_subject_grade(&subject_grade_draft(application_id, subject, grade))
            .unwrap_err();
        assert!(matches!(&err, StoreError::Validation(v) if v.has_field("grade")));
    }
    for (subject, grade) in [("Math", 1), ("History", 5)] {
        let created = store
            .create_subject_grade(&subject_grade_draft(application_id, subject, grade))
            .unwrap();
        assert_eq!(created.data.grade, grade);
    }
    assert_eq!(store.list_subject_grades().unwrap().len(), 2);
}

#[test]
fn same_subject_twice_for_one_application_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);
    let first_app = seeded_application(&store, "1111 000001");
    let second_app = seeded_application(&store, "1111 000002");

    store
        .create_subject_grade(&subject_grade_draft(first_app, "Math", 5))
        .unwrap();
    let err = store
        .create_subject_grade(&subject_grade_draft(first_app, "Math", 4))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Conflict(UniqueKey::SubjectGrade { application_id, ref subject })
            if application_id == first_app && subject == "Math"
    ));

    store
        .create_subject_grade(&subject_grade_draft(second_app, "Math", 4))
        .unwrap();
}

#[test]
fn grade_for_unknown_application_is_parent_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);

    let err = store
        .create_subject_grade(&subject_grade_draft(77, "Math", 5))
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::ParentNotFound {
            entity: EntityKind::Application,
            id: 77
        }
    ));
}

#[test]
fn update_changes_grade_but_not_owner() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);
    let owner_app = seeded_application(&store, "1111 000001");
    let other_app = seeded_application(&store, "1111 000002");
    let created = store
        .create_subject_grade(&subject_grade_draft(owner_app, "Math", 3))
        .unwrap();

    let updated = store
        .update_subject_grade(created.id, &subject_grade_draft(other_app, "Algebra", 4))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.data.application_id, owner_app);
    assert_eq!(updated.data.subject, "Algebra");
    assert_eq!(updated.data.grade, 4);
    assert_eq!(store.get_subject_grade(created.id).unwrap(), updated);
}

#[test]
fn update_to_subject_held_by_sibling_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);
    let application_id = seeded_application(&store, "4510 123456");
    store
        .create_subject_grade(&subject_grade_draft(application_id, "Math", 5))
        .unwrap();
    let history = store
        .create_subject_grade(&subject_grade_draft(application_id, "History", 4))
        .unwrap();

    let same_subject = store
        .update_subject_grade(history.id, &subject_grade_draft(application_id, "History", 5))
        .unwrap();
    assert_eq!(same_subject.data.grade, 5);

    let err = store
        .update_subject_grade(history.id, &subject_grade_draft(application_id, "Math", 5))
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(UniqueKey::SubjectGrade { .. })));
}

#[test]
fn delete_removes_only_the_grade() {
    let conn = open_db_in_memory().unwrap();
    let store = store(&conn);
    let application_id = seeded_application(&store, "4510 123456");
    let grade = store
        .create_subject_grade(&subject_grade_draft(application_id, "Math", 5))
        .unwrap();

    store.delete_subject_grade(grade.id).unwrap();

    assert!(matches!(
        store.get_subject_grade(grade.id),
        Err(StoreError::NotFound {
            entity: EntityKind::SubjectGrade,
            ..
        })
    ));
    assert!(store.get_application(application_id).is_ok());
    assert!(matches!(
        store.delete_subject_grade(grade.id),
        Err(StoreError::NotFound { .. })
    ));
}
