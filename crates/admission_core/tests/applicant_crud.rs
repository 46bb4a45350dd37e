mod common;

use admission_core::db::open_db_in_memory;
use admission_core::{EntityKind, RecordStore, SqliteRecordStore, StoreError, UniqueKey};
use common::{applicant_draft, date};

#[test]
fn create_then_get_returns_identical_record() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let created = store.create_applicant(&applicant_draft("4510 123456")).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.data, applicant_draft("4510 123456"));
    assert_eq!(created.full_name(), "Ivanova Anna Sergeevna");

    let loaded = store.get_applicant(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn list_returns_applicants_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    assert!(store.list_applicants().unwrap().is_empty());
    let first = store.create_applicant(&applicant_draft("1111 000001")).unwrap();
    let second = store.create_applicant(&applicant_draft("1111 000002")).unwrap();

    let ids: Vec<_> = store
        .list_applicants()
        .unwrap()
        .into_iter()
        .map(|applicant| applicant.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn duplicate_passport_is_a_conflict_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    store.create_applicant(&applicant_draft("4510 123456")).unwrap();

    let mut duplicate = applicant_draft("4510 123456");
    duplicate.first_name = "Boris".to_string();
    let err = store.create_applicant(&duplicate).unwrap_err();

    assert!(matches!(
        &err,
        StoreError::Conflict(UniqueKey::Passport(passport)) if passport == "4510 123456"
    ));
    assert_eq!(err.code(), "conflict");
    assert!(!err.to_string().contains("4510 123456"));
    assert_eq!(store.list_applicants().unwrap().len(), 1);
}

#[test]
fn update_replaces_fields_and_keeps_identity() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let created = store.create_applicant(&applicant_draft("4510 123456")).unwrap();

    let mut changed = applicant_draft("4510 123456");
    changed.last_name = "Petrova".to_string();
    changed.patronymic = None;
    changed.birth_date = date(2005, 12, 1);
    let updated = store.update_applicant(created.id, &changed).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.data, changed);
    assert_eq!(store.get_applicant(created.id).unwrap(), updated);
}

#[test]
fn update_to_another_applicants_passport_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    store.create_applicant(&applicant_draft("1111 000001")).unwrap();
    let second = store.create_applicant(&applicant_draft("1111 000002")).unwrap();

    let err = store
        .update_applicant(second.id, &applicant_draft("1111 000001"))
        .unwrap_err();

    assert!(matches!(err, StoreError::Conflict(UniqueKey::Passport(_))));
    assert_eq!(
        store.get_applicant(second.id).unwrap().data.passport_data,
        "1111 000002"
    );
}

#[test]
fn missing_applicant_is_not_found_for_get_update_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let not_found = |err: StoreError| {
        matches!(
            err,
            StoreError::NotFound {
                entity: EntityKind::Applicant,
                id: 42
            }
        )
    };
    assert!(not_found(store.get_applicant(42).unwrap_err()));
    assert!(not_found(
        store
            .update_applicant(42, &applicant_draft("4510 123456"))
            .unwrap_err()
    ));
    assert!(not_found(store.delete_applicant(42).unwrap_err()));
}

#[test]
fn invalid_draft_is_rejected_before_lookup() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let mut draft = applicant_draft("4510 123456");
    draft.gender = "x".to_string();

    let create_err = store.create_applicant(&draft).unwrap_err();
    assert!(matches!(&create_err, StoreError::Validation(err) if err.has_field("gender")));
    assert_eq!(create_err.code(), "validation");

    let update_err = store.update_applicant(42, &draft).unwrap_err();
    assert!(matches!(update_err, StoreError::Validation(_)));
    assert!(store.list_applicants().unwrap().is_empty());
}

#[test]
fn deleted_applicant_identity_is_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let first = store.create_applicant(&applicant_draft("1111 000001")).unwrap();

    let summary = store.delete_applicant(first.id).unwrap();
    assert_eq!(summary.total(), 0);
    assert!(store.get_applicant(first.id).is_err());

    let second = store.create_applicant(&applicant_draft("1111 000001")).unwrap();
    assert!(second.id > first.id);
}
