use clinic_core::db::open_db_in_memory;
use clinic_core::{
    ClinicService, LabTestPatch, NewLabTest, NewPatient, RepoError, ValidationError,
};

#[test]
fn ordered_test_is_pending_until_result_is_recorded() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("M. Das", 56)).unwrap();

    let ordered = service
        .order_lab_test(NewLabTest::new(patient.id, "ECG", 800.0))
        .unwrap();
    assert!(ordered.is_pending());
    assert_eq!(ordered.result, None);
    assert_eq!(ordered.reported_on, None);

    let loaded = service.get_lab_test(ordered.id).unwrap().unwrap();
    assert_eq!(loaded, ordered);

    let reported = service
        .record_lab_result(ordered.id, "Sinus rhythm")
        .unwrap()
        .unwrap();
    assert!(!reported.is_pending());
    assert_eq!(reported.result.as_deref(), Some("Sinus rhythm"));
    let reported_on = reported.reported_on.expect("reported_on must be set");
    assert!(reported_on >= reported.ordered_on);
    assert_eq!(reported.ordered_on, ordered.ordered_on);
}

#[test]
fn record_result_rejects_blank_text_and_ignores_missing_id() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("M. Das", 56)).unwrap();
    let ordered = service
        .order_lab_test(NewLabTest::new(patient.id, "CBC", 400.0))
        .unwrap();

    let err = service.record_lab_result(ordered.id, "   ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyField("result"))
    ));
    assert!(service
        .get_lab_test(ordered.id)
        .unwrap()
        .unwrap()
        .is_pending());

    assert!(service.record_lab_result(9999, "Normal").unwrap().is_none());
}

#[test]
fn schema_rejects_result_without_reported_on() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("M. Das", 56)).unwrap();
    let ordered = service
        .order_lab_test(NewLabTest::new(patient.id, "CBC", 400.0))
        .unwrap();

    let err = conn
        .execute(
            "UPDATE lab_tests SET result = 'Normal' WHERE id = ?1;",
            [ordered.id],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK"));
}

#[test]
fn order_validates_name_cost_and_patient() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("M. Das", 56)).unwrap();

    let err = service
        .order_lab_test(NewLabTest::new(patient.id, " ", 10.0))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyField("test_name"))
    ));

    let err = service
        .order_lab_test(NewLabTest::new(patient.id, "CBC", -5.0))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NegativeValue { field: "cost", .. })
    ));

    let err = service
        .order_lab_test(NewLabTest::new(patient.id + 100, "CBC", 5.0))
        .unwrap_err();
    assert!(matches!(err, RepoError::ReferenceNotFound { table: "patients", .. }));
}

#[test]
fn views_are_newest_first_and_can_filter_pending() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("S. Chatterjee", 35)).unwrap();
    let older = service
        .order_lab_test(NewLabTest::new(patient.id, "CBC", 400.0))
        .unwrap();
    let newer = service
        .order_lab_test(NewLabTest::new(patient.id, "Lipid Panel", 650.0))
        .unwrap();
    conn.execute(
        "UPDATE lab_tests SET ordered_on = '2025-01-01T08:00:00' WHERE id = ?1;",
        [older.id],
    )
    .unwrap();
    conn.execute(
        "UPDATE lab_tests SET ordered_on = '2025-02-01T08:00:00' WHERE id = ?1;",
        [newer.id],
    )
    .unwrap();
    service.record_lab_result(older.id, "Normal").unwrap();

    let all = service.list_lab_test_views(false).unwrap();
    let ids: Vec<_> = all.iter().map(|v| v.test.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert_eq!(all[0].patient_name, "S. Chatterjee");

    let pending = service.list_lab_test_views(true).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].test.id, newer.id);
}

#[test]
fn update_lab_test_changes_order_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("M. Das", 56)).unwrap();
    let ordered = service
        .order_lab_test(NewLabTest::new(patient.id, "CBC", 400.0))
        .unwrap();

    let updated = service
        .update_lab_test(
            ordered.id,
            LabTestPatch {
                cost: Some(450.0),
                ..LabTestPatch::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.cost, 450.0);
    assert_eq!(updated.test_name, "CBC");
    assert!(updated.is_pending());

    assert!(service.delete_lab_test(ordered.id).unwrap());
    assert!(service.list_lab_tests().unwrap().is_empty());
}
