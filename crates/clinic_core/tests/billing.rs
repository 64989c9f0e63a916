use clinic_core::db::open_db_in_memory;
use clinic_core::{BillPatch, ClinicService, NewBill, NewPatient, RepoError, ValidationError};

#[test]
fn new_bill_starts_unpaid_and_dated_today() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("A. Khan", 42)).unwrap();

    let bill = service
        .create_bill(NewBill {
            description: Some("Consultation".to_string()),
            ..NewBill::new(patient.id, 500.0)
        })
        .unwrap();

    assert!(!bill.paid);
    assert_eq!(bill.billed_on, chrono::Local::now().date_naive());
    assert_eq!(service.get_bill(bill.id).unwrap().unwrap(), bill);
}

#[test]
fn negative_amount_is_rejected_by_validation_and_schema() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("A. Khan", 42)).unwrap();

    let err = service
        .create_bill(NewBill::new(patient.id, -1.0))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NegativeValue { field: "amount", .. })
    ));
    assert!(service.list_bills().unwrap().is_empty());

    let err = conn
        .execute(
            "INSERT INTO billing (patient_id, amount, billed_on, paid)
             VALUES (?1, -1.0, '2025-09-10', 0);",
            [patient.id],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK"));
}

#[test]
fn bill_requires_existing_patient() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();

    let err = service.create_bill(NewBill::new(77, 10.0)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ReferenceNotFound {
            table: "patients",
            id: 77
        }
    ));
    assert!(err.is_client_error());
}

#[test]
fn mark_paid_and_unpaid_filter() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("A. Khan", 42)).unwrap();
    let first = service.create_bill(NewBill::new(patient.id, 500.0)).unwrap();
    let second = service.create_bill(NewBill::new(patient.id, 400.0)).unwrap();

    assert!(service.mark_bill_paid(first.id).unwrap());
    assert!(!service.mark_bill_paid(9999).unwrap());

    let all = service.list_bill_views(false).unwrap();
    let ids: Vec<_> = all.iter().map(|v| v.bill.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(all[0].patient_name, "A. Khan");

    let unpaid = service.list_bill_views(true).unwrap();
    assert_eq!(unpaid.len(), 1);
    assert_eq!(unpaid[0].bill.id, second.id);
    assert_eq!(unpaid[0].bill.amount, 400.0);
}

#[test]
fn update_bill_merges_patch_and_validates_amount() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("A. Khan", 42)).unwrap();
    let bill = service
        .create_bill(NewBill {
            description: Some("X-ray".to_string()),
            ..NewBill::new(patient.id, 300.0)
        })
        .unwrap();

    let updated = service
        .update_bill(
            bill.id,
            BillPatch {
                amount: Some(350.0),
                paid: Some(true),
                ..BillPatch::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.amount, 350.0);
    assert!(updated.paid);
    assert_eq!(updated.description.as_deref(), Some("X-ray"));
    assert_eq!(service.get_bill(bill.id).unwrap().unwrap(), updated);

    let err = service
        .update_bill(
            bill.id,
            BillPatch {
                amount: Some(-10.0),
                ..BillPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(service.get_bill(bill.id).unwrap().unwrap().amount, 350.0);

    assert!(service
        .update_bill(4242, BillPatch::default())
        .unwrap()
        .is_none());
}

#[test]
fn delete_bill_removes_row() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let patient = service.add_patient(NewPatient::new("A. Khan", 42)).unwrap();
    let bill = service.create_bill(NewBill::new(patient.id, 20.0)).unwrap();

    assert!(service.delete_bill(bill.id).unwrap());
    assert!(!service.delete_bill(bill.id).unwrap());
    assert!(service.list_bills().unwrap().is_empty());
}
