use clinic_core::db::open_db_in_memory;
use clinic_core::{
    parse_date, parse_time, seed_sample_data, ClinicService, NewAppointment, NewBill,
    NewDoctor, NewLabTest, NewPatient, SeedSummary,
};

fn book(service: &ClinicService<'_>, patient_id: i64, doctor_id: i64, date: &str) {
    service
        .schedule_appointment(NewAppointment {
            patient_id,
            doctor_id,
            date: parse_date(date).unwrap(),
            time: parse_time("10:00").unwrap(),
            notes: None,
        })
        .unwrap();
}

#[test]
fn patient_summary_does_not_multiply_unpaid_amount() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let doctor = service.add_doctor(NewDoctor::new("Dr. A. Sen")).unwrap();
    let patient = service.add_patient(NewPatient::new("M. Das", 56)).unwrap();
    book(&service, patient.id, doctor.id, "2025-09-10");
    book(&service, patient.id, doctor.id, "2025-09-11");
    service
        .order_lab_test(NewLabTest::new(patient.id, "ECG", 800.0))
        .unwrap();
    service
        .create_bill(NewBill::new(patient.id, 400.0))
        .unwrap();
    let paid = service
        .create_bill(NewBill::new(patient.id, 500.0))
        .unwrap();
    service.mark_bill_paid(paid.id).unwrap();

    let summary = service.patient_summary().unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].patient_id, patient.id);
    assert_eq!(summary[0].name, "M. Das");
    assert_eq!(summary[0].appointments, 2);
    assert_eq!(summary[0].lab_tests, 1);
    assert_eq!(summary[0].unpaid_amount, 400.0);
}

#[test]
fn patient_summary_includes_patients_without_activity() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let first = service.add_patient(NewPatient::new("Quiet One", 20)).unwrap();
    let second = service.add_patient(NewPatient::new("Quiet Two", 30)).unwrap();

    let summary = service.patient_summary().unwrap();
    let ids: Vec<_> = summary.iter().map(|s| s.patient_id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    for row in &summary {
        assert_eq!(row.appointments, 0);
        assert_eq!(row.lab_tests, 0);
        assert_eq!(row.unpaid_amount, 0.0);
    }
}

#[test]
fn doctor_workload_counts_and_ordering() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let idle = service.add_doctor(NewDoctor::new("Dr. Idle")).unwrap();
    let busy = service
        .add_doctor(NewDoctor {
            specialization: Some("Cardiology".to_string()),
            ..NewDoctor::new("Dr. Busy")
        })
        .unwrap();
    let other = service.add_doctor(NewDoctor::new("Dr. Another")).unwrap();

    let first = service
        .add_patient(NewPatient {
            doctor_id: Some(busy.id),
            ..NewPatient::new("P. One", 40)
        })
        .unwrap();
    let second = service
        .add_patient(NewPatient {
            doctor_id: Some(busy.id),
            ..NewPatient::new("P. Two", 41)
        })
        .unwrap();
    book(&service, first.id, busy.id, "2025-09-10");
    book(&service, second.id, busy.id, "2025-09-11");
    book(&service, first.id, busy.id, "2025-09-12");
    book(&service, second.id, other.id, "2025-09-12");

    let workload = service.doctor_workload().unwrap();
    let ids: Vec<_> = workload.iter().map(|w| w.doctor_id).collect();
    assert_eq!(ids, vec![busy.id, other.id, idle.id]);

    assert_eq!(workload[0].appointments_count, 3);
    assert_eq!(workload[0].patients_assigned, 2);
    assert_eq!(workload[0].specialization.as_deref(), Some("Cardiology"));
    assert_eq!(workload[1].appointments_count, 1);
    assert_eq!(workload[1].patients_assigned, 0);
    assert_eq!(workload[2].name, "Dr. Idle");
    assert_eq!(workload[2].appointments_count, 0);
    assert_eq!(workload[2].patients_assigned, 0);
}

#[test]
fn doctor_workload_breaks_ties_by_name() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    service.add_doctor(NewDoctor::new("Dr. Zed")).unwrap();
    service.add_doctor(NewDoctor::new("Dr. Abe")).unwrap();

    let names: Vec<_> = service
        .doctor_workload()
        .unwrap()
        .into_iter()
        .map(|w| w.name)
        .collect();
    assert_eq!(names, vec!["Dr. Abe", "Dr. Zed"]);
}

#[test]
fn deleting_patient_cascades_to_dependent_rows() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();
    let doctor = service.add_doctor(NewDoctor::new("Dr. A. Sen")).unwrap();
    let patient = service.add_patient(NewPatient::new("M. Das", 56)).unwrap();
    book(&service, patient.id, doctor.id, "2025-09-10");
    service
        .order_lab_test(NewLabTest::new(patient.id, "CBC", 400.0))
        .unwrap();
    service.create_bill(NewBill::new(patient.id, 400.0)).unwrap();

    assert!(service.delete_patient(patient.id).unwrap());

    assert!(service.list_appointments().unwrap().is_empty());
    assert!(service.list_lab_tests().unwrap().is_empty());
    assert!(service.list_bills().unwrap().is_empty());
    assert!(service.patient_summary().unwrap().is_empty());
    assert_eq!(service.doctor_workload().unwrap()[0].appointments_count, 0);
}

#[test]
fn seed_sample_data_populates_every_table() {
    let conn = open_db_in_memory().unwrap();
    let service = ClinicService::try_new(&conn).unwrap();

    let summary = seed_sample_data(&service).unwrap();
    assert_eq!(
        summary,
        SeedSummary {
            doctors: 3,
            patients: 3,
            appointments: 3,
            lab_tests: 2,
            bills: 3,
        }
    );

    assert_eq!(service.list_doctors().unwrap().len(), 3);
    assert_eq!(service.list_patients().unwrap().len(), 3);
    assert_eq!(service.list_lab_test_views(true).unwrap().len(), 1);
    assert_eq!(service.list_bill_views(true).unwrap().len(), 2);

    let summary = service.patient_summary().unwrap();
    assert_eq!(summary[0].name, "S. Chatterjee");
    assert_eq!(summary[0].appointments, 1);
    assert_eq!(summary[0].lab_tests, 1);
    assert_eq!(summary[0].unpaid_amount, 400.0);
}
