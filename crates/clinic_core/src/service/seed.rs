//! Demo dataset for a fresh clinic database.

use crate::model::appointment::NewAppointment;
use crate::model::billing::NewBill;
use crate::model::doctor::NewDoctor;
use crate::model::lab_test::NewLabTest;
use crate::model::patient::NewPatient;
use crate::model::validation::{parse_date, parse_time};
use crate::repo::error::RepoResult;
use crate::service::clinic_service::ClinicService;
use log::info;

/// Row counts inserted by [`seed_sample_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub doctors: usize,
    pub patients: usize,
    pub appointments: usize,
    pub lab_tests: usize,
    pub bills: usize,
}

/// Inserts three doctors, three patients and related sample records.
///
/// Every call appends a new copy of the dataset.
pub fn seed_sample_data(service: &ClinicService<'_>) -> RepoResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    let mut doctor_ids = Vec::new();
    for (name, specialization, contact) in [
        ("Dr. A. Sen", "Cardiology", "9876543210"),
        ("Dr. R. Gupta", "Orthopedics", "9876543211"),
        ("Dr. P. Bose", "General Medicine", "9876543212"),
    ] {
        let doctor = service.add_doctor(NewDoctor {
            name: name.to_string(),
            specialization: Some(specialization.to_string()),
            contact: Some(contact.to_string()),
        })?;
        doctor_ids.push(doctor.id);
        summary.doctors += 1;
    }

    let mut patient_ids = Vec::new();
    for (name, age, gender, contact, disease, doctor) in [
        ("S. Chatterjee", 35, "M", "9000000001", "Fever", 2),
        ("M. Das", 56, "F", "9000000002", "Chest Pain", 0),
        ("A. Khan", 42, "M", "9000000003", "Back Pain", 1),
    ] {
        let patient = service.add_patient(NewPatient {
            name: name.to_string(),
            age,
            gender: Some(gender.to_string()),
            contact: Some(contact.to_string()),
            disease: Some(disease.to_string()),
            doctor_id: Some(doctor_ids[doctor]),
        })?;
        patient_ids.push(patient.id);
        summary.patients += 1;
    }

    for (patient, doctor, date, time, notes) in [
        (0, 2, "2025-09-10", "10:00", "Follow-up"),
        (1, 0, "2025-09-11", "11:30", "New issue"),
        (2, 1, "2025-09-12", "09:15", "Routine check"),
    ] {
        service.schedule_appointment(NewAppointment {
            patient_id: patient_ids[patient],
            doctor_id: doctor_ids[doctor],
            date: parse_date(date)?,
            time: parse_time(time)?,
            notes: Some(notes.to_string()),
        })?;
        summary.appointments += 1;
    }

    let cbc = service.order_lab_test(NewLabTest::new(patient_ids[0], "CBC", 400.0))?;
    service.record_lab_result(cbc.id, "Normal")?;
    service.order_lab_test(NewLabTest::new(patient_ids[1], "ECG", 800.0))?;
    summary.lab_tests += 2;

    for (patient, amount, description, paid) in [
        (0, 500.0, "Consultation", true),
        (0, 400.0, "CBC Test", false),
        (1, 600.0, "Consultation", false),
    ] {
        let bill = service.create_bill(NewBill {
            patient_id: patient_ids[patient],
            amount,
            description: Some(description.to_string()),
        })?;
        if paid {
            service.mark_bill_paid(bill.id)?;
        }
        summary.bills += 1;
    }

    info!(
        "event=seed_sample_data module=service status=ok doctors={} patients={} appointments={} lab_tests={} bills={}",
        summary.doctors, summary.patients, summary.appointments, summary.lab_tests, summary.bills
    );
    Ok(summary)
}
