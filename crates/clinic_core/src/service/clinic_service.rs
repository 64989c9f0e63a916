//! Clinic use-case service.
//!
//! # Responsibility
//! - Provide one facade over the doctor, patient, appointment, lab test,
//!   billing and report repositories sharing a connection.
//! - Emit metadata-only `event=...` log lines for every write.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Log lines carry row ids and error codes, never patient-identifying text.

use crate::logging::sanitize_message;
use crate::model::appointment::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentView, NewAppointment,
};
use crate::model::billing::{BillId, BillPatch, BillView, BillingRecord, NewBill};
use crate::model::doctor::{Doctor, DoctorId, DoctorPatch, NewDoctor};
use crate::model::lab_test::{LabTest, LabTestId, LabTestPatch, LabTestView, NewLabTest};
use crate::model::patient::{NewPatient, Patient, PatientId, PatientPatch, PatientWithDoctor};
use crate::model::report::{DoctorWorkload, PatientSummary};
use crate::repo::appointment_repo::{AppointmentRepository, SqliteAppointmentRepository};
use crate::repo::billing_repo::{BillingRepository, SqliteBillingRepository};
use crate::repo::doctor_repo::{DoctorRepository, SqliteDoctorRepository};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::lab_test_repo::{LabTestRepository, SqliteLabTestRepository};
use crate::repo::patient_repo::{PatientRepository, SqlitePatientRepository};
use crate::repo::report_repo::{ReportRepository, SqliteReportRepository};
use log::{debug, info, warn};
use rusqlite::Connection;

const MAX_LOGGED_ERROR_CHARS: usize = 200;

/// Use-case facade over all clinic repositories for one connection.
pub struct ClinicService<'conn> {
    doctors: SqliteDoctorRepository<'conn>,
    patients: SqlitePatientRepository<'conn>,
    appointments: SqliteAppointmentRepository<'conn>,
    lab_tests: SqliteLabTestRepository<'conn>,
    billing: SqliteBillingRepository<'conn>,
    reports: SqliteReportRepository<'conn>,
}

impl<'conn> ClinicService<'conn> {
    /// Creates the service from a migrated connection.
    ///
    /// Fails when the connection is not at the latest schema version.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            doctors: SqliteDoctorRepository::try_new(conn)?,
            patients: SqlitePatientRepository::try_new(conn)?,
            appointments: SqliteAppointmentRepository::try_new(conn)?,
            lab_tests: SqliteLabTestRepository::try_new(conn)?,
            billing: SqliteBillingRepository::try_new(conn)?,
            reports: SqliteReportRepository::try_new(conn)?,
        })
    }

    // Doctors

    pub fn add_doctor(&self, doctor: NewDoctor) -> RepoResult<Doctor> {
        trace_write("doctor_create", self.doctors.create_doctor(doctor), |d| {
            Some(d.id)
        })
    }

    pub fn get_doctor(&self, id: DoctorId) -> RepoResult<Option<Doctor>> {
        self.doctors.get_doctor(id)
    }

    pub fn list_doctors(&self) -> RepoResult<Vec<Doctor>> {
        self.doctors.list_doctors()
    }

    pub fn update_doctor(&self, id: DoctorId, patch: DoctorPatch) -> RepoResult<Option<Doctor>> {
        trace_write("doctor_update", self.doctors.update_doctor(id, patch), |d| {
            d.as_ref().map(|_| id)
        })
    }

    /// Deletes a doctor; assigned patients keep existing with no doctor.
    pub fn delete_doctor(&self, id: DoctorId) -> RepoResult<bool> {
        trace_write("doctor_delete", self.doctors.delete_doctor(id), |removed| {
            removed.then_some(id)
        })
    }

    // Patients

    pub fn add_patient(&self, patient: NewPatient) -> RepoResult<Patient> {
        trace_write("patient_create", self.patients.create_patient(patient), |p| {
            Some(p.id)
        })
    }

    pub fn get_patient(&self, id: PatientId) -> RepoResult<Option<Patient>> {
        self.patients.get_patient(id)
    }

    pub fn list_patients(&self) -> RepoResult<Vec<Patient>> {
        self.patients.list_patients()
    }

    pub fn list_patients_with_doctor(&self) -> RepoResult<Vec<PatientWithDoctor>> {
        self.patients.list_patients_with_doctor()
    }

    pub fn update_patient(
        &self,
        id: PatientId,
        patch: PatientPatch,
    ) -> RepoResult<Option<Patient>> {
        trace_write(
            "patient_update",
            self.patients.update_patient(id, patch),
            |p| p.as_ref().map(|_| id),
        )
    }

    /// Deletes a patient together with appointments, lab tests and bills.
    pub fn delete_patient(&self, id: PatientId) -> RepoResult<bool> {
        trace_write("patient_delete", self.patients.delete_patient(id), |removed| {
            removed.then_some(id)
        })
    }

    // Appointments

    pub fn schedule_appointment(&self, appointment: NewAppointment) -> RepoResult<Appointment> {
        trace_write(
            "appointment_create",
            self.appointments.schedule_appointment(appointment),
            |a| Some(a.id),
        )
    }

    pub fn get_appointment(&self, id: AppointmentId) -> RepoResult<Option<Appointment>> {
        self.appointments.get_appointment(id)
    }

    pub fn list_appointments(&self) -> RepoResult<Vec<Appointment>> {
        self.appointments.list_appointments()
    }

    pub fn list_appointment_views(&self) -> RepoResult<Vec<AppointmentView>> {
        self.appointments.list_appointment_views()
    }

    pub fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> RepoResult<Option<Appointment>> {
        trace_write(
            "appointment_update",
            self.appointments.update_appointment(id, patch),
            |a| a.as_ref().map(|_| id),
        )
    }

    pub fn delete_appointment(&self, id: AppointmentId) -> RepoResult<bool> {
        trace_write(
            "appointment_delete",
            self.appointments.delete_appointment(id),
            |removed| removed.then_some(id),
        )
    }

    // Lab tests

    pub fn order_lab_test(&self, test: NewLabTest) -> RepoResult<LabTest> {
        trace_write("lab_test_create", self.lab_tests.order_lab_test(test), |t| {
            Some(t.id)
        })
    }

    pub fn get_lab_test(&self, id: LabTestId) -> RepoResult<Option<LabTest>> {
        self.lab_tests.get_lab_test(id)
    }

    pub fn list_lab_tests(&self) -> RepoResult<Vec<LabTest>> {
        self.lab_tests.list_lab_tests()
    }

    pub fn list_lab_test_views(&self, pending_only: bool) -> RepoResult<Vec<LabTestView>> {
        self.lab_tests.list_lab_test_views(pending_only)
    }

    pub fn record_lab_result(&self, id: LabTestId, result: &str) -> RepoResult<Option<LabTest>> {
        trace_write(
            "lab_result_record",
            self.lab_tests.record_lab_result(id, result),
            |t| t.as_ref().map(|_| id),
        )
    }

    pub fn update_lab_test(
        &self,
        id: LabTestId,
        patch: LabTestPatch,
    ) -> RepoResult<Option<LabTest>> {
        trace_write(
            "lab_test_update",
            self.lab_tests.update_lab_test(id, patch),
            |t| t.as_ref().map(|_| id),
        )
    }

    pub fn delete_lab_test(&self, id: LabTestId) -> RepoResult<bool> {
        trace_write("lab_test_delete", self.lab_tests.delete_lab_test(id), |removed| {
            removed.then_some(id)
        })
    }

    // Billing

    pub fn create_bill(&self, bill: NewBill) -> RepoResult<BillingRecord> {
        trace_write("bill_create", self.billing.create_bill(bill), |b| Some(b.id))
    }

    pub fn get_bill(&self, id: BillId) -> RepoResult<Option<BillingRecord>> {
        self.billing.get_bill(id)
    }

    pub fn list_bills(&self) -> RepoResult<Vec<BillingRecord>> {
        self.billing.list_bills()
    }

    pub fn list_bill_views(&self, unpaid_only: bool) -> RepoResult<Vec<BillView>> {
        self.billing.list_bill_views(unpaid_only)
    }

    pub fn update_bill(&self, id: BillId, patch: BillPatch) -> RepoResult<Option<BillingRecord>> {
        trace_write("bill_update", self.billing.update_bill(id, patch), |b| {
            b.as_ref().map(|_| id)
        })
    }

    pub fn mark_bill_paid(&self, id: BillId) -> RepoResult<bool> {
        trace_write("bill_mark_paid", self.billing.mark_bill_paid(id), |changed| {
            changed.then_some(id)
        })
    }

    pub fn delete_bill(&self, id: BillId) -> RepoResult<bool> {
        trace_write("bill_delete", self.billing.delete_bill(id), |removed| {
            removed.then_some(id)
        })
    }

    // Reports

    pub fn patient_summary(&self) -> RepoResult<Vec<PatientSummary>> {
        let rows = self.reports.patient_summary()?;
        debug!(
            "event=report_patient_summary module=service status=ok rows={}",
            rows.len()
        );
        Ok(rows)
    }

    pub fn doctor_workload(&self) -> RepoResult<Vec<DoctorWorkload>> {
        let rows = self.reports.doctor_workload()?;
        debug!(
            "event=report_doctor_workload module=service status=ok rows={}",
            rows.len()
        );
        Ok(rows)
    }
}

/// Stable error code used in log lines and API envelopes.
pub fn error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::Validation(_) => "validation_failed",
        RepoError::ReferenceNotFound { .. } => "reference_not_found",
        RepoError::Db(_) if err.is_constraint_violation() => "constraint_violation",
        RepoError::Db(_) => "db_failed",
        RepoError::UninitializedConnection { .. }
        | RepoError::MissingRequiredTable(_)
        | RepoError::MissingRequiredColumn { .. } => "schema_not_ready",
        RepoError::InvalidData(_) => "invalid_data",
    }
}

fn trace_write<T>(
    event: &'static str,
    result: RepoResult<T>,
    row_id: impl FnOnce(&T) -> Option<i64>,
) -> RepoResult<T> {
    match &result {
        Ok(value) => match row_id(value) {
            Some(id) => info!("event={event} module=service status=ok id={id}"),
            None => info!("event={event} module=service status=noop"),
        },
        Err(err) => warn!(
            "event={} module=service status=error error_code={} error={}",
            event,
            error_code(err),
            sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
        ),
    }
    result
}
