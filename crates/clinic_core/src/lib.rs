//! Core domain logic for the clinic records system.
//! This crate is the single source of truth for schema, validation and
//! reporting rules; the console and HTTP front ends only call into it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ClinicConfig, DEFAULT_DB_FILE_NAME};
pub use logging::{
    default_log_level, init_logging, init_server_logging, logging_status, LogEcho, LogLevel,
};
pub use model::appointment::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentView, NewAppointment,
};
pub use model::billing::{BillId, BillPatch, BillView, BillingRecord, NewBill};
pub use model::doctor::{Doctor, DoctorId, DoctorPatch, NewDoctor};
pub use model::lab_test::{LabTest, LabTestId, LabTestPatch, LabTestView, NewLabTest};
pub use model::patient::{NewPatient, Patient, PatientId, PatientPatch, PatientWithDoctor};
pub use model::report::{DoctorWorkload, PatientSummary};
pub use model::validation::{parse_date, parse_time, ValidationError};
pub use repo::appointment_repo::{AppointmentRepository, SqliteAppointmentRepository};
pub use repo::billing_repo::{BillingRepository, SqliteBillingRepository};
pub use repo::doctor_repo::{DoctorRepository, SqliteDoctorRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::lab_test_repo::{LabTestRepository, SqliteLabTestRepository};
pub use repo::patient_repo::{PatientRepository, SqlitePatientRepository};
pub use repo::report_repo::{ReportRepository, SqliteReportRepository};
pub use service::clinic_service::{error_code, ClinicService};
pub use service::seed::{seed_sample_data, SeedSummary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
