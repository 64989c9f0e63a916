//! Aggregate reporting queries.
//!
//! # Responsibility
//! - Patient summary: appointment/lab counts and unpaid balance per patient.
//! - Doctor workload: appointment count and assigned patients per doctor.
//!
//! # Invariants
//! - Every patient/doctor appears, even with no related rows (outer joins,
//!   counts and sums default to 0).
//! - Each aggregate is grouped in its own derived table before joining, so
//!   several one-to-many joins never multiply bill amounts.

use crate::model::report::{DoctorWorkload, PatientSummary};
use crate::repo::common::ensure_connection_ready;
use crate::repo::error::RepoResult;
use rusqlite::Connection;

const PATIENT_SUMMARY_SQL: &str = "SELECT
    p.id AS patient_id,
    p.name AS name,
    COALESCE(a.appointment_count, 0) AS appointments,
    COALESCE(lt.lab_test_count, 0) AS lab_tests,
    COALESCE(b.unpaid_amount, 0.0) AS unpaid_amount
FROM patients p
LEFT JOIN (
    SELECT patient_id, COUNT(DISTINCT id) AS appointment_count
    FROM appointments
    GROUP BY patient_id
) a ON a.patient_id = p.id
LEFT JOIN (
    SELECT patient_id, COUNT(DISTINCT id) AS lab_test_count
    FROM lab_tests
    GROUP BY patient_id
) lt ON lt.patient_id = p.id
LEFT JOIN (
    SELECT patient_id, SUM(amount) AS unpaid_amount
    FROM billing
    WHERE paid = 0
    GROUP BY patient_id
) b ON b.patient_id = p.id
ORDER BY p.id ASC;";

const DOCTOR_WORKLOAD_SQL: &str = "SELECT
    d.id AS doctor_id,
    d.name AS name,
    d.specialization AS specialization,
    COALESCE(a.appointment_count, 0) AS appointments_count,
    COALESCE(p.patient_count, 0) AS patients_assigned
FROM doctors d
LEFT JOIN (
    SELECT doctor_id, COUNT(DISTINCT id) AS appointment_count
    FROM appointments
    GROUP BY doctor_id
) a ON a.doctor_id = d.id
LEFT JOIN (
    SELECT doctor_id, COUNT(DISTINCT id) AS patient_count
    FROM patients
    WHERE doctor_id IS NOT NULL
    GROUP BY doctor_id
) p ON p.doctor_id = d.id
ORDER BY appointments_count DESC, d.name ASC, d.id ASC;";

/// Repository interface for aggregate reports.
pub trait ReportRepository {
    fn patient_summary(&self) -> RepoResult<Vec<PatientSummary>>;
    fn doctor_workload(&self) -> RepoResult<Vec<DoctorWorkload>>;
}

/// SQLite-backed report repository.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in ["patients", "doctors", "appointments", "lab_tests", "billing"] {
            ensure_connection_ready(conn, table, &[])?;
        }
        Ok(Self { conn })
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn patient_summary(&self) -> RepoResult<Vec<PatientSummary>> {
        let mut stmt = self.conn.prepare(PATIENT_SUMMARY_SQL)?;
        let mut rows = stmt.query([])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(PatientSummary {
                patient_id: row.get("patient_id")?,
                name: row.get("name")?,
                appointments: row.get("appointments")?,
                lab_tests: row.get("lab_tests")?,
                unpaid_amount: row.get("unpaid_amount")?,
            });
        }
        Ok(summaries)
    }

    fn doctor_workload(&self) -> RepoResult<Vec<DoctorWorkload>> {
        let mut stmt = self.conn.prepare(DOCTOR_WORKLOAD_SQL)?;
        let mut rows = stmt.query([])?;
        let mut workload = Vec::new();
        while let Some(row) = rows.next()? {
            workload.push(DoctorWorkload {
                doctor_id: row.get("doctor_id")?,
                name: row.get("name")?,
                specialization: row.get("specialization")?,
                appointments_count: row.get("appointments_count")?,
                patients_assigned: row.get("patients_assigned")?,
            });
        }
        Ok(workload)
    }
}
