//! Patient repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `patients` table.
//! - Provide the patient listing joined with the assigned doctor's name.
//!
//! # Invariants
//! - An assigned `doctor_id` must reference an existing doctor at write time.
//! - Deleting a patient cascades to appointments, lab tests and bills through
//!   foreign keys.
//! - Listing is ordered by `id ASC`.

use crate::model::doctor::DoctorId;
use crate::model::patient::{NewPatient, Patient, PatientId, PatientPatch, PatientWithDoctor};
use crate::repo::common::{ensure_connection_ready, ensure_row_exists};
use crate::repo::error::RepoResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const PATIENT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "age",
    "gender",
    "contact",
    "disease",
    "doctor_id",
];

const PATIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    age,
    gender,
    contact,
    disease,
    doctor_id
FROM patients";

/// Repository interface for patient CRUD operations.
pub trait PatientRepository {
    /// Inserts one patient and returns the stored row.
    fn create_patient(&self, patient: NewPatient) -> RepoResult<Patient>;
    fn get_patient(&self, id: PatientId) -> RepoResult<Option<Patient>>;
    /// Lists all patients ordered by id.
    fn list_patients(&self) -> RepoResult<Vec<Patient>>;
    /// Lists all patients with their doctor's name (if any), ordered by id.
    fn list_patients_with_doctor(&self) -> RepoResult<Vec<PatientWithDoctor>>;
    /// Applies supplied overrides; returns `None` when `id` does not exist.
    fn update_patient(&self, id: PatientId, patch: PatientPatch) -> RepoResult<Option<Patient>>;
    /// Deletes one patient and its dependents; returns whether a row was removed.
    fn delete_patient(&self, id: PatientId) -> RepoResult<bool>;
}

/// SQLite-backed patient repository.
pub struct SqlitePatientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePatientRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "patients", PATIENT_COLUMNS)?;
        Ok(Self { conn })
    }

    fn ensure_doctor(&self, doctor_id: Option<DoctorId>) -> RepoResult<()> {
        match doctor_id {
            Some(id) => ensure_row_exists(self.conn, "doctors", id),
            None => Ok(()),
        }
    }
}

impl PatientRepository for SqlitePatientRepository<'_> {
    fn create_patient(&self, patient: NewPatient) -> RepoResult<Patient> {
        let patient = patient.normalized()?;
        self.ensure_doctor(patient.doctor_id)?;

        self.conn.execute(
            "INSERT INTO patients (
                name,
                age,
                gender,
                contact,
                disease,
                doctor_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                patient.name.as_str(),
                patient.age,
                patient.gender.as_deref(),
                patient.contact.as_deref(),
                patient.disease.as_deref(),
                patient.doctor_id,
            ],
        )?;

        Ok(Patient {
            id: self.conn.last_insert_rowid(),
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            contact: patient.contact,
            disease: patient.disease,
            doctor_id: patient.doctor_id,
        })
    }

    fn get_patient(&self, id: PatientId) -> RepoResult<Option<Patient>> {
        let patient = self
            .conn
            .query_row(
                &format!("{PATIENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_patient_row,
            )
            .optional()?;
        Ok(patient)
    }

    fn list_patients(&self) -> RepoResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PATIENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut patients = Vec::new();
        while let Some(row) = rows.next()? {
            patients.push(parse_patient_row(row)?);
        }
        Ok(patients)
    }

    fn list_patients_with_doctor(&self) -> RepoResult<Vec<PatientWithDoctor>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                p.id AS id,
                p.name AS name,
                p.age AS age,
                p.gender AS gender,
                p.contact AS contact,
                p.disease AS disease,
                p.doctor_id AS doctor_id,
                d.name AS doctor_name
             FROM patients p
             LEFT JOIN doctors d ON d.id = p.doctor_id
             ORDER BY p.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut patients = Vec::new();
        while let Some(row) = rows.next()? {
            patients.push(PatientWithDoctor {
                patient: parse_patient_row(row)?,
                doctor_name: row.get("doctor_name")?,
            });
        }
        Ok(patients)
    }

    fn update_patient(&self, id: PatientId, patch: PatientPatch) -> RepoResult<Option<Patient>> {
        let Some(existing) = self.get_patient(id)? else {
            return Ok(None);
        };
        let previous_doctor = existing.doctor_id;
        let updated = existing.apply(patch)?;
        if updated.doctor_id != previous_doctor {
            self.ensure_doctor(updated.doctor_id)?;
        }

        self.conn.execute(
            "UPDATE patients
             SET
                name = ?1,
                age = ?2,
                gender = ?3,
                contact = ?4,
                disease = ?5,
                doctor_id = ?6
             WHERE id = ?7;",
            params![
                updated.name.as_str(),
                updated.age,
                updated.gender.as_deref(),
                updated.contact.as_deref(),
                updated.disease.as_deref(),
                updated.doctor_id,
                id,
            ],
        )?;

        Ok(Some(updated))
    }

    fn delete_patient(&self, id: PatientId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_patient_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get("id")?,
        name: row.get("name")?,
        age: row.get("age")?,
        gender: row.get("gender")?,
        contact: row.get("contact")?,
        disease: row.get("disease")?,
        doctor_id: row.get("doctor_id")?,
    })
}
