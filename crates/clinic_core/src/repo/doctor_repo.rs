//! Doctor repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `doctors` table.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Listing is ordered by `id ASC`.
//! - Update/delete on a missing id is a no-op, not an error.

use crate::model::doctor::{Doctor, DoctorId, DoctorPatch, NewDoctor};
use crate::repo::common::ensure_connection_ready;
use crate::repo::error::RepoResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const DOCTOR_COLUMNS: &[&str] = &["id", "name", "specialization", "contact"];

const DOCTOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    specialization,
    contact
FROM doctors";

/// Repository interface for doctor CRUD operations.
pub trait DoctorRepository {
    /// Inserts one doctor and returns the stored row.
    fn create_doctor(&self, doctor: NewDoctor) -> RepoResult<Doctor>;
    fn get_doctor(&self, id: DoctorId) -> RepoResult<Option<Doctor>>;
    /// Lists all doctors ordered by id.
    fn list_doctors(&self) -> RepoResult<Vec<Doctor>>;
    /// Applies supplied overrides; returns `None` when `id` does not exist.
    fn update_doctor(&self, id: DoctorId, patch: DoctorPatch) -> RepoResult<Option<Doctor>>;
    /// Deletes one doctor; returns whether a row was removed.
    fn delete_doctor(&self, id: DoctorId) -> RepoResult<bool>;
}

/// SQLite-backed doctor repository.
pub struct SqliteDoctorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDoctorRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "doctors", DOCTOR_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl DoctorRepository for SqliteDoctorRepository<'_> {
    fn create_doctor(&self, doctor: NewDoctor) -> RepoResult<Doctor> {
        let doctor = doctor.normalized()?;

        self.conn.execute(
            "INSERT INTO doctors (name, specialization, contact) VALUES (?1, ?2, ?3);",
            params![
                doctor.name.as_str(),
                doctor.specialization.as_deref(),
                doctor.contact.as_deref(),
            ],
        )?;

        Ok(Doctor {
            id: self.conn.last_insert_rowid(),
            name: doctor.name,
            specialization: doctor.specialization,
            contact: doctor.contact,
        })
    }

    fn get_doctor(&self, id: DoctorId) -> RepoResult<Option<Doctor>> {
        let doctor = self
            .conn
            .query_row(
                &format!("{DOCTOR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_doctor_row,
            )
            .optional()?;
        Ok(doctor)
    }

    fn list_doctors(&self) -> RepoResult<Vec<Doctor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCTOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut doctors = Vec::new();
        while let Some(row) = rows.next()? {
            doctors.push(parse_doctor_row(row)?);
        }
        Ok(doctors)
    }

    fn update_doctor(&self, id: DoctorId, patch: DoctorPatch) -> RepoResult<Option<Doctor>> {
        let Some(existing) = self.get_doctor(id)? else {
            return Ok(None);
        };
        let updated = existing.apply(patch)?;

        self.conn.execute(
            "UPDATE doctors
             SET
                name = ?1,
                specialization = ?2,
                contact = ?3
             WHERE id = ?4;",
            params![
                updated.name.as_str(),
                updated.specialization.as_deref(),
                updated.contact.as_deref(),
                id,
            ],
        )?;

        Ok(Some(updated))
    }

    fn delete_doctor(&self, id: DoctorId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM doctors WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_doctor_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get("id")?,
        name: row.get("name")?,
        specialization: row.get("specialization")?,
        contact: row.get("contact")?,
    })
}
