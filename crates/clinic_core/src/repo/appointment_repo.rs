//! Appointment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `appointments` table.
//! - Provide the schedule listing joined with patient and doctor names.
//!
//! # Invariants
//! - Both patient and doctor references must exist at write time.
//! - Joined listing is ordered by `date, time, id`.

use crate::model::appointment::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentView, NewAppointment,
};
use crate::repo::common::{
    date_to_db, ensure_connection_ready, ensure_row_exists, read_date, read_time, time_to_db,
};
use crate::repo::error::RepoResult;
use rusqlite::{params, Connection, Row};

const APPOINTMENT_COLUMNS: &[&str] = &["id", "patient_id", "doctor_id", "date", "time", "notes"];

const APPOINTMENT_SELECT_SQL: &str = "SELECT
    id,
    patient_id,
    doctor_id,
    date,
    time,
    notes
FROM appointments";

/// Repository interface for appointment CRUD operations.
pub trait AppointmentRepository {
    /// Inserts one appointment and returns the stored row.
    fn schedule_appointment(&self, appointment: NewAppointment) -> RepoResult<Appointment>;
    fn get_appointment(&self, id: AppointmentId) -> RepoResult<Option<Appointment>>;
    /// Lists all appointments ordered by id.
    fn list_appointments(&self) -> RepoResult<Vec<Appointment>>;
    /// Lists appointments with patient/doctor names, ordered chronologically.
    fn list_appointment_views(&self) -> RepoResult<Vec<AppointmentView>>;
    /// Applies supplied overrides; returns `None` when `id` does not exist.
    fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> RepoResult<Option<Appointment>>;
    /// Deletes one appointment; returns whether a row was removed.
    fn delete_appointment(&self, id: AppointmentId) -> RepoResult<bool>;
}

/// SQLite-backed appointment repository.
pub struct SqliteAppointmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAppointmentRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "appointments", APPOINTMENT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl AppointmentRepository for SqliteAppointmentRepository<'_> {
    fn schedule_appointment(&self, appointment: NewAppointment) -> RepoResult<Appointment> {
        let appointment = appointment.normalized();
        ensure_row_exists(self.conn, "patients", appointment.patient_id)?;
        ensure_row_exists(self.conn, "doctors", appointment.doctor_id)?;

        self.conn.execute(
            "INSERT INTO appointments (
                patient_id,
                doctor_id,
                date,
                time,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                appointment.patient_id,
                appointment.doctor_id,
                date_to_db(appointment.date),
                time_to_db(appointment.time),
                appointment.notes.as_deref(),
            ],
        )?;

        Ok(Appointment {
            id: self.conn.last_insert_rowid(),
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            date: appointment.date,
            time: appointment.time,
            notes: appointment.notes,
        })
    }

    fn get_appointment(&self, id: AppointmentId) -> RepoResult<Option<Appointment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APPOINTMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_appointment_row(row)?));
        }
        Ok(None)
    }

    fn list_appointments(&self) -> RepoResult<Vec<Appointment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APPOINTMENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut appointments = Vec::new();
        while let Some(row) = rows.next()? {
            appointments.push(parse_appointment_row(row)?);
        }
        Ok(appointments)
    }

    fn list_appointment_views(&self) -> RepoResult<Vec<AppointmentView>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                a.id AS id,
                a.patient_id AS patient_id,
                a.doctor_id AS doctor_id,
                a.date AS date,
                a.time AS time,
                a.notes AS notes,
                p.name AS patient_name,
                d.name AS doctor_name
             FROM appointments a
             INNER JOIN patients p ON p.id = a.patient_id
             INNER JOIN doctors d ON d.id = a.doctor_id
             ORDER BY a.date ASC, a.time ASC, a.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut views = Vec::new();
        while let Some(row) = rows.next()? {
            views.push(AppointmentView {
                appointment: parse_appointment_row(row)?,
                patient_name: row.get("patient_name")?,
                doctor_name: row.get("doctor_name")?,
            });
        }
        Ok(views)
    }

    fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> RepoResult<Option<Appointment>> {
        let Some(existing) = self.get_appointment(id)? else {
            return Ok(None);
        };
        let (previous_patient, previous_doctor) = (existing.patient_id, existing.doctor_id);
        let updated = existing.apply(patch);
        if updated.patient_id != previous_patient {
            ensure_row_exists(self.conn, "patients", updated.patient_id)?;
        }
        if updated.doctor_id != previous_doctor {
            ensure_row_exists(self.conn, "doctors", updated.doctor_id)?;
        }

        self.conn.execute(
            "UPDATE appointments
             SET
                patient_id = ?1,
                doctor_id = ?2,
                date = ?3,
                time = ?4,
                notes = ?5
             WHERE id = ?6;",
            params![
                updated.patient_id,
                updated.doctor_id,
                date_to_db(updated.date),
                time_to_db(updated.time),
                updated.notes.as_deref(),
                id,
            ],
        )?;

        Ok(Some(updated))
    }

    fn delete_appointment(&self, id: AppointmentId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_appointment_row(row: &Row<'_>) -> RepoResult<Appointment> {
    Ok(Appointment {
        id: row.get("id")?,
        patient_id: row.get("patient_id")?,
        doctor_id: row.get("doctor_id")?,
        date: read_date(row, "date")?,
        time: read_time(row, "time")?,
        notes: row.get("notes")?,
    })
}
