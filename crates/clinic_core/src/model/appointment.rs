//! Appointment domain model.
//!
//! # Invariants
//! - Both `patient_id` and `doctor_id` referenced existing rows at write time.
//! - Deleting either referenced row removes the appointment.

use super::doctor::DoctorId;
use super::patient::PatientId;
use super::validation::normalize_optional_text;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Auto-incrementing appointment row id.
pub type AppointmentId = i64;

/// Persisted appointment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    /// Minute precision, 24h clock.
    pub time: NaiveTime,
    pub notes: Option<String>,
}

/// Appointment joined with patient and doctor display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient_name: String,
    pub doctor_name: String,
}

/// Input for scheduling an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn normalized(self) -> Self {
        Self {
            notes: normalize_optional_text(self.notes),
            ..self
        }
    }
}

/// Partial update for an appointment. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub patient_id: Option<PatientId>,
    pub doctor_id: Option<DoctorId>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub notes: Option<String>,
}

impl Appointment {
    /// Applies supplied overrides.
    pub fn apply(mut self, patch: AppointmentPatch) -> Self {
        if let Some(patient_id) = patch.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(doctor_id) = patch.doctor_id {
            self.doctor_id = doctor_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if patch.notes.is_some() {
            self.notes = normalize_optional_text(patch.notes);
        }
        self
    }
}
