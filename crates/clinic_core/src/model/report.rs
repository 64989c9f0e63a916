//! Aggregate report rows.

use super::doctor::DoctorId;
use super::patient::PatientId;
use serde::{Deserialize, Serialize};

/// Per-patient activity and outstanding balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub patient_id: PatientId,
    pub name: String,
    pub appointments: i64,
    pub lab_tests: i64,
    /// Sum of unpaid bill amounts, `0.0` when there are none.
    pub unpaid_amount: f64,
}

/// Per-doctor scheduling load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorWorkload {
    pub doctor_id: DoctorId,
    pub name: String,
    pub specialization: Option<String>,
    pub appointments_count: i64,
    pub patients_assigned: i64,
}
