//! Doctor domain model.
//!
//! # Invariants
//! - `name` is never empty.
//! - Deleting a doctor nulls out `Patient::doctor_id` for assigned patients
//!   and removes the doctor's appointments.

use super::validation::{normalize_optional_text, require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Auto-incrementing doctor row id.
pub type DoctorId = i64;

/// Persisted doctor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialization: Option<String>,
    pub contact: Option<String>,
}

/// Input for creating a doctor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

impl NewDoctor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Trims text fields and validates required ones.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        require_text("name", &self.name)?;
        Ok(Self {
            name: self.name.trim().to_string(),
            specialization: normalize_optional_text(self.specialization),
            contact: normalize_optional_text(self.contact),
        })
    }
}

/// Partial update for a doctor. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorPatch {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub contact: Option<String>,
}

impl Doctor {
    /// Applies supplied overrides and re-validates the merged record.
    pub fn apply(mut self, patch: DoctorPatch) -> Result<Self, ValidationError> {
        if let Some(name) = patch.name {
            require_text("name", &name)?;
            self.name = name.trim().to_string();
        }
        if patch.specialization.is_some() {
            self.specialization = normalize_optional_text(patch.specialization);
        }
        if patch.contact.is_some() {
            self.contact = normalize_optional_text(patch.contact);
        }
        Ok(self)
    }
}
