//! Patient domain model.
//!
//! # Invariants
//! - `name` is never empty and `age >= 0`.
//! - `doctor_id`, when set, referenced an existing doctor at write time.
//! - Deleting a patient cascades to appointments, lab tests and bills.

use super::doctor::DoctorId;
use super::validation::{
    normalize_optional_text, require_non_negative_int, require_text, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Auto-incrementing patient row id.
pub type PatientId = i64;

/// Persisted patient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub age: i64,
    pub gender: Option<String>,
    pub contact: Option<String>,
    /// Free-text disease or complaint.
    pub disease: Option<String>,
    pub doctor_id: Option<DoctorId>,
}

/// Patient row joined with the assigned doctor's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientWithDoctor {
    #[serde(flatten)]
    pub patient: Patient,
    pub doctor_name: Option<String>,
}

/// Input for creating a patient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<DoctorId>,
}

impl NewPatient {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            age,
            ..Self::default()
        }
    }

    /// Trims text fields and validates required ones.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        require_text("name", &self.name)?;
        require_non_negative_int("age", self.age)?;
        Ok(Self {
            name: self.name.trim().to_string(),
            age: self.age,
            gender: normalize_optional_text(self.gender),
            contact: normalize_optional_text(self.contact),
            disease: normalize_optional_text(self.disease),
            doctor_id: self.doctor_id,
        })
    }
}

/// Partial update for a patient. `None` keeps the stored value.
///
/// `doctor_id: Some(None)` clears the doctor assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub contact: Option<String>,
    pub disease: Option<String>,
    pub doctor_id: Option<Option<DoctorId>>,
}

impl Patient {
    /// Applies supplied overrides and re-validates the merged record.
    pub fn apply(mut self, patch: PatientPatch) -> Result<Self, ValidationError> {
        if let Some(name) = patch.name {
            require_text("name", &name)?;
            self.name = name.trim().to_string();
        }
        if let Some(age) = patch.age {
            require_non_negative_int("age", age)?;
            self.age = age;
        }
        if patch.gender.is_some() {
            self.gender = normalize_optional_text(patch.gender);
        }
        if patch.contact.is_some() {
            self.contact = normalize_optional_text(patch.contact);
        }
        if patch.disease.is_some() {
            self.disease = normalize_optional_text(patch.disease);
        }
        if let Some(doctor_id) = patch.doctor_id {
            self.doctor_id = doctor_id;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Patient {
        Patient {
            id: 1,
            name: "M. Das".to_string(),
            age: 56,
            gender: Some("F".to_string()),
            contact: None,
            disease: Some("Chest Pain".to_string()),
            doctor_id: Some(1),
        }
    }

    #[test]
    fn apply_keeps_unsupplied_fields() {
        let updated = stored()
            .apply(PatientPatch {
                age: Some(57),
                ..PatientPatch::default()
            })
            .unwrap();
        assert_eq!(updated.age, 57);
        assert_eq!(updated.name, "M. Das");
        assert_eq!(updated.disease.as_deref(), Some("Chest Pain"));
        assert_eq!(updated.doctor_id, Some(1));
    }

    #[test]
    fn apply_can_clear_doctor_assignment() {
        let updated = stored()
            .apply(PatientPatch {
                doctor_id: Some(None),
                ..PatientPatch::default()
            })
            .unwrap();
        assert_eq!(updated.doctor_id, None);
    }

    #[test]
    fn apply_rejects_blank_name_and_negative_age() {
        let err = stored()
            .apply(PatientPatch {
                name: Some("  ".to_string()),
                ..PatientPatch::default()
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("name"));

        let err = stored()
            .apply(PatientPatch {
                age: Some(-1),
                ..PatientPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, ValidationError::NegativeValue { field: "age", .. }));
    }

    #[test]
    fn new_patient_deserializes_with_optional_fields_missing() {
        let input: NewPatient =
            serde_json::from_str(r#"{"name":"A. Khan","age":42}"#).unwrap();
        let normalized = input.normalized().unwrap();
        assert_eq!(normalized.name, "A. Khan");
        assert_eq!(normalized.gender, None);
        assert_eq!(normalized.doctor_id, None);
    }
}
