//! Lab test domain model.
//!
//! # Invariants
//! - `cost >= 0` and `test_name` is never empty.
//! - `reported_on` is `Some` if and only if `result` is `Some`.
//! - A test is pending while `result` is `None`.

use super::patient::PatientId;
use super::validation::{require_non_negative, require_text, ValidationError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Auto-incrementing lab test row id.
pub type LabTestId = i64;

/// Persisted lab test record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTest {
    pub id: LabTestId,
    pub patient_id: PatientId,
    pub test_name: String,
    pub cost: f64,
    /// Set once when the test is ordered.
    pub ordered_on: NaiveDateTime,
    pub result: Option<String>,
    /// Set when the result is entered.
    pub reported_on: Option<NaiveDateTime>,
}

impl LabTest {
    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }

    /// Applies supplied overrides and re-validates the merged record.
    pub fn apply(mut self, patch: LabTestPatch) -> Result<Self, ValidationError> {
        if let Some(test_name) = patch.test_name {
            require_text("test_name", &test_name)?;
            self.test_name = test_name.trim().to_string();
        }
        if let Some(cost) = patch.cost {
            require_non_negative("cost", cost)?;
            self.cost = cost;
        }
        Ok(self)
    }
}

/// Lab test joined with the patient's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTestView {
    #[serde(flatten)]
    pub test: LabTest,
    pub patient_name: String,
}

/// Input for ordering a lab test.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLabTest {
    pub patient_id: PatientId,
    pub test_name: String,
    pub cost: f64,
}

impl NewLabTest {
    pub fn new(patient_id: PatientId, test_name: impl Into<String>, cost: f64) -> Self {
        Self {
            patient_id,
            test_name: test_name.into(),
            cost,
        }
    }

    pub fn normalized(self) -> Result<Self, ValidationError> {
        require_text("test_name", &self.test_name)?;
        require_non_negative("cost", self.cost)?;
        Ok(Self {
            test_name: self.test_name.trim().to_string(),
            ..self
        })
    }
}

/// Partial update for a lab test order.
///
/// Results are entered through the dedicated result-entry operation so the
/// `reported_on` timestamp always moves together with `result`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabTestPatch {
    pub test_name: Option<String>,
    pub cost: Option<f64>,
}

/// Validates result text before it is recorded.
pub fn validate_result(result: &str) -> Result<String, ValidationError> {
    require_text("result", result)?;
    Ok(result.trim().to_string())
}
