//! Billing domain model.
//!
//! # Invariants
//! - `amount >= 0`; the table carries a matching CHECK constraint.
//! - New bills start unpaid with `billed_on` set to the creation date.

use super::patient::PatientId;
use super::validation::{normalize_optional_text, require_non_negative, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Auto-incrementing bill row id.
pub type BillId = i64;

/// Persisted billing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub id: BillId,
    pub patient_id: PatientId,
    pub amount: f64,
    pub description: Option<String>,
    pub billed_on: NaiveDate,
    pub paid: bool,
}

impl BillingRecord {
    /// Applies supplied overrides and re-validates the merged record.
    pub fn apply(mut self, patch: BillPatch) -> Result<Self, ValidationError> {
        if let Some(amount) = patch.amount {
            require_non_negative("amount", amount)?;
            self.amount = amount;
        }
        if patch.description.is_some() {
            self.description = normalize_optional_text(patch.description);
        }
        if let Some(paid) = patch.paid {
            self.paid = paid;
        }
        Ok(self)
    }
}

/// Bill joined with the patient's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillView {
    #[serde(flatten)]
    pub bill: BillingRecord,
    pub patient_name: String,
}

/// Input for creating a bill.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub patient_id: PatientId,
    pub amount: f64,
    pub description: Option<String>,
}

impl NewBill {
    pub fn new(patient_id: PatientId, amount: f64) -> Self {
        Self {
            patient_id,
            amount,
            description: None,
        }
    }

    pub fn normalized(self) -> Result<Self, ValidationError> {
        require_non_negative("amount", self.amount)?;
        Ok(Self {
            description: normalize_optional_text(self.description),
            ..self
        })
    }
}

/// Partial update for a bill. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillPatch {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub paid: Option<bool>,
}
