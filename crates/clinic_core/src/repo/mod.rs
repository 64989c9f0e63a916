//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one data access contract per clinic entity plus reports.
//! - Isolate SQLite query details from service/front-end orchestration.
//!
//! # Invariants
//! - Repository writes validate input before persistence.
//! - Missing parent rows are reported as `ReferenceNotFound`, not as raw
//!   foreign key failures.
//! - Update/delete of a missing id is a silent no-op.

pub mod appointment_repo;
pub mod billing_repo;
mod common;
pub mod doctor_repo;
pub mod error;
pub mod lab_test_repo;
pub mod patient_repo;
pub mod report_repo;
