//! Clinic domain model.
//!
//! # Responsibility
//! - Define typed records for doctors, patients, appointments, lab tests and
//!   bills, plus their create/patch inputs and joined read models.
//! - Own field validation shared by repositories and front ends.
//!
//! # Invariants
//! - Every record is identified by an auto-incrementing integer id.
//! - Patches only override fields that are supplied.

pub mod appointment;
pub mod billing;
pub mod doctor;
pub mod lab_test;
pub mod patient;
pub mod report;
pub mod validation;
