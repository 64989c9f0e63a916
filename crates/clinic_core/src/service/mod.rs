//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs shared by the
//!   console and HTTP front ends.
//! - Keep front ends decoupled from storage details.

pub mod clinic_service;
pub mod seed;
