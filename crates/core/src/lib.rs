//! # Clinic Core
//!
//! Core business logic for the clinic records service.
//!
//! This crate contains pure data operations over the record store:
//! - Facility, doctor, patient and note records in SQLite
//! - Access guards that run before every mutation
//! - The patient risk report
//!
//! **No API concerns**: HTTP servers, request parsing and response shaping belong in `api-rest`
//! or `api-shared`.

pub mod access;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod report;
pub mod repositories;
pub mod validation;

pub use access::{AccessProvider, Caller};
pub use clinic_types::{EmailAddress, NonEmptyText, PatientAge, TypesError};
pub use config::CoreConfig;
pub use constants::DEFAULT_DATABASE_PATH;
pub use db::{DatabaseError, Store};
pub use error::{ClinicError, ClinicResult};
pub use ids::{DoctorId, FacilityId, NoteId, PatientId};
pub use report::{PatientReport, RiskEntry};
pub use repositories::{
    doctor::DoctorService, facility::FacilityService, note::NoteService, patient::PatientService,
};
