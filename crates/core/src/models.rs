//! Record types held by the store and the validated inputs used to create them.
//!
//! Records reference each other by id. Display names (`facility_name`, `doctor_name`, ...)
//! are resolved by join when a record is read and are never used as join keys.

use crate::ids::{DoctorId, FacilityId, NoteId, PatientId};
use crate::report::RosterEntry;
use chrono::{DateTime, NaiveDate, Utc};
use clinic_types::{NonEmptyText, PatientAge};
use serde::Serialize;

/// A doctor account. Doctors authenticate with an API key and belong to zero or more facilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub age: u32,
    /// Comma-separated condition names, stored exactly as entered.
    pub diagnoses: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl RosterEntry for Patient {
    fn name(&self) -> &str {
        &self.name
    }

    fn age(&self) -> u32 {
        self.age
    }

    fn diagnoses(&self) -> &str {
        &self.diagnoses
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientNote {
    pub id: NoteId,
    pub patient_id: PatientId,
    pub patient_name: String,
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub note_text: String,
    pub created_by: DoctorId,
    pub created_by_username: String,
    pub note_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A facility with its patient and doctor head counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacilitySummary {
    pub facility: Facility,
    pub patient_count: u64,
    pub doctor_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacilityDetail {
    pub facility: Facility,
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
}

/// The flat view of a single patient returned by the export operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatientExport {
    pub name: String,
    pub facility_name: String,
    pub doctor_name: String,
    pub age: u32,
}

impl From<&Patient> for PatientExport {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            facility_name: patient.facility_name.clone(),
            doctor_name: patient.doctor_name.clone(),
            age: patient.age,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewFacility {
    pub name: NonEmptyText,
    pub address: NonEmptyText,
    pub phone: NonEmptyText,
}

/// Raw patient fields as submitted by a caller, before validation.
#[derive(Debug, Clone, Default)]
pub struct PatientInput {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub diagnoses: Option<String>,
}

/// Patient fields that passed validation.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub age: PatientAge,
    pub phone: NonEmptyText,
    pub address: NonEmptyText,
    pub diagnoses: String,
}

/// Raw note fields as submitted by a caller, before validation.
#[derive(Debug, Clone, Default)]
pub struct NoteInput {
    pub note_text: Option<String>,
    pub note_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub note_text: NonEmptyText,
    pub note_date: NaiveDate,
}
