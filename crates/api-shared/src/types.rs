//! Request and response bodies for the clinic APIs.
//!
//! Timestamps are RFC 3339 strings and note dates are `YYYY-MM-DD`.

use clinic_core::models::{
    Doctor, Facility, FacilityDetail, FacilitySummary, NoteInput, Patient, PatientExport,
    PatientInput, PatientNote,
};
use clinic_core::{PatientReport, RiskEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error envelope returned by every failing request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DoctorRes {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<Doctor> for DoctorRes {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id.get(),
            username: doctor.username,
            email: doctor.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FacilityRes {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub created_at: String,
}

impl From<Facility> for FacilityRes {
    fn from(facility: Facility) -> Self {
        Self {
            id: facility.id.get(),
            name: facility.name,
            address: facility.address,
            phone: facility.phone,
            created_at: facility.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacilitySummaryRes {
    pub facility: FacilityRes,
    pub patient_count: u64,
    pub doctor_count: u64,
}

impl From<FacilitySummary> for FacilitySummaryRes {
    fn from(summary: FacilitySummary) -> Self {
        Self {
            facility: summary.facility.into(),
            patient_count: summary.patient_count,
            doctor_count: summary.doctor_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListFacilitiesRes {
    pub facilities: Vec<FacilitySummaryRes>,
    pub total_facilities: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacilityDetailRes {
    pub facility: FacilityRes,
    pub patient_count: usize,
    pub doctor_count: usize,
    pub doctors: Vec<DoctorRes>,
    pub patients: Vec<PatientRes>,
}

impl From<FacilityDetail> for FacilityDetailRes {
    fn from(detail: FacilityDetail) -> Self {
        Self {
            facility: detail.facility.into(),
            patient_count: detail.patients.len(),
            doctor_count: detail.doctors.len(),
            doctors: detail.doctors.into_iter().map(Into::into).collect(),
            patients: detail.patients.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacilityPatientsRes {
    pub facility: FacilityRes,
    pub patients: Vec<PatientRes>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacilityDoctorsRes {
    pub facility: FacilityRes,
    pub doctors: Vec<DoctorRes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: i64,
    pub name: String,
    pub facility_id: i64,
    pub facility_name: String,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub age: u32,
    pub diagnoses: String,
    pub phone: String,
    pub address: String,
    pub created_at: String,
}

impl From<Patient> for PatientRes {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id.get(),
            name: patient.name,
            facility_id: patient.facility_id.get(),
            facility_name: patient.facility_name,
            doctor_id: patient.doctor_id.get(),
            doctor_name: patient.doctor_name,
            age: patient.age,
            diagnoses: patient.diagnoses,
            phone: patient.phone,
            address: patient.address,
            created_at: patient.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<PatientRes>,
}

/// New patient fields. Every field except `diagnoses` is required; missing fields are reported
/// as a validation error rather than a decoding error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Comma-separated condition names.
    #[serde(default)]
    pub diagnoses: Option<String>,
}

impl From<CreatePatientReq> for PatientInput {
    fn from(req: CreatePatientReq) -> Self {
        Self {
            name: req.name,
            age: req.age,
            phone: req.phone,
            address: req.address,
            diagnoses: req.diagnoses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PatientExportRes {
    pub name: String,
    pub facility_name: String,
    pub doctor_name: String,
    pub age: u32,
}

impl From<PatientExport> for PatientExportRes {
    fn from(export: PatientExport) -> Self {
        Self {
            name: export.name,
            facility_name: export.facility_name,
            doctor_name: export.doctor_name,
            age: export.age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NoteRes {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub facility_id: i64,
    pub facility_name: String,
    pub note_text: String,
    pub created_by: String,
    pub note_date: String,
    pub created_at: String,
}

impl From<PatientNote> for NoteRes {
    fn from(note: PatientNote) -> Self {
        Self {
            id: note.id.get(),
            patient_id: note.patient_id.get(),
            patient_name: note.patient_name,
            facility_id: note.facility_id.get(),
            facility_name: note.facility_name,
            note_text: note.note_text,
            created_by: note.created_by_username,
            note_date: note.note_date.to_string(),
            created_at: note.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListNotesRes {
    pub notes: Vec<NoteRes>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientNotesRes {
    pub patient: PatientRes,
    pub notes: Vec<NoteRes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteReq {
    #[serde(default)]
    pub note_text: Option<String>,
    /// Calendar date of the consultation, `YYYY-MM-DD`.
    #[serde(default)]
    pub note_date: Option<String>,
}

impl From<CreateNoteReq> for NoteInput {
    fn from(req: CreateNoteReq) -> Self {
        Self {
            note_text: req.note_text,
            note_date: req.note_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RiskEntryRes {
    pub name: String,
    pub score: u32,
}

impl From<RiskEntry> for RiskEntryRes {
    fn from(entry: RiskEntry) -> Self {
        Self {
            name: entry.name,
            score: entry.score,
        }
    }
}

/// Patient risk report for one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportRes {
    pub avg: f64,
    pub max: u32,
    pub min: u32,
    pub diagnoses: BTreeMap<String, u32>,
    pub high_risk: Vec<RiskEntryRes>,
    pub total: usize,
}

impl From<PatientReport> for ReportRes {
    fn from(report: PatientReport) -> Self {
        Self {
            avg: report.avg,
            max: report.max,
            min: report.min,
            diagnoses: report.diagnoses,
            high_risk: report.high_risk.into_iter().map(Into::into).collect(),
            total: report.total,
        }
    }
}
