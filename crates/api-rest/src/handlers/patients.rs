use api_shared::{
    CreateNoteReq, ErrorRes, ListPatientsRes, NoteRes, PatientExportRes, PatientNotesRes,
    PatientRes,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use clinic_core::PatientId;
use serde::Deserialize;

use super::record_id;
use crate::caller::RequestCaller;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub facility: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub id: Option<i64>,
}

fn patient_list(patients: Vec<clinic_core::models::Patient>) -> Json<ListPatientsRes> {
    Json(ListPatientsRes {
        patients: patients.into_iter().map(Into::into).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All patients", body = ListPatientsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<ListPatientsRes>, ApiError> {
    Ok(patient_list(state.patients.list()?))
}

#[utoipa::path(
    get,
    path = "/patients/search",
    params(
        ("name" = Option<String>, Query, description = "Substring of the patient name"),
        ("facility" = Option<String>, Query, description = "Exact facility name")
    ),
    responses(
        (status = 200, description = "Matching patients", body = ListPatientsRes)
    )
)]
/// Search patients by name, optionally within one facility. An empty name lists every patient.
///
/// Both values are matched literally.
pub async fn search_patients(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ListPatientsRes>, ApiError> {
    let Query(query) = query?;
    let name = query.name.unwrap_or_default();
    let patients = state
        .patients
        .search(&name, query.facility.as_deref())?;
    Ok(patient_list(patients))
}

#[utoipa::path(
    get,
    path = "/patients/export",
    params(("id" = i64, Query, description = "Patient id")),
    responses(
        (status = 200, description = "Flat patient export", body = PatientExportRes),
        (status = 400, description = "Missing or malformed id", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
pub async fn export_patient(
    State(state): State<AppState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Json<PatientExportRes>, ApiError> {
    let Query(query) = query?;
    let id = query
        .id
        .map(PatientId::new)
        .ok_or_else(|| ApiError::BadRequest("id is required".into()))?;
    Ok(Json(state.patients.export(id)?.into()))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient", body = PatientRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
pub async fn patient_detail(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<PatientRes>, ApiError> {
    let id: PatientId = record_id(path)?;
    Ok(Json(state.patients.get(id)?.into()))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(
        ("id" = i64, Path, description = "Patient id"),
        ("x-api-key" = String, Header, description = "API key of a doctor at the patient's facility")
    ),
    responses(
        (status = 204, description = "Patient and their notes deleted"),
        (status = 401, description = "No valid API key", body = ErrorRes),
        (status = 403, description = "Caller is not a doctor at the patient's facility", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    RequestCaller(caller): RequestCaller,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id: PatientId = record_id(path)?;
    state.patients.delete(&caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/patients/{id}/notes",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient and their notes, oldest first", body = PatientNotesRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
pub async fn patient_notes(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<PatientNotesRes>, ApiError> {
    let id: PatientId = record_id(path)?;
    let (patient, notes) = state.notes.for_patient(id)?;
    Ok(Json(PatientNotesRes {
        patient: patient.into(),
        notes: notes.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/notes",
    params(
        ("id" = i64, Path, description = "Patient id"),
        ("x-api-key" = String, Header, description = "API key of a doctor at the patient's facility")
    ),
    request_body = CreateNoteReq,
    responses(
        (status = 201, description = "Note created", body = NoteRes),
        (status = 400, description = "Missing text or malformed date", body = ErrorRes),
        (status = 401, description = "No valid API key", body = ErrorRes),
        (status = 403, description = "Caller is not a doctor at the patient's facility", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    RequestCaller(caller): RequestCaller,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreateNoteReq>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteRes>), ApiError> {
    let id: PatientId = record_id(path)?;
    state.notes.authorize_note(&caller, id)?;
    let Json(req) = body?;

    let note = state.notes.create(&caller, id, req.into())?;
    Ok((StatusCode::CREATED, Json(note.into())))
}
