use api_shared::{
    CreatePatientReq, ErrorRes, FacilityDetailRes, FacilityDoctorsRes, FacilityPatientsRes,
    ListFacilitiesRes, PatientRes, ReportRes,
};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinic_core::FacilityId;

use super::record_id;
use crate::caller::RequestCaller;
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/facilities",
    responses(
        (status = 200, description = "Facilities with patient and doctor counts", body = ListFacilitiesRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List every facility with its patient and doctor counts.
pub async fn list_facilities(
    State(state): State<AppState>,
) -> Result<Json<ListFacilitiesRes>, ApiError> {
    let facilities = state.facilities.list_with_counts()?;
    let total_facilities = state.facilities.count()?;
    Ok(Json(ListFacilitiesRes {
        facilities: facilities.into_iter().map(Into::into).collect(),
        total_facilities,
    }))
}

#[utoipa::path(
    get,
    path = "/facilities/{id}",
    params(("id" = i64, Path, description = "Facility id")),
    responses(
        (status = 200, description = "Facility with its doctors and patients", body = FacilityDetailRes),
        (status = 404, description = "Facility not found", body = ErrorRes)
    )
)]
pub async fn facility_detail(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<FacilityDetailRes>, ApiError> {
    let id: FacilityId = record_id(path)?;
    Ok(Json(state.facilities.detail(id)?.into()))
}

#[utoipa::path(
    get,
    path = "/facilities/{id}/patients",
    params(("id" = i64, Path, description = "Facility id")),
    responses(
        (status = 200, description = "Facility roster", body = FacilityPatientsRes),
        (status = 404, description = "Facility not found", body = ErrorRes)
    )
)]
pub async fn facility_patients(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<FacilityPatientsRes>, ApiError> {
    let id: FacilityId = record_id(path)?;
    let (facility, patients) = state.facilities.patients(id)?;
    Ok(Json(FacilityPatientsRes {
        facility: facility.into(),
        patients: patients.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/facilities/{id}/doctors",
    params(("id" = i64, Path, description = "Facility id")),
    responses(
        (status = 200, description = "Doctors at the facility", body = FacilityDoctorsRes),
        (status = 404, description = "Facility not found", body = ErrorRes)
    )
)]
pub async fn facility_doctors(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<FacilityDoctorsRes>, ApiError> {
    let id: FacilityId = record_id(path)?;
    let (facility, doctors) = state.facilities.doctors(id)?;
    Ok(Json(FacilityDoctorsRes {
        facility: facility.into(),
        doctors: doctors.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/facilities/{id}/report",
    params(("id" = i64, Path, description = "Facility id")),
    responses(
        (status = 200, description = "Patient risk report", body = ReportRes),
        (status = 404, description = "Facility not found", body = ErrorRes)
    )
)]
/// Risk report over the facility's roster.
///
/// Age statistics, diagnosis frequencies and the three highest-scoring patients.
pub async fn facility_report(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ReportRes>, ApiError> {
    let id: FacilityId = record_id(path)?;
    Ok(Json(state.patients.report(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/facilities/{id}/patients",
    params(
        ("id" = i64, Path, description = "Facility id"),
        ("x-api-key" = String, Header, description = "API key of a doctor at the facility")
    ),
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient created", body = PatientRes),
        (status = 400, description = "Missing fields or invalid age", body = ErrorRes),
        (status = 401, description = "No valid API key", body = ErrorRes),
        (status = 403, description = "Caller is not a doctor at the facility", body = ErrorRes),
        (status = 404, description = "Facility not found", body = ErrorRes)
    )
)]
/// Admit a patient to the facility. The calling doctor becomes the patient's doctor.
pub async fn create_patient(
    State(state): State<AppState>,
    RequestCaller(caller): RequestCaller,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreatePatientReq>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientRes>), ApiError> {
    let id: FacilityId = record_id(path)?;
    state.patients.authorize_admission(&caller, id)?;
    let Json(req) = body?;

    let patient = state.patients.create(&caller, id, req.into())?;
    Ok((StatusCode::CREATED, Json(patient.into())))
}
