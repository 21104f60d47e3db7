use api_shared::{ErrorRes, ListNotesRes, NoteRes};
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinic_core::NoteId;

use super::record_id;
use crate::caller::RequestCaller;
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes", body = ListNotesRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<ListNotesRes>, ApiError> {
    let notes = state.notes.list()?;
    Ok(Json(ListNotesRes {
        notes: notes.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note", body = NoteRes),
        (status = 404, description = "Note not found", body = ErrorRes)
    )
)]
pub async fn note_detail(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<NoteRes>, ApiError> {
    let id: NoteId = record_id(path)?;
    Ok(Json(state.notes.get(id)?.into()))
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note id"),
        ("x-api-key" = String, Header, description = "API key of a doctor at the note's facility")
    ),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 401, description = "No valid API key", body = ErrorRes),
        (status = 403, description = "Caller is not a doctor at the note's facility", body = ErrorRes),
        (status = 404, description = "Note not found", body = ErrorRes)
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    RequestCaller(caller): RequestCaller,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id: NoteId = record_id(path)?;
    state.notes.delete(&caller, id)?;
    Ok(StatusCode::NO_CONTENT)
}
