//! Route handlers, one module per resource.
//!
//! Extractor rejections are taken as `Result`s and turned into [`ApiError`]s so every failure
//! uses the same JSON error body.

pub mod facilities;
pub mod notes;
pub mod patients;

use axum::extract::rejection::PathRejection;
use axum::extract::Path;

use crate::error::ApiError;

/// Reads a numeric record id from the path.
fn record_id<T: From<i64>>(path: Result<Path<i64>, PathRejection>) -> Result<T, ApiError> {
    let Path(raw) = path?;
    Ok(T::from(raw))
}
