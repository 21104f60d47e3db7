//! Resolves the `x-api-key` header into the request's [`Caller`].

use api_shared::auth::{parse_api_key, API_KEY_HEADER};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use clinic_core::access::resolve_caller;
use clinic_core::Caller;

use crate::error::ApiError;
use crate::AppState;

/// The identity behind a request.
///
/// A request without a key is anonymous. A key that is present but unknown, or not valid
/// header text, is rejected with 401 before the handler runs.
pub struct RequestCaller(pub Caller);

#[axum::async_trait]
impl FromRequestParts<AppState> for RequestCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = match parts.headers.get(API_KEY_HEADER) {
            Some(value) => Some(value.to_str().map_err(|_| ApiError::Unauthorized)?),
            None => None,
        };

        let caller = resolve_caller(&state.store, parse_api_key(raw))?;
        Ok(Self(caller))
    }
}
