//! # API Shared
//!
//! Shared utilities and definitions for the clinic APIs.
//!
//! Contains:
//! - Wire types with OpenAPI schemas (`types` module)
//! - Shared services like `HealthService`
//! - API-key header handling
//!
//! Used by `api-rest` so that handlers never serialise core records directly.

pub mod auth;
pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
