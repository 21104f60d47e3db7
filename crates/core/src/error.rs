use crate::db::DatabaseError;
use crate::ids::FacilityId;

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("authentication required")]
    Unauthenticated,
    #[error("caller is not a doctor at facility {0}")]
    Forbidden(FacilityId),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid value: {0}")]
    Types(#[from] clinic_types::TypesError),
    #[error("database error: {0}")]
    Database(DatabaseError),
}

impl ClinicError {
    pub(crate) fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<DatabaseError> for ClinicError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConstraintViolation(msg) => ClinicError::Conflict(msg),
            DatabaseError::NotFound { entity, id } => ClinicError::NotFound { entity, id },
            other => ClinicError::Database(other),
        }
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
