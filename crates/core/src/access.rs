//! Caller identity and authorisation guards.
//!
//! Every mutation runs its guard before touching the store:
//! 1. [`require_authenticated`]: the caller must be a known doctor.
//! 2. [`require_facility_doctor`]: that doctor must belong to the facility that owns the record.
//!
//! Doctors authenticate with an API key. Only the SHA-256 digest of a key is stored.

use crate::constants::API_KEY_BYTES;
use crate::db::{self, Store};
use crate::ids::{DoctorId, FacilityId};
use crate::models::Doctor;
use crate::{ClinicError, ClinicResult};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Doctor(Doctor),
}

impl Caller {
    pub fn doctor(&self) -> Option<&Doctor> {
        match self {
            Caller::Anonymous => None,
            Caller::Doctor(doctor) => Some(doctor),
        }
    }
}

/// Answers identity and membership questions for the guards.
pub trait AccessProvider {
    /// Resolves an API key to its doctor, or `None` if the key is unknown.
    fn authenticate(&self, api_key: &str) -> ClinicResult<Option<Doctor>>;

    fn is_facility_doctor(&self, doctor_id: DoctorId, facility_id: FacilityId)
        -> ClinicResult<bool>;
}

impl AccessProvider for Store {
    fn authenticate(&self, api_key: &str) -> ClinicResult<Option<Doctor>> {
        let hash = hash_api_key(api_key);
        self.with_conn(|conn| Ok(db::doctor::find_doctor_by_key_hash(conn, &hash)?))
    }

    fn is_facility_doctor(
        &self,
        doctor_id: DoctorId,
        facility_id: FacilityId,
    ) -> ClinicResult<bool> {
        self.with_conn(|conn| {
            Ok(db::facility::is_facility_doctor(
                conn,
                facility_id,
                doctor_id,
            )?)
        })
    }
}

/// Resolves an optional API key into a [`Caller`].
///
/// # Errors
///
/// Returns `ClinicError::Unauthenticated` if a key was supplied but matches no doctor.
pub fn resolve_caller(
    provider: &impl AccessProvider,
    api_key: Option<&str>,
) -> ClinicResult<Caller> {
    match api_key {
        None => Ok(Caller::Anonymous),
        Some(key) => match provider.authenticate(key)? {
            Some(doctor) => Ok(Caller::Doctor(doctor)),
            None => {
                tracing::warn!("rejected unknown API key");
                Err(ClinicError::Unauthenticated)
            }
        },
    }
}

pub fn require_authenticated(caller: &Caller) -> ClinicResult<&Doctor> {
    caller.doctor().ok_or(ClinicError::Unauthenticated)
}

/// Fails with `ClinicError::Forbidden` unless `doctor` belongs to `facility_id`.
pub fn require_facility_doctor(
    provider: &impl AccessProvider,
    doctor: &Doctor,
    facility_id: FacilityId,
) -> ClinicResult<()> {
    if provider.is_facility_doctor(doctor.id, facility_id)? {
        Ok(())
    } else {
        tracing::warn!(
            "doctor {} denied access to facility {}",
            doctor.username,
            facility_id
        );
        Err(ClinicError::Forbidden(facility_id))
    }
}

/// Generates a fresh random API key as lowercase hex.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; API_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hex-encoded SHA-256 digest of an API key, as stored in the `doctors` table.
pub fn hash_api_key(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}
