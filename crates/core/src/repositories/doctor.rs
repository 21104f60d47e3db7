//! Doctor accounts.
//!
//! Registering a doctor issues their API key. The key is returned exactly once; only its
//! digest is stored.

use crate::access::{generate_api_key, hash_api_key};
use crate::db::{self, Store};
use crate::models::Doctor;
use crate::validation::validate_username;
use crate::{ClinicError, ClinicResult};
use chrono::Utc;
use clinic_types::EmailAddress;

/// A newly registered doctor together with the plain-text API key issued to them.
#[derive(Debug, Clone)]
pub struct RegisteredDoctor {
    pub doctor: Doctor,
    pub api_key: String,
}

#[derive(Clone, Debug)]
pub struct DoctorService {
    store: Store,
}

impl DoctorService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Registers a doctor and issues their API key.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError` if:
    /// - the username or email is invalid,
    /// - the username is already taken (`ClinicError::Conflict`),
    /// - the store write fails.
    pub fn register(&self, username: &str, email: &str) -> ClinicResult<RegisteredDoctor> {
        let username = validate_username(username)?;
        let email = EmailAddress::parse(email)?;
        let api_key = generate_api_key();
        let api_key_hash = hash_api_key(&api_key);

        let doctor = self.store.with_conn(|conn| {
            let id = db::doctor::insert_doctor(
                conn,
                username.as_str(),
                email.as_str(),
                &api_key_hash,
                Utc::now(),
            )?;
            db::doctor::get_doctor(conn, id)?.ok_or_else(|| ClinicError::not_found("doctor", id))
        })?;

        tracing::info!("registered doctor {} ({})", doctor.username, doctor.id);
        Ok(RegisteredDoctor { doctor, api_key })
    }

    pub fn get_by_username(&self, username: &str) -> ClinicResult<Doctor> {
        self.store.with_conn(|conn| {
            db::doctor::get_doctor_by_username(conn, username)?
                .ok_or_else(|| ClinicError::not_found("doctor", username))
        })
    }

    pub fn list(&self) -> ClinicResult<Vec<Doctor>> {
        self.store
            .with_conn(|conn| Ok(db::doctor::list_doctors(conn)?))
    }
}
