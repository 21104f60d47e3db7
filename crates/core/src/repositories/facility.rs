//! Facilities and their doctor rosters.

use crate::db::{self, Store};
use crate::ids::FacilityId;
use crate::models::{Doctor, Facility, FacilityDetail, FacilitySummary, NewFacility, Patient};
use crate::{ClinicError, ClinicResult};
use chrono::Utc;
use rusqlite::Connection;

#[derive(Clone, Debug)]
pub struct FacilityService {
    store: Store,
}

/// Loads a facility or fails with `NotFound`.
pub(crate) fn load_facility(conn: &Connection, id: FacilityId) -> ClinicResult<Facility> {
    db::facility::get_facility(conn, id)?.ok_or_else(|| ClinicError::not_found("facility", id))
}

impl FacilityService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates a facility. Facility names are unique.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::Conflict` if a facility with the same name exists.
    pub fn create(&self, facility: NewFacility) -> ClinicResult<Facility> {
        let created = self.store.with_conn(|conn| {
            let id = db::facility::insert_facility(
                conn,
                facility.name.as_str(),
                facility.address.as_str(),
                facility.phone.as_str(),
                Utc::now(),
            )?;
            load_facility(conn, id)
        })?;

        tracing::info!("created facility {} ({})", created.name, created.id);
        Ok(created)
    }

    /// Adds the doctor called `username` to the facility's doctor set.
    ///
    /// Returns `false` if the doctor was already a member.
    pub fn assign_doctor(&self, facility_id: FacilityId, username: &str) -> ClinicResult<bool> {
        let added = self.store.with_conn(|conn| {
            load_facility(conn, facility_id)?;
            let doctor = db::doctor::get_doctor_by_username(conn, username)?
                .ok_or_else(|| ClinicError::not_found("doctor", username))?;
            Ok::<_, ClinicError>(db::facility::add_facility_doctor(
                conn,
                facility_id,
                doctor.id,
            )?)
        })?;

        if added {
            tracing::info!("assigned doctor {} to facility {}", username, facility_id);
        }
        Ok(added)
    }

    pub fn count(&self) -> ClinicResult<u64> {
        self.store
            .with_conn(|conn| Ok(db::facility::count_facilities(conn)?))
    }

    /// Every facility with its patient and doctor counts.
    pub fn list_with_counts(&self) -> ClinicResult<Vec<FacilitySummary>> {
        self.store
            .with_conn(|conn| Ok(db::facility::list_facility_summaries(conn)?))
    }

    pub fn get(&self, id: FacilityId) -> ClinicResult<Facility> {
        self.store.with_conn(|conn| load_facility(conn, id))
    }

    /// A facility with its doctors and patients.
    pub fn detail(&self, id: FacilityId) -> ClinicResult<FacilityDetail> {
        self.store.with_conn(|conn| {
            let facility = load_facility(conn, id)?;
            let doctors = db::facility::list_facility_doctors(conn, id)?;
            let patients = db::patient::list_patients_by_facility(conn, id)?;
            Ok(FacilityDetail {
                facility,
                doctors,
                patients,
            })
        })
    }

    pub fn patients(&self, id: FacilityId) -> ClinicResult<(Facility, Vec<Patient>)> {
        self.store.with_conn(|conn| {
            let facility = load_facility(conn, id)?;
            let patients = db::patient::list_patients_by_facility(conn, id)?;
            Ok((facility, patients))
        })
    }

    pub fn doctors(&self, id: FacilityId) -> ClinicResult<(Facility, Vec<Doctor>)> {
        self.store.with_conn(|conn| {
            let facility = load_facility(conn, id)?;
            let doctors = db::facility::list_facility_doctors(conn, id)?;
            Ok((facility, doctors))
        })
    }
}
