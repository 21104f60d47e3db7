//! Patient records and the facility risk report.
//!
//! Mutations check, in order: the caller is a doctor, the target exists, the doctor belongs to
//! the owning facility, and only then the submitted fields.

use crate::access::{require_authenticated, require_facility_doctor, Caller};
use crate::db::{self, Store};
use crate::ids::{FacilityId, PatientId};
use crate::models::{Doctor, Patient, PatientExport, PatientInput};
use crate::report::PatientReport;
use crate::repositories::facility::load_facility;
use crate::validation::validate_patient_input;
use crate::{ClinicError, ClinicResult};
use chrono::Utc;
use rusqlite::Connection;

#[derive(Clone, Debug)]
pub struct PatientService {
    store: Store,
}

fn load_patient(conn: &Connection, id: PatientId) -> ClinicResult<Patient> {
    db::patient::get_patient(conn, id)?.ok_or_else(|| ClinicError::not_found("patient", id))
}

impl PatientService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn list(&self) -> ClinicResult<Vec<Patient>> {
        self.store
            .with_conn(|conn| Ok(db::patient::list_patients(conn)?))
    }

    /// Patients whose name contains `name`, optionally only those at the facility called
    /// `facility`. An empty `name` returns every patient and ignores `facility`.
    ///
    /// Both values are bound as query parameters and matched literally.
    pub fn search(&self, name: &str, facility: Option<&str>) -> ClinicResult<Vec<Patient>> {
        let name = name.trim();
        if name.is_empty() {
            return self.list();
        }
        let facility = facility.map(str::trim).filter(|f| !f.is_empty());
        self.store
            .with_conn(|conn| Ok(db::patient::search_patients(conn, name, facility)?))
    }

    pub fn get(&self, id: PatientId) -> ClinicResult<Patient> {
        self.store.with_conn(|conn| load_patient(conn, id))
    }

    /// Checks that `caller` may admit patients to `facility_id`, without looking at any
    /// submitted fields.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, then `NotFound`, then `Forbidden`, as for [`PatientService::create`].
    pub fn authorize_admission<'a>(
        &self,
        caller: &'a Caller,
        facility_id: FacilityId,
    ) -> ClinicResult<&'a Doctor> {
        let doctor = require_authenticated(caller)?;
        self.store.with_conn(|conn| load_facility(conn, facility_id))?;
        require_facility_doctor(&self.store, doctor, facility_id)?;
        Ok(doctor)
    }

    /// Admits a patient to `facility_id`, recording the calling doctor as their doctor.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError` if:
    /// - the caller is anonymous (`Unauthenticated`),
    /// - the facility does not exist (`NotFound`),
    /// - the caller is not one of the facility's doctors (`Forbidden`),
    /// - the input fails validation (`InvalidInput`).
    pub fn create(
        &self,
        caller: &Caller,
        facility_id: FacilityId,
        input: PatientInput,
    ) -> ClinicResult<Patient> {
        let doctor = self.authorize_admission(caller, facility_id)?;
        let new_patient = validate_patient_input(input)?;

        let patient = self.store.with_conn(|conn| {
            let id = db::patient::insert_patient(
                conn,
                facility_id,
                doctor.id,
                &new_patient,
                Utc::now(),
            )?;
            load_patient(conn, id)
        })?;

        tracing::info!(
            "doctor {} admitted patient {} to facility {}",
            doctor.username,
            patient.id,
            facility_id
        );
        Ok(patient)
    }

    /// Deletes a patient and their notes.
    ///
    /// Only a doctor at the patient's facility may do this.
    pub fn delete(&self, caller: &Caller, id: PatientId) -> ClinicResult<()> {
        let doctor = require_authenticated(caller)?;
        let patient = self.get(id)?;
        require_facility_doctor(&self.store, doctor, patient.facility_id)?;

        let deleted = self
            .store
            .with_conn(|conn| Ok::<_, ClinicError>(db::patient::delete_patient(conn, id)?))?;
        if !deleted {
            return Err(ClinicError::not_found("patient", id));
        }

        tracing::info!("doctor {} deleted patient {}", doctor.username, id);
        Ok(())
    }

    pub fn export(&self, id: PatientId) -> ClinicResult<PatientExport> {
        Ok(PatientExport::from(&self.get(id)?))
    }

    /// Risk report over the facility's roster, read in patient id order.
    pub fn report(&self, facility_id: FacilityId) -> ClinicResult<PatientReport> {
        let roster = self.store.with_conn(|conn| {
            load_facility(conn, facility_id)?;
            Ok::<_, ClinicError>(db::patient::list_patients_by_facility(conn, facility_id)?)
        })?;

        tracing::debug!(
            "building report for facility {} over {} patients",
            facility_id,
            roster.len()
        );
        Ok(PatientReport::build(&roster))
    }
}
