//! Clinical notes attached to patients.
//!
//! A note inherits its facility from the patient at creation time. Creating or deleting a
//! note requires a doctor at that facility.

use crate::access::{require_authenticated, require_facility_doctor, Caller};
use crate::db::{self, Store};
use crate::ids::{NoteId, PatientId};
use crate::models::{Doctor, NoteInput, Patient, PatientNote};
use crate::validation::validate_note_input;
use crate::{ClinicError, ClinicResult};
use chrono::Utc;
use rusqlite::Connection;

#[derive(Clone, Debug)]
pub struct NoteService {
    store: Store,
}

fn load_note(conn: &Connection, id: NoteId) -> ClinicResult<PatientNote> {
    db::note::get_note(conn, id)?.ok_or_else(|| ClinicError::not_found("note", id))
}

impl NoteService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn list(&self) -> ClinicResult<Vec<PatientNote>> {
        self.store.with_conn(|conn| Ok(db::note::list_notes(conn)?))
    }

    pub fn get(&self, id: NoteId) -> ClinicResult<PatientNote> {
        self.store.with_conn(|conn| load_note(conn, id))
    }

    /// Notes for one patient, oldest note date first.
    pub fn for_patient(&self, patient_id: PatientId) -> ClinicResult<(Patient, Vec<PatientNote>)> {
        self.store.with_conn(|conn| {
            let patient = db::patient::get_patient(conn, patient_id)?
                .ok_or_else(|| ClinicError::not_found("patient", patient_id))?;
            let notes = db::note::list_notes_by_patient(conn, patient_id)?;
            Ok((patient, notes))
        })
    }

    /// Checks that `caller` may write notes for the patient, without looking at any submitted
    /// fields. Returns the doctor and the patient.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, then `NotFound`, then `Forbidden`, as for [`NoteService::create`].
    pub fn authorize_note<'a>(
        &self,
        caller: &'a Caller,
        patient_id: PatientId,
    ) -> ClinicResult<(&'a Doctor, Patient)> {
        let doctor = require_authenticated(caller)?;
        let patient = self.store.with_conn(|conn| {
            db::patient::get_patient(conn, patient_id)?
                .ok_or_else(|| ClinicError::not_found("patient", patient_id))
        })?;
        require_facility_doctor(&self.store, doctor, patient.facility_id)?;
        Ok((doctor, patient))
    }

    /// Adds a note to a patient's record, authored by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError` if:
    /// - the caller is anonymous (`Unauthenticated`),
    /// - the patient does not exist (`NotFound`),
    /// - the caller is not a doctor at the patient's facility (`Forbidden`),
    /// - the text is blank or the date is not `YYYY-MM-DD` (`InvalidInput`).
    pub fn create(
        &self,
        caller: &Caller,
        patient_id: PatientId,
        input: NoteInput,
    ) -> ClinicResult<PatientNote> {
        let (doctor, patient) = self.authorize_note(caller, patient_id)?;
        let new_note = validate_note_input(input)?;

        let note = self.store.with_conn(|conn| {
            let id = db::note::insert_note(
                conn,
                patient.id,
                patient.facility_id,
                doctor.id,
                &new_note,
                Utc::now(),
            )?;
            load_note(conn, id)
        })?;

        tracing::info!(
            "doctor {} added note {} for patient {}",
            doctor.username,
            note.id,
            patient.id
        );
        Ok(note)
    }

    pub fn delete(&self, caller: &Caller, id: NoteId) -> ClinicResult<()> {
        let doctor = require_authenticated(caller)?;
        let note = self.get(id)?;
        require_facility_doctor(&self.store, doctor, note.facility_id)?;

        let deleted = self
            .store
            .with_conn(|conn| Ok::<_, ClinicError>(db::note::delete_note(conn, id)?))?;
        if !deleted {
            return Err(ClinicError::not_found("note", id));
        }

        tracing::info!("doctor {} deleted note {}", doctor.username, id);
        Ok(())
    }
}
