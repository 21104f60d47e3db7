//! Shared fixture for service tests.
//!
//! Two facilities, each with one doctor:
//! - `North` staffed by `grey`
//! - `South` staffed by `shepherd`

use crate::access::Caller;
use crate::db::Store;
use crate::ids::FacilityId;
use crate::models::{Doctor, Facility, Patient, PatientInput};
use crate::repositories::doctor::DoctorService;
use crate::repositories::facility::FacilityService;
use crate::repositories::note::NoteService;
use crate::repositories::patient::PatientService;
use crate::validation::validate_facility;

pub(crate) struct Fixture {
    pub facilities: FacilityService,
    pub patients: PatientService,
    pub notes: NoteService,
    pub north: Facility,
    pub south: Facility,
    pub grey: Doctor,
    pub shepherd: Doctor,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Store::open_in_memory().expect("in-memory store");
        let doctors = DoctorService::new(store.clone());
        let facilities = FacilityService::new(store.clone());

        let grey = doctors.register("grey", "grey@example.com").unwrap();
        let shepherd = doctors.register("shepherd", "shepherd@example.com").unwrap();

        let north = facilities
            .create(validate_facility("North", "1 High St", "555-0100").unwrap())
            .unwrap();
        let south = facilities
            .create(validate_facility("South", "2 Low Rd", "555-0200").unwrap())
            .unwrap();

        facilities.assign_doctor(north.id, "grey").unwrap();
        facilities.assign_doctor(south.id, "shepherd").unwrap();

        Self {
            patients: PatientService::new(store.clone()),
            notes: NoteService::new(store.clone()),
            facilities,
            north,
            south,
            grey: grey.doctor,
            shepherd: shepherd.doctor,
        }
    }

    pub fn as_grey(&self) -> Caller {
        Caller::Doctor(self.grey.clone())
    }

    pub fn as_shepherd(&self) -> Caller {
        Caller::Doctor(self.shepherd.clone())
    }

    /// Admits a patient to `facility_id` as that facility's doctor.
    pub fn add_patient(
        &self,
        facility_id: FacilityId,
        name: &str,
        age: i64,
        diagnoses: &str,
    ) -> Patient {
        let caller = if facility_id == self.south.id {
            self.as_shepherd()
        } else {
            self.as_grey()
        };
        self.patients
            .create(&caller, facility_id, patient_input(name, age, diagnoses))
            .expect("fixture patient should be created")
    }
}

pub(crate) fn patient_input(name: &str, age: i64, diagnoses: &str) -> PatientInput {
    PatientInput {
        name: Some(name.to_string()),
        age: Some(age),
        phone: Some("555-0199".to_string()),
        address: Some("3 Elm St".to_string()),
        diagnoses: Some(diagnoses.to_string()),
    }
}
