//! Input validation utilities.
//!
//! Raw caller input is turned into the validated `New*` records here, before any store write.

use crate::constants::NOTE_DATE_FORMAT;
use crate::models::{NewFacility, NewNote, NewPatient, NoteInput, PatientInput};
use crate::{ClinicError, ClinicResult};
use chrono::NaiveDate;
use clinic_types::{NonEmptyText, PatientAge};

/// Trims `value` and treats blank strings as missing.
fn present(value: Option<String>) -> Option<NonEmptyText> {
    value.and_then(|v| NonEmptyText::new(v).ok())
}

/// Validates a patient submission.
///
/// Name, age, phone and address are required; the age check only runs once all of them are
/// present. Diagnoses are optional and kept verbatim.
///
/// # Errors
///
/// Returns `ClinicError::InvalidInput` if a required field is missing or blank, or if the age is
/// outside `(0, 150)`.
pub fn validate_patient_input(input: PatientInput) -> ClinicResult<NewPatient> {
    let PatientInput {
        name,
        age,
        phone,
        address,
        diagnoses,
    } = input;

    let (Some(name), Some(age), Some(phone), Some(address)) =
        (present(name), age, present(phone), present(address))
    else {
        return Err(ClinicError::InvalidInput("all fields are required".into()));
    };

    let age = PatientAge::new(age).map_err(|_| ClinicError::InvalidInput("invalid age".into()))?;

    Ok(NewPatient {
        name,
        age,
        phone,
        address,
        diagnoses: diagnoses.unwrap_or_default(),
    })
}

/// Validates a note submission. Both the text and a `YYYY-MM-DD` date are required.
///
/// # Errors
///
/// Returns `ClinicError::InvalidInput` if either field is missing or the date does not parse.
pub fn validate_note_input(input: NoteInput) -> ClinicResult<NewNote> {
    let note_text = present(input.note_text)
        .ok_or_else(|| ClinicError::InvalidInput("note text is required".into()))?;

    let raw_date = present(input.note_date)
        .ok_or_else(|| ClinicError::InvalidInput("note date is required".into()))?;

    let note_date = NaiveDate::parse_from_str(raw_date.as_str(), NOTE_DATE_FORMAT)
        .map_err(|_| {
            ClinicError::InvalidInput(format!(
                "note date must be formatted as YYYY-MM-DD, got '{raw_date}'"
            ))
        })?;

    Ok(NewNote {
        note_text,
        note_date,
    })
}

/// Validates a facility. All three fields must be non-blank.
pub fn validate_facility(name: &str, address: &str, phone: &str) -> ClinicResult<NewFacility> {
    Ok(NewFacility {
        name: NonEmptyText::new(name)?,
        address: NonEmptyText::new(address)?,
        phone: NonEmptyText::new(phone)?,
    })
}

/// Validates a doctor username: 1 to 150 characters of ASCII letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> ClinicResult<NonEmptyText> {
    const MAX_USERNAME_LEN: usize = 150;

    let username = NonEmptyText::new(username)?;

    if username.as_str().len() > MAX_USERNAME_LEN {
        return Err(ClinicError::InvalidInput(format!(
            "username exceeds maximum length of {} characters",
            MAX_USERNAME_LEN
        )));
    }

    let ok = username
        .as_str()
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'@' | b'.' | b'+' | b'-' | b'_'));

    if !ok {
        return Err(ClinicError::InvalidInput(
            "username contains invalid characters (only alphanumeric, '@', '.', '+', '-', '_' allowed)"
                .into(),
        ));
    }

    Ok(username)
}
