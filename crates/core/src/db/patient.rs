use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{constraint_error, DatabaseError};
use crate::ids::{DoctorId, FacilityId, PatientId};
use crate::models::{NewPatient, Patient};

const PATIENT_SELECT: &str = "SELECT p.id, p.name, p.facility_id, f.name, p.doctor_id, d.username,
        p.age, p.diagnoses, p.phone, p.address, p.created_at
 FROM patients p
 JOIN facilities f ON f.id = p.facility_id
 JOIN doctors d ON d.id = p.doctor_id";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        facility_id: row.get(2)?,
        facility_name: row.get(3)?,
        doctor_id: row.get(4)?,
        doctor_name: row.get(5)?,
        age: row.get(6)?,
        diagnoses: row.get(7)?,
        phone: row.get(8)?,
        address: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Escapes `%`, `_` and the escape character itself so `fragment` matches literally inside a
/// `LIKE ... ESCAPE '\'` pattern.
pub(crate) fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn insert_patient(
    conn: &Connection,
    facility_id: FacilityId,
    doctor_id: DoctorId,
    patient: &NewPatient,
    created_at: DateTime<Utc>,
) -> Result<PatientId, DatabaseError> {
    conn.execute(
        "INSERT INTO patients
             (name, facility_id, doctor_id, age, diagnoses, phone, address, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            patient.name.as_str(),
            facility_id,
            doctor_id,
            patient.age.years(),
            patient.diagnoses,
            patient.phone.as_str(),
            patient.address.as_str(),
            created_at,
        ],
    )
    .map_err(|e| constraint_error(e, "patient references an unknown facility or doctor"))?;
    Ok(PatientId::new(conn.last_insert_rowid()))
}

pub fn get_patient(conn: &Connection, id: PatientId) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            &format!("{PATIENT_SELECT} WHERE p.id = ?1"),
            params![id],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{PATIENT_SELECT} ORDER BY p.id"))?;
    let rows = stmt
        .query_map([], patient_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// A facility's roster in id order, which is also creation order.
pub fn list_patients_by_facility(
    conn: &Connection,
    facility_id: FacilityId,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{PATIENT_SELECT} WHERE p.facility_id = ?1 ORDER BY p.id"
    ))?;
    let rows = stmt
        .query_map(params![facility_id], patient_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_patients_by_facility(
    conn: &Connection,
    facility_id: FacilityId,
) -> Result<u64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE facility_id = ?1",
        params![facility_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Patients whose name contains `name_fragment` (ASCII case-insensitive), optionally limited
/// to the facility called `facility_name`.
pub fn search_patients(
    conn: &Connection,
    name_fragment: &str,
    facility_name: Option<&str>,
) -> Result<Vec<Patient>, DatabaseError> {
    let pattern = format!("%{}%", escape_like(name_fragment));
    let mut stmt = conn.prepare(&format!(
        "{PATIENT_SELECT}
         WHERE p.name LIKE ?1 ESCAPE '\\'
           AND (?2 IS NULL OR f.name = ?2)
         ORDER BY p.id"
    ))?;
    let rows = stmt
        .query_map(params![pattern, facility_name], patient_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Deletes the patient and, by cascade, their notes. Returns `false` if no such patient existed.
pub fn delete_patient(conn: &Connection, id: PatientId) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}
