use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{constraint_error, DatabaseError};
use crate::ids::DoctorId;
use crate::models::Doctor;

const DOCTOR_COLUMNS: &str = "id, username, email";

pub(crate) fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
    })
}

pub fn insert_doctor(
    conn: &Connection,
    username: &str,
    email: &str,
    api_key_hash: &str,
    created_at: DateTime<Utc>,
) -> Result<DoctorId, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (username, email, api_key_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![username, email, api_key_hash, created_at],
    )
    .map_err(|e| constraint_error(e, &format!("doctor username '{username}' already exists")))?;
    Ok(DoctorId::new(conn.last_insert_rowid()))
}

pub fn get_doctor(conn: &Connection, id: DoctorId) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
            params![id],
            doctor_from_row,
        )
        .optional()?;
    Ok(doctor)
}

pub fn get_doctor_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE username = ?1"),
            params![username],
            doctor_from_row,
        )
        .optional()?;
    Ok(doctor)
}

pub fn find_doctor_by_key_hash(
    conn: &Connection,
    api_key_hash: &str,
) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE api_key_hash = ?1"),
            params![api_key_hash],
            doctor_from_row,
        )
        .optional()?;
    Ok(doctor)
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY id"))?;
    let rows = stmt
        .query_map([], doctor_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
