use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{constraint_error, DatabaseError};
use crate::ids::{DoctorId, FacilityId, NoteId, PatientId};
use crate::models::{NewNote, PatientNote};

const NOTE_SELECT: &str = "SELECT n.id, n.patient_id, p.name, n.facility_id, f.name, n.note_text,
        n.created_by, d.username, n.note_date, n.created_at
 FROM patient_notes n
 JOIN patients p ON p.id = n.patient_id
 JOIN facilities f ON f.id = n.facility_id
 JOIN doctors d ON d.id = n.created_by";

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<PatientNote> {
    Ok(PatientNote {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        patient_name: row.get(2)?,
        facility_id: row.get(3)?,
        facility_name: row.get(4)?,
        note_text: row.get(5)?,
        created_by: row.get(6)?,
        created_by_username: row.get(7)?,
        note_date: row.get(8)?,
        created_at: row.get(9)?,
    })
}

pub fn insert_note(
    conn: &Connection,
    patient_id: PatientId,
    facility_id: FacilityId,
    created_by: DoctorId,
    note: &NewNote,
    created_at: DateTime<Utc>,
) -> Result<NoteId, DatabaseError> {
    conn.execute(
        "INSERT INTO patient_notes
             (patient_id, facility_id, note_text, created_by, note_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient_id,
            facility_id,
            note.note_text.as_str(),
            created_by,
            note.note_date,
            created_at,
        ],
    )
    .map_err(|e| constraint_error(e, "note references an unknown patient, facility or doctor"))?;
    Ok(NoteId::new(conn.last_insert_rowid()))
}

pub fn get_note(conn: &Connection, id: NoteId) -> Result<Option<PatientNote>, DatabaseError> {
    let note = conn
        .query_row(
            &format!("{NOTE_SELECT} WHERE n.id = ?1"),
            params![id],
            note_from_row,
        )
        .optional()?;
    Ok(note)
}

pub fn list_notes(conn: &Connection) -> Result<Vec<PatientNote>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT} ORDER BY n.id"))?;
    let rows = stmt
        .query_map([], note_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_notes_by_patient(
    conn: &Connection,
    patient_id: PatientId,
) -> Result<Vec<PatientNote>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{NOTE_SELECT} WHERE n.patient_id = ?1 ORDER BY n.note_date, n.id"
    ))?;
    let rows = stmt
        .query_map(params![patient_id], note_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_note(conn: &Connection, id: NoteId) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM patient_notes WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}
