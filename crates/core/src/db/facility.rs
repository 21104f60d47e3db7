use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::doctor::doctor_from_row;
use super::{constraint_error, DatabaseError};
use crate::ids::{DoctorId, FacilityId};
use crate::models::{Doctor, Facility, FacilitySummary};

const FACILITY_COLUMNS: &str = "f.id, f.name, f.address, f.phone, f.created_at";

fn facility_from_row(row: &Row<'_>) -> rusqlite::Result<Facility> {
    Ok(Facility {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn insert_facility(
    conn: &Connection,
    name: &str,
    address: &str,
    phone: &str,
    created_at: DateTime<Utc>,
) -> Result<FacilityId, DatabaseError> {
    conn.execute(
        "INSERT INTO facilities (name, address, phone, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, address, phone, created_at],
    )
    .map_err(|e| constraint_error(e, &format!("facility name '{name}' already exists")))?;
    Ok(FacilityId::new(conn.last_insert_rowid()))
}

pub fn get_facility(conn: &Connection, id: FacilityId) -> Result<Option<Facility>, DatabaseError> {
    let facility = conn
        .query_row(
            &format!("SELECT {FACILITY_COLUMNS} FROM facilities f WHERE f.id = ?1"),
            params![id],
            facility_from_row,
        )
        .optional()?;
    Ok(facility)
}

pub fn get_facility_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Facility>, DatabaseError> {
    let facility = conn
        .query_row(
            &format!("SELECT {FACILITY_COLUMNS} FROM facilities f WHERE f.name = ?1"),
            params![name],
            facility_from_row,
        )
        .optional()?;
    Ok(facility)
}

/// Every facility with its patient and doctor counts, in one query.
pub fn list_facility_summaries(conn: &Connection) -> Result<Vec<FacilitySummary>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FACILITY_COLUMNS},
                (SELECT COUNT(*) FROM patients p WHERE p.facility_id = f.id),
                (SELECT COUNT(*) FROM facility_doctors fd WHERE fd.facility_id = f.id)
         FROM facilities f
         ORDER BY f.id"
    ))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(FacilitySummary {
                facility: facility_from_row(row)?,
                patient_count: row.get(5)?,
                doctor_count: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_facilities(conn: &Connection) -> Result<u64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM facilities", [], |row| row.get(0))?;
    Ok(count)
}

/// Adds `doctor_id` to the facility's doctor set. Returns `false` if they were already a member.
pub fn add_facility_doctor(
    conn: &Connection,
    facility_id: FacilityId,
    doctor_id: DoctorId,
) -> Result<bool, DatabaseError> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO facility_doctors (facility_id, doctor_id) VALUES (?1, ?2)",
            params![facility_id, doctor_id],
        )
        .map_err(|e| constraint_error(e, "facility or doctor does not exist"))?;
    Ok(inserted > 0)
}

pub fn is_facility_doctor(
    conn: &Connection,
    facility_id: FacilityId,
    doctor_id: DoctorId,
) -> Result<bool, DatabaseError> {
    let member = conn.query_row(
        "SELECT EXISTS(
             SELECT 1 FROM facility_doctors WHERE facility_id = ?1 AND doctor_id = ?2
         )",
        params![facility_id, doctor_id],
        |row| row.get(0),
    )?;
    Ok(member)
}

pub fn list_facility_doctors(
    conn: &Connection,
    facility_id: FacilityId,
) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT d.id, d.username, d.email
         FROM doctors d
         JOIN facility_doctors fd ON fd.doctor_id = d.id
         WHERE fd.facility_id = ?1
         ORDER BY d.id",
    )?;
    let rows = stmt
        .query_map(params![facility_id], doctor_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::doctor::insert_doctor;
    use crate::db::open_memory_database;

    #[test]
    fn insert_and_fetch_facility() {
        let conn = open_memory_database().unwrap();
        let id = insert_facility(&conn, "North Clinic", "1 High St", "555-0100", Utc::now())
            .unwrap();

        let facility = get_facility(&conn, id).unwrap().expect("facility should exist");
        assert_eq!(facility.name, "North Clinic");
        assert_eq!(facility.address, "1 High St");
        assert_eq!(facility.phone, "555-0100");

        assert_eq!(
            get_facility_by_name(&conn, "North Clinic").unwrap(),
            Some(facility)
        );
        assert_eq!(get_facility(&conn, FacilityId::new(999)).unwrap(), None);
        assert_eq!(count_facilities(&conn).unwrap(), 1);
    }

    #[test]
    fn facility_names_are_unique() {
        let conn = open_memory_database().unwrap();
        insert_facility(&conn, "North Clinic", "1 High St", "555", Utc::now()).unwrap();

        let err = insert_facility(&conn, "North Clinic", "2 Low St", "556", Utc::now())
            .expect_err("duplicate name should fail");
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn doctor_membership() {
        let conn = open_memory_database().unwrap();
        let facility = insert_facility(&conn, "North", "1 High St", "555", Utc::now()).unwrap();
        let other = insert_facility(&conn, "South", "2 Low St", "556", Utc::now()).unwrap();
        let doctor = insert_doctor(&conn, "grey", "grey@example.com", "h", Utc::now()).unwrap();

        assert!(!is_facility_doctor(&conn, facility, doctor).unwrap());
        assert!(add_facility_doctor(&conn, facility, doctor).unwrap());
        assert!(!add_facility_doctor(&conn, facility, doctor).unwrap());
        assert!(is_facility_doctor(&conn, facility, doctor).unwrap());
        assert!(!is_facility_doctor(&conn, other, doctor).unwrap());

        let doctors = list_facility_doctors(&conn, facility).unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].username, "grey");
        assert!(list_facility_doctors(&conn, other).unwrap().is_empty());
    }

    #[test]
    fn membership_requires_existing_rows() {
        let conn = open_memory_database().unwrap();
        let facility = insert_facility(&conn, "North", "1 High St", "555", Utc::now()).unwrap();

        let err = add_facility_doctor(&conn, facility, DoctorId::new(42))
            .expect_err("unknown doctor should fail");
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn summaries_count_patients_and_doctors() {
        let conn = open_memory_database().unwrap();
        let north = insert_facility(&conn, "North", "1 High St", "555", Utc::now()).unwrap();
        insert_facility(&conn, "South", "2 Low St", "556", Utc::now()).unwrap();
        let doctor = insert_doctor(&conn, "grey", "grey@example.com", "h", Utc::now()).unwrap();
        add_facility_doctor(&conn, north, doctor).unwrap();
        conn.execute(
            "INSERT INTO patients (name, facility_id, doctor_id, age, diagnoses, phone, address, created_at)
             VALUES ('Ann', ?1, ?2, 40, '', '555', 'Here', ?3)",
            params![north, doctor, Utc::now()],
        )
        .unwrap();

        let summaries = list_facility_summaries(&conn).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].facility.name, "North");
        assert_eq!(summaries[0].patient_count, 1);
        assert_eq!(summaries[0].doctor_count, 1);
        assert_eq!(summaries[1].patient_count, 0);
        assert_eq!(summaries[1].doctor_count, 0);
    }
}
