//! Constants used throughout the clinic core crate.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "clinic.db";

/// Number of patients listed in a report's high-risk section.
pub const HIGH_RISK_LIMIT: usize = 3;

/// Ages strictly above this add [`SENIOR_AGE_POINTS`] to a risk score.
pub const SENIOR_AGE_THRESHOLD: u32 = 65;

pub const SENIOR_AGE_POINTS: u32 = 2;

/// Ages strictly above this add [`ELDERLY_AGE_POINTS`] on top of the senior points.
pub const ELDERLY_AGE_THRESHOLD: u32 = 75;

pub const ELDERLY_AGE_POINTS: u32 = 1;

/// Diagnosis token counts strictly above this add the count itself to a risk score.
pub const MULTIMORBIDITY_THRESHOLD: usize = 2;

/// Diagnosis token counts strictly above this add [`COMPLEX_CASE_POINTS`].
pub const COMPLEX_CASE_THRESHOLD: usize = 4;

pub const COMPLEX_CASE_POINTS: u32 = 2;

/// Byte length of issued API keys before hex encoding.
pub const API_KEY_BYTES: usize = 32;

/// Date format accepted for note dates.
pub const NOTE_DATE_FORMAT: &str = "%Y-%m-%d";
