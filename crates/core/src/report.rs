//! Patient risk report.
//!
//! Summarises one facility's roster: age statistics, how often each diagnosis appears, and the
//! patients with the highest risk scores.
//!
//! The diagnoses field is read twice with two different tokenisations:
//! - the risk score counts raw comma-split tokens, empty ones included (`"a,,b"` is 3 tokens);
//! - the frequency table trims each token and skips empty ones (`"a,,b"` counts `a` and `b`).
//!
//! Both behaviours are kept as they are. Do not unify them without sign-off from the clinical
//! product owners.

use crate::constants::{
    COMPLEX_CASE_POINTS, COMPLEX_CASE_THRESHOLD, ELDERLY_AGE_POINTS, ELDERLY_AGE_THRESHOLD,
    HIGH_RISK_LIMIT, MULTIMORBIDITY_THRESHOLD, SENIOR_AGE_POINTS, SENIOR_AGE_THRESHOLD,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// A record the report can read: anything exposing a name, an age and a diagnoses string.
pub trait RosterEntry {
    fn name(&self) -> &str;
    fn age(&self) -> u32;
    fn diagnoses(&self) -> &str;
}

/// One line of the high-risk list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientReport {
    /// Mean age, `0` for an empty roster.
    pub avg: f64,
    pub max: u32,
    pub min: u32,
    /// Occurrences of each trimmed diagnosis name across the roster.
    pub diagnoses: BTreeMap<String, u32>,
    /// Up to [`HIGH_RISK_LIMIT`] patients, highest score first, ties in roster order.
    pub high_risk: Vec<RiskEntry>,
    pub total: usize,
}

impl PatientReport {
    /// Builds the report for `roster`, read in the order given.
    ///
    /// An empty roster yields a zero-filled report.
    pub fn build<P: RosterEntry>(roster: &[P]) -> Self {
        let total = roster.len();

        let (sum, max, min) = roster.iter().fold(
            (0u64, None::<u32>, None::<u32>),
            |(sum, max, min), patient| {
                let age = patient.age();
                (
                    sum + u64::from(age),
                    Some(max.map_or(age, |m| m.max(age))),
                    Some(min.map_or(age, |m| m.min(age))),
                )
            },
        );

        let avg = if total == 0 {
            0.0
        } else {
            sum as f64 / total as f64
        };

        Self {
            avg,
            max: max.unwrap_or(0),
            min: min.unwrap_or(0),
            diagnoses: diagnosis_counts(roster.iter().map(RosterEntry::diagnoses)),
            high_risk: high_risk(roster),
            total,
        }
    }
}

/// Scores one patient from their age and raw diagnoses string.
pub fn risk_score(age: u32, diagnoses: &str) -> u32 {
    let mut score = 0;

    if age > SENIOR_AGE_THRESHOLD {
        score += SENIOR_AGE_POINTS;
    }
    if age > ELDERLY_AGE_THRESHOLD {
        score += ELDERLY_AGE_POINTS;
    }

    let tokens = raw_token_count(diagnoses);
    if tokens > MULTIMORBIDITY_THRESHOLD {
        score += tokens as u32;
    }
    if tokens > COMPLEX_CASE_THRESHOLD {
        score += COMPLEX_CASE_POINTS;
    }

    score
}

/// Number of comma-separated tokens, untrimmed. An empty field has none.
fn raw_token_count(diagnoses: &str) -> usize {
    if diagnoses.is_empty() {
        0
    } else {
        diagnoses.split(',').count()
    }
}

/// Counts every trimmed, non-empty diagnosis token across all `fields`.
pub fn diagnosis_counts<'a>(fields: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for token in fields
        .into_iter()
        .flat_map(|field| field.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    counts
}

fn high_risk<P: RosterEntry>(roster: &[P]) -> Vec<RiskEntry> {
    let mut entries: Vec<RiskEntry> = roster
        .iter()
        .map(|patient| RiskEntry {
            name: patient.name().to_string(),
            score: risk_score(patient.age(), patient.diagnoses()),
        })
        .collect();

    // sort_by is stable, so equal scores stay in roster order.
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(HIGH_RISK_LIMIT);
    entries
}
