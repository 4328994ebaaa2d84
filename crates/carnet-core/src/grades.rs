//! Grade store: per-(subject, period) numeric inputs on the 0-20 scale.
//!
//! Raw user input is parsed leniently (comma decimals accepted, anything
//! unparseable means "no grade") and stored unclamped so the user can keep
//! typing; [`GradeStore::commit`] clamps a value into range. Absence is a
//! first-class state: a missing entry is simply not in the map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest recordable grade.
pub const GRADE_MIN: f64 = 0.0;
/// Highest recordable grade.
pub const GRADE_MAX: f64 = 20.0;

/// Parse a raw grade string to a finite float.
///
/// Blank input and anything that does not parse yield `None`. A comma is
/// accepted as the decimal separator.
pub fn parse_grade(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Holds the per-subject, per-period grades of one calculation session.
///
/// Keys are the subject name and the period id the policy's averaging rule
/// reads (`s1`, `s2`, `note`, `exam`, or a composite part name). Ordered maps
/// keep the persisted snapshot and recomputation deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeStore {
    entries: BTreeMap<String, BTreeMap<String, f64>>,
}

impl GradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record raw input for a (subject, period) slot.
    ///
    /// Blank or unparseable input clears the slot. The parsed value is stored
    /// unclamped; call [`commit`](Self::commit) once the input is final.
    pub fn set(&mut self, subject: &str, period: &str, raw: &str) {
        match parse_grade(raw) {
            Some(value) => self.insert(subject, period, value),
            None => self.remove(subject, period),
        }
    }

    /// Store an already-numeric value, unclamped.
    pub fn insert(&mut self, subject: &str, period: &str, value: f64) {
        self.entries
            .entry(subject.to_string())
            .or_default()
            .insert(period.to_string(), value);
    }

    /// Clamp the slot into the `GRADE_MIN..=GRADE_MAX` range. No-op when the
    /// slot is absent or already in range.
    pub fn commit(&mut self, subject: &str, period: &str) {
        if let Some(value) = self
            .entries
            .get_mut(subject)
            .and_then(|periods| periods.get_mut(period))
        {
            *value = value.clamp(GRADE_MIN, GRADE_MAX);
        }
    }

    /// Clamp every recorded slot. Used when grades arrive from a file rather
    /// than one field at a time.
    pub fn commit_all(&mut self) {
        for periods in self.entries.values_mut() {
            for value in periods.values_mut() {
                *value = value.clamp(GRADE_MIN, GRADE_MAX);
            }
        }
    }

    /// The recorded value for a slot, if any.
    pub fn get(&self, subject: &str, period: &str) -> Option<f64> {
        self.entries
            .get(subject)
            .and_then(|periods| periods.get(period))
            .copied()
    }

    /// Remove one slot, pruning the subject map when it empties.
    pub fn remove(&mut self, subject: &str, period: &str) {
        if let Some(periods) = self.entries.get_mut(subject) {
            periods.remove(period);
            if periods.is_empty() {
                self.entries.remove(subject);
            }
        }
    }

    /// Drop every recorded grade.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded (subject, period) slots.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }
}
