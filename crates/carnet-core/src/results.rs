//! Derived calculation result types.
//!
//! A [`CalculationResult`] is immutable once produced and recomputed in full
//! on every calculation request; nothing here updates incrementally.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Scope;

/// Classification of one subject average against the policy thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Standing {
    /// At or above the pass mark.
    Passing,
    /// Between the retake floor (inclusive) and the pass mark; may be offset
    /// by overall performance.
    CompensableRetake,
    /// Below the retake floor; remedial examination regardless of overall
    /// average.
    MandatoryRetake,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::Passing => write!(f, "passing"),
            Standing::CompensableRetake => write!(f, "optional retake"),
            Standing::MandatoryRetake => write!(f, "mandatory retake"),
        }
    }
}

/// The overall outcome of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    Pass,
    Retake,
}

/// One subject's computed average within a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAverage {
    pub subject: String,
    pub coefficient: u32,
    /// Full-precision average; round only at display time.
    pub average: f64,
    pub standing: Standing,
}

/// The complete outcome of one calculation request.
///
/// `subject_averages` holds exactly one entry per in-scope subject that had
/// sufficient inputs, in policy order. `overall_average` is `None` only when
/// no subject average could be computed at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub scope: Scope,
    pub subject_averages: Vec<SubjectAverage>,
    pub overall_average: Option<f64>,
    pub decision: Decision,
    /// Variant wording for the decision (e.g. "Admis en 2e annee").
    pub status: String,
    /// Ordered human-readable warnings.
    pub warnings: Vec<String>,
    /// Hospitals whose minimum qualifying average the result reaches; empty
    /// for non-passing or semester results, or variants without a table.
    pub eligible_hospitals: Vec<String>,
}

impl CalculationResult {
    /// Look up one subject's computed average.
    pub fn subject_average(&self, subject: &str) -> Option<f64> {
        self.subject_averages
            .iter()
            .find(|s| s.subject == subject)
            .map(|s| s.average)
    }
}

/// Round a value to 2 decimal places for display. Internal arithmetic keeps
/// full floating-point precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_display_rounding() {
        assert_eq!(round2(10.666_666_7), 10.67);
        assert_eq!(round2(9.994_9), 9.99);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn result_serde_roundtrip() {
        let result = CalculationResult {
            scope: Scope::Annual,
            subject_averages: vec![SubjectAverage {
                subject: "Anatomie".into(),
                coefficient: 3,
                average: 11.75,
                standing: Standing::Passing,
            }],
            overall_average: Some(11.75),
            decision: Decision::Pass,
            status: "Pass".into(),
            warnings: vec![],
            eligible_hospitals: vec![],
        };
        let json = serde_json::to_string(&result).unwrap();
        let loaded: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, result);
    }
}
