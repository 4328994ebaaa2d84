//! The average calculator: per-subject averages, weighted overall average,
//! and the validation gate.
//!
//! Everything here is a pure function of (policy, scope, grade store).
//! Subjects lacking required inputs are tolerated by omission rather than by
//! erroring; the validation gate exists so callers can block calculation
//! while inputs are incomplete.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grades::GradeStore;
use crate::model::{AveragingRule, PartialAnnualRule, Policy, Scope, Subject};
use crate::results::{CalculationResult, Standing, SubjectAverage};
use crate::status;

/// A required (subject, period) pair with no recorded grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingGrade {
    pub subject: String,
    pub period: String,
}

impl fmt::Display for MissingGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.subject, self.period)
    }
}

/// List every missing required (subject, period) pair for `scope`, in policy
/// order. Calculation should be blocked while this is non-empty; all missing
/// fields are reported at once, not just the first.
///
/// Under [`PartialAnnualRule::UseAvailable`] a two-semester subject in annual
/// scope is satisfied by either semester grade; with neither present, both
/// slots are reported.
pub fn validate_for_scope(policy: &Policy, scope: Scope, grades: &GradeStore) -> Vec<MissingGrade> {
    let mut missing = Vec::new();
    for subject in policy.subjects_in_scope(scope) {
        let tolerate_half = scope == Scope::Annual
            && subject.rule == AveragingRule::TwoSemester
            && policy.partial_annual == PartialAnnualRule::UseAvailable;
        if tolerate_half
            && (grades.get(&subject.name, "s1").is_some()
                || grades.get(&subject.name, "s2").is_some())
        {
            continue;
        }
        for period in subject.rule.period_ids(scope) {
            if grades.get(&subject.name, &period).is_none() {
                missing.push(MissingGrade {
                    subject: subject.name.clone(),
                    period,
                });
            }
        }
    }
    missing
}

/// Compute one subject's average for `scope` per its averaging rule, or
/// `None` when the recorded grades are insufficient.
pub fn subject_average(
    policy: &Policy,
    subject: &Subject,
    scope: Scope,
    grades: &GradeStore,
) -> Option<f64> {
    match &subject.rule {
        AveragingRule::TwoSemester => match scope {
            Scope::Semester1 => grades.get(&subject.name, "s1"),
            Scope::Semester2 => grades.get(&subject.name, "s2"),
            Scope::Annual => {
                let s1 = grades.get(&subject.name, "s1");
                let s2 = grades.get(&subject.name, "s2");
                match (s1, s2) {
                    (Some(a), Some(b)) => Some((a + b) / 2.0),
                    (Some(v), None) | (None, Some(v)) => match policy.partial_annual {
                        PartialAnnualRule::UseAvailable => Some(v),
                        PartialAnnualRule::Exclude => None,
                    },
                    (None, None) => None,
                }
            }
        },
        AveragingRule::SingleExam => grades.get(&subject.name, "note"),
        AveragingRule::SemesterExam { semester } => {
            grades.get(&subject.name, semester.period_id())
        }
        AveragingRule::Composite {
            exam_weight,
            parts,
            parts_weight,
            ..
        } => {
            let exam = grades.get(&subject.name, "exam")?;
            let mut sum = 0.0;
            for part in parts {
                sum += grades.get(&subject.name, part)?;
            }
            let parts_mean = sum / parts.len() as f64;
            let total_weight = (*exam_weight + *parts_weight) as f64;
            Some(
                (exam * *exam_weight as f64 + parts_mean * *parts_weight as f64) / total_weight,
            )
        }
    }
}

/// Classify a subject average against the policy thresholds. Both boundaries
/// are inclusive on the passing side: exactly the floor is compensable, not
/// mandatory; exactly the pass mark is passing.
pub fn classify(policy: &Policy, average: f64) -> Standing {
    if average < policy.retake_floor {
        Standing::MandatoryRetake
    } else if average < policy.pass_mark {
        Standing::CompensableRetake
    } else {
        Standing::Passing
    }
}

/// Coefficient-weighted mean over the computed subject averages. Subjects
/// with no defined average are excluded from numerator and denominator, not
/// treated as zero.
fn weighted_overall(averages: &[SubjectAverage]) -> Option<f64> {
    if averages.is_empty() {
        return None;
    }
    let weighted_sum: f64 = averages
        .iter()
        .map(|s| s.average * s.coefficient as f64)
        .sum();
    let total_coefficient: f64 = averages.iter().map(|s| s.coefficient as f64).sum();
    Some(weighted_sum / total_coefficient)
}

/// Run a full calculation for `scope`: subject averages, overall average,
/// decision, warnings, and hospital eligibility.
///
/// Pure and idempotent; the result is rebuilt whole on every call. Subjects
/// with insufficient inputs are omitted (the validation gate prevents that
/// case when used, but the calculator tolerates it).
pub fn compute_scope(policy: &Policy, scope: Scope, grades: &GradeStore) -> CalculationResult {
    let mut subject_averages = Vec::new();
    for subject in policy.subjects_in_scope(scope) {
        match subject_average(policy, subject, scope, grades) {
            Some(average) => subject_averages.push(SubjectAverage {
                subject: subject.name.clone(),
                coefficient: subject.coefficient,
                average,
                standing: classify(policy, average),
            }),
            None => {
                tracing::debug!(subject = %subject.name, scope = %scope, "insufficient inputs, subject omitted");
            }
        }
    }

    let overall_average = weighted_overall(&subject_averages);
    let summary = status::derive(policy, scope, &subject_averages, overall_average);

    CalculationResult {
        scope,
        subject_averages,
        overall_average,
        decision: summary.decision,
        status: summary.status,
        warnings: summary.warnings,
        eligible_hospitals: summary.eligible_hospitals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HospitalTier, Semester};
    use crate::results::Decision;

    fn subject(name: &str, coefficient: u32, rule: AveragingRule) -> Subject {
        Subject {
            name: name.into(),
            coefficient,
            eliminatory: false,
            rule,
        }
    }

    fn policy_with(subjects: Vec<Subject>) -> Policy {
        Policy {
            id: "test-med1".into(),
            name: "Test".into(),
            academic_year: "2023/2024".into(),
            pass_mark: 10.0,
            retake_floor: 5.0,
            pass_label: "Pass".into(),
            retake_label: "Retake".into(),
            semester_advisories: false,
            partial_annual: PartialAnnualRule::Exclude,
            subjects,
            hospitals: vec![],
        }
    }

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn two_period_average_scenario() {
        // coefficient 2, sem1=12, sem2=8 -> 10.00
        let policy = policy_with(vec![subject("Anatomie", 2, AveragingRule::TwoSemester)]);
        let mut grades = GradeStore::new();
        grades.insert("Anatomie", "s1", 12.0);
        grades.insert("Anatomie", "s2", 8.0);

        let result = compute_scope(&policy, Scope::Annual, &grades);
        approx(result.subject_average("Anatomie").unwrap(), 10.0);
        approx(result.overall_average.unwrap(), 10.0);
        assert_eq!(result.decision, Decision::Pass);
    }

    #[test]
    fn composite_average_scenario() {
        // exam=10 (x4), parts mean of (8, 12, 10)=10 -> (10*4 + 10)/5 = 10.00
        let policy = policy_with(vec![subject(
            "Physiologie",
            3,
            AveragingRule::Composite {
                exam_weight: 4,
                parts: vec![
                    "tp_anatomie".into(),
                    "tp_histologie".into(),
                    "td_physiologie".into(),
                ],
                parts_weight: 1,
                semester: None,
            },
        )]);
        let mut grades = GradeStore::new();
        grades.insert("Physiologie", "exam", 10.0);
        grades.insert("Physiologie", "tp_anatomie", 8.0);
        grades.insert("Physiologie", "tp_histologie", 12.0);
        grades.insert("Physiologie", "td_physiologie", 10.0);

        let result = compute_scope(&policy, Scope::Annual, &grades);
        approx(result.subject_average("Physiologie").unwrap(), 10.0);
    }

    #[test]
    fn exam_times_two_plus_td_composite() {
        let policy = policy_with(vec![subject(
            "Biophysique",
            2,
            AveragingRule::Composite {
                exam_weight: 2,
                parts: vec!["td_biophysique".into()],
                parts_weight: 1,
                semester: None,
            },
        )]);
        let mut grades = GradeStore::new();
        grades.insert("Biophysique", "exam", 10.0);
        grades.insert("Biophysique", "td_biophysique", 13.0);

        let result = compute_scope(&policy, Scope::Annual, &grades);
        approx(result.subject_average("Biophysique").unwrap(), 11.0);
    }

    #[test]
    fn overall_is_weighted_and_bounded() {
        let policy = policy_with(vec![
            subject("Anatomie", 3, AveragingRule::TwoSemester),
            subject("Biostatistique", 1, AveragingRule::SingleExam),
        ]);
        let mut grades = GradeStore::new();
        grades.insert("Anatomie", "s1", 14.0);
        grades.insert("Anatomie", "s2", 12.0);
        grades.insert("Biostatistique", "note", 7.0);

        let result = compute_scope(&policy, Scope::Annual, &grades);
        // (13*3 + 7*1) / 4
        approx(result.overall_average.unwrap(), 11.5);

        // Jensen-style sanity bound: overall lies between min and max subject average.
        let averages: Vec<f64> = result.subject_averages.iter().map(|s| s.average).collect();
        let min = averages.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = averages.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let overall = result.overall_average.unwrap();
        assert!(overall >= min && overall <= max);
    }

    #[test]
    fn undefined_averages_excluded_from_both_sides() {
        let policy = policy_with(vec![
            subject("Anatomie", 3, AveragingRule::TwoSemester),
            subject("Biochimie", 2, AveragingRule::TwoSemester),
        ]);
        let mut grades = GradeStore::new();
        grades.insert("Anatomie", "s1", 12.0);
        grades.insert("Anatomie", "s2", 12.0);
        // Biochimie has no grades: excluded, not counted as zero.

        let result = compute_scope(&policy, Scope::Annual, &grades);
        assert_eq!(result.subject_averages.len(), 1);
        approx(result.overall_average.unwrap(), 12.0);
    }

    #[test]
    fn partial_annual_exclude_vs_use_available() {
        let mut policy = policy_with(vec![subject("Anatomie", 2, AveragingRule::TwoSemester)]);
        let mut grades = GradeStore::new();
        grades.insert("Anatomie", "s1", 14.0);

        policy.partial_annual = PartialAnnualRule::Exclude;
        let excluded = compute_scope(&policy, Scope::Annual, &grades);
        assert!(excluded.subject_averages.is_empty());
        assert_eq!(excluded.overall_average, None);

        policy.partial_annual = PartialAnnualRule::UseAvailable;
        let used = compute_scope(&policy, Scope::Annual, &grades);
        approx(used.subject_average("Anatomie").unwrap(), 14.0);
    }

    #[test]
    fn threshold_boundaries_are_passing_side_inclusive() {
        let policy = policy_with(vec![subject("X", 1, AveragingRule::SingleExam)]);
        approx_standing(&policy, 5.0, Standing::CompensableRetake);
        approx_standing(&policy, 4.999, Standing::MandatoryRetake);
        approx_standing(&policy, 10.0, Standing::Passing);
        approx_standing(&policy, 9.999, Standing::CompensableRetake);
    }

    fn approx_standing(policy: &Policy, average: f64, expected: Standing) {
        assert_eq!(classify(policy, average), expected, "for average {average}");
    }

    #[test]
    fn overall_exactly_at_pass_mark_passes() {
        let policy = policy_with(vec![subject("X", 1, AveragingRule::SingleExam)]);
        let mut grades = GradeStore::new();
        grades.insert("X", "note", 10.0);
        let result = compute_scope(&policy, Scope::Annual, &grades);
        assert_eq!(result.decision, Decision::Pass);
    }

    #[test]
    fn compute_is_idempotent() {
        let policy = policy_with(vec![
            subject("Anatomie", 3, AveragingRule::TwoSemester),
            subject(
                "Biophysique",
                2,
                AveragingRule::Composite {
                    exam_weight: 2,
                    parts: vec!["td_biophysique".into()],
                    parts_weight: 1,
                    semester: None,
                },
            ),
        ]);
        let mut grades = GradeStore::new();
        grades.insert("Anatomie", "s1", 11.0);
        grades.insert("Anatomie", "s2", 9.5);
        grades.insert("Biophysique", "exam", 8.0);
        grades.insert("Biophysique", "td_biophysique", 12.0);

        let first = compute_scope(&policy, Scope::Annual, &grades);
        let second = compute_scope(&policy, Scope::Annual, &grades);
        assert_eq!(first, second);
    }

    #[test]
    fn validation_lists_all_missing_fields_at_once() {
        let policy = policy_with(vec![
            subject("Anatomie", 3, AveragingRule::TwoSemester),
            subject("Biostatistique", 1, AveragingRule::SingleExam),
        ]);
        let mut grades = GradeStore::new();
        grades.insert("Anatomie", "s1", 12.0);

        let missing = validate_for_scope(&policy, Scope::Annual, &grades);
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0].subject, "Anatomie");
        assert_eq!(missing[0].period, "s2");
        assert_eq!(missing[1].subject, "Biostatistique");
        assert_eq!(missing[1].period, "note");
    }

    #[test]
    fn validation_respects_use_available() {
        let mut policy = policy_with(vec![subject("Anatomie", 2, AveragingRule::TwoSemester)]);
        policy.partial_annual = PartialAnnualRule::UseAvailable;

        let mut grades = GradeStore::new();
        assert_eq!(validate_for_scope(&policy, Scope::Annual, &grades).len(), 2);

        grades.insert("Anatomie", "s2", 9.0);
        assert!(validate_for_scope(&policy, Scope::Annual, &grades).is_empty());
    }

    #[test]
    fn validation_ignores_out_of_scope_subjects() {
        let policy = policy_with(vec![
            subject(
                "Cytologie",
                2,
                AveragingRule::SemesterExam {
                    semester: Semester::First,
                },
            ),
            subject("Biostatistique", 1, AveragingRule::SingleExam),
        ]);
        let grades = GradeStore::new();

        // Semester 2 has no in-scope subjects here, nothing to require.
        assert!(validate_for_scope(&policy, Scope::Semester2, &grades).is_empty());
        assert_eq!(validate_for_scope(&policy, Scope::Annual, &grades).len(), 2);
    }

    #[test]
    fn retake_with_mandatory_warning_scenario() {
        // coefficients 2 and 2, averages 3.0 and 12.0 -> overall 7.5, Retake,
        // exactly one mandatory-retake warning.
        let policy = policy_with(vec![
            subject("Anatomie", 2, AveragingRule::SingleExam),
            subject("Biochimie", 2, AveragingRule::SingleExam),
        ]);
        // SingleExam participates in annual scope only.
        let mut grades = GradeStore::new();
        grades.insert("Anatomie", "note", 3.0);
        grades.insert("Biochimie", "note", 12.0);

        let result = compute_scope(&policy, Scope::Annual, &grades);
        approx(result.overall_average.unwrap(), 7.5);
        assert_eq!(result.decision, Decision::Retake);
        assert_eq!(result.warnings, vec!["mandatory retake for Anatomie"]);
    }

    #[test]
    fn hospital_eligibility_threshold_lookup() {
        let mut policy = policy_with(vec![subject("X", 2, AveragingRule::SingleExam)]);
        policy.hospitals = vec![
            HospitalTier {
                name: "A".into(),
                min_average: 14.0,
            },
            HospitalTier {
                name: "B".into(),
                min_average: 13.8,
            },
            HospitalTier {
                name: "C".into(),
                min_average: 13.2,
            },
        ];
        let mut grades = GradeStore::new();
        grades.insert("X", "note", 13.5);

        let result = compute_scope(&policy, Scope::Annual, &grades);
        assert_eq!(result.eligible_hospitals, vec!["C"]);
    }
}
