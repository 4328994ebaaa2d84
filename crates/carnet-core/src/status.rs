//! Status and warning derivation.
//!
//! Turns the computed subject averages and overall average into a pass/retake
//! decision plus ordered human-readable warnings, applying the variant knobs
//! a policy carries (semester advisories, hospital eligibility table).

use crate::model::{Policy, Scope};
use crate::results::{Decision, Standing, SubjectAverage};

/// Decision, wording, and warnings for one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSummary {
    pub decision: Decision,
    pub status: String,
    pub warnings: Vec<String>,
    pub eligible_hospitals: Vec<String>,
}

/// Derive the overall decision and warnings for a computed scope.
///
/// The common shape across variants:
/// - overall below the pass mark is a retake, whatever the buckets;
/// - a subject below the hard floor forces a retake even when the overall
///   average passes (no compensation below the floor);
/// - otherwise the result passes, worded by the policy's labels.
pub fn derive(
    policy: &Policy,
    scope: Scope,
    averages: &[SubjectAverage],
    overall: Option<f64>,
) -> StatusSummary {
    let any_mandatory = averages
        .iter()
        .any(|s| s.standing == Standing::MandatoryRetake);

    let decision = match overall {
        Some(o) if o >= policy.pass_mark && !any_mandatory => Decision::Pass,
        _ => Decision::Retake,
    };

    let status = match decision {
        Decision::Pass => policy.pass_label.clone(),
        Decision::Retake => policy.retake_label.clone(),
    };

    let warnings = if policy.semester_advisories && scope != Scope::Annual {
        semester_advisories(policy, averages)
    } else {
        bucket_warnings(averages)
    };

    let eligible_hospitals = match (decision, scope, overall) {
        (Decision::Pass, Scope::Annual, Some(o)) => eligible_hospitals(policy, o),
        _ => Vec::new(),
    };

    StatusSummary {
        decision,
        status,
        warnings,
        eligible_hospitals,
    }
}

/// Standard warnings: every mandatory-retake subject, then every compensable
/// one, each bucket in policy order.
fn bucket_warnings(averages: &[SubjectAverage]) -> Vec<String> {
    let mut warnings = Vec::new();
    for s in averages {
        if s.standing == Standing::MandatoryRetake {
            warnings.push(format!("mandatory retake for {}", s.subject));
        }
    }
    for s in averages {
        if s.standing == Standing::CompensableRetake {
            warnings.push(format!("optional retake for {}", s.subject));
        }
    }
    warnings
}

/// Semester-scope advisory variant: a sub-floor grade in a designated
/// eliminatory subject is terminal on its own; any other below-pass grade
/// must be offset in the other semester.
fn semester_advisories(policy: &Policy, averages: &[SubjectAverage]) -> Vec<String> {
    let mut warnings = Vec::new();
    for s in averages {
        if s.standing == Standing::Passing {
            continue;
        }
        let eliminatory = policy.subject(&s.subject).is_some_and(|sub| sub.eliminatory);
        if eliminatory && s.standing == Standing::MandatoryRetake {
            warnings.push(format!("direct mandatory retake for {}", s.subject));
        } else {
            warnings.push(format!(
                "danger: compensation required in the other semester for {}",
                s.subject
            ));
        }
    }
    warnings
}

/// Every hospital whose minimum qualifying average the overall reaches, in
/// table order. A threshold lookup only; no capacities, no competition.
fn eligible_hospitals(policy: &Policy, overall: f64) -> Vec<String> {
    policy
        .hospitals
        .iter()
        .filter(|tier| tier.min_average <= overall)
        .map(|tier| tier.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AveragingRule, HospitalTier, PartialAnnualRule, Subject};

    fn policy(semester_advisories: bool) -> Policy {
        Policy {
            id: "test-med1".into(),
            name: "Test".into(),
            academic_year: "2023/2024".into(),
            pass_mark: 10.0,
            retake_floor: 5.0,
            pass_label: "Admis".into(),
            retake_label: "Rattrapage".into(),
            semester_advisories,
            partial_annual: PartialAnnualRule::Exclude,
            subjects: vec![
                Subject {
                    name: "Anatomie".into(),
                    coefficient: 3,
                    eliminatory: true,
                    rule: AveragingRule::TwoSemester,
                },
                Subject {
                    name: "Histologie".into(),
                    coefficient: 2,
                    eliminatory: false,
                    rule: AveragingRule::TwoSemester,
                },
            ],
            hospitals: vec![],
        }
    }

    fn avg(subject: &str, average: f64, standing: Standing) -> SubjectAverage {
        SubjectAverage {
            subject: subject.into(),
            coefficient: 2,
            average,
            standing,
        }
    }

    #[test]
    fn passing_overall_with_clean_subjects_passes() {
        let summary = derive(
            &policy(false),
            Scope::Annual,
            &[avg("Anatomie", 12.0, Standing::Passing)],
            Some(12.0),
        );
        assert_eq!(summary.decision, Decision::Pass);
        assert_eq!(summary.status, "Admis");
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn sub_floor_subject_blocks_compensation() {
        let summary = derive(
            &policy(false),
            Scope::Annual,
            &[
                avg("Anatomie", 4.0, Standing::MandatoryRetake),
                avg("Histologie", 16.5, Standing::Passing),
            ],
            Some(11.5),
        );
        assert_eq!(summary.decision, Decision::Retake);
        assert_eq!(summary.warnings, vec!["mandatory retake for Anatomie"]);
    }

    #[test]
    fn warnings_order_mandatory_then_optional() {
        let summary = derive(
            &policy(false),
            Scope::Annual,
            &[
                avg("Anatomie", 7.0, Standing::CompensableRetake),
                avg("Histologie", 3.0, Standing::MandatoryRetake),
            ],
            Some(5.0),
        );
        assert_eq!(
            summary.warnings,
            vec![
                "mandatory retake for Histologie",
                "optional retake for Anatomie",
            ]
        );
    }

    #[test]
    fn advisories_only_apply_to_semester_scopes() {
        let averages = [
            avg("Anatomie", 4.0, Standing::MandatoryRetake),
            avg("Histologie", 8.0, Standing::CompensableRetake),
        ];

        let semester = derive(&policy(true), Scope::Semester1, &averages, Some(5.6));
        assert_eq!(
            semester.warnings,
            vec![
                "direct mandatory retake for Anatomie",
                "danger: compensation required in the other semester for Histologie",
            ]
        );

        let annual = derive(&policy(true), Scope::Annual, &averages, Some(5.6));
        assert_eq!(
            annual.warnings,
            vec![
                "mandatory retake for Anatomie",
                "optional retake for Histologie",
            ]
        );
    }

    #[test]
    fn non_eliminatory_sub_floor_is_a_danger_advisory() {
        let summary = derive(
            &policy(true),
            Scope::Semester2,
            &[avg("Histologie", 3.0, Standing::MandatoryRetake)],
            Some(3.0),
        );
        assert_eq!(
            summary.warnings,
            vec!["danger: compensation required in the other semester for Histologie"]
        );
    }

    #[test]
    fn hospital_eligibility_requires_passing_annual() {
        let mut p = policy(false);
        p.hospitals = vec![
            HospitalTier {
                name: "CHU Ben Badis".into(),
                min_average: 14.0,
            },
            HospitalTier {
                name: "EHS Daksi".into(),
                min_average: 12.0,
            },
        ];

        let passing = derive(
            &p,
            Scope::Annual,
            &[avg("Anatomie", 13.0, Standing::Passing)],
            Some(13.0),
        );
        assert_eq!(passing.eligible_hospitals, vec!["EHS Daksi"]);

        let retake = derive(
            &p,
            Scope::Annual,
            &[avg("Anatomie", 9.0, Standing::CompensableRetake)],
            Some(9.0),
        );
        assert!(retake.eligible_hospitals.is_empty());

        let semester = derive(
            &p,
            Scope::Semester1,
            &[avg("Anatomie", 13.0, Standing::Passing)],
            Some(13.0),
        );
        assert!(semester.eligible_hospitals.is_empty());
    }

    #[test]
    fn no_averages_means_retake_with_no_warnings() {
        let summary = derive(&policy(false), Scope::Annual, &[], None);
        assert_eq!(summary.decision, Decision::Retake);
        assert!(summary.warnings.is_empty());
    }
}
