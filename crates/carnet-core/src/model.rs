//! Core data model types for carnet.
//!
//! These are the fundamental types the entire carnet system uses to represent
//! curriculum policies: subjects, coefficients, averaging rules, and the
//! calculation scopes they apply to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PolicyError;

/// One of the two teaching semesters of an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    First,
    Second,
}

impl Semester {
    /// The period id under which this semester's grade is stored.
    pub fn period_id(self) -> &'static str {
        match self {
            Semester::First => "s1",
            Semester::Second => "s2",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semester::First => write!(f, "semester 1"),
            Semester::Second => write!(f, "semester 2"),
        }
    }
}

impl FromStr for Semester {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s1" | "1" | "first" | "semester1" => Ok(Semester::First),
            "s2" | "2" | "second" | "semester2" => Ok(Semester::Second),
            other => Err(format!("unknown semester: {other}")),
        }
    }
}

/// The calculation window a result is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    Semester1,
    Semester2,
    Annual,
}

impl Scope {
    /// The semester this scope covers, or `None` for the annual scope.
    pub fn semester(self) -> Option<Semester> {
        match self {
            Scope::Semester1 => Some(Semester::First),
            Scope::Semester2 => Some(Semester::Second),
            Scope::Annual => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Semester1 => write!(f, "semester 1"),
            Scope::Semester2 => write!(f, "semester 2"),
            Scope::Annual => write!(f, "annual"),
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s1" | "sem1" | "semester1" | "semester-1" => Ok(Scope::Semester1),
            "s2" | "sem2" | "semester2" | "semester-2" => Ok(Scope::Semester2),
            "annual" | "year" | "annuel" => Ok(Scope::Annual),
            other => Err(format!("unknown scope: {other}")),
        }
    }
}

/// How a subject's average is computed from its recorded grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum AveragingRule {
    /// One grade per semester; the annual average is their mean.
    TwoSemester,
    /// A single grade for the whole year, stored under the `note` period id.
    SingleExam,
    /// A single grade counted only in its designated semester (and annually).
    SemesterExam { semester: Semester },
    /// Weighted combination of an `exam` grade and the mean of named part
    /// grades: `(exam * exam_weight + mean(parts) * parts_weight) /
    /// (exam_weight + parts_weight)`. A `semester` binds the subject to one
    /// semester; `None` means the subject is annual-only.
    Composite {
        exam_weight: u32,
        parts: Vec<String>,
        parts_weight: u32,
        semester: Option<Semester>,
    },
}

impl AveragingRule {
    /// Whether a subject with this rule participates in `scope`.
    pub fn in_scope(&self, scope: Scope) -> bool {
        match self {
            AveragingRule::TwoSemester => true,
            AveragingRule::SingleExam => scope == Scope::Annual,
            AveragingRule::SemesterExam { semester } => {
                scope == Scope::Annual || scope.semester() == Some(*semester)
            }
            AveragingRule::Composite { semester, .. } => match semester {
                Some(s) => scope == Scope::Annual || scope.semester() == Some(*s),
                None => scope == Scope::Annual,
            },
        }
    }

    /// The period ids this rule reads in `scope`.
    ///
    /// For the two-semester rule in annual scope this is both semesters; the
    /// policy's partial-annual setting decides whether both are actually
    /// required (see [`validate_for_scope`]).
    ///
    /// [`validate_for_scope`]: crate::calculator::validate_for_scope
    pub fn period_ids(&self, scope: Scope) -> Vec<String> {
        match self {
            AveragingRule::TwoSemester => match scope {
                Scope::Semester1 => vec!["s1".into()],
                Scope::Semester2 => vec!["s2".into()],
                Scope::Annual => vec!["s1".into(), "s2".into()],
            },
            AveragingRule::SingleExam => vec!["note".into()],
            AveragingRule::SemesterExam { semester } => vec![semester.period_id().into()],
            AveragingRule::Composite { parts, .. } => std::iter::once("exam".to_string())
                .chain(parts.iter().cloned())
                .collect(),
        }
    }
}

/// A subject of a curriculum policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject name, unique within the policy.
    pub name: String,
    /// Weight of this subject in the overall average.
    pub coefficient: u32,
    /// Whether a sub-floor grade in this subject is terminal on its own in
    /// semester-advisory variants.
    #[serde(default)]
    pub eliminatory: bool,
    /// How the subject average is computed.
    #[serde(flatten)]
    pub rule: AveragingRule,
}

/// How a two-semester subject with only one recorded semester behaves in the
/// annual scope. Variants differ on this, so it is a policy knob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartialAnnualRule {
    /// The subject is omitted from the annual average entirely.
    #[default]
    Exclude,
    /// The single available semester grade stands in for the annual average.
    UseAvailable,
}

impl FromStr for PartialAnnualRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exclude" => Ok(PartialAnnualRule::Exclude),
            "use-available" | "use_available" => Ok(PartialAnnualRule::UseAvailable),
            other => Err(format!("unknown partial-annual rule: {other}")),
        }
    }
}

/// A hospital with its minimum qualifying annual average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalTier {
    pub name: String,
    pub min_average: f64,
}

/// The fixed subject/coefficient/averaging-rule table for one university and
/// year curriculum variant. Immutable once built; selected before any
/// calculation begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Unique identifier (e.g. "alger-med1").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Academic year label (e.g. "2023/2024").
    #[serde(default)]
    pub academic_year: String,
    /// Overall average at or above which the year is passed.
    pub pass_mark: f64,
    /// Subject average below which a retake is mandatory.
    pub retake_floor: f64,
    /// Status wording for a passing result.
    pub pass_label: String,
    /// Status wording for a retake result.
    pub retake_label: String,
    /// Whether semester-scope results carry advisory warnings instead of the
    /// plain retake buckets.
    #[serde(default)]
    pub semester_advisories: bool,
    /// Annual-scope behavior for half-recorded two-semester subjects.
    #[serde(default)]
    pub partial_annual: PartialAnnualRule,
    /// Ordered subject table.
    pub subjects: Vec<Subject>,
    /// Ordered hospital eligibility table; empty when the variant has none.
    #[serde(default)]
    pub hospitals: Vec<HospitalTier>,
}

impl Policy {
    /// Check structural validity: non-empty id and subject table, unique
    /// subject names, positive coefficients and weights, ordered thresholds,
    /// hospital minimums on the grading scale.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.id.is_empty() {
            return Err(PolicyError::EmptyId);
        }
        if self.subjects.is_empty() {
            return Err(PolicyError::NoSubjects(self.id.clone()));
        }
        if !(0.0..=20.0).contains(&self.retake_floor)
            || !(0.0..=20.0).contains(&self.pass_mark)
            || self.retake_floor >= self.pass_mark
        {
            return Err(PolicyError::InvalidThresholds {
                policy: self.id.clone(),
                floor: self.retake_floor,
                pass_mark: self.pass_mark,
            });
        }

        let mut seen = std::collections::BTreeSet::new();
        for subject in &self.subjects {
            if !seen.insert(subject.name.as_str()) {
                return Err(PolicyError::DuplicateSubject {
                    policy: self.id.clone(),
                    subject: subject.name.clone(),
                });
            }
            if subject.coefficient == 0 {
                return Err(PolicyError::ZeroCoefficient {
                    subject: subject.name.clone(),
                });
            }
            if let AveragingRule::Composite {
                exam_weight,
                parts,
                parts_weight,
                ..
            } = &subject.rule
            {
                if parts.is_empty() || parts.iter().any(|p| p.is_empty()) {
                    return Err(PolicyError::EmptyComposite {
                        subject: subject.name.clone(),
                    });
                }
                if *exam_weight == 0 || *parts_weight == 0 {
                    return Err(PolicyError::ZeroWeight {
                        subject: subject.name.clone(),
                    });
                }
            }
        }

        for tier in &self.hospitals {
            if !(0.0..=20.0).contains(&tier.min_average) {
                return Err(PolicyError::HospitalOffScale {
                    name: tier.name.clone(),
                    min_average: tier.min_average,
                });
            }
        }

        Ok(())
    }

    /// Look up a subject by name.
    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    /// Subjects participating in `scope`, in policy order.
    pub fn subjects_in_scope(&self, scope: Scope) -> impl Iterator<Item = &Subject> {
        self.subjects.iter().filter(move |s| s.rule.in_scope(scope))
    }
}
