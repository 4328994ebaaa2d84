//! TOML file parsers: curriculum policies and grade sheets.
//!
//! Policies are loaded from TOML files (a `[policy]` header plus
//! `[[subjects]]` and `[[hospitals]]` arrays) and checked structurally; a
//! separate lint pass reports non-fatal oddities.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::grades::GradeStore;
use crate::model::{AveragingRule, HospitalTier, PartialAnnualRule, Policy, Semester, Subject};

/// Intermediate TOML structure for parsing policy files.
#[derive(Debug, Deserialize)]
struct TomlPolicyFile {
    policy: TomlPolicyHeader,
    #[serde(default)]
    subjects: Vec<TomlSubject>,
    #[serde(default)]
    hospitals: Vec<TomlHospital>,
}

#[derive(Debug, Deserialize)]
struct TomlPolicyHeader {
    id: String,
    name: String,
    #[serde(default)]
    academic_year: String,
    #[serde(default = "default_pass_mark")]
    pass_mark: f64,
    #[serde(default = "default_retake_floor")]
    retake_floor: f64,
    #[serde(default = "default_pass_label")]
    pass_label: String,
    #[serde(default = "default_retake_label")]
    retake_label: String,
    #[serde(default)]
    semester_advisories: bool,
    #[serde(default = "default_partial_annual")]
    partial_annual: String,
}

fn default_pass_mark() -> f64 {
    10.0
}

fn default_retake_floor() -> f64 {
    5.0
}

fn default_pass_label() -> String {
    "Pass".to_string()
}

fn default_retake_label() -> String {
    "Retake".to_string()
}

fn default_partial_annual() -> String {
    "exclude".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlSubject {
    name: String,
    coefficient: u32,
    #[serde(default)]
    eliminatory: bool,
    rule: String,
    #[serde(default)]
    semester: Option<String>,
    #[serde(default)]
    exam_weight: Option<u32>,
    #[serde(default)]
    parts: Vec<String>,
    #[serde(default)]
    parts_weight: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TomlHospital {
    name: String,
    min_average: f64,
}

/// Parse a policy TOML file.
pub fn parse_policy(path: &Path) -> Result<Policy> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file: {}", path.display()))?;
    parse_policy_str(&content, path)
}

/// Parse a policy TOML string (useful for testing and embedded policies).
pub fn parse_policy_str(content: &str, source_path: &Path) -> Result<Policy> {
    let parsed: TomlPolicyFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let partial_annual: PartialAnnualRule = parsed
        .policy
        .partial_annual
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let subjects = parsed
        .subjects
        .into_iter()
        .map(build_subject)
        .collect::<Result<Vec<_>>>()?;

    let hospitals = parsed
        .hospitals
        .into_iter()
        .map(|h| HospitalTier {
            name: h.name,
            min_average: h.min_average,
        })
        .collect();

    let policy = Policy {
        id: parsed.policy.id,
        name: parsed.policy.name,
        academic_year: parsed.policy.academic_year,
        pass_mark: parsed.policy.pass_mark,
        retake_floor: parsed.policy.retake_floor,
        pass_label: parsed.policy.pass_label,
        retake_label: parsed.policy.retake_label,
        semester_advisories: parsed.policy.semester_advisories,
        partial_annual,
        subjects,
        hospitals,
    };

    policy
        .validate()
        .with_context(|| format!("invalid policy: {}", source_path.display()))?;

    Ok(policy)
}

fn build_subject(raw: TomlSubject) -> Result<Subject> {
    let semester = raw
        .semester
        .as_deref()
        .map(|s| {
            s.parse::<Semester>()
                .map_err(|e| anyhow::anyhow!("subject '{}': {}", raw.name, e))
        })
        .transpose()?;

    let rule = match raw.rule.as_str() {
        "two-semester" => AveragingRule::TwoSemester,
        "single" => AveragingRule::SingleExam,
        "semester" => AveragingRule::SemesterExam {
            semester: semester.with_context(|| {
                format!("subject '{}': semester rule requires a semester", raw.name)
            })?,
        },
        "composite" => AveragingRule::Composite {
            exam_weight: raw.exam_weight.unwrap_or(1),
            parts: raw.parts,
            parts_weight: raw.parts_weight.unwrap_or(1),
            semester,
        },
        other => anyhow::bail!("subject '{}': unknown averaging rule '{other}'", raw.name),
    };

    Ok(Subject {
        name: raw.name,
        coefficient: raw.coefficient,
        eliminatory: raw.eliminatory,
        rule,
    })
}

/// Load every `.toml` policy in a directory, sorted by id.
pub fn load_policy_directory(dir: &Path) -> Result<Vec<Policy>> {
    let mut policies = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read policy directory: {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            policies.push(parse_policy(&path)?);
        }
    }
    policies.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(policies)
}

/// A non-fatal oddity found while linting a policy.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The subject the warning is about, when subject-level.
    pub subject: Option<String>,
    pub message: String,
}

/// Lint a structurally valid policy for oddities worth flagging to the
/// policy author.
pub fn validate_policy(policy: &Policy) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if policy.academic_year.is_empty() {
        warnings.push(ValidationWarning {
            subject: None,
            message: "policy has no academic_year label".into(),
        });
    }

    if policy.subjects.len() == 1 {
        warnings.push(ValidationWarning {
            subject: None,
            message: "policy has a single subject; the overall average equals its average".into(),
        });
    }

    for subject in &policy.subjects {
        if subject.coefficient > 10 {
            warnings.push(ValidationWarning {
                subject: Some(subject.name.clone()),
                message: format!("unusually large coefficient {}", subject.coefficient),
            });
        }
        if subject.eliminatory && !policy.semester_advisories {
            warnings.push(ValidationWarning {
                subject: Some(subject.name.clone()),
                message: "eliminatory flag has no effect without semester_advisories".into(),
            });
        }
        if let AveragingRule::Composite { parts, .. } = &subject.rule {
            let mut seen = std::collections::BTreeSet::new();
            for part in parts {
                if !seen.insert(part.as_str()) {
                    warnings.push(ValidationWarning {
                        subject: Some(subject.name.clone()),
                        message: format!("part '{part}' listed more than once"),
                    });
                }
            }
        }
    }

    let descending = policy
        .hospitals
        .windows(2)
        .all(|w| w[0].min_average >= w[1].min_average);
    if !descending {
        warnings.push(ValidationWarning {
            subject: None,
            message: "hospital table is not in descending order of minimum average".into(),
        });
    }

    warnings
}

// ---------------------------------------------------------------------------
// Grade sheets
// ---------------------------------------------------------------------------

/// Intermediate TOML structure for grade sheets.
#[derive(Debug, Deserialize)]
struct TomlGradesFile {
    #[serde(default)]
    student: Option<String>,
    #[serde(default)]
    grades: BTreeMap<String, BTreeMap<String, toml::Value>>,
}

/// A parsed grade sheet: the optional student label and the committed store.
#[derive(Debug, Clone)]
pub struct GradeSheet {
    pub student: Option<String>,
    pub grades: GradeStore,
}

/// Parse a grade sheet TOML file.
pub fn parse_grades(path: &Path) -> Result<GradeSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read grades file: {}", path.display()))?;
    parse_grades_str(&content, path)
}

/// Parse a grade sheet TOML string.
///
/// Values may be numbers or raw strings; strings go through the same lenient
/// parse as interactive input (comma decimals, garbage treated as absent).
/// All values are committed, so out-of-range entries are clamped.
pub fn parse_grades_str(content: &str, source_path: &Path) -> Result<GradeSheet> {
    let parsed: TomlGradesFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut store = GradeStore::new();
    for (subject, periods) in &parsed.grades {
        for (period, value) in periods {
            match value {
                toml::Value::Float(v) => store.insert(subject, period, *v),
                toml::Value::Integer(v) => store.insert(subject, period, *v as f64),
                toml::Value::String(raw) => store.set(subject, period, raw),
                other => anyhow::bail!(
                    "grade for {subject}/{period} must be a number or string, got {}",
                    other.type_str()
                ),
            }
        }
    }
    store.commit_all();

    Ok(GradeSheet {
        student: parsed.student,
        grades: store,
    })
}
