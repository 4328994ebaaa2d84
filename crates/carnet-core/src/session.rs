//! Calculation session with whole-snapshot JSON persistence.
//!
//! A session owns the grade store and the last computed result for one
//! policy. Persistence is a single JSON document read once at session start
//! and written after mutations; last write wins, no partial writes.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculator::{self, MissingGrade};
use crate::grades::GradeStore;
use crate::model::{Policy, Scope};
use crate::results::CalculationResult;

/// Outcome of a calculation request. Missing inputs block the calculation;
/// they are a value, never a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationOutcome {
    Computed(CalculationResult),
    /// The validation gate failed; every missing field is listed.
    Blocked(Vec<MissingGrade>),
}

/// One student's calculation session for a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Id of the policy this session calculates against.
    pub policy_id: String,
    /// Optional student label for display and reports.
    #[serde(default)]
    pub student: Option<String>,
    /// The active calculation scope.
    pub scope: Scope,
    /// Recorded grades.
    #[serde(default)]
    pub grades: GradeStore,
    /// Last computed result, if any.
    #[serde(default)]
    pub result: Option<CalculationResult>,
}

impl Session {
    pub fn new(policy_id: impl Into<String>, scope: Scope) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            policy_id: policy_id.into(),
            student: None,
            scope,
            grades: GradeStore::new(),
            result: None,
        }
    }

    /// Change the calculation scope. The previous result belongs to the old
    /// scope and is dropped.
    pub fn set_scope(&mut self, scope: Scope) {
        if self.scope != scope {
            self.scope = scope;
            self.result = None;
        }
    }

    /// Record raw input for a grade slot (see [`GradeStore::set`]).
    pub fn set_grade(&mut self, subject: &str, period: &str, raw: &str) {
        self.grades.set(subject, period, raw);
    }

    /// Clamp a grade slot into range (see [`GradeStore::commit`]).
    pub fn commit_grade(&mut self, subject: &str, period: &str) {
        self.grades.commit(subject, period);
    }

    /// Run the validation gate, then the calculator.
    ///
    /// With required inputs missing the calculation is blocked and the stored
    /// result cleared; otherwise the result is recomputed in full and stored.
    pub fn calculate(&mut self, policy: &Policy) -> CalculationOutcome {
        if policy.id != self.policy_id {
            tracing::warn!(
                session_policy = %self.policy_id,
                policy = %policy.id,
                "calculating with a policy that does not match the session"
            );
        }

        let missing = calculator::validate_for_scope(policy, self.scope, &self.grades);
        if !missing.is_empty() {
            self.result = None;
            return CalculationOutcome::Blocked(missing);
        }

        let result = calculator::compute_scope(policy, self.scope, &self.grades);
        self.result = Some(result.clone());
        CalculationOutcome::Computed(result)
    }

    /// Clear grades, result, and validation state atomically.
    pub fn reset(&mut self) {
        self.grades.clear();
        self.result = None;
    }

    /// Save the session as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize session")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write session to {}", path.display()))?;
        tracing::debug!(path = %path.display(), "session saved");
        Ok(())
    }

    /// Load a session from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session from {}", path.display()))?;
        let session: Session =
            serde_json::from_str(&content).context("failed to parse session JSON")?;
        Ok(session)
    }
}
