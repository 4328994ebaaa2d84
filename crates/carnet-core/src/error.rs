//! Policy error types.
//!
//! These errors represent structural defects of a curriculum policy. They are
//! typed in `carnet-core` so callers can point at the offending subject
//! without string matching.

use thiserror::Error;

/// Structural defects detected when building or validating a [`Policy`].
///
/// [`Policy`]: crate::model::Policy
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy has an empty id.
    #[error("policy id is empty")]
    EmptyId,

    /// The policy defines no subjects at all.
    #[error("policy '{0}' defines no subjects")]
    NoSubjects(String),

    /// The same subject name appears twice.
    #[error("duplicate subject '{subject}' in policy '{policy}'")]
    DuplicateSubject { policy: String, subject: String },

    /// A subject has coefficient zero.
    #[error("subject '{subject}' has coefficient 0")]
    ZeroCoefficient { subject: String },

    /// A composite rule lists no part grades.
    #[error("subject '{subject}' uses a composite rule with no parts")]
    EmptyComposite { subject: String },

    /// A composite rule has a zero exam or parts weight.
    #[error("subject '{subject}' uses a composite rule with a zero weight")]
    ZeroWeight { subject: String },

    /// The retake floor and pass mark are not ordered within the 0-20 scale.
    #[error(
        "policy '{policy}' has invalid thresholds: floor {floor} and pass mark {pass_mark} \
         must satisfy 0 <= floor < pass mark <= 20"
    )]
    InvalidThresholds {
        policy: String,
        floor: f64,
        pass_mark: f64,
    },

    /// A hospital tier's minimum qualifying average is off the grading scale.
    #[error("hospital '{name}' has minimum average {min_average} outside the 0-20 scale")]
    HospitalOffScale { name: String, min_average: f64 },
}

impl PolicyError {
    /// Returns the offending subject name, if this error is subject-level.
    pub fn subject(&self) -> Option<&str> {
        match self {
            PolicyError::DuplicateSubject { subject, .. }
            | PolicyError::ZeroCoefficient { subject }
            | PolicyError::EmptyComposite { subject }
            | PolicyError::ZeroWeight { subject } => Some(subject),
            _ => None,
        }
    }
}
