//! Built-in policy catalog.
//!
//! The curriculum variants shipped with carnet, embedded as TOML and parsed
//! through the same code path as user-provided policy files.

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::Policy;
use crate::parser::parse_policy_str;

const ALGER_MED1: &str = include_str!("../policies/alger-med1.toml");
const ORAN_MED1: &str = include_str!("../policies/oran-med1.toml");
const CONSTANTINE_MED1: &str = include_str!("../policies/constantine-med1.toml");
const SETIF_MED1: &str = include_str!("../policies/setif-med1.toml");

const BUILTINS: &[(&str, &str)] = &[
    ("alger-med1", ALGER_MED1),
    ("constantine-med1", CONSTANTINE_MED1),
    ("oran-med1", ORAN_MED1),
    ("setif-med1", SETIF_MED1),
];

/// Every built-in policy, sorted by id.
pub fn builtin_policies() -> Result<Vec<Policy>> {
    BUILTINS
        .iter()
        .map(|(id, content)| {
            parse_policy_str(content, Path::new(&format!("builtin:{id}")))
                .with_context(|| format!("built-in policy '{id}' failed to parse"))
        })
        .collect()
}

/// Look up a built-in policy by id.
pub fn find_builtin(id: &str) -> Result<Option<Policy>> {
    match BUILTINS.iter().find(|(builtin_id, _)| *builtin_id == id) {
        Some((builtin_id, content)) => {
            let policy = parse_policy_str(content, Path::new(&format!("builtin:{builtin_id}")))
                .with_context(|| format!("built-in policy '{builtin_id}' failed to parse"))?;
            Ok(Some(policy))
        }
        None => Ok(None),
    }
}
