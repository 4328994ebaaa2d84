//! The `carnet check` command.

use std::path::PathBuf;

use anyhow::Result;

use carnet_core::calculator::validate_for_scope;
use carnet_core::parser::parse_grades;

use crate::config::load_config_from;

use super::{parse_scope, resolve_policy};

pub fn execute(
    policy_arg: Option<String>,
    grades_path: PathBuf,
    scope: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let policy = resolve_policy(policy_arg.as_deref(), &config)?;
    let scope = parse_scope(&scope)?;
    let sheet = parse_grades(&grades_path)?;

    let missing = validate_for_scope(&policy, scope, &sheet.grades);
    if missing.is_empty() {
        println!("All required grades present for {scope}.");
    } else {
        println!("{} missing grade(s) for {scope}:", missing.len());
        for m in &missing {
            println!("  {m}");
        }
    }

    Ok(())
}
