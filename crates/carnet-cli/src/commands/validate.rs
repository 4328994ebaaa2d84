//! The `carnet validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(policy_path: PathBuf) -> Result<()> {
    let policies = if policy_path.is_dir() {
        carnet_core::parser::load_policy_directory(&policy_path)?
    } else {
        vec![carnet_core::parser::parse_policy(&policy_path)?]
    };

    let mut total_warnings = 0;

    for policy in &policies {
        println!("Policy: {} ({} subjects)", policy.name, policy.subjects.len());

        let warnings = carnet_core::parser::validate_policy(policy);
        for w in &warnings {
            let prefix = w
                .subject
                .as_ref()
                .map(|s| format!("  [{s}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All policies valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
