//! The `carnet policies` command.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use carnet_core::model::PartialAnnualRule;
use carnet_core::policies::builtin_policies;

pub fn execute() -> Result<()> {
    let policies = builtin_policies()?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Id",
        "Name",
        "Subjects",
        "Partial annual",
        "Advisories",
        "Hospitals",
    ]);

    for policy in &policies {
        table.add_row(vec![
            policy.id.clone(),
            policy.name.clone(),
            policy.subjects.len().to_string(),
            match policy.partial_annual {
                PartialAnnualRule::Exclude => "exclude".to_string(),
                PartialAnnualRule::UseAvailable => "use-available".to_string(),
            },
            if policy.semester_advisories { "yes" } else { "no" }.to_string(),
            policy.hospitals.len().to_string(),
        ]);
    }

    println!("{table}");
    println!("{} built-in policies.", policies.len());

    Ok(())
}
