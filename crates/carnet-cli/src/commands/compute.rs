//! The `carnet compute` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use carnet_core::model::Policy;
use carnet_core::parser::parse_grades;
use carnet_core::results::{round2, CalculationResult};
use carnet_core::session::{CalculationOutcome, Session};

use crate::config::load_config_from;

use super::{parse_scope, resolve_policy};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    policy_arg: Option<String>,
    grades_path: PathBuf,
    scope: String,
    student: Option<String>,
    format: String,
    output: Option<PathBuf>,
    save: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let policy = resolve_policy(policy_arg.as_deref(), &config)?;
    let scope = parse_scope(&scope)?;
    let sheet = parse_grades(&grades_path)?;
    let student = student.or(sheet.student).or(config.student);

    let mut session = Session::new(policy.id.clone(), scope);
    session.student = student.clone();
    session.grades = sheet.grades;

    let result = match session.calculate(&policy) {
        CalculationOutcome::Blocked(missing) => {
            println!("Calculation blocked: {} missing grade(s):", missing.len());
            for m in &missing {
                println!("  {m}");
            }
            std::process::exit(1);
        }
        CalculationOutcome::Computed(result) => result,
    };

    if let Some(save_path) = &save {
        session.save_json(save_path)?;
        println!("Session saved to {}", save_path.display());
    }

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "html" => {
            let path = output.unwrap_or_else(|| config.output_dir.join("transcript.html"));
            carnet_report::write_html(&path, &policy, &result, student.as_deref())?;
            println!("Transcript written to {}", path.display());
        }
        _ => {
            // text format
            print_text(&policy, &result);
        }
    }

    Ok(())
}

fn print_text(policy: &Policy, result: &CalculationResult) {
    println!("{} | {}", policy.name, result.scope);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Subject", "Coef", "Average", "Standing"]);
    for s in &result.subject_averages {
        table.add_row(vec![
            s.subject.clone(),
            s.coefficient.to_string(),
            format!("{:.2}", round2(s.average)),
            s.standing.to_string(),
        ]);
    }
    println!("{table}");

    match result.overall_average {
        Some(overall) => println!("Overall average: {:.2} / 20", round2(overall)),
        None => println!("Overall average: not computable"),
    }
    println!("Result: {}", result.status);

    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  - {warning}");
        }
    }

    if !result.eligible_hospitals.is_empty() {
        println!("\nEligible hospital assignments:");
        for (rank, hospital) in result.eligible_hospitals.iter().enumerate() {
            println!("  {}. {hospital}", rank + 1);
        }
    }
}
