//! HTML transcript generator.
//!
//! Produces a self-contained, printable HTML file with all CSS inlined.

use std::path::Path;

use anyhow::{Context, Result};

use carnet_core::model::Policy;
use carnet_core::results::{CalculationResult, Standing, round2};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate a printable HTML transcript from a computed result.
pub fn generate_html(policy: &Policy, result: &CalculationResult, student: Option<&str>) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>carnet transcript — {}</title>\n",
        html_escape(&policy.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Transcript</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} | {} | scope: {} | {}</p>\n",
        html_escape(&policy.name),
        html_escape(&policy.academic_year),
        result.scope,
        chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(student) = student {
        html.push_str(&format!(
            "<p class=\"student\">Student: <strong>{}</strong></p>\n",
            html_escape(student)
        ));
    }
    html.push_str("</header>\n");

    // Subject table
    html.push_str("<section class=\"subjects\">\n");
    html.push_str("<table>\n");
    html.push_str(
        "<thead><tr><th>Subject</th><th>Coefficient</th><th>Average</th><th>Standing</th></tr></thead>\n",
    );
    html.push_str("<tbody>\n");
    for s in &result.subject_averages {
        let class = match s.standing {
            Standing::Passing => "pass",
            Standing::CompensableRetake => "warn",
            Standing::MandatoryRetake => "fail",
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>\n",
            class,
            html_escape(&s.subject),
            s.coefficient,
            round2(s.average),
            s.standing,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Overall result
    html.push_str("<section class=\"overall\">\n");
    match result.overall_average {
        Some(overall) => {
            html.push_str(&format!(
                "<p class=\"average\">Overall average: <strong>{:.2}</strong> / 20</p>\n",
                round2(overall)
            ));
        }
        None => {
            html.push_str("<p class=\"average\">Overall average: not computable</p>\n");
        }
    }
    html.push_str(&format!(
        "<p class=\"status\">{}</p>\n",
        html_escape(&result.status)
    ));
    html.push_str("</section>\n");

    // Warnings
    if !result.warnings.is_empty() {
        html.push_str("<section class=\"warnings\">\n<h2>Warnings</h2>\n<ul>\n");
        for warning in &result.warnings {
            html.push_str(&format!("<li>{}</li>\n", html_escape(warning)));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Hospital eligibility
    if !result.eligible_hospitals.is_empty() {
        html.push_str("<section class=\"hospitals\">\n<h2>Eligible hospital assignments</h2>\n<ol>\n");
        for hospital in &result.eligible_hospitals {
            html.push_str(&format!("<li>{}</li>\n", html_escape(hospital)));
        }
        html.push_str("</ol>\n</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Generate the transcript and write it to `path`.
pub fn write_html(
    path: &Path,
    policy: &Policy,
    result: &CalculationResult,
    student: Option<&str>,
) -> Result<()> {
    let html = generate_html(policy, result, student);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write transcript to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
body {
  font-family: Georgia, 'Times New Roman', serif;
  max-width: 720px;
  margin: 2rem auto;
  padding: 0 1rem;
  color: #1a1a1a;
}
header { border-bottom: 2px solid #1a1a1a; padding-bottom: 0.5rem; }
h1 { margin: 0 0 0.25rem; font-size: 1.6rem; }
.meta, .student { margin: 0.15rem 0; color: #444; font-size: 0.9rem; }
table { width: 100%; border-collapse: collapse; margin: 1.25rem 0; }
th, td { border: 1px solid #999; padding: 0.4rem 0.6rem; text-align: left; }
th { background: #f0f0f0; }
tr.warn td { background: #fff8e1; }
tr.fail td { background: #fdecea; }
.overall .average { font-size: 1.1rem; }
.overall .status { font-size: 1.2rem; font-weight: bold; }
.warnings ul { margin: 0.25rem 0 0 1.25rem; }
.hospitals ol { margin: 0.25rem 0 0 1.25rem; }
@media print {
  body { margin: 0; max-width: none; }
  tr.warn td, tr.fail td { -webkit-print-color-adjust: exact; print-color-adjust: exact; }
}
"#;
