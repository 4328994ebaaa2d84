//! The `carnet init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create carnet.toml
    if std::path::Path::new("carnet.toml").exists() {
        println!("carnet.toml already exists, skipping.");
    } else {
        std::fs::write("carnet.toml", SAMPLE_CONFIG)?;
        println!("Created carnet.toml");
    }

    // Create example grades file
    std::fs::create_dir_all("grades")?;
    let example_path = std::path::Path::new("grades/example.toml");
    if example_path.exists() {
        println!("grades/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_GRADES)?;
        println!("Created grades/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit grades/example.toml with your grades");
    println!("  2. Run: carnet policies");
    println!("  3. Run: carnet compute --grades grades/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# carnet configuration

default_policy = "alger-med1"
output_dir = "./carnet-results"
# student = "A. Benali"
"#;

const EXAMPLE_GRADES: &str = r#"# Example grade sheet for the alger-med1 policy.
# Period ids per averaging rule: s1/s2 for two-semester and semester
# subjects, note for single exams, exam plus part names for composites.
# Values may be numbers or strings; "12,5" is read as 12.5.

student = "A. Benali"

[grades.Anatomie]
s1 = 12.5
s2 = 11.0

[grades.Biochimie]
s1 = 10.5
s2 = 9.75

[grades.Cytologie]
s1 = 13.0

[grades.Embryologie]
s2 = 11.5

[grades.Biophysique]
exam = 10.0
td_biophysique = 12.0

[grades.Biostatistique]
note = 14.0

[grades."Santé, Société, Humanité"]
note = 12.0
"#;
