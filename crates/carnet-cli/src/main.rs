//! carnet CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "carnet", version, about = "Medical curriculum grade calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute averages and the pass/retake decision
    Compute {
        /// Built-in policy id or path to a policy .toml
        #[arg(long)]
        policy: Option<String>,

        /// Path to the grades .toml
        #[arg(long)]
        grades: PathBuf,

        /// Calculation scope: s1, s2, or annual
        #[arg(long, default_value = "annual")]
        scope: String,

        /// Student label shown on reports
        #[arg(long)]
        student: Option<String>,

        /// Output format: text, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Output path for the html format
        #[arg(long)]
        output: Option<PathBuf>,

        /// Save the session snapshot to this path after computing
        #[arg(long)]
        save: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List missing required grades for a scope
    Check {
        /// Built-in policy id or path to a policy .toml
        #[arg(long)]
        policy: Option<String>,

        /// Path to the grades .toml
        #[arg(long)]
        grades: PathBuf,

        /// Calculation scope: s1, s2, or annual
        #[arg(long, default_value = "annual")]
        scope: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate policy .toml files
    Validate {
        /// Path to a policy file or directory
        #[arg(long)]
        policy: PathBuf,
    },

    /// List the built-in policy catalog
    Policies,

    /// Create a starter config and example grades file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carnet=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compute {
            policy,
            grades,
            scope,
            student,
            format,
            output,
            save,
            config,
        } => commands::compute::execute(
            policy, grades, scope, student, format, output, save, config,
        ),
        Commands::Check {
            policy,
            grades,
            scope,
            config,
        } => commands::check::execute(policy, grades, scope, config),
        Commands::Validate { policy } => commands::validate::execute(policy),
        Commands::Policies => commands::policies::execute(),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
