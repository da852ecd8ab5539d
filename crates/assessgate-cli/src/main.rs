//! assessgate CLI: evaluate and lint candidate assessments from the shell.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "assessgate",
    version,
    about = "Assessment conditional-logic and validation engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a response snapshot against an assessment
    Evaluate {
        /// Path to a .json or .toml assessment
        #[arg(long)]
        assessment: PathBuf,

        /// Path to a JSON object of responses keyed by question id
        #[arg(long)]
        responses: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long)]
        format: Option<String>,

        /// Write the JSON report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the JSON report into the configured output directory
        #[arg(long)]
        save: bool,

        /// Exit code 1 if the assessment cannot be submitted
        #[arg(long)]
        fail_on_errors: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Lint assessment files
    Validate {
        /// Path to assessment file or directory
        #[arg(long)]
        assessment: PathBuf,
    },

    /// Create starter config and example assessment
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("assessgate=info".parse().unwrap())
                .add_directive("assessgate_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            assessment,
            responses,
            format,
            output,
            save,
            fail_on_errors,
            config,
        } => commands::evaluate::execute(commands::evaluate::EvaluateArgs {
            assessment,
            responses,
            format,
            output,
            save,
            fail_on_errors,
            config,
        }),
        Commands::Validate { assessment } => commands::validate::execute(assessment),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
