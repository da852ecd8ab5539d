//! The `assessgate evaluate` command.

use std::path::PathBuf;

use anyhow::Result;

use assessgate_core::parser;
use assessgate_core::report::EvaluationReport;
use assessgate_core::{AssessmentState, ResponseMap};

use crate::config::load_config_from;

pub struct EvaluateArgs {
    pub assessment: PathBuf,
    pub responses: Option<PathBuf>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub save: bool,
    pub fail_on_errors: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let format = args.format.unwrap_or(config.default_format);
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json" | "markdown" | "md"),
        "unknown format '{format}' (expected text, json, or markdown)"
    );

    let assessment = parser::parse_assessment(&args.assessment)?;
    let responses = match &args.responses {
        Some(path) => parser::parse_responses(path)?,
        None => ResponseMap::new(),
    };

    for w in parser::lint_assessment(&assessment) {
        tracing::warn!(
            question = w.question_id.as_deref().unwrap_or("-"),
            "{}",
            w.message
        );
    }

    let report = EvaluationReport::evaluate(&assessment, &responses);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        _ => print_summary(&report),
    }

    let mut targets = Vec::new();
    if let Some(path) = args.output {
        targets.push(path);
    }
    if args.save {
        let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
        targets.push(config.output_dir.join(format!(
            "{}-{timestamp}.json",
            report.assessment.id
        )));
    }
    for path in &targets {
        report.save_json(path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    if (args.fail_on_errors || config.fail_on_errors) && !report.state.can_submit {
        eprintln!(
            "Assessment cannot be submitted: {} error(s), {} required question(s) unanswered",
            report.state.error_count(),
            report.state.unanswered_required().len()
        );
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(report: &EvaluationReport) {
    use comfy_table::{Cell, Table};

    let state: &AssessmentState = &report.state;

    let mut table = Table::new();
    table.set_header(vec![
        "Question", "Visible", "Required", "Disabled", "Answered", "Errors",
    ]);

    let flag = |b: bool| if b { "yes" } else { "" };
    for q in &state.questions {
        let errors = q
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.kind, e.message))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(&q.id),
            Cell::new(flag(q.visible)),
            Cell::new(flag(q.required)),
            Cell::new(flag(q.disabled)),
            Cell::new(flag(q.answered)),
            Cell::new(errors),
        ]);
    }

    println!("{}", report.assessment.title);
    println!("{table}");
    println!(
        "Progress: {}/{} answered ({:.1}%)",
        state.answered_count, state.total_count, state.progress_percent
    );
    println!(
        "Ready to submit: {}",
        if state.can_submit { "yes" } else { "no" }
    );
}
