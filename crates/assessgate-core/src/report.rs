//! Evaluation report types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{evaluate_assessment, AssessmentState};
use crate::model::Assessment;
use crate::response::ResponseMap;

/// A snapshot of one evaluation, suitable for saving and sharing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub assessment: AssessmentSummary,
    pub state: AssessmentState,
}

/// Summary of an assessment (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub id: String,
    pub title: String,
    pub job_id: String,
    pub section_count: usize,
    pub question_count: usize,
}

impl AssessmentSummary {
    pub fn of(assessment: &Assessment) -> Self {
        Self {
            id: assessment.id.clone(),
            title: assessment.title.clone(),
            job_id: assessment.job_id.clone(),
            section_count: assessment.sections.len(),
            question_count: assessment.question_count(),
        }
    }
}

impl EvaluationReport {
    /// Wrap an already computed state.
    pub fn new(assessment: &Assessment, state: AssessmentState) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            assessment: AssessmentSummary::of(assessment),
            state,
        }
    }

    /// Evaluate and wrap in one step.
    pub fn evaluate(assessment: &Assessment, responses: &ResponseMap) -> Self {
        Self::new(assessment, evaluate_assessment(assessment, responses))
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: EvaluationReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let state = &self.state;
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.assessment.title));
        md.push_str(&format!(
            "**Progress:** {}/{} answered ({:.1}%)\n\n",
            state.answered_count, state.total_count, state.progress_percent
        ));
        md.push_str(&format!(
            "**Ready to submit:** {}\n\n",
            if state.can_submit { "yes" } else { "no" }
        ));

        if !state.sections.is_empty() {
            md.push_str("### Sections\n\n");
            md.push_str("| Section | Answered | Missing required |\n");
            md.push_str("|---------|----------|------------------|\n");
            for s in &state.sections {
                md.push_str(&format!(
                    "| {} | {}/{} | {} |\n",
                    s.title, s.answered_count, s.visible_count, s.missing_required
                ));
            }
            md.push('\n');
        }

        if !state.errors_by_question.is_empty() {
            md.push_str("### Errors\n\n");
            md.push_str("| Question | Type | Message |\n");
            md.push_str("|----------|------|---------|\n");
            for id in &state.visible_questions {
                for e in state.errors_for(id) {
                    md.push_str(&format!("| {} | {} | {} |\n", e.field, e.kind, e.message));
                }
            }
        }

        md
    }
}
