//! Assessment-level evaluation.
//!
//! Folds the per-question resolver and validator results into the view the
//! form layer renders: what is visible, what is required, what is wrong, how
//! far along the candidate is, and whether they can submit. One pass over
//! the questions, with map lookups only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::is_answered;
use crate::model::{Assessment, ValidationError};
use crate::resolver::resolve;
use crate::response::ResponseMap;
use crate::validator::validate;

/// Derived state for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionState {
    pub id: String,
    pub visible: bool,
    pub required: bool,
    pub disabled: bool,
    pub answered: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

/// Progress within one section, over its visible questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProgress {
    pub id: String,
    pub title: String,
    pub visible_count: usize,
    pub answered_count: usize,
    /// Visible required questions without an answer.
    pub missing_required: usize,
}

/// Everything derived from one (assessment, responses) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentState {
    /// Every question in schema order, hidden ones included.
    pub questions: Vec<QuestionState>,
    pub sections: Vec<SectionProgress>,
    /// Ids of visible questions in schema order.
    pub visible_questions: Vec<String>,
    /// Ids of visible questions that are also required.
    pub required_questions: Vec<String>,
    /// Only questions with at least one error appear here.
    pub errors_by_question: BTreeMap<String, Vec<ValidationError>>,
    pub answered_count: usize,
    pub total_count: usize,
    pub progress_percent: f64,
    pub can_submit: bool,
}

impl AssessmentState {
    pub fn question(&self, id: &str) -> Option<&QuestionState> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Errors for a question; empty for valid or hidden questions.
    pub fn errors_for(&self, id: &str) -> &[ValidationError] {
        self.errors_by_question
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn error_count(&self) -> usize {
        self.errors_by_question.values().map(Vec::len).sum()
    }

    /// Visible required questions that still lack an answer, in schema order.
    pub fn unanswered_required(&self) -> Vec<&str> {
        self.questions
            .iter()
            .filter(|q| q.visible && q.required && !q.answered)
            .map(|q| q.id.as_str())
            .collect()
    }
}

/// Evaluate an entire assessment against a response snapshot.
pub fn evaluate_assessment(assessment: &Assessment, responses: &ResponseMap) -> AssessmentState {
    let mut questions = Vec::with_capacity(assessment.question_count());
    let mut sections = Vec::with_capacity(assessment.sections.len());
    let mut visible_questions = Vec::new();
    let mut required_questions = Vec::new();
    let mut errors_by_question = BTreeMap::new();
    let mut answered_count = 0usize;
    let mut missing_required_total = 0usize;

    for section in &assessment.sections {
        let mut progress = SectionProgress {
            id: section.id.clone(),
            title: section.title.clone(),
            visible_count: 0,
            answered_count: 0,
            missing_required: 0,
        };

        for question in &section.questions {
            let value = responses.get(&question.id);
            let flags = resolve(question, responses);
            let answered = is_answered(value);

            let errors = if flags.visible {
                validate(question, value, responses)
            } else {
                Vec::new()
            };

            if flags.visible {
                visible_questions.push(question.id.clone());
                progress.visible_count += 1;
                if answered {
                    answered_count += 1;
                    progress.answered_count += 1;
                }
                if flags.required {
                    required_questions.push(question.id.clone());
                    if !answered {
                        progress.missing_required += 1;
                        missing_required_total += 1;
                    }
                }
                if !errors.is_empty() {
                    errors_by_question.insert(question.id.clone(), errors.clone());
                }
            }

            questions.push(QuestionState {
                id: question.id.clone(),
                visible: flags.visible,
                required: flags.required,
                disabled: flags.disabled,
                answered,
                errors,
            });
        }

        sections.push(progress);
    }

    let total_count = visible_questions.len();
    let progress_percent = if total_count == 0 {
        0.0
    } else {
        answered_count as f64 / total_count as f64 * 100.0
    };
    let can_submit = missing_required_total == 0 && errors_by_question.is_empty();

    tracing::trace!(
        assessment = %assessment.id,
        visible = total_count,
        answered = answered_count,
        errors = errors_by_question.len(),
        "evaluated assessment"
    );

    AssessmentState {
        questions,
        sections,
        visible_questions,
        required_questions,
        errors_by_question,
        answered_count,
        total_count,
        progress_percent,
        can_submit,
    }
}
