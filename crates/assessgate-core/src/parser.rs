//! Assessment and response loaders.
//!
//! Loads assessment schemas from JSON or TOML files and directories, loads
//! response snapshots from JSON, and lints schemas for authoring mistakes.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::LoadError;
use crate::model::{Assessment, Question};
use crate::response::{ResponseMap, ResponseValue};

/// On-disk schema format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Toml,
}

impl SchemaFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(SchemaFormat::Json),
            "toml" => Ok(SchemaFormat::Toml),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse a single assessment file.
pub fn parse_assessment(path: &Path) -> Result<Assessment> {
    let format = SchemaFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read assessment file: {}", path.display()))?;

    parse_assessment_str(&content, format, path)
}

/// Parse an assessment from a string (useful for testing).
pub fn parse_assessment_str(
    content: &str,
    format: SchemaFormat,
    source_path: &Path,
) -> Result<Assessment> {
    let assessment = match format {
        SchemaFormat::Json => serde_json::from_str::<Assessment>(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
        SchemaFormat::Toml => toml::from_str::<Assessment>(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
    };
    Ok(assessment)
}

/// Recursively load every `.json` and `.toml` assessment under `dir`.
///
/// Files that fail to parse are skipped with a warning, since directories
/// usually hold response snapshots alongside schemas.
pub fn load_assessment_directory(dir: &Path) -> Result<Vec<Assessment>> {
    let mut assessments = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            assessments.extend(load_assessment_directory(&path)?);
        } else if SchemaFormat::from_path(&path).is_ok() {
            match parse_assessment(&path) {
                Ok(assessment) => assessments.push(assessment),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(assessments)
}

/// Parse a JSON response snapshot file.
pub fn parse_responses(path: &Path) -> Result<ResponseMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read responses file: {}", path.display()))?;

    parse_responses_str(&content, path)
}

/// Parse a JSON response snapshot: an object keyed by question id.
pub fn parse_responses_str(content: &str, source_path: &Path) -> Result<ResponseMap> {
    let json: serde_json::Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    let entries = match json {
        serde_json::Value::Object(entries) => entries,
        other => return Err(LoadError::ResponsesNotAnObject(json_kind(&other)).into()),
    };

    let mut responses = ResponseMap::new();
    for (question_id, raw) in entries {
        let value = serde_json::from_value::<ResponseValue>(raw).map_err(|e| {
            LoadError::InvalidResponseValue {
                question_id: question_id.clone(),
                message: e.to_string(),
            }
        })?;
        responses.set(question_id, value);
    }
    Ok(responses)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// A warning from assessment linting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl SchemaWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Lint an assessment for authoring mistakes. Never fails and never changes
/// how the assessment evaluates.
pub fn lint_assessment(assessment: &Assessment) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate question IDs across sections
    let mut seen_ids = HashSet::new();
    for question in assessment.questions() {
        if !seen_ids.insert(question.id.as_str()) {
            warnings.push(SchemaWarning::question(
                &question.id,
                format!("duplicate question ID: {}", question.id),
            ));
        }
    }

    for question in assessment.questions() {
        lint_question(question, &seen_ids, &mut warnings);
    }

    for cycle in dependency_cycles(assessment) {
        warnings.push(SchemaWarning {
            question_id: cycle.first().cloned(),
            message: format!("conditional dependency cycle: {}", cycle.join(" -> ")),
        });
    }

    warnings
}

fn lint_question(question: &Question, known_ids: &HashSet<&str>, warnings: &mut Vec<SchemaWarning>) {
    let id = question.id.as_str();

    if question.question_type.is_choice() && question.option_list().is_empty() {
        warnings.push(SchemaWarning::question(
            id,
            format!("{} question has no options", question.question_type),
        ));
    }

    if let Some(rule) = &question.conditional_logic {
        if rule.depends_on == question.id {
            warnings.push(SchemaWarning::question(id, "conditional rule depends on itself"));
        } else if !known_ids.contains(rule.depends_on.as_str()) {
            warnings.push(SchemaWarning::question(
                id,
                format!("conditional rule depends on unknown question: {}", rule.depends_on),
            ));
        }
        if !rule.condition.is_unary() && rule.value.is_none() {
            warnings.push(SchemaWarning::question(
                id,
                "conditional rule has no value to compare against",
            ));
        }
    }

    let Some(v) = &question.validation else {
        return;
    };
    if !question.question_type.is_text()
        && (v.min_length.is_some() || v.max_length.is_some() || v.pattern.is_some())
    {
        warnings.push(SchemaWarning::question(
            id,
            format!(
                "length and pattern constraints are ignored on {} questions",
                question.question_type
            ),
        ));
    }
    if let (Some(min), Some(max)) = (v.min_length, v.max_length) {
        if min > max {
            warnings.push(SchemaWarning::question(id, "minLength is greater than maxLength"));
        }
    }
    if let (Some(min), Some(max)) = (v.min, v.max) {
        if min > max {
            warnings.push(SchemaWarning::question(id, "min is greater than max"));
        }
    }
    if let (Some(min), Some(max)) = (v.min_file_size, v.max_file_size) {
        if min > max {
            warnings.push(SchemaWarning::question(
                id,
                "minFileSize is greater than maxFileSize",
            ));
        }
    }
    if let Some(pattern) = &v.pattern {
        if let Err(e) = fancy_regex::Regex::new(pattern) {
            warnings.push(SchemaWarning::question(
                id,
                format!("pattern will be ignored, it does not compile: {e}"),
            ));
        }
    }
}

/// Find cycles in the one-hop `dependsOn` graph.
///
/// Each question has at most one outgoing edge, so every cycle is found by
/// walking forward from each unvisited question. Cycles are returned closed
/// (first id repeated at the end), starting from the earliest question in
/// schema order.
pub fn dependency_cycles(assessment: &Assessment) -> Vec<Vec<String>> {
    let edges: HashMap<&str, &str> = assessment
        .questions()
        .filter_map(|q| {
            q.conditional_logic
                .as_ref()
                .map(|r| (q.id.as_str(), r.depends_on.as_str()))
        })
        .collect();

    let mut done: HashSet<&str> = HashSet::new();
    let mut cycles = Vec::new();

    for question in assessment.questions() {
        let start = question.id.as_str();
        if done.contains(start) {
            continue;
        }

        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut current = Some(start);

        while let Some(node) = current {
            if done.contains(node) {
                break;
            }
            if on_path.contains(node) {
                if let Some(pos) = path.iter().position(|&n| n == node) {
                    let mut cycle: Vec<String> =
                        path[pos..].iter().map(|s| s.to_string()).collect();
                    cycle.push(node.to_string());
                    cycles.push(cycle);
                }
                break;
            }
            on_path.insert(node);
            path.push(node);
            current = edges.get(node).copied();
        }

        done.extend(path);
    }

    cycles
}
