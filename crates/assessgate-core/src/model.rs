//! Core data model types for assessgate.
//!
//! An [`Assessment`] is an ordered list of [`Section`]s, each an ordered list
//! of [`Question`]s. Schemas are authored elsewhere and handed to the engine
//! as read-only inputs; field names on the wire are camelCase.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::response::ResponseValue;

/// A complete assessment schema attached to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Unique identifier for this assessment.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// The job this assessment belongs to.
    #[serde(default)]
    pub job_id: String,
    /// Sections in display order.
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Assessment {
    /// Iterate over every question in schema order, across all sections.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    /// Total number of questions, visible or not.
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id == id)
    }
}

/// An ordered group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A single question requiring one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier, unique across the whole assessment.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Determines the expected response shape and which checks run.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Static required flag.
    #[serde(default)]
    pub required: bool,
    /// Declared options; mandatory and non-empty for choice types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
    /// At most one rule; rules do not chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalRule>,
}

impl Question {
    /// Create a question with no options, validation, or conditional rule.
    pub fn new(id: impl Into<String>, question_type: QuestionType) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            description: None,
            question_type,
            required: false,
            options: None,
            validation: None,
            conditional_logic: None,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_validation(mut self, validation: ValidationRule) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_rule(mut self, rule: ConditionalRule) -> Self {
        self.conditional_logic = Some(rule);
        self
    }

    /// The static required flag, or the redundant `validation.required`.
    pub fn statically_required(&self) -> bool {
        self.required
            || self
                .validation
                .as_ref()
                .and_then(|v| v.required)
                .unwrap_or(false)
    }

    /// Declared options, empty when none were given.
    pub fn option_list(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }
}

/// The kind of response a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    ShortText,
    LongText,
    Numeric,
    SingleChoice,
    MultiChoice,
    FileUpload,
}

impl QuestionType {
    pub fn is_text(self) -> bool {
        matches!(self, QuestionType::ShortText | QuestionType::LongText)
    }

    pub fn is_choice(self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultiChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionType::ShortText => "short-text",
            QuestionType::LongText => "long-text",
            QuestionType::Numeric => "numeric",
            QuestionType::SingleChoice => "single-choice",
            QuestionType::MultiChoice => "multi-choice",
            QuestionType::FileUpload => "file-upload",
        };
        f.write_str(s)
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short-text" => Ok(QuestionType::ShortText),
            "long-text" => Ok(QuestionType::LongText),
            "numeric" => Ok(QuestionType::Numeric),
            "single-choice" => Ok(QuestionType::SingleChoice),
            "multi-choice" => Ok(QuestionType::MultiChoice),
            "file-upload" => Ok(QuestionType::FileUpload),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Optional constraints on a question's response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression, matched anywhere in the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_message: Option<String>,
    /// Numeric bound, or selection count for multi-choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Accepted extensions, with or without a leading dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_types: Option<Vec<String>>,
    /// Megabytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_file_size: Option<f64>,
    /// Megabytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<f64>,
    /// Replaces the default "required" message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

/// A single dependency-driven rule on another question's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    /// Id of the question whose response drives this rule.
    pub depends_on: String,
    pub condition: Condition,
    /// Expected operand; ignored by unary conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ResponseValue>,
    pub action: RuleAction,
}

impl ConditionalRule {
    pub fn new(
        depends_on: impl Into<String>,
        condition: Condition,
        value: Option<ResponseValue>,
        action: RuleAction,
    ) -> Self {
        Self {
            depends_on: depends_on.into(),
            condition,
            value,
            action,
        }
    }
}

/// Predicate applied to the dependency's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    IsEmpty,
    IsNotEmpty,
}

impl Condition {
    /// Unary conditions ignore the rule's expected value.
    pub fn is_unary(self) -> bool {
        matches!(self, Condition::IsEmpty | Condition::IsNotEmpty)
    }
}

/// What a conditional rule does when its condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Show,
    Hide,
    Require,
    Disable,
}

/// A single validation failure for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The question id.
    pub field: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }
}

/// Which check produced a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Min,
    Max,
    FileType,
    FileSize,
    Custom,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Required => "required",
            ErrorKind::MinLength => "minLength",
            ErrorKind::MaxLength => "maxLength",
            ErrorKind::Pattern => "pattern",
            ErrorKind::Min => "min",
            ErrorKind::Max => "max",
            ErrorKind::FileType => "fileType",
            ErrorKind::FileSize => "fileSize",
            ErrorKind::Custom => "custom",
        };
        f.write_str(s)
    }
}
