//! Per-question field validation.
//!
//! Checks run in a fixed order and errors are reported in that order:
//! visibility, then the required check, then type-specific constraints.

use fancy_regex::Regex;

use crate::condition::is_empty_value;
use crate::model::{ErrorKind, Question, QuestionType, ValidationError, ValidationRule};
use crate::resolver::{is_required, is_visible};
use crate::response::{FileDescriptor, ResponseMap, ResponseValue};

/// File sizes in rules are megabytes of this many bytes.
pub const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";
const DEFAULT_PATTERN_MESSAGE: &str = "Invalid format";

/// Validate `value` as the response to `question`.
///
/// Hidden questions never produce errors. A required question with an empty
/// value produces exactly one `required` error and nothing else; an empty
/// multi-choice selection counts as empty here even though
/// [`is_empty_value`] does not treat lists as empty.
pub fn validate(
    question: &Question,
    value: Option<&ResponseValue>,
    responses: &ResponseMap,
) -> Vec<ValidationError> {
    if !is_visible(question, responses) {
        return Vec::new();
    }

    let empty = is_empty_value(value);
    let empty_selection = matches!(value, Some(ResponseValue::List(items)) if items.is_empty());

    if (empty || empty_selection) && is_required(question, responses) {
        let message = question
            .validation
            .as_ref()
            .and_then(|v| v.custom_message.clone())
            .unwrap_or_else(|| DEFAULT_REQUIRED_MESSAGE.to_string());
        return vec![ValidationError::new(
            &question.id,
            ErrorKind::Required,
            message,
        )];
    }

    // `empty` never holds for lists, so an optional empty selection still
    // goes through the count checks below.
    let Some(value) = value.filter(|_| !empty) else {
        return Vec::new();
    };

    let unconstrained = ValidationRule::default();
    let rule = question.validation.as_ref().unwrap_or(&unconstrained);
    let mut errors = Vec::new();
    match question.question_type {
        QuestionType::ShortText | QuestionType::LongText => {
            check_text(question, value, rule, &mut errors)
        }
        QuestionType::Numeric => check_numeric(question, value, rule, &mut errors),
        QuestionType::SingleChoice => check_single_choice(question, value, &mut errors),
        QuestionType::MultiChoice => check_multi_choice(question, value, rule, &mut errors),
        QuestionType::FileUpload => check_file(question, value, rule, &mut errors),
    }
    errors
}

fn check_text(
    question: &Question,
    value: &ResponseValue,
    rule: &ValidationRule,
    errors: &mut Vec<ValidationError>,
) {
    let Some(text) = value.as_text() else {
        errors.push(structural(question, "Please enter text", value));
        return;
    };

    let length = text.chars().count();
    if let Some(min) = rule.min_length {
        if length < min {
            errors.push(ValidationError::new(
                &question.id,
                ErrorKind::MinLength,
                format!("Must be at least {min} characters"),
            ));
        }
    }
    if let Some(max) = rule.max_length {
        if length > max {
            errors.push(ValidationError::new(
                &question.id,
                ErrorKind::MaxLength,
                format!("Must be no more than {max} characters"),
            ));
        }
    }

    if let Some(pattern) = &rule.pattern {
        if let Some(re) = compile_pattern(&question.id, pattern) {
            if !pattern_matches(&question.id, &re, text) {
                let message = rule
                    .pattern_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PATTERN_MESSAGE.to_string());
                errors.push(ValidationError::new(
                    &question.id,
                    ErrorKind::Pattern,
                    message,
                ));
            }
        }
    }
}

/// Compile a pattern constraint, or log and skip it when malformed.
///
/// Patterns are authored for browser forms, so lookaround and
/// backreferences are accepted.
pub fn compile_pattern(question_id: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(
                question = question_id,
                pattern,
                "ignoring invalid validation pattern: {e}"
            );
            None
        }
    }
}

// A match that exceeds the backtracking limit counts as a match, the same
// way a pattern we cannot compile is not enforced.
fn pattern_matches(question_id: &str, re: &Regex, text: &str) -> bool {
    re.is_match(text).unwrap_or_else(|e| {
        tracing::warn!(question = question_id, "pattern match abandoned: {e}");
        true
    })
}

fn check_numeric(
    question: &Question,
    value: &ResponseValue,
    rule: &ValidationRule,
    errors: &mut Vec<ValidationError>,
) {
    let Some(n) = value.as_number() else {
        errors.push(ValidationError::new(
            &question.id,
            ErrorKind::Custom,
            "Please enter a valid number",
        ));
        return;
    };

    if let Some(min) = rule.min {
        if n < min {
            errors.push(ValidationError::new(
                &question.id,
                ErrorKind::Min,
                format!("Must be at least {min}"),
            ));
        }
    }
    if let Some(max) = rule.max {
        if n > max {
            errors.push(ValidationError::new(
                &question.id,
                ErrorKind::Max,
                format!("Must be no more than {max}"),
            ));
        }
    }
}

fn check_single_choice(
    question: &Question,
    value: &ResponseValue,
    errors: &mut Vec<ValidationError>,
) {
    let valid = value
        .as_text()
        .is_some_and(|choice| question.option_list().iter().any(|o| o == choice));
    if !valid {
        errors.push(ValidationError::new(
            &question.id,
            ErrorKind::Custom,
            "Please select a valid option",
        ));
    }
}

fn check_multi_choice(
    question: &Question,
    value: &ResponseValue,
    rule: &ValidationRule,
    errors: &mut Vec<ValidationError>,
) {
    let Some(selected) = value.as_list() else {
        errors.push(structural(
            question,
            "Please select from the available options",
            value,
        ));
        return;
    };

    let options = question.option_list();
    let all_known = selected.iter().all(|item| {
        item.as_text()
            .is_some_and(|choice| options.iter().any(|o| o == choice))
    });
    if !all_known {
        errors.push(ValidationError::new(
            &question.id,
            ErrorKind::Custom,
            "One or more selections are not valid options",
        ));
    }

    let count = selected.len() as f64;
    if let Some(min) = rule.min {
        if count < min {
            errors.push(ValidationError::new(
                &question.id,
                ErrorKind::Min,
                format!("Please select at least {min} options"),
            ));
        }
    }
    if let Some(max) = rule.max {
        if count > max {
            errors.push(ValidationError::new(
                &question.id,
                ErrorKind::Max,
                format!("Please select no more than {max} options"),
            ));
        }
    }
}

fn check_file(
    question: &Question,
    value: &ResponseValue,
    rule: &ValidationRule,
    errors: &mut Vec<ValidationError>,
) {
    let Some(file) = value.as_file() else {
        errors.push(structural(question, "Please upload a valid file", value));
        return;
    };

    if let Some(types) = rule.file_types.as_deref().filter(|t| !t.is_empty()) {
        if !extension_allowed(file, types) {
            let listed = types
                .iter()
                .map(|t| normalize_extension(t))
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(ValidationError::new(
                &question.id,
                ErrorKind::FileType,
                format!("File type must be one of: {listed}"),
            ));
        }
    }

    let size_mb = file.size / BYTES_PER_MEGABYTE;
    if let Some(min) = rule.min_file_size {
        if size_mb < min {
            errors.push(ValidationError::new(
                &question.id,
                ErrorKind::FileSize,
                format!("File must be at least {min} MB"),
            ));
        }
    }
    if let Some(max) = rule.max_file_size {
        if size_mb > max {
            errors.push(ValidationError::new(
                &question.id,
                ErrorKind::FileSize,
                format!("File must be no larger than {max} MB"),
            ));
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn extension_allowed(file: &FileDescriptor, types: &[String]) -> bool {
    let Some(ext) = file.extension() else {
        return false;
    };
    types.iter().any(|t| normalize_extension(t) == ext)
}

fn structural(question: &Question, message: &str, value: &ResponseValue) -> ValidationError {
    tracing::debug!(
        question = %question.id,
        kind = %question.question_type,
        found = value.kind_name(),
        "response has the wrong shape for its question type"
    );
    ValidationError::new(&question.id, ErrorKind::Custom, message)
}
