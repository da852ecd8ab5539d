//! Load error types.
//!
//! The evaluation engine itself never fails; these errors only arise at the
//! edges, when schemas and response snapshots are read from disk.

use thiserror::Error;

/// Errors that can occur while loading assessments or responses.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file extension is not one we know how to parse.
    #[error("unsupported file format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),

    /// The responses document was valid JSON but not an object.
    #[error("responses must be a JSON object keyed by question id, found {0}")]
    ResponsesNotAnObject(&'static str),

    /// A single response value could not be represented.
    #[error("invalid response value for question '{question_id}': {message}")]
    InvalidResponseValue { question_id: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_lists_accepted_extensions() {
        let err = LoadError::UnsupportedFormat("screen.yaml".into());
        assert_eq!(
            err.to_string(),
            "unsupported file format: screen.yaml (expected .json or .toml)"
        );
    }

    #[test]
    fn messages_name_the_problem() {
        let err = LoadError::InvalidResponseValue {
            question_id: "q1".into(),
            message: "bad".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid response value for question 'q1': bad"
        );
    }
}
