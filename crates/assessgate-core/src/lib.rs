//! assessgate-core: conditional-logic and validation engine for assessments.
//!
//! Given an assessment schema and a snapshot of candidate responses, this
//! crate derives which questions are visible, required, or disabled, the
//! validation errors for every visible question, and assessment-level
//! progress and submit-readiness. Evaluation is pure and synchronous.

pub mod aggregate;
pub mod cache;
pub mod condition;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod resolver;
pub mod response;
pub mod validator;

pub use aggregate::{evaluate_assessment, AssessmentState, QuestionState, SectionProgress};
pub use cache::EvaluationCache;
pub use model::{
    Assessment, Condition, ConditionalRule, ErrorKind, Question, QuestionType, RuleAction,
    Section, ValidationError, ValidationRule,
};
pub use response::{FileDescriptor, ResponseMap, ResponseValue};
