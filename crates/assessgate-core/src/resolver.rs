//! Per-question visibility, requirement, and disablement.
//!
//! Each query looks at the question's static flags and its single
//! conditional rule, reading the dependency's response directly from the
//! map. Rules are one hop: a dependency's own visibility is not consulted,
//! so a cycle such as A shown by B and B shown by A is neither detected nor
//! broken here (see `parser::lint_assessment` for the advisory check).

use serde::{Deserialize, Serialize};

use crate::condition::evaluate;
use crate::model::{ConditionalRule, Question, RuleAction};
use crate::response::ResponseMap;

/// The three derived flags for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub visible: bool,
    pub required: bool,
    pub disabled: bool,
}

/// Evaluate the rule's condition against the current dependency response.
fn rule_fires(rule: &ConditionalRule, responses: &ResponseMap) -> bool {
    evaluate(
        rule.condition,
        responses.get(&rule.depends_on),
        rule.value.as_ref(),
    )
}

/// `show` rules show when they fire, `hide` rules hide when they fire, and
/// no other action ever hides a question.
pub fn is_visible(question: &Question, responses: &ResponseMap) -> bool {
    match &question.conditional_logic {
        None => true,
        Some(rule) => match rule.action {
            RuleAction::Show => rule_fires(rule, responses),
            RuleAction::Hide => !rule_fires(rule, responses),
            RuleAction::Require | RuleAction::Disable => true,
        },
    }
}

/// The static flag, OR-ed with a firing `require` rule. A rule can only add
/// the requirement, never lift it.
pub fn is_required(question: &Question, responses: &ResponseMap) -> bool {
    let required = question.statically_required();
    match &question.conditional_logic {
        Some(rule) if rule.action == RuleAction::Require => {
            required || rule_fires(rule, responses)
        }
        _ => required,
    }
}

pub fn is_disabled(question: &Question, responses: &ResponseMap) -> bool {
    match &question.conditional_logic {
        Some(rule) if rule.action == RuleAction::Disable => rule_fires(rule, responses),
        _ => false,
    }
}

/// All three flags at once. The flags are independent; a question may be
/// both required and disabled.
pub fn resolve(question: &Question, responses: &ResponseMap) -> Resolution {
    Resolution {
        visible: is_visible(question, responses),
        required: is_required(question, responses),
        disabled: is_disabled(question, responses),
    }
}
