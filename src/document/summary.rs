//! Human-readable segment summaries

use crate::mapping::MappedCondition;
use crate::predicate::{ConditionValue, Operator};
use crate::vocabulary::SegmentContext;

/// Render a short description of what a segment selects, one line per
/// condition. Guidance text only; the document JSON is the source of truth.
pub fn format_summary(
    name: &str,
    context: SegmentContext,
    conditions: &[MappedCondition],
) -> String {
    let scope = match context {
        SegmentContext::Entity => "visitor level",
        SegmentContext::Session => "visit level",
        SegmentContext::Event => "hit level",
    };

    let mut lines = vec![format!("Segment '{name}' ({scope})")];
    for condition in conditions {
        lines.push(format!("  - {}", describe_condition(condition)));
    }
    lines.join("\n")
}

fn describe_condition(condition: &MappedCondition) -> String {
    let attribute = display_name(&condition.canonical_name);
    match condition.operator {
        Operator::StrEq => format!("{attribute} is {}", display_value(&condition.value)),
        Operator::StrNotEq => format!("{attribute} is not {}", display_value(&condition.value)),
        Operator::Contains => format!("{attribute} contains {}", display_value(&condition.value)),
        Operator::Gt => format!("{attribute} is more than {}", display_value(&condition.value)),
        Operator::Lt => format!("{attribute} is less than {}", display_value(&condition.value)),
        Operator::Gte => format!("{attribute} is at least {}", display_value(&condition.value)),
        Operator::Lte => format!("{attribute} is at most {}", display_value(&condition.value)),
        Operator::InList => format!("{attribute} is one of {}", display_value(&condition.value)),
        Operator::Exists => format!("{attribute} is set"),
        Operator::NotExists => format!("{attribute} did not occur"),
        Operator::EventExists => format!("{attribute} occurred"),
    }
}

/// Last path segment of a canonical attribute reference
fn display_name(canonical: &str) -> &str {
    canonical.rsplit('/').next().unwrap_or(canonical)
}

fn display_value(value: &ConditionValue) -> String {
    match value {
        ConditionValue::Str(s) => s.clone(),
        ConditionValue::Int(n) => n.to_string(),
        ConditionValue::Float(f) => f.to_string(),
        ConditionValue::List(values) => values.join(", "),
    }
}
