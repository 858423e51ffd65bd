//! Raw-condition to canonical-attribute resolution

use crate::extract::RawCondition;
use crate::mapping::MappedCondition;
use crate::predicate::{ConditionValue, Operator};
use crate::vocabulary::{Category, Vocabulary};
use std::collections::HashMap;

/// Result of a mapping pass. `missing` lists attributes the vocabulary could
/// not resolve; compilation must not proceed while it is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingOutcome {
    pub mapped: Vec<MappedCondition>,
    pub missing: Vec<String>,
}

impl MappingOutcome {
    pub fn is_resolved(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolve an operator hint through the static hint table. Unknown hints
/// degrade to string equality rather than failing the whole request.
fn resolve_operator(hint: &str) -> Operator {
    match hint {
        "equals" => Operator::StrEq,
        "not_equals" => Operator::StrNotEq,
        "contains" => Operator::Contains,
        "greater_than" => Operator::Gt,
        "less_than" => Operator::Lt,
        "greater_than_or_equal" => Operator::Gte,
        "less_than_or_equal" => Operator::Lte,
        "in_list" => Operator::InList,
        "exists" => Operator::Exists,
        "not_exists" => Operator::NotExists,
        "event_exists" => Operator::EventExists,
        other => {
            tracing::warn!(hint = other, "unknown operator hint, using equality");
            Operator::StrEq
        }
    }
}

/// Map raw conditions onto canonical attribute paths.
///
/// `bindings` lets the caller resolve custom attributes the vocabulary only
/// knows by family, keyed by term-group key (`user_type` ->
/// `variables/evar1`). `geography_value` substitutes for generic location
/// words like "country" that carry no concrete place.
pub fn map_conditions(
    vocabulary: &Vocabulary,
    raw: &[RawCondition],
    bindings: &HashMap<String, String>,
    geography_value: Option<&str>,
) -> MappingOutcome {
    let mut outcome = MappingOutcome::default();

    for condition in raw {
        match condition.category {
            Category::Device => map_dimension(
                vocabulary,
                condition,
                "device",
                vocabulary.normalize_value("device", &condition.term).to_string(),
                &mut outcome,
            ),
            Category::Page => map_dimension(
                vocabulary,
                condition,
                "page",
                condition.term.clone(),
                &mut outcome,
            ),
            Category::Campaign => map_dimension(
                vocabulary,
                condition,
                "campaign",
                condition.term.clone(),
                &mut outcome,
            ),
            Category::Geography => map_geography(vocabulary, condition, geography_value, &mut outcome),
            Category::Time => map_time(vocabulary, condition, &mut outcome),
            Category::Event => map_event(vocabulary, condition, &condition.term, &mut outcome),
            Category::Behavior => map_behavior(vocabulary, condition, &mut outcome),
            Category::Custom => map_custom(vocabulary, condition, bindings, &mut outcome),
        }
    }

    outcome
}

fn map_dimension(
    vocabulary: &Vocabulary,
    condition: &RawCondition,
    dimension_key: &str,
    value: String,
    outcome: &mut MappingOutcome,
) {
    match vocabulary.dimensions.get(dimension_key) {
        Some(path) => outcome.mapped.push(MappedCondition {
            category: condition.category,
            canonical_name: path.clone(),
            operator: resolve_operator(&condition.operator_hint),
            value: ConditionValue::Str(value),
        }),
        None => outcome.missing.push(format!("dimension: {dimension_key}")),
    }
}

fn map_geography(
    vocabulary: &Vocabulary,
    condition: &RawCondition,
    geography_value: Option<&str>,
    outcome: &mut MappingOutcome,
) {
    // `term` is the tier (country/state/city); `matched` is the literal
    let Some(path) = vocabulary.dimensions.get(&condition.term) else {
        outcome.missing.push(format!("dimension: {}", condition.term));
        return;
    };

    let dictionary = vocabulary
        .values
        .get("geography")
        .and_then(|m| m.get(&condition.matched));
    let value = match dictionary {
        Some(normalized) => normalized.clone(),
        // Generic tier words ("from a specific country") name no place at
        // all; substitute the caller's placeholder
        None if condition.matched == condition.term => geography_value
            .unwrap_or("Specific Country")
            .to_string(),
        None => condition.matched.clone(),
    };

    outcome.mapped.push(MappedCondition {
        category: condition.category,
        canonical_name: path.clone(),
        operator: resolve_operator(&condition.operator_hint),
        value: ConditionValue::Str(value),
    });
}

fn map_time(vocabulary: &Vocabulary, condition: &RawCondition, outcome: &mut MappingOutcome) {
    let Some(path) = vocabulary.dimensions.get(&condition.term) else {
        outcome.missing.push(format!("dimension: {}", condition.term));
        return;
    };
    let Some(values) = vocabulary.list_values.get(&condition.term) else {
        outcome.missing.push(format!("value set: {}", condition.term));
        return;
    };
    outcome.mapped.push(MappedCondition {
        category: condition.category,
        canonical_name: path.clone(),
        operator: Operator::InList,
        value: ConditionValue::List(values.clone()),
    });
}

fn map_event(
    vocabulary: &Vocabulary,
    condition: &RawCondition,
    event_key: &str,
    outcome: &mut MappingOutcome,
) {
    match vocabulary.events.get(event_key) {
        Some(path) => outcome.mapped.push(MappedCondition {
            category: condition.category,
            canonical_name: path.clone(),
            operator: resolve_operator(&condition.operator_hint),
            value: ConditionValue::Str(event_key.to_string()),
        }),
        None => outcome.missing.push(format!("event: {event_key}")),
    }
}

fn map_behavior(vocabulary: &Vocabulary, condition: &RawCondition, outcome: &mut MappingOutcome) {
    // Metric-shaped signals resolve in the metrics namespace only; the
    // dimension table must never satisfy a count comparison
    if let Some(path) = vocabulary.metrics.get(&condition.term) {
        outcome.mapped.push(MappedCondition {
            category: condition.category,
            canonical_name: path.clone(),
            operator: resolve_operator(&condition.operator_hint),
            value: condition.value.clone(),
        });
        return;
    }
    if vocabulary.events.contains_key(&condition.term) {
        let key = condition.term.clone();
        map_event(vocabulary, condition, &key, outcome);
        return;
    }
    outcome.missing.push(format!("metric: {}", condition.term));
}

fn map_custom(
    vocabulary: &Vocabulary,
    condition: &RawCondition,
    bindings: &HashMap<String, String>,
    outcome: &mut MappingOutcome,
) {
    if let Some(path) = bindings.get(&condition.term) {
        outcome.mapped.push(MappedCondition {
            category: condition.category,
            canonical_name: path.clone(),
            operator: resolve_operator(&condition.operator_hint),
            value: ConditionValue::Str(condition.matched.clone()),
        });
        return;
    }
    let family = vocabulary
        .families
        .get(&condition.term)
        .map(String::as_str)
        .unwrap_or("eVar");
    outcome.missing.push(format!("{}: {}", family, condition.term));
}
