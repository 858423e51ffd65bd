//! Term-dictionary scan over request text

use crate::extract::RawCondition;
use crate::predicate::ConditionValue;
use crate::vocabulary::{Category, TermGroup, Vocabulary};
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

/// Comparison cue with a captured numeric literal, e.g. "more than 5"
static COMPARISON_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(more than|over|greater than|at least|at most|less than|under|fewer than)\s+(\d+)",
    )
    .expect("comparison cue regex")
});

/// Negated existence cue, e.g. "without downloading". Evaluated once over
/// the whole text and applied to every event-shaped condition, so one cue
/// negates them all ("without a purchase who downloaded" negates both).
static NEGATION_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(without|who did not|who didn't|never)\b").expect("negation cue regex"));

/// Extract raw conditions from request text.
///
/// Categories are scanned in declaration order; one condition per category on
/// the first matching term group, except behavior and custom-attribute
/// categories which accumulate every matching group. Comparison cues in the
/// text override the default operator hint and supply the numeric literal.
pub fn extract_conditions(vocabulary: &Vocabulary, text: &str) -> Vec<RawCondition> {
    let lowered = text.to_lowercase();
    let mut conditions = Vec::new();

    // Numeric cues in text order, consumed by metric conditions as they are
    // extracted
    let mut cues = comparison_cues(&lowered);
    let negated = NEGATION_CUE.is_match(&lowered);

    for category in Category::SCAN_ORDER {
        let mut matched: SmallVec<[(&TermGroup, &str); 4]> = SmallVec::new();
        for group in vocabulary.groups(category) {
            if let Some(variant) = first_variant_match(group, &lowered) {
                matched.push((group, variant));
                if !category.accumulates() {
                    break;
                }
            }
        }
        for (group, variant) in matched {
            conditions.push(build_condition(
                vocabulary, category, group, variant, &mut cues, negated,
            ));
        }
    }

    conditions
}

fn first_variant_match<'a>(group: &'a TermGroup, text: &str) -> Option<&'a str> {
    group
        .variants
        .iter()
        .find(|variant| text.contains(variant.as_str()))
        .map(String::as_str)
}

#[derive(Debug, Clone, Copy)]
struct NumericCue {
    hint: &'static str,
    value: i64,
}

fn comparison_cues(text: &str) -> std::vec::IntoIter<NumericCue> {
    COMPARISON_CUE
        .captures_iter(text)
        .filter_map(|caps| {
            let hint = match caps.get(1)?.as_str() {
                "more than" | "over" | "greater than" => "greater_than",
                "at least" => "greater_than_or_equal",
                "at most" => "less_than_or_equal",
                _ => "less_than",
            };
            let value = caps.get(2)?.as_str().parse::<i64>().ok()?;
            Some(NumericCue { hint, value })
        })
        .collect::<Vec<_>>()
        .into_iter()
}

fn build_condition(
    vocabulary: &Vocabulary,
    category: Category,
    group: &TermGroup,
    variant: &str,
    cues: &mut std::vec::IntoIter<NumericCue>,
    negated: bool,
) -> RawCondition {
    let (operator_hint, value) = match category {
        Category::Device | Category::Custom => ("equals".to_string(), ConditionValue::from(group.key.as_str())),
        Category::Page | Category::Campaign => {
            ("contains".to_string(), ConditionValue::from(group.key.as_str()))
        }
        Category::Event => {
            let hint = if negated { "not_exists" } else { "event_exists" };
            (hint.to_string(), ConditionValue::from(group.key.as_str()))
        }
        // Geography carries the literal that matched, not the group key; the
        // mapper decides between dictionary normalization and the caller's
        // placeholder.
        Category::Geography => ("equals".to_string(), ConditionValue::from(variant)),
        Category::Time => ("in_list".to_string(), ConditionValue::from(group.key.as_str())),
        Category::Behavior => behavior_hint(vocabulary, &group.key, cues, negated),
    };

    RawCondition {
        category,
        term: group.key.clone(),
        matched: variant.to_string(),
        operator_hint,
        value,
    }
}

fn behavior_hint(
    vocabulary: &Vocabulary,
    key: &str,
    cues: &mut std::vec::IntoIter<NumericCue>,
    negated: bool,
) -> (String, ConditionValue) {
    if vocabulary.metrics.contains_key(key) {
        // Metric signal: explicit cue wins, otherwise the vocabulary default
        // threshold with a greater-than comparison
        if let Some(cue) = cues.next() {
            return (cue.hint.to_string(), ConditionValue::Int(cue.value));
        }
        let threshold = vocabulary.default_thresholds.get(key).copied().unwrap_or(1);
        return ("greater_than".to_string(), ConditionValue::Int(threshold));
    }
    // Event-shaped behavioral signal (conversion, cart add)
    let hint = if negated { "not_exists" } else { "event_exists" };
    (hint.to_string(), ConditionValue::from(key))
}
