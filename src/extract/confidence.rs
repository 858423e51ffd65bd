//! Extraction confidence scoring
//!
//! A presentation hint only: confidence never gates whether compilation
//! succeeds.

use crate::extract::RawCondition;
use crate::vocabulary::Category;
use std::collections::HashSet;

/// Confidence tier for user-facing guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        }
    }
}

/// Score extraction confidence from the number of distinct categories
/// matched: zero is low, one or two medium, three or more high. Monotonic in
/// the category count.
pub fn score_confidence(conditions: &[RawCondition]) -> ConfidenceTier {
    let distinct: HashSet<Category> = conditions.iter().map(|c| c.category).collect();
    match distinct.len() {
        0 => ConfidenceTier::Low,
        1 | 2 => ConfidenceTier::Medium,
        _ => ConfidenceTier::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::ConditionValue;

    fn condition(category: Category, term: &str) -> RawCondition {
        RawCondition {
            category,
            term: term.to_string(),
            matched: term.to_string(),
            operator_hint: "equals".to_string(),
            value: ConditionValue::from(term),
        }
    }

    #[test]
    fn test_tiers() {
        assert_eq!(score_confidence(&[]), ConfidenceTier::Low);
        assert_eq!(
            score_confidence(&[condition(Category::Device, "mobile")]),
            ConfidenceTier::Medium
        );
        assert_eq!(
            score_confidence(&[
                condition(Category::Device, "mobile"),
                condition(Category::Geography, "state"),
                condition(Category::Behavior, "page_views"),
            ]),
            ConfidenceTier::High
        );
    }

    #[test]
    fn test_duplicate_categories_count_once() {
        let conditions = [
            condition(Category::Behavior, "page_views"),
            condition(Category::Behavior, "time_on_site"),
        ];
        assert_eq!(score_confidence(&conditions), ConfidenceTier::Medium);
    }

    #[test]
    fn test_monotonic_in_distinct_categories() {
        let mut conditions = Vec::new();
        let mut previous = score_confidence(&conditions);
        for category in Category::SCAN_ORDER {
            conditions.push(condition(category, "term"));
            let tier = score_confidence(&conditions);
            assert!(tier >= previous);
            previous = tier;
        }
    }
}
