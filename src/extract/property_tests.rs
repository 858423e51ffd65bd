use super::*;
use crate::extract::confidence::{score_confidence, ConfidenceTier};
use crate::extract::extractor::extract_conditions;
use crate::vocabulary::{Category, Vocabulary};
use proptest::prelude::*;
use std::collections::HashSet;

fn phrase_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "mobile users".to_string(),
        "visitors from california".to_string(),
        "who made a purchase".to_string(),
        "with more than 5 page views".to_string(),
        "from email campaigns".to_string(),
        "on weekends".to_string(),
        "premium customers".to_string(),
        "who viewed the homepage".to_string(),
    ])
}

fn phrase() -> impl Strategy<Value = String> {
    prop::collection::vec(phrase_fragment(), 0..5).prop_map(|parts| parts.join(" and "))
}

proptest! {
    #[test]
    fn extraction_is_deterministic(text in phrase()) {
        let vocabulary = Vocabulary::builtin();
        let first = extract_conditions(vocabulary, &text);
        let second = extract_conditions(vocabulary, &text);
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(a.category, b.category);
            prop_assert_eq!(&a.term, &b.term);
            prop_assert_eq!(&a.operator_hint, &b.operator_hint);
        }
    }

    #[test]
    fn extraction_ignores_letter_case(text in phrase()) {
        let vocabulary = Vocabulary::builtin();
        let lower = extract_conditions(vocabulary, &text);
        let upper = extract_conditions(vocabulary, &text.to_uppercase());
        prop_assert_eq!(lower.len(), upper.len());
        for (a, b) in lower.iter().zip(upper.iter()) {
            prop_assert_eq!(a.category, b.category);
            prop_assert_eq!(&a.term, &b.term);
        }
    }

    #[test]
    fn non_accumulating_categories_yield_at_most_one(text in phrase()) {
        let vocabulary = Vocabulary::builtin();
        let conditions = extract_conditions(vocabulary, &text);
        for category in Category::SCAN_ORDER {
            if category.accumulates() {
                continue;
            }
            let count = conditions.iter().filter(|c| c.category == category).count();
            prop_assert!(count <= 1, "{category} produced {count} conditions");
        }
    }

    #[test]
    fn conditions_follow_scan_order(text in phrase()) {
        let vocabulary = Vocabulary::builtin();
        let conditions = extract_conditions(vocabulary, &text);
        let ranks: Vec<usize> = conditions
            .iter()
            .map(|c| {
                Category::SCAN_ORDER
                    .iter()
                    .position(|&cat| cat == c.category)
                    .unwrap()
            })
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ranks, sorted);
    }

    #[test]
    fn confidence_tracks_distinct_categories(text in phrase()) {
        let vocabulary = Vocabulary::builtin();
        let conditions = extract_conditions(vocabulary, &text);
        let distinct: HashSet<Category> =
            conditions.iter().map(|c| c.category).collect();
        let expected = match distinct.len() {
            0 => ConfidenceTier::Low,
            1 | 2 => ConfidenceTier::Medium,
            _ => ConfidenceTier::High,
        };
        prop_assert_eq!(score_confidence(&conditions), expected);
    }
}
