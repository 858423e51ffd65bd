//! Container context resolution
//!
//! Each matched category votes for the evaluation tier it belongs to; the
//! tier with a strict majority wins, and anything else falls back to the
//! widest tier so a segment never silently narrows its scope.

use crate::vocabulary::{Category, SegmentContext, Vocabulary};
use std::collections::HashMap;

/// Resolve the container context from the categories that produced
/// conditions. No conditions, or a tied vote, resolves to [`SegmentContext::Entity`].
pub fn resolve_context(vocabulary: &Vocabulary, categories: &[Category]) -> SegmentContext {
    let mut votes: HashMap<SegmentContext, usize> = HashMap::new();
    for &category in categories {
        *votes.entry(vocabulary.context_of(category)).or_insert(0) += 1;
    }

    let Some((&leader, &count)) = votes.iter().max_by_key(|(_, &count)| count) else {
        return SegmentContext::Entity;
    };
    let tied = votes.values().filter(|&&c| c == count).count() > 1;
    if tied {
        SegmentContext::Entity
    } else {
        leader
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(categories: &[Category]) -> SegmentContext {
        resolve_context(Vocabulary::builtin(), categories)
    }

    #[test]
    fn test_event_tier_majority() {
        assert_eq!(
            resolve(&[Category::Page, Category::Event, Category::Device]),
            SegmentContext::Event
        );
    }

    #[test]
    fn test_session_tier_majority() {
        assert_eq!(
            resolve(&[Category::Device, Category::Geography]),
            SegmentContext::Session
        );
    }

    #[test]
    fn test_tie_resolves_to_entity() {
        // One session vote (device) against one entity vote (behavior)
        assert_eq!(
            resolve(&[Category::Device, Category::Behavior]),
            SegmentContext::Entity
        );
    }

    #[test]
    fn test_no_conditions_resolve_to_entity() {
        assert_eq!(resolve(&[]), SegmentContext::Entity);
    }

    #[test]
    fn test_single_category_wins_outright() {
        assert_eq!(resolve(&[Category::Page]), SegmentContext::Event);
        assert_eq!(resolve(&[Category::Custom]), SegmentContext::Entity);
    }

    #[test]
    fn test_order_of_votes_is_irrelevant() {
        let forward = resolve(&[Category::Page, Category::Device, Category::Event]);
        let backward = resolve(&[Category::Event, Category::Device, Category::Page]);
        assert_eq!(forward, backward);
    }
}
