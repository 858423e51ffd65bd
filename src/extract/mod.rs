//! Condition extraction module
//!
//! Scans lower-cased request text against the vocabulary's category
//! dictionaries and emits raw condition tuples for the mapper.

mod confidence;
mod extractor;

#[cfg(test)]
mod property_tests;

pub use confidence::*;
pub use extractor::*;

use crate::predicate::ConditionValue;
use crate::vocabulary::Category;

/// Raw condition produced by the extractor. Ephemeral: consumed by the
/// mapper, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCondition {
    pub category: Category,
    /// Normalized term-group key, e.g. "mobile" or "page_views"
    pub term: String,
    /// Literal variant that matched in the text
    pub matched: String,
    /// Human operator word; the mapper resolves it through a static table
    pub operator_hint: String,
    pub value: ConditionValue,
}
