//! Canonical attribute mapping
//!
//! Turns raw extracted conditions into fully-resolved conditions whose
//! attribute references live in the `variables/`, `metrics/` or `events/`
//! namespaces. Anything the vocabulary cannot resolve is reported, never
//! guessed.

mod mapper;

pub use mapper::*;

use crate::predicate::{ConditionValue, Operator};
use crate::vocabulary::Category;

/// A condition with its attribute reference resolved to a canonical path
#[derive(Debug, Clone, PartialEq)]
pub struct MappedCondition {
    pub category: Category,
    /// Canonical attribute path, e.g. `variables/geocountry`
    pub canonical_name: String,
    pub operator: Operator,
    pub value: ConditionValue,
}
