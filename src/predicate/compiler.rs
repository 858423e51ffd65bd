//! Mapped-condition to predicate-tree compilation

use crate::error::{Result, SegmentError};
use crate::mapping::MappedCondition;
use crate::predicate::ast::{Connective, ConditionValue, Operator, PredicateNode};

/// Compile resolved conditions into a predicate tree.
///
/// One condition compiles straight to its leaf; two or more are joined under
/// a single AND group in input order, with no nesting. A negated event test
/// compiles to the same occurrence leaf as a positive one: the wire schema
/// has no negated form, so the distinction stays in the summary text.
pub fn compile_predicate(conditions: &[MappedCondition]) -> Result<PredicateNode> {
    if conditions.is_empty() {
        return Err(SegmentError::EmptyConditionSet);
    }

    if let [only] = conditions {
        return condition_to_leaf(only);
    }

    let leaves = conditions
        .iter()
        .map(condition_to_leaf)
        .collect::<Result<Vec<_>>>()?;

    Ok(PredicateNode::Group {
        connective: Connective::And,
        children: leaves,
    })
}

fn condition_to_leaf(condition: &MappedCondition) -> Result<PredicateNode> {
    match condition.operator {
        Operator::Exists | Operator::NotExists | Operator::EventExists => {
            Ok(PredicateNode::EventTest {
                event_ref: condition.canonical_name.clone(),
            })
        }
        Operator::InList => match &condition.value {
            ConditionValue::List(values) => Ok(PredicateNode::ListTest {
                attribute_ref: condition.canonical_name.clone(),
                values: values.clone(),
            }),
            other => Err(SegmentError::SchemaSerialization(format!(
                "list operator on '{}' requires list values, got {:?}",
                condition.canonical_name, other
            ))),
        },
        operator => Ok(PredicateNode::Comparison {
            operator,
            attribute_ref: condition.canonical_name.clone(),
            value: condition.value.clone(),
        }),
    }
}
