//! Wire serialization for predicate trees
//!
//! The target schema is exact about leaf shapes: string comparisons carry
//! `str`, numeric comparisons carry `num`, event tests wrap an `evt` object
//! and list tests carry `list`. Any operator/value combination outside the
//! leaf table is an internal invariant violation, not a user error.

use crate::error::{Result, SegmentError};
use crate::predicate::ast::{ConditionValue, Operator, PredicateNode};
use serde_json::{json, Value};

/// Serialize a predicate tree into the wire JSON shape
pub fn predicate_to_json(node: &PredicateNode) -> Result<Value> {
    match node {
        PredicateNode::Comparison {
            operator,
            attribute_ref,
            value,
        } => comparison_to_json(*operator, attribute_ref, value),
        PredicateNode::EventTest { event_ref } => Ok(json!({
            "func": "event-exists",
            "evt": {
                "func": "event",
                "name": event_ref,
            },
        })),
        PredicateNode::ListTest {
            attribute_ref,
            values,
        } => {
            if values.is_empty() {
                return Err(SegmentError::SchemaSerialization(format!(
                    "list test on '{}' has no values",
                    attribute_ref
                )));
            }
            Ok(json!({
                "func": "streq-in",
                "val": attr_ref(attribute_ref),
                "list": values,
            }))
        }
        PredicateNode::Group {
            connective,
            children,
        } => {
            if children.is_empty() {
                return Err(SegmentError::SchemaSerialization(
                    "predicate group has no children".to_string(),
                ));
            }
            let preds = children
                .iter()
                .map(predicate_to_json)
                .collect::<Result<Vec<Value>>>()?;
            Ok(json!({
                "func": connective.wire_token(),
                "preds": preds,
            }))
        }
    }
}

fn comparison_to_json(operator: Operator, attribute_ref: &str, value: &ConditionValue) -> Result<Value> {
    let func = operator.wire_token().ok_or_else(|| {
        SegmentError::SchemaSerialization(format!(
            "operator {:?} has no comparison leaf shape",
            operator
        ))
    })?;

    if operator.is_string() {
        let literal = value.as_str().ok_or_else(|| {
            SegmentError::SchemaSerialization(format!(
                "string operator {:?} on '{}' requires a string literal, got {:?}",
                operator, attribute_ref, value
            ))
        })?;
        return Ok(json!({
            "func": func,
            "val": attr_ref(attribute_ref),
            "str": literal,
        }));
    }

    if operator.is_numeric() {
        let num = match value {
            ConditionValue::Int(n) => json!(n),
            ConditionValue::Float(f) => json!(f),
            other => {
                return Err(SegmentError::SchemaSerialization(format!(
                    "numeric operator {:?} on '{}' requires a numeric literal, got {:?}",
                    operator, attribute_ref, other
                )))
            }
        };
        return Ok(json!({
            "func": func,
            "val": attr_ref(attribute_ref),
            "num": num,
        }));
    }

    // InList and existence operators never reach a Comparison node
    Err(SegmentError::SchemaSerialization(format!(
        "operator {:?} is not a comparison operator",
        operator
    )))
}

fn attr_ref(name: &str) -> Value {
    json!({
        "func": "attr",
        "name": name,
    })
}
