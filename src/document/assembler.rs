//! Document envelope around a predicate tree

use crate::error::{Result, SegmentError};
use crate::predicate::{predicate_to_json, PredicateNode};
use crate::vocabulary::SegmentContext;
use serde_json::{json, Value};

/// Schema version carried in every document
pub const SCHEMA_VERSION: [u8; 3] = [1, 0, 0];

/// A complete segment document ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDocument {
    pub name: String,
    pub description: String,
    /// Report suite the segment is scoped to
    pub rsid: String,
    pub context: SegmentContext,
    pub predicate: PredicateNode,
}

impl SegmentDocument {
    /// Serialize into the wire envelope. The root predicate goes into the
    /// container verbatim: a single condition stays a bare leaf, never
    /// wrapped in a one-child group.
    pub fn to_json(&self) -> Result<Value> {
        let pred = predicate_to_json(&self.predicate)?;
        Ok(json!({
            "name": self.name,
            "description": self.description,
            "rsid": self.rsid,
            "definition": {
                "version": SCHEMA_VERSION,
                "func": "segment",
                "container": {
                    "func": "container",
                    "context": self.context.wire_token(),
                    "pred": pred,
                },
            },
        }))
    }
}

/// Structural check on an assembled document, for callers that round-trip
/// documents through storage before submission.
pub fn validate_document(document: &Value) -> Result<()> {
    for field in ["name", "rsid"] {
        if document.get(field).and_then(Value::as_str).is_none() {
            return Err(SegmentError::SchemaSerialization(format!(
                "document is missing '{field}'"
            )));
        }
    }
    let definition = document
        .get("definition")
        .ok_or_else(|| SegmentError::SchemaSerialization("document has no definition".to_string()))?;
    if definition.get("func").and_then(Value::as_str) != Some("segment") {
        return Err(SegmentError::SchemaSerialization(
            "definition func must be 'segment'".to_string(),
        ));
    }
    let container = definition
        .get("container")
        .ok_or_else(|| SegmentError::SchemaSerialization("definition has no container".to_string()))?;
    let context = container
        .get("context")
        .and_then(Value::as_str)
        .ok_or_else(|| SegmentError::SchemaSerialization("container has no context".to_string()))?;
    if SegmentContext::from_wire_token(context).is_none() {
        return Err(SegmentError::SchemaSerialization(format!(
            "unknown container context '{context}'"
        )));
    }
    if container.get("pred").is_none() {
        return Err(SegmentError::SchemaSerialization(
            "container has no predicate".to_string(),
        ));
    }
    Ok(())
}
