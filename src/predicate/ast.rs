//! Predicate tree for segment definitions

use serde::{Deserialize, Serialize};

/// AST node for a segment predicate tree
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateNode {
    /// Attribute comparison like mobiledevicetype = "Mobile Phone"
    Comparison {
        operator: Operator,
        attribute_ref: String,
        value: ConditionValue,
    },
    /// Event occurrence test like events/purchase exists
    EventTest { event_ref: String },
    /// Ordered list membership like dayofweek in [Saturday, Sunday]
    ListTest {
        attribute_ref: String,
        values: Vec<String>,
    },
    /// Logical combination of child predicates, never empty
    Group {
        connective: Connective,
        children: Vec<PredicateNode>,
    },
}

impl PredicateNode {
    /// Number of leaf conditions under this node
    pub fn leaf_count(&self) -> usize {
        match self {
            PredicateNode::Group { children, .. } => children.iter().map(Self::leaf_count).sum(),
            _ => 1,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, PredicateNode::Group { .. })
    }
}

/// Logical connective for predicate groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn wire_token(self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
        }
    }
}

/// Comparison and test operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// String equality (streq)
    StrEq,
    /// String inequality (not-streq)
    StrNotEq,
    /// Substring match (contains)
    Contains,
    /// Greater than (gt)
    Gt,
    /// Less than (lt)
    Lt,
    /// Greater than or equal (gte)
    Gte,
    /// Less than or equal (lte)
    Lte,
    /// Attribute existence
    Exists,
    /// Attribute non-existence
    NotExists,
    /// Ordered list membership (streq-in)
    InList,
    /// Event occurrence
    EventExists,
}

impl Operator {
    /// Wire token for comparison operators. Existence and list operators have
    /// dedicated leaf shapes and no bare token.
    pub fn wire_token(self) -> Option<&'static str> {
        match self {
            Operator::StrEq => Some("streq"),
            Operator::StrNotEq => Some("not-streq"),
            Operator::Contains => Some("contains"),
            Operator::Gt => Some("gt"),
            Operator::Lt => Some("lt"),
            Operator::Gte => Some("gte"),
            Operator::Lte => Some("lte"),
            Operator::InList => Some("streq-in"),
            Operator::EventExists => Some("event-exists"),
            Operator::Exists | Operator::NotExists => None,
        }
    }

    /// Whether this operator compares against a string literal
    pub fn is_string(self) -> bool {
        matches!(self, Operator::StrEq | Operator::StrNotEq | Operator::Contains)
    }

    /// Whether this operator compares against a numeric literal
    pub fn is_numeric(self) -> bool {
        matches!(self, Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte)
    }

    /// Whether this operator tests event occurrence
    pub fn is_existence(self) -> bool {
        matches!(
            self,
            Operator::Exists | Operator::NotExists | Operator::EventExists
        )
    }
}

/// Condition value types
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Str(String),
    Int(i64),
    Float(f64),
    List(Vec<String>),
}

impl ConditionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConditionValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Str(s.to_string())
    }
}

impl From<i64> for ConditionValue {
    fn from(n: i64) -> Self {
        ConditionValue::Int(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_classification_is_exhaustive() {
        let all = [
            Operator::StrEq,
            Operator::StrNotEq,
            Operator::Contains,
            Operator::Gt,
            Operator::Lt,
            Operator::Gte,
            Operator::Lte,
            Operator::Exists,
            Operator::NotExists,
            Operator::InList,
            Operator::EventExists,
        ];
        for op in all {
            let classes = [
                op.is_string(),
                op.is_numeric(),
                op.is_existence(),
                op == Operator::InList,
            ];
            assert_eq!(
                classes.iter().filter(|c| **c).count(),
                1,
                "operator {:?} must belong to exactly one leaf class",
                op
            );
        }
    }

    #[test]
    fn test_leaf_count() {
        let leaf = PredicateNode::EventTest {
            event_ref: "events/purchase".to_string(),
        };
        assert_eq!(leaf.leaf_count(), 1);

        let group = PredicateNode::Group {
            connective: Connective::And,
            children: vec![
                leaf.clone(),
                PredicateNode::Comparison {
                    operator: Operator::StrEq,
                    attribute_ref: "variables/geocountry".to_string(),
                    value: ConditionValue::Str("India".to_string()),
                },
            ],
        };
        assert_eq!(group.leaf_count(), 2);
        assert!(group.is_group());
    }
}
