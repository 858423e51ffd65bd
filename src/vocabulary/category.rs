//! Condition categories and evaluation contexts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a raw condition was recognized under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Device,
    Page,
    Event,
    Campaign,
    Custom,
    Geography,
    Time,
    Behavior,
}

impl Category {
    /// Fixed scan order for the extractor
    pub const SCAN_ORDER: [Category; 8] = [
        Category::Device,
        Category::Page,
        Category::Event,
        Category::Campaign,
        Category::Custom,
        Category::Geography,
        Category::Time,
        Category::Behavior,
    ];

    /// Whether the extractor accumulates every match instead of stopping at
    /// the first one. Behavior and custom requests may carry several
    /// independent signals ("page views and time on site").
    pub fn accumulates(self) -> bool {
        matches!(self, Category::Behavior | Category::Custom)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Device => "device",
            Category::Page => "page",
            Category::Event => "event",
            Category::Campaign => "campaign",
            Category::Custom => "custom",
            Category::Geography => "geography",
            Category::Time => "time",
            Category::Behavior => "behavior",
        };
        f.write_str(name)
    }
}

/// Evaluation scope a segment is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentContext {
    /// Entity level, broadest reach ("visitors")
    Entity,
    /// Session level ("visits")
    Session,
    /// Event level ("hits")
    Event,
}

impl SegmentContext {
    /// Wire token the target schema expects for this tier
    pub fn wire_token(self) -> &'static str {
        match self {
            SegmentContext::Entity => "visitors",
            SegmentContext::Session => "visits",
            SegmentContext::Event => "hits",
        }
    }

    /// Parse a wire token back into a tier
    pub fn from_wire_token(token: &str) -> Option<Self> {
        match token {
            "visitors" => Some(SegmentContext::Entity),
            "visits" => Some(SegmentContext::Session),
            "hits" => Some(SegmentContext::Event),
            _ => None,
        }
    }
}

impl fmt::Display for SegmentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tokens_round_trip() {
        for ctx in [
            SegmentContext::Entity,
            SegmentContext::Session,
            SegmentContext::Event,
        ] {
            assert_eq!(SegmentContext::from_wire_token(ctx.wire_token()), Some(ctx));
        }
        assert_eq!(SegmentContext::from_wire_token("pageviews"), None);
    }

    #[test]
    fn test_accumulating_categories() {
        assert!(Category::Behavior.accumulates());
        assert!(Category::Custom.accumulates());
        assert!(!Category::Device.accumulates());
        assert!(!Category::Geography.accumulates());
    }
}
