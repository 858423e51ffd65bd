//! End-to-end compilation pipeline
//!
//! Wires the stages together: extraction (cached), attribute mapping,
//! context resolution, predicate compilation and document assembly. The
//! pipeline is synchronous and pure apart from the extraction cache; the
//! Python surface adds the async wrapper.

mod cache;
mod suggest;

pub use cache::*;
pub use suggest::*;

use crate::context::resolve_context;
use crate::document::{format_summary, SegmentDocument};
use crate::error::{Result, SegmentError};
use crate::extract::{score_confidence, ConfidenceTier};
use crate::mapping::{map_conditions, MappedCondition};
use crate::predicate::compile_predicate;
use crate::vocabulary::{Category, SegmentContext, Vocabulary};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Caller-supplied knobs for one compilation
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Segment name; suggested from the matched terms when absent
    pub name: Option<String>,
    pub description: Option<String>,
    /// Report suite the segment targets
    pub rsid: String,
    /// Custom-attribute resolutions, term key -> canonical path
    pub bindings: HashMap<String, String>,
    /// Concrete place for generic location words like "country"
    pub geography_value: Option<String>,
    /// Skip the vote and force a container context
    pub context_override: Option<SegmentContext>,
}

/// A fully compiled segment
#[derive(Debug, Clone)]
pub struct CompiledSegment {
    pub document: SegmentDocument,
    /// Wire JSON, assembled once at compile time
    pub json: Value,
    pub summary: String,
    pub confidence: ConfidenceTier,
    pub conditions: Vec<MappedCondition>,
}

/// Outcome of a compilation attempt. Unresolved attributes are a normal
/// outcome, not an error: the caller supplies bindings and retries.
#[derive(Debug, Clone)]
pub enum CompileOutcome {
    Compiled(Box<CompiledSegment>),
    /// Attributes the vocabulary could not resolve, e.g. "eVar: user_type"
    NeedsInput { missing: Vec<String> },
}

impl CompileOutcome {
    /// Unwrap into the compiled segment, turning unresolved attributes into
    /// an error for callers with no way to supply bindings
    pub fn into_compiled(self) -> Result<Box<CompiledSegment>> {
        match self {
            CompileOutcome::Compiled(segment) => Ok(segment),
            CompileOutcome::NeedsInput { missing } => {
                Err(SegmentError::UnresolvedMappings(missing))
            }
        }
    }
}

/// The compilation pipeline, parameterized by a vocabulary
#[derive(Clone)]
pub struct SegmentPipeline {
    vocabulary: Arc<Vocabulary>,
}

impl SegmentPipeline {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        SegmentPipeline { vocabulary }
    }

    /// Pipeline over the built-in vocabulary
    pub fn builtin() -> Self {
        SegmentPipeline {
            vocabulary: Arc::new(Vocabulary::builtin().clone()),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Detect creation intent in request text
    pub fn detect_intent(&self, text: &str) -> Option<crate::intent::IntentMatch> {
        crate::intent::detect_intent(&self.vocabulary, text)
    }

    /// Compile request text into a segment document.
    ///
    /// Does not gate on intent: the caller decides whether a request should
    /// be compiled at all (typically by checking [`Self::detect_intent`]
    /// first), so intent-free texts like follow-up answers still compile.
    ///
    /// Fails with [`SegmentError::EmptyConditionSet`] when no terms match at
    /// all; returns [`CompileOutcome::NeedsInput`] when terms matched but
    /// some attributes need caller bindings.
    pub fn compile(&self, text: &str, options: &CompileOptions) -> Result<CompileOutcome> {
        let raw = cache::get_or_extract(&self.vocabulary, text);
        if raw.is_empty() {
            return Err(SegmentError::EmptyConditionSet);
        }

        let mapping = map_conditions(
            &self.vocabulary,
            &raw,
            &options.bindings,
            options.geography_value.as_deref(),
        );
        if !mapping.is_resolved() {
            return Ok(CompileOutcome::NeedsInput {
                missing: mapping.missing,
            });
        }

        let categories: Vec<Category> = mapping.mapped.iter().map(|c| c.category).collect();
        let context = options
            .context_override
            .unwrap_or_else(|| resolve_context(&self.vocabulary, &categories));

        let predicate = compile_predicate(&mapping.mapped)?;

        let name = options
            .name
            .clone()
            .unwrap_or_else(|| suggest::suggest_name(&raw));
        let description = options
            .description
            .clone()
            .unwrap_or_else(|| suggest::suggest_description(&raw));

        let document = SegmentDocument {
            name,
            description,
            rsid: options.rsid.clone(),
            context,
            predicate,
        };
        let json = document.to_json()?;
        let summary = format_summary(&document.name, context, &mapping.mapped);
        let confidence = score_confidence(&raw);

        Ok(CompileOutcome::Compiled(Box::new(CompiledSegment {
            document,
            json,
            summary,
            confidence,
            conditions: mapping.mapped,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::PredicateNode;

    fn compile(text: &str) -> CompileOutcome {
        SegmentPipeline::builtin()
            .compile(text, &CompileOptions::default())
            .unwrap()
    }

    fn compiled(outcome: CompileOutcome) -> CompiledSegment {
        match outcome {
            CompileOutcome::Compiled(segment) => *segment,
            CompileOutcome::NeedsInput { missing } => {
                panic!("expected a compiled segment, missing: {missing:?}")
            }
        }
    }

    #[test]
    fn test_end_to_end_mobile_engagement() {
        let segment = compiled(compile(
            "create a segment for mobile users who visited more than 5 pages",
        ));
        assert_eq!(segment.document.name, "Mobile + Page Views Segment");
        assert_eq!(segment.conditions.len(), 2);
        assert_eq!(segment.confidence, ConfidenceTier::Medium);
        // Device (visit tier) vs behavior (visitor tier) ties to visitors
        assert_eq!(segment.document.context, SegmentContext::Entity);

        let pred = &segment.json["definition"]["container"]["pred"];
        assert_eq!(pred["func"], "and");
        let preds = pred["preds"].as_array().unwrap();
        assert_eq!(preds.len(), 2);
        assert_eq!(preds[0]["func"], "streq");
        assert_eq!(preds[0]["str"], "Mobile Phone");
        assert_eq!(preds[1]["func"], "gt");
        assert_eq!(preds[1]["num"], 5);
    }

    #[test]
    fn test_single_condition_stays_bare() {
        let segment = compiled(compile("segment of visitors from canada"));
        assert!(!segment.document.predicate.is_group());
        let pred = &segment.json["definition"]["container"]["pred"];
        assert_eq!(pred["func"], "streq");
        assert_eq!(pred["str"], "Canada");
        assert_eq!(segment.json["definition"]["container"]["context"], "visits");
    }

    #[test]
    fn test_missing_custom_attribute_needs_input() {
        let outcome = compile("segment for premium users");
        let CompileOutcome::NeedsInput { missing } = outcome else {
            panic!("expected missing mappings");
        };
        assert_eq!(missing, vec!["eVar: user_type".to_string()]);
    }

    #[test]
    fn test_bindings_unblock_compilation() {
        let options = CompileOptions {
            bindings: HashMap::from([("user_type".to_string(), "variables/evar1".to_string())]),
            ..Default::default()
        };
        let outcome = SegmentPipeline::builtin()
            .compile("segment for premium users", &options)
            .unwrap();
        let segment = compiled(outcome);
        assert!(matches!(
            segment.document.predicate,
            PredicateNode::Comparison { ref attribute_ref, .. }
                if attribute_ref == "variables/evar1"
        ));
    }

    #[test]
    fn test_into_compiled_surfaces_unresolved_mappings() {
        let outcome = compile("segment for premium users");
        assert!(matches!(
            outcome.into_compiled(),
            Err(SegmentError::UnresolvedMappings(_))
        ));
    }

    #[test]
    fn test_no_matching_terms_is_an_error() {
        let result =
            SegmentPipeline::builtin().compile("hello there", &CompileOptions::default());
        assert!(matches!(result, Err(SegmentError::EmptyConditionSet)));
    }

    #[test]
    fn test_explicit_options_override_suggestions() {
        let options = CompileOptions {
            name: Some("VIP Mobile".to_string()),
            description: Some("hand-written".to_string()),
            rsid: "myrsid".to_string(),
            context_override: Some(SegmentContext::Event),
            ..Default::default()
        };
        let segment = compiled(
            SegmentPipeline::builtin()
                .compile("mobile users", &options)
                .unwrap(),
        );
        assert_eq!(segment.document.name, "VIP Mobile");
        assert_eq!(segment.json["rsid"], "myrsid");
        assert_eq!(segment.json["definition"]["container"]["context"], "hits");
    }

    #[test]
    fn test_summary_mentions_every_condition() {
        let segment = compiled(compile(
            "create a segment for mobile users who purchased on weekends",
        ));
        assert!(segment.summary.contains("mobiledevicetype is Mobile Phone"));
        assert!(segment.summary.contains("purchase occurred"));
        assert!(segment.summary.contains("dayofweek is one of Saturday, Sunday"));
    }
}
