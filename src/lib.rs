//! Segment Compiler Core - natural-language to analytics segment definitions
//!
//! This crate compiles plain-English audience descriptions into versioned
//! segment definition documents, with Python bindings via PyO3.

use pyo3::prelude::*;

pub mod context;
pub mod document;
pub mod error;
pub mod extract;
pub mod intent;
pub mod mapping;
pub mod pipeline;
pub mod predicate;
pub mod vocabulary;

use crate::pipeline::{CompileOptions, CompileOutcome, SegmentPipeline};
use crate::vocabulary::{SegmentContext, Vocabulary};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::exceptions::PyValueError;
use pyo3::types::PyDict;
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Cached Pipeline
// ============================================================================

/// Global cached pipeline, rebuilt when the vocabulary is reloaded
static CACHED_PIPELINE: OnceCell<Arc<RwLock<SegmentPipeline>>> = OnceCell::new();

/// Pipeline for the current call. Falls back to the built-in vocabulary when
/// `init_vocabulary` was never called; cloning is cheap, the vocabulary is
/// behind an Arc.
fn current_pipeline() -> SegmentPipeline {
    match CACHED_PIPELINE.get() {
        Some(cached) => cached.read().clone(),
        None => SegmentPipeline::builtin(),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Deserialize custom-attribute bindings from a Python dict
fn deserialize_bindings(dict: &Bound<'_, PyDict>) -> PyResult<HashMap<String, String>> {
    let mut map = HashMap::new();
    for (key, value) in dict.iter() {
        let term: String = key.extract()?;
        let path: String = value.extract()?;
        map.insert(term, path);
    }
    Ok(map)
}

fn parse_context(token: &str) -> PyResult<SegmentContext> {
    SegmentContext::from_wire_token(token).ok_or_else(|| {
        PyValueError::new_err(format!(
            "unknown context '{token}', expected visitors, visits or hits"
        ))
    })
}

#[allow(clippy::too_many_arguments)]
fn build_options(
    name: Option<String>,
    description: Option<String>,
    rsid: Option<String>,
    bindings: Option<&Bound<'_, PyDict>>,
    geography_value: Option<String>,
    context: Option<String>,
) -> PyResult<CompileOptions> {
    Ok(CompileOptions {
        name,
        description,
        rsid: rsid.unwrap_or_default(),
        bindings: match bindings {
            Some(dict) => deserialize_bindings(dict)?,
            None => HashMap::new(),
        },
        geography_value,
        context_override: context.as_deref().map(parse_context).transpose()?,
    })
}

// ============================================================================
// Session Object
// ============================================================================

/// Compiled segment handed back to Python, with everything pre-rendered so
/// getters never re-enter Rust logic
#[pyclass]
pub struct SegmentSession {
    name: String,
    context: String,
    json: String,
    summary: String,
    confidence: String,
    missing_mappings: Vec<String>,
    condition_count: usize,
}

impl SegmentSession {
    fn from_outcome(outcome: CompileOutcome) -> PyResult<SegmentSession> {
        match outcome {
            CompileOutcome::Compiled(segment) => Ok(SegmentSession {
                name: segment.document.name.clone(),
                context: segment.document.context.wire_token().to_string(),
                json: serde_json::to_string(&segment.json)
                    .map_err(|e| crate::error::SegmentError::SchemaSerialization(e.to_string()))?,
                summary: segment.summary,
                confidence: segment.confidence.as_str().to_string(),
                missing_mappings: Vec::new(),
                condition_count: segment.conditions.len(),
            }),
            CompileOutcome::NeedsInput { missing } => Ok(SegmentSession {
                name: String::new(),
                context: String::new(),
                json: String::new(),
                summary: String::new(),
                confidence: String::new(),
                missing_mappings: missing,
                condition_count: 0,
            }),
        }
    }
}

#[pymethods]
impl SegmentSession {
    /// Whether compilation produced a document. False means the caller must
    /// supply bindings for `missing_mappings` and retry.
    #[getter]
    fn is_complete(&self) -> bool {
        self.missing_mappings.is_empty()
    }

    #[getter]
    fn name(&self) -> &str {
        &self.name
    }

    /// Container context wire token: visitors, visits or hits
    #[getter]
    fn context(&self) -> &str {
        &self.context
    }

    /// The full document as a JSON string
    #[getter]
    fn json(&self) -> &str {
        &self.json
    }

    #[getter]
    fn summary(&self) -> &str {
        &self.summary
    }

    #[getter]
    fn confidence(&self) -> &str {
        &self.confidence
    }

    /// Unresolved attributes, e.g. ["eVar: user_type"]
    #[getter]
    fn missing_mappings(&self) -> Vec<String> {
        self.missing_mappings.clone()
    }

    #[getter]
    fn condition_count(&self) -> usize {
        self.condition_count
    }
}

// ============================================================================
// Python Functions
// ============================================================================

/// Initialize the vocabulary (call once at startup)
///
/// Caches the parsed vocabulary in Rust memory. Without an argument the
/// built-in tables are used; a JSON string overrides individual sections and
/// inherits the rest.
#[pyfunction]
#[pyo3(signature = (vocabulary_json=None))]
fn init_vocabulary(vocabulary_json: Option<&str>) -> PyResult<()> {
    let vocabulary = match vocabulary_json {
        Some(json) => Vocabulary::from_json(json)?,
        None => Vocabulary::builtin().clone(),
    };
    let pipeline = SegmentPipeline::new(Arc::new(vocabulary));

    // If already initialized, swap the pipeline in place
    if let Some(existing) = CACHED_PIPELINE.get() {
        let mut guard = existing.write();
        *guard = pipeline;
    } else {
        let _ = CACHED_PIPELINE.set(Arc::new(RwLock::new(pipeline)));
    }

    Ok(())
}

/// Check if a vocabulary was explicitly initialized
#[pyfunction]
fn is_vocabulary_initialized() -> bool {
    CACHED_PIPELINE.get().is_some()
}

/// Detect creation intent in request text
///
/// # Returns
/// A `(object, keyword)` tuple, or None when the text carries no creation
/// intent
#[pyfunction]
fn detect_intent(text: &str) -> Option<(String, String)> {
    current_pipeline()
        .detect_intent(text)
        .map(|intent| (intent.object, intent.keyword))
}

/// Compile request text into a segment document
///
/// # Arguments
/// * `text` - The natural-language request
/// * `name` / `description` - Optional overrides for the suggested metadata
/// * `rsid` - Report suite the segment targets
/// * `bindings` - Custom-attribute resolutions, term key -> canonical path
/// * `geography_value` - Concrete place for generic location words
/// * `context` - Force a container context: "visitors", "visits" or "hits"
///
/// # Returns
/// A SegmentSession; check `is_complete` before using the document
///
/// # Raises
/// ValueError when no conditions could be extracted from the text
#[pyfunction]
#[pyo3(signature = (text, name=None, description=None, rsid=None, bindings=None, geography_value=None, context=None))]
fn compile_segment(
    text: &str,
    name: Option<String>,
    description: Option<String>,
    rsid: Option<String>,
    bindings: Option<&Bound<'_, PyDict>>,
    geography_value: Option<String>,
    context: Option<String>,
) -> PyResult<SegmentSession> {
    let options = build_options(name, description, rsid, bindings, geography_value, context)?;
    let outcome = current_pipeline().compile(text, &options)?;
    SegmentSession::from_outcome(outcome)
}

/// Structurally validate a segment document JSON string
///
/// # Raises
/// ValueError when the string is not JSON, RuntimeError when the envelope is
/// structurally wrong
#[pyfunction]
fn validate_document(document_json: &str) -> PyResult<()> {
    let document: serde_json::Value = serde_json::from_str(document_json)
        .map_err(|e| crate::error::SegmentError::DeserializationError(e.to_string()))?;
    crate::document::validate_document(&document)?;
    Ok(())
}

/// Compile request text asynchronously
///
/// Runs compilation in a background thread via Tokio's spawn_blocking so
/// Python's asyncio event loop stays responsive.
///
/// # Example (Python)
/// ```python
/// session = await compile_segment_async("segment for mobile users")
/// print(session.summary)
/// ```
#[pyfunction]
#[pyo3(signature = (text, name=None, description=None, rsid=None, bindings=None, geography_value=None, context=None))]
#[allow(clippy::too_many_arguments)]
fn compile_segment_async<'py>(
    py: Python<'py>,
    text: String,
    name: Option<String>,
    description: Option<String>,
    rsid: Option<String>,
    bindings: Option<&Bound<'py, PyDict>>,
    geography_value: Option<String>,
    context: Option<String>,
) -> PyResult<Bound<'py, PyAny>> {
    // Extract Python-side arguments before entering the async context
    let options = build_options(name, description, rsid, bindings, geography_value, context)?;
    let pipeline = current_pipeline();

    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let session = tokio::task::spawn_blocking(move || {
            let outcome = pipeline.compile(&text, &options)?;
            SegmentSession::from_outcome(outcome)
        })
        .await
        .map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                "Compilation task panicked: {}",
                e
            ))
        })??;

        Ok(session)
    })
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn segment_compiler_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_vocabulary, m)?)?;
    m.add_function(wrap_pyfunction!(is_vocabulary_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(detect_intent, m)?)?;
    m.add_function(wrap_pyfunction!(compile_segment, m)?)?;
    m.add_function(wrap_pyfunction!(validate_document, m)?)?;
    m.add_function(wrap_pyfunction!(compile_segment_async, m)?)?;
    m.add_class::<SegmentSession>()?;
    Ok(())
}
