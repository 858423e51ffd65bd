//! Error types for the segment compiler core

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

/// Main error type for the segment compiler core
#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("Unresolved mappings: {0:?}")]
    UnresolvedMappings(Vec<String>),

    #[error("Empty condition set: nothing to compile")]
    EmptyConditionSet,

    #[error("Schema serialization failure: {0}")]
    SchemaSerialization(String),

    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<SegmentError> for PyErr {
    fn from(err: SegmentError) -> PyErr {
        match err {
            SegmentError::UnresolvedMappings(terms) => {
                PyValueError::new_err(format!("Unresolved mappings: {}", terms.join(", ")))
            }
            SegmentError::EmptyConditionSet => {
                PyValueError::new_err("Empty condition set: nothing to compile")
            }
            SegmentError::SchemaSerialization(msg) => {
                PyRuntimeError::new_err(format!("Schema serialization failure: {}", msg))
            }
            SegmentError::InvalidVocabulary(msg) => {
                PyValueError::new_err(format!("Invalid vocabulary: {}", msg))
            }
            SegmentError::DeserializationError(msg) => {
                PyValueError::new_err(format!("Deserialization error: {}", msg))
            }
        }
    }
}

/// Result type alias for the segment compiler core
pub type Result<T> = std::result::Result<T, SegmentError>;
