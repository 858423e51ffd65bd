//! Segment document assembly
//!
//! Wraps a compiled predicate tree in the versioned document envelope the
//! analytics API accepts, and renders a human-readable summary of what the
//! segment selects.

mod assembler;
mod summary;

pub use assembler::*;
pub use summary::*;
