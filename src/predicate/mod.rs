//! Predicate tree construction and wire serialization

mod ast;
mod compiler;
mod serialize;


pub use ast::*;
pub use compiler::*;
pub use serialize::*;
