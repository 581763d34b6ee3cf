//! Source-language model: the openCypher query AST and the generic
//! depth-first walker used to traverse it.

pub mod ast;
pub mod walk;

pub use ast::*;
pub use walk::{expression_ref, walk, SyntaxNodeRef, Visitor};
