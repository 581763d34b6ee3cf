//! Target-language model: the SQL statement AST, the fixed `node`/`edge`
//! schema contract, and the explicit-stack SQL formatter.

pub mod ast;
pub mod errors;
pub mod format;
pub mod types;

pub use ast::*;
pub use errors::FormatError;
pub use format::{format_expression, format_statement, FormatOptions, FormattedQuery};
pub use types::{schema, DataType, Value};
