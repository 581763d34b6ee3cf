//! graphsql - openCypher to SQL translation over a fixed graph schema
//!
//! This crate turns parsed openCypher query models into SQL statements
//! against a two-table graph store:
//! - `node(id, kind_ids, properties)`
//! - `edge(id, start_id, end_id, kind_id, properties)`
//!
//! Each bound pattern element becomes a common table expression; pattern
//! and WHERE predicates are pushed down to the first CTE whose scope
//! satisfies them. The resulting statement model renders to SQL text
//! through an explicit-stack formatter, either with literals inlined or
//! with named parameters plus a value side table.

pub mod open_cypher_model;
pub mod pg_query_generator;
pub mod translate;

pub use pg_query_generator::{
    format_expression, format_statement, FormatError, FormatOptions, FormattedQuery,
};
pub use translate::{translate, KindMapError, KindMapper, TranslateError};
