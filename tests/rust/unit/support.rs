//! Shared fixtures: a map-backed kind mapper and builders for source query
//! models.

use std::collections::HashMap;

use graphsql::open_cypher_model::{
    Direction, Expression, Match, NodePattern, PatternElement, PatternPart, Projection,
    ProjectionItem, ReadingClause, RegularQuery, RelationshipPattern, SinglePartQuery,
    SingleQuery, Where,
};
use graphsql::{translate, FormatOptions, KindMapError, KindMapper};

pub struct MapKindMapper {
    kinds: HashMap<String, i16>,
}

impl MapKindMapper {
    pub fn new(entries: &[(&str, i16)]) -> Self {
        MapKindMapper {
            kinds: entries
                .iter()
                .map(|(name, id)| (name.to_string(), *id))
                .collect(),
        }
    }
}

impl KindMapper for MapKindMapper {
    fn map_kinds(&self, kinds: &[String]) -> Result<Vec<i16>, KindMapError> {
        Ok(kinds
            .iter()
            .filter_map(|kind| self.kinds.get(kind).copied())
            .collect())
    }

    fn assert_kinds(&self, kinds: &[String]) -> Result<Vec<i16>, KindMapError> {
        let unknown: Vec<String> = kinds
            .iter()
            .filter(|kind| !self.kinds.contains_key(*kind))
            .cloned()
            .collect();

        if unknown.is_empty() {
            self.map_kinds(kinds)
        } else {
            Err(KindMapError::UnknownKinds(unknown))
        }
    }
}

/// Translates and formats with literals materialized, panicking on failure.
pub fn to_sql(query: &RegularQuery, mapper: &MapKindMapper) -> String {
    let _ = env_logger::builder().is_test(true).try_init();

    let statement = translate(query, mapper).expect("translation succeeds");

    graphsql::format_statement(&statement, &FormatOptions::materialized())
        .expect("formatting succeeds")
        .sql
}

pub fn regular_query(
    reading_clauses: Vec<ReadingClause>,
    projection: Option<Projection>,
) -> RegularQuery {
    RegularQuery {
        single_query: SingleQuery::SinglePart(SinglePartQuery {
            reading_clauses,
            projection,
        }),
    }
}

pub fn match_clause(pattern: Vec<PatternPart>, where_clause: Option<Where>) -> ReadingClause {
    ReadingClause::Match(Match {
        optional: false,
        pattern,
        where_clause,
    })
}

pub fn pattern(elements: Vec<PatternElement>) -> PatternPart {
    PatternPart {
        binding: None,
        shortest_path: false,
        all_shortest_paths: false,
        elements,
    }
}

pub fn bound_pattern(binding: &str, elements: Vec<PatternElement>) -> PatternPart {
    PatternPart {
        binding: Some(binding.to_owned()),
        shortest_path: false,
        all_shortest_paths: false,
        elements,
    }
}

pub fn node(binding: Option<&str>, kinds: &[&str]) -> PatternElement {
    PatternElement::Node(NodePattern {
        binding: binding.map(str::to_owned),
        kinds: kinds.iter().map(|kind| kind.to_string()).collect(),
        properties: None,
    })
}

pub fn node_with_properties(binding: Option<&str>, properties: Expression) -> PatternElement {
    PatternElement::Node(NodePattern {
        binding: binding.map(str::to_owned),
        kinds: Vec::new(),
        properties: Some(Box::new(properties)),
    })
}

pub fn edge(binding: Option<&str>, kinds: &[&str], direction: Direction) -> PatternElement {
    PatternElement::Relationship(RelationshipPattern {
        binding: binding.map(str::to_owned),
        kinds: kinds.iter().map(|kind| kind.to_string()).collect(),
        direction,
        range: None,
        properties: None,
    })
}

pub fn returning(items: Vec<ProjectionItem>) -> Option<Projection> {
    Some(Projection {
        distinct: false,
        items,
        order: None,
        skip: None,
        limit: None,
    })
}

pub fn item(expression: Expression) -> ProjectionItem {
    ProjectionItem {
        expression: Box::new(expression),
        binding: None,
    }
}

pub fn aliased_item(expression: Expression, binding: &str) -> ProjectionItem {
    ProjectionItem {
        expression: Box::new(expression),
        binding: Some(binding.to_owned()),
    }
}

pub fn where_clause(expression: Expression) -> Option<Where> {
    Some(Where {
        expressions: vec![expression],
    })
}
