use std::collections::HashMap;
use std::mem;

use crate::pg_query_generator::{
    schema, ArrayLiteral, BinaryExpression, CompositeValue, CompoundIdentifier, DataType,
    Expression, FromClause, Identifier, IdentifierSet, Operator, SelectItem,
};

use super::errors::TranslateError;

/// Issues fresh, collision-free identifiers for the three binding scopes:
/// `p` for pattern (path) bindings, `n` for nodes, `e` for edges.
#[derive(Debug, Default)]
pub struct IdentifierGenerator {
    counters: HashMap<DataType, usize>,
}

impl IdentifierGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self, data_type: DataType) -> Result<Identifier, TranslateError> {
        let prefix = match data_type {
            DataType::PathComposite => "p",
            DataType::NodeComposite => "n",
            DataType::EdgeComposite => "e",
            other => return Err(TranslateError::NoPrefixForDataType(other)),
        };

        let counter = self.counters.entry(data_type).or_insert(0);
        let identifier = Identifier::from(format!("{}{}", prefix, counter));
        *counter += 1;

        Ok(identifier)
    }
}

/// A pending predicate tagged with the identifiers it depends on. It stays
/// pending until every dependency has a FROM clause to live in.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub dependencies: IdentifierSet,
    pub expression: Expression,
}

/// Holds constraints until their dependency sets are satisfied by the
/// identifiers declared so far.
#[derive(Debug, Default)]
pub struct ConstraintTracker {
    constraints: Vec<Constraint>,
}

impl ConstraintTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Registers a predicate. A predicate over an already-seen dependency
    /// set is conjoined into the existing constraint, keeping at most one
    /// constraint per distinct set.
    pub fn constrain(&mut self, dependencies: IdentifierSet, expression: Expression) {
        if let Some(existing) = self
            .constraints
            .iter_mut()
            .find(|constraint| constraint.dependencies.matches(&dependencies))
        {
            let previous = mem::replace(&mut existing.expression, Expression::Wildcard);
            existing.expression = BinaryExpression::new(previous, Operator::And, expression);
        } else {
            self.constraints.push(Constraint {
                dependencies,
                expression,
            });
        }
    }

    /// Removes and conjoins every constraint whose dependencies are all in
    /// `available`. Scanning preserves insertion order, so the combined
    /// expression is deterministic.
    pub fn consume(&mut self, available: &IdentifierSet) -> Option<Constraint> {
        let mut matched: Option<Constraint> = None;
        let mut remaining = Vec::with_capacity(self.constraints.len());

        for constraint in self.constraints.drain(..) {
            if available.satisfies(&constraint.dependencies) {
                matched = Some(match matched {
                    Some(mut combined) => {
                        combined.dependencies.merge(&constraint.dependencies);
                        combined.expression = BinaryExpression::new(
                            combined.expression,
                            Operator::And,
                            constraint.expression,
                        );
                        combined
                    }
                    None => constraint,
                });
            } else {
                remaining.push(constraint);
            }
        }

        self.constraints = remaining;
        matched
    }

    /// Flushes every remaining constraint unconditionally. Used for the
    /// final SELECT, where all identifiers are in scope.
    pub fn consume_all(&mut self) -> Option<Constraint> {
        let mut all = IdentifierSet::new();

        for constraint in &self.constraints {
            all.merge(&constraint.dependencies);
        }

        self.consume(&all)
    }
}

/// One bound graph-pattern element: its generated relational identifier,
/// the source alias it answers to (if any), its composite kind, and the
/// identifiers a path depends on.
#[derive(Debug, Clone)]
pub struct TrackedIdentifier {
    pub identifier: Identifier,
    pub alias: Option<Identifier>,
    pub data_type: DataType,
    pub dependencies: Vec<Identifier>,
}

/// Maps source-language aliases to generated identifiers and records each
/// binding's metadata for RETURN translation.
#[derive(Debug, Default)]
pub struct IdentifierTracker {
    aliases: HashMap<String, Identifier>,
    tracked: HashMap<Identifier, TrackedIdentifier>,
}

impl IdentifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an unaliased generated identifier.
    pub fn track(&mut self, identifier: Identifier, data_type: DataType) {
        self.tracked.insert(
            identifier.clone(),
            TrackedIdentifier {
                identifier,
                alias: None,
                data_type,
                dependencies: Vec::new(),
            },
        );
    }

    /// Registers a generated identifier under its source-language alias.
    pub fn alias(&mut self, alias: impl Into<String>, identifier: Identifier, data_type: DataType) {
        let alias = alias.into();

        self.aliases.insert(alias.clone(), identifier.clone());
        self.tracked.insert(
            identifier.clone(),
            TrackedIdentifier {
                identifier,
                alias: Some(Identifier::from(alias)),
                data_type,
                dependencies: Vec::new(),
            },
        );
    }

    /// Records that `identifier` (a path) depends on `dependency`.
    pub fn depends_on(
        &mut self,
        identifier: &Identifier,
        dependency: Identifier,
    ) -> Result<(), TranslateError> {
        match self.tracked.get_mut(identifier) {
            Some(tracked) => {
                if !tracked.dependencies.contains(&dependency) {
                    tracked.dependencies.push(dependency);
                }
                Ok(())
            }
            None => Err(TranslateError::UntrackedIdentifier(
                identifier.0.clone(),
            )),
        }
    }

    pub fn lookup(&self, identifier: &Identifier) -> Result<&TrackedIdentifier, TranslateError> {
        self.tracked
            .get(identifier)
            .ok_or_else(|| TranslateError::UntrackedIdentifier(identifier.0.clone()))
    }

    pub fn lookup_alias(&self, alias: &str) -> Result<Identifier, TranslateError> {
        self.aliases
            .get(alias)
            .cloned()
            .ok_or_else(|| TranslateError::UnknownAlias(alias.to_owned()))
    }

    pub fn alias_exists(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    /// FROM clauses a projection of `identifier` needs: its own CTE for a
    /// node or edge, or one CTE per dependency for a path.
    pub fn build_from_clauses(
        &self,
        identifier: &Identifier,
    ) -> Result<Vec<FromClause>, TranslateError> {
        let tracked = self.lookup(identifier)?;

        match tracked.data_type {
            DataType::NodeComposite | DataType::EdgeComposite => {
                Ok(vec![FromClause::table(tracked.identifier.clone(), None)])
            }

            DataType::PathComposite => Ok(tracked
                .dependencies
                .iter()
                .map(|dependency| FromClause::table(dependency.clone(), None))
                .collect()),

            other => Err(TranslateError::unsupported(format!(
                "from clause for data type {}",
                other
            ))),
        }
    }

    /// The composite tuple projecting `identifier` as a graph entity.
    pub fn build_composite_value(
        &self,
        identifier: &Identifier,
    ) -> Result<Expression, TranslateError> {
        let tracked = self.lookup(identifier)?;

        match tracked.data_type {
            DataType::NodeComposite => Ok(node_composite(&tracked.identifier)),
            DataType::EdgeComposite => Ok(edge_composite(&tracked.identifier)),

            DataType::PathComposite => {
                let mut nodes = Vec::new();
                let mut edges = Vec::new();

                for dependency in &tracked.dependencies {
                    let dependency = self.lookup(dependency)?;

                    match dependency.data_type {
                        DataType::NodeComposite => {
                            nodes.push(node_composite(&dependency.identifier))
                        }
                        DataType::EdgeComposite => {
                            edges.push(edge_composite(&dependency.identifier))
                        }
                        other => {
                            return Err(TranslateError::unsupported(format!(
                                "path dependency of data type {}",
                                other
                            )))
                        }
                    }
                }

                Ok(Expression::CompositeValue(CompositeValue {
                    values: vec![
                        Expression::ArrayLiteral(ArrayLiteral {
                            values: nodes,
                            type_hint: DataType::NodeCompositeArray,
                        }),
                        Expression::ArrayLiteral(ArrayLiteral {
                            values: edges,
                            type_hint: DataType::EdgeCompositeArray,
                        }),
                    ],
                    data_type: DataType::PathComposite,
                }))
            }

            other => Err(TranslateError::unsupported(format!(
                "composite value for data type {}",
                other
            ))),
        }
    }

    /// Projection entry for `identifier`, aliased back to its source alias
    /// when one exists.
    pub fn build_projection(
        &self,
        identifier: &Identifier,
    ) -> Result<SelectItem, TranslateError> {
        let composite = self.build_composite_value(identifier)?;
        let tracked = self.lookup(identifier)?;

        Ok(match &tracked.alias {
            Some(alias) => SelectItem::Aliased {
                expression: composite,
                alias: alias.clone(),
            },
            None => SelectItem::Expression(composite),
        })
    }
}

fn node_composite(binding: &Identifier) -> Expression {
    Expression::CompositeValue(CompositeValue {
        values: schema::NODE_TABLE_COLUMNS
            .iter()
            .map(|column| {
                Expression::CompoundIdentifier(CompoundIdentifier::column(binding, column))
            })
            .collect(),
        data_type: DataType::NodeComposite,
    })
}

fn edge_composite(binding: &Identifier) -> Expression {
    Expression::CompositeValue(CompositeValue {
        values: schema::EDGE_TABLE_COLUMNS
            .iter()
            .map(|column| {
                Expression::CompoundIdentifier(CompoundIdentifier::column(binding, column))
            })
            .collect(),
        data_type: DataType::EdgeComposite,
    })
}
