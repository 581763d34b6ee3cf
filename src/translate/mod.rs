//! Translation of openCypher query models into SQL statement models.
//!
//! The translator walks the source AST once, depth first. Pattern elements
//! allocate bound identifiers and register pending constraints; each bound
//! node and edge becomes a common table expression over the fixed `node` /
//! `edge` schema, filtered by exactly the constraints whose dependencies
//! are in scope at that point. The RETURN clause becomes the final SELECT
//! over those CTEs.

use std::mem;

use log::{debug, trace};

use crate::open_cypher_model::{self as model, Direction, SyntaxNodeRef, Visitor};
use crate::pg_query_generator::{
    opt_and, schema, ArrayLiteral, BinaryExpression, CommonTableExpression, DataType, Expression,
    FromClause, FunctionCall, Identifier, IdentifierSet, Literal, Operator, OrderBy, Parameter,
    Query, Select, SelectItem, SetExpression, Statement, TableAlias, UnaryExpression, Value,
};

pub mod errors;
pub mod expression;
pub mod functions;
pub mod pattern;
pub mod tracking;

pub use errors::{KindMapError, MultipleErrors, TranslateError};

use expression::{extract_identifier_references, ExpressionTreeTranslator};
use functions::translate_function_name;
use pattern::Pattern;
use tracking::{IdentifierGenerator, IdentifierTracker};

/// External collaborator that resolves graph kind labels to their numeric
/// storage IDs.
pub trait KindMapper {
    /// Maps the kind names that are known, skipping any that are not.
    fn map_kinds(&self, kinds: &[String]) -> Result<Vec<i16>, KindMapError>;

    /// Maps every kind name, failing if any of them is unknown.
    fn assert_kinds(&self, kinds: &[String]) -> Result<Vec<i16>, KindMapError>;
}

/// Translates a source query model into a SQL statement model.
pub fn translate(
    query: &model::RegularQuery,
    kind_mapper: &dyn KindMapper,
) -> Result<Statement, TranslateError> {
    let mut translator = Translator::new(kind_mapper);

    model::walk(SyntaxNodeRef::RegularQuery(query), &mut translator)?;
    translator.finish()
}

/// Query sections the translation pass moves through, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Pattern,
    Match,
    Where,
    Projection,
}

/// Single-use, single-threaded translation state. One instance translates
/// exactly one query; all trackers and counters die with it.
pub struct Translator<'a> {
    kind_mapper: &'a dyn KindMapper,
    state: State,

    expressions: ExpressionTreeTranslator,
    identifier_generator: IdentifierGenerator,
    identifiers: IdentifierTracker,

    pattern: Option<Pattern>,
    patterns: Vec<Pattern>,

    /// Identifiers whose CTEs have been emitted so far.
    declared: IdentifierSet,

    query: Query,
    projection: Select,
    /// Identifiers a projection item depends on beyond what its final
    /// expression still references (e.g. the argument of `count(n)` after
    /// the wildcard rewrite).
    projection_dependencies: IdentifierSet,
    has_projection: bool,

    errors: Vec<TranslateError>,
}

impl<'a> Translator<'a> {
    pub fn new(kind_mapper: &'a dyn KindMapper) -> Self {
        Translator {
            kind_mapper,
            state: State::Start,
            expressions: ExpressionTreeTranslator::new(),
            identifier_generator: IdentifierGenerator::new(),
            identifiers: IdentifierTracker::new(),
            pattern: None,
            patterns: Vec::new(),
            declared: IdentifierSet::new(),
            query: Query::default(),
            projection: Select::default(),
            projection_dependencies: IdentifierSet::new(),
            has_projection: false,
            errors: Vec::new(),
        }
    }

    /// Consumes the translator, reporting every accumulated problem or
    /// producing the finished statement.
    pub fn finish(mut self) -> Result<Statement, TranslateError> {
        if !self.has_projection {
            self.errors.push(TranslateError::MissingReturnClause);
        }

        if !self.errors.is_empty() {
            return Err(if self.errors.len() == 1 {
                self.errors.remove(0)
            } else {
                TranslateError::Multiple(MultipleErrors(self.errors))
            });
        }

        let mut query = self.query;
        query.body = SetExpression::Select(self.projection);

        Ok(Statement::Query(query))
    }

    fn capture(&mut self, result: Result<(), TranslateError>) {
        if let Err(error) = result {
            self.errors.push(error);
        }
    }

    fn transition(&mut self, next: State) {
        if self.state != next {
            debug!("translation state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn current_pattern(&mut self) -> Result<&mut Pattern, TranslateError> {
        self.pattern
            .as_mut()
            .ok_or_else(|| TranslateError::unsupported("pattern element outside a pattern part"))
    }

    /// Resolves a pattern element's binding to an identifier: an existing
    /// alias is reused so `(a)-[]->(a)` refers to one bound node, anything
    /// else gets a fresh identifier. Reuse under a different composite kind
    /// (a node variable reappearing as an edge) is a structural error.
    fn bind_source_alias(
        &mut self,
        binding: &Option<String>,
        data_type: DataType,
    ) -> Result<Identifier, TranslateError> {
        match binding {
            Some(alias) if self.identifiers.alias_exists(alias) => {
                let identifier = self.identifiers.lookup_alias(alias)?;
                let bound = self.identifiers.lookup(&identifier)?.data_type;

                if bound != data_type {
                    return Err(TranslateError::ConflictingAliasUse {
                        alias: alias.clone(),
                        bound,
                        requested: data_type,
                    });
                }

                Ok(identifier)
            }

            Some(alias) => {
                let identifier = self.identifier_generator.fresh(data_type)?;
                self.identifiers
                    .alias(alias.clone(), identifier.clone(), data_type);
                Ok(identifier)
            }

            None => {
                let identifier = self.identifier_generator.fresh(data_type)?;
                self.identifiers.track(identifier.clone(), data_type);
                Ok(identifier)
            }
        }
    }

    fn enter_pattern_part(&mut self, part: &model::PatternPart) -> Result<(), TranslateError> {
        self.transition(State::Pattern);

        if part.shortest_path || part.all_shortest_paths {
            return Err(TranslateError::unsupported("shortest path traversal"));
        }

        let binding = match &part.binding {
            Some(alias) => {
                let identifier = self.identifier_generator.fresh(DataType::PathComposite)?;
                self.identifiers
                    .alias(alias.clone(), identifier.clone(), DataType::PathComposite);
                Some(identifier)
            }
            None => None,
        };

        self.pattern = Some(Pattern::new(part.elements.len() > 1, binding));
        Ok(())
    }

    fn enter_node_pattern(&mut self, node: &model::NodePattern) -> Result<(), TranslateError> {
        let identifier = self.bind_source_alias(&node.binding, DataType::NodeComposite)?;

        if !node.kinds.is_empty() {
            let kind_ids = self.kind_mapper.assert_kinds(&node.kinds)?;

            self.expressions.constraints.constrain(
                single_dependency(&identifier),
                node_kind_constraint(&identifier, &kind_ids),
            );
        }

        if let Some(properties) = &node.properties {
            self.constrain_properties(&identifier, properties)?;
        }

        self.current_pattern()?.bind_node(identifier)
    }

    fn enter_relationship_pattern(
        &mut self,
        relationship: &model::RelationshipPattern,
    ) -> Result<(), TranslateError> {
        if relationship.range.is_some() {
            return Err(TranslateError::unsupported(
                "variable-length relationship patterns",
            ));
        }

        let identifier = self.bind_source_alias(&relationship.binding, DataType::EdgeComposite)?;

        if !relationship.kinds.is_empty() {
            let kind_ids = self.kind_mapper.assert_kinds(&relationship.kinds)?;

            self.expressions.constraints.constrain(
                single_dependency(&identifier),
                edge_kind_constraint(&identifier, &kind_ids),
            );
        }

        if let Some(properties) = &relationship.properties {
            self.constrain_properties(&identifier, properties)?;
        }

        self.current_pattern()?
            .bind_edge(identifier, relationship.direction)
    }

    /// Inline property matchers (`{name: 'x'}`) become one constraint per
    /// entry on the element's identifier, comparing the JSONB field against
    /// the literal or parameter value.
    fn constrain_properties(
        &mut self,
        identifier: &Identifier,
        properties: &model::Expression,
    ) -> Result<(), TranslateError> {
        match properties {
            model::Expression::MapLiteral(map) => {
                for (key, value) in &map.entries {
                    let matcher = BinaryExpression::new(
                        BinaryExpression::new(
                            Expression::column(identifier, schema::COLUMN_PROPERTIES),
                            Operator::JsonField,
                            Expression::literal(key.as_str()),
                        ),
                        Operator::Equals,
                        self.translate_primitive(value)?,
                    );

                    self.expressions
                        .constraints
                        .constrain(single_dependency(identifier), matcher);
                }

                Ok(())
            }

            _ => Err(TranslateError::unsupported(
                "property matchers must be map literals",
            )),
        }
    }

    /// Scalar translation for positions that cannot hold a computed
    /// expression: literals and named parameters only.
    fn translate_primitive(
        &self,
        expression: &model::Expression,
    ) -> Result<Expression, TranslateError> {
        match expression {
            model::Expression::Literal(literal) => Ok(Expression::Literal(Literal {
                value: literal_value(literal),
            })),

            model::Expression::Parameter(parameter) => Ok(Expression::Parameter(Parameter {
                name: Identifier::from(parameter.symbol.clone()),
                value: literal_value(&parameter.value),
            })),

            _ => Err(TranslateError::unsupported(
                "expected a literal or parameter value",
            )),
        }
    }

    fn enter_list_literal(&mut self, list: &model::ListLiteral) -> Result<(), TranslateError> {
        let values = list
            .values
            .iter()
            .map(|value| self.translate_primitive(value))
            .collect::<Result<Vec<_>, _>>()?;

        let type_hint = values
            .first()
            .and_then(|value| match value {
                Expression::Literal(literal) => literal.type_hint().to_array_type(),
                Expression::Parameter(parameter) => parameter.value.type_hint().to_array_type(),
                _ => None,
            })
            .unwrap_or(DataType::Unknown);

        self.expressions
            .push_operand(Expression::ArrayLiteral(ArrayLiteral { values, type_hint }));
        Ok(())
    }

    fn enter_kind_matcher(&mut self, matcher: &model::KindMatcher) -> Result<(), TranslateError> {
        let identifier = match matcher.reference.as_ref() {
            model::Expression::Variable(variable) => {
                self.identifiers.lookup_alias(&variable.symbol)?
            }
            _ => {
                return Err(TranslateError::unsupported(
                    "kind matchers must reference a pattern variable",
                ))
            }
        };

        let kind_ids = self.kind_mapper.assert_kinds(&matcher.kinds)?;
        let expression = match self.identifiers.lookup(&identifier)?.data_type {
            DataType::NodeComposite => node_kind_constraint(&identifier, &kind_ids),
            DataType::EdgeComposite => edge_kind_constraint(&identifier, &kind_ids),
            other => {
                return Err(TranslateError::unsupported(format!(
                    "kind matcher over a {} binding",
                    other
                )))
            }
        };

        self.expressions.push_operand(expression);
        Ok(())
    }

    fn enter_property_lookup(
        &mut self,
        lookup: &model::PropertyLookup,
    ) -> Result<(), TranslateError> {
        let identifier = match lookup.atom.as_ref() {
            model::Expression::Variable(variable) => {
                self.identifiers.lookup_alias(&variable.symbol)?
            }
            _ => {
                return Err(TranslateError::unsupported(
                    "property access on a non-variable expression",
                ))
            }
        };

        self.expressions.push_property_lookup(
            Expression::column(&identifier, schema::COLUMN_PROPERTIES),
            &lookup.symbols,
        );
        Ok(())
    }

    fn exit_function_invocation(
        &mut self,
        invocation: &model::FunctionInvocation,
    ) -> Result<(), TranslateError> {
        let mut parameters = Vec::with_capacity(invocation.arguments.len());

        for _ in 0..invocation.arguments.len() {
            parameters.push(self.expressions.pop_operand()?);
        }
        parameters.reverse();

        // id(n) reads the bound entity's id column, no SQL function call.
        if invocation.name.eq_ignore_ascii_case("id") {
            return match parameters.as_slice() {
                [Expression::Identifier(identifier)] => {
                    self.expressions
                        .push_operand(Expression::column(identifier, schema::COLUMN_ID));
                    Ok(())
                }
                _ => Err(TranslateError::unsupported(
                    "id() over a non-variable argument",
                )),
            };
        }

        let function = translate_function_name(&invocation.name)?;

        // count over a bound entity counts rows of its CTE.
        if function == Identifier::from("count") {
            if let [Expression::Identifier(identifier)] = parameters.as_slice() {
                self.projection_dependencies.add(identifier.clone());
                parameters[0] = Expression::Wildcard;
            }
        }

        self.expressions
            .push_operand(Expression::FunctionCall(FunctionCall {
                distinct: invocation.distinct,
                function,
                parameters,
            }));
        Ok(())
    }

    fn exit_negation(&mut self) -> Result<(), TranslateError> {
        let operand = match self.expressions.pop_operand()? {
            binary @ Expression::Binary(_) => Expression::parenthetical(binary),
            other => other,
        };

        self.expressions
            .push_operand(UnaryExpression::new(Operator::Not, operand));
        Ok(())
    }

    fn exit_pattern_part(&mut self) {
        if let Some(pattern) = self.pattern.take() {
            self.patterns.push(pattern);
        }
    }

    /// Turns every pattern gathered by the current MATCH clause into CTEs,
    /// left to right. Identifier declaration is cumulative, so a later
    /// pattern's constraints may join against an earlier pattern's CTEs.
    fn translate_match(&mut self) -> Result<(), TranslateError> {
        for pattern in mem::take(&mut self.patterns) {
            if !pattern.is_traversal {
                let identifier = pattern.node_select.identifier.clone().ok_or_else(|| {
                    TranslateError::unsupported("pattern part without a node pattern")
                })?;

                self.emit_cte(identifier, schema::TABLE_NODE)?;
                continue;
            }

            for step in &pattern.traversal_steps {
                let left = step
                    .left_node
                    .clone()
                    .ok_or(TranslateError::MisplacedRelationshipPattern)?;
                let edge = step
                    .edge
                    .clone()
                    .ok_or(TranslateError::MisplacedRelationshipPattern)?;
                let right = step
                    .right_node
                    .clone()
                    .ok_or(TranslateError::MisplacedRelationshipPattern)?;

                let (left_edge_column, right_edge_column) = match step.direction {
                    Direction::Outbound => (schema::COLUMN_START_ID, schema::COLUMN_END_ID),
                    Direction::Inbound => (schema::COLUMN_END_ID, schema::COLUMN_START_ID),
                    Direction::Bidirectional => {
                        return Err(TranslateError::UnsupportedDirection(step.direction))
                    }
                };

                self.emit_cte(left.clone(), schema::TABLE_NODE)?;

                let left_join = BinaryExpression::new(
                    Expression::column(&left, schema::COLUMN_ID),
                    Operator::Equals,
                    Expression::column(&edge, left_edge_column),
                );
                let right_join = BinaryExpression::new(
                    Expression::column(&right, schema::COLUMN_ID),
                    Operator::Equals,
                    Expression::column(&edge, right_edge_column),
                );

                self.expressions
                    .constraints
                    .constrain(pair_dependency(&left, &edge), left_join.clone());
                self.emit_cte(edge.clone(), schema::TABLE_EDGE)?;

                self.expressions
                    .constraints
                    .constrain(pair_dependency(&right, &edge), right_join.clone());
                self.emit_cte(right.clone(), schema::TABLE_NODE)?;

                // A bound path needs the step's join predicates again when
                // its own projection cross-joins the step CTEs.
                if let Some(path) = &pattern.binding {
                    self.expressions.constraints.constrain(
                        single_dependency(path),
                        BinaryExpression::new(left_join, Operator::And, right_join),
                    );

                    for element in [&left, &edge, &right] {
                        self.identifiers.depends_on(path, (*element).clone())?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Emits one CTE scanning `table` as `identifier`, filtered by every
    /// constraint satisfiable now that this identifier is in scope. Foreign
    /// dependencies of consumed constraints join in as extra FROM entries.
    fn emit_cte(&mut self, identifier: Identifier, table: &str) -> Result<(), TranslateError> {
        if self.declared.contains(&identifier) {
            return Ok(());
        }

        let mut available = self.declared.clone();
        available.add(identifier.clone());

        let mut select = Select {
            projection: vec![SelectItem::Expression(Expression::Wildcard)],
            from: vec![FromClause::table(
                Identifier::from(table),
                Some(identifier.clone()),
            )],
            ..Select::default()
        };

        if let Some(constraint) = self.expressions.constraints.consume(&available) {
            trace!(
                "cte {} consumes constraints over {:?}",
                identifier,
                constraint.dependencies.slice()
            );

            for dependency in constraint.dependencies.slice() {
                if dependency != identifier {
                    select.from.push(FromClause::table(dependency, None));
                }
            }

            select.where_clause = Some(constraint.expression);
        }

        debug!("emitting cte {} over {}", identifier, table);

        self.query.add_cte(CommonTableExpression {
            alias: TableAlias::new(identifier.clone()),
            materialized: None,
            query: Query::single_select(select),
        });

        self.declared.add(identifier);
        Ok(())
    }

    fn push_projection_from(&mut self, clause: FromClause) {
        let exists = self.projection.from.iter().any(|existing| {
            existing.source.name == clause.source.name
                && existing.source.binding == clause.source.binding
        });

        if !exists {
            self.projection.from.push(clause);
        }
    }

    fn add_projection_dependencies(
        &mut self,
        references: &IdentifierSet,
    ) -> Result<(), TranslateError> {
        for reference in references.slice() {
            for clause in self.identifiers.build_from_clauses(&reference)? {
                self.push_projection_from(clause);
            }
        }

        Ok(())
    }

    fn exit_projection_item(&mut self, item: &model::ProjectionItem) -> Result<(), TranslateError> {
        let binding = item
            .binding
            .as_ref()
            .map(|alias| Identifier::from(alias.clone()));

        match self.expressions.pop_operand()? {
            // A bare bound variable projects as its composite value, renamed
            // by an explicit `as` binding when one is present.
            Expression::Identifier(identifier) => {
                self.add_projection_dependencies(&single_dependency(&identifier))?;

                let item = match binding {
                    Some(alias) => SelectItem::Aliased {
                        expression: self.identifiers.build_composite_value(&identifier)?,
                        alias,
                    },
                    None => self.identifiers.build_projection(&identifier)?,
                };

                self.projection.projection.push(item);
            }

            expression => {
                let mut references = extract_identifier_references(&expression)?;
                references.merge(&mem::replace(
                    &mut self.projection_dependencies,
                    IdentifierSet::new(),
                ));
                self.add_projection_dependencies(&references)?;

                self.projection.projection.push(match binding {
                    Some(alias) => SelectItem::Aliased { expression, alias },
                    None => SelectItem::Expression(expression),
                });
            }
        }

        Ok(())
    }

    fn exit_sort_item(&mut self, item: &model::SortItem) -> Result<(), TranslateError> {
        let expression = match self.expressions.pop_operand()? {
            Expression::Identifier(identifier) => {
                self.add_projection_dependencies(&single_dependency(&identifier))?;
                self.identifiers.build_composite_value(&identifier)?
            }

            expression => {
                let references = extract_identifier_references(&expression)?;
                self.add_projection_dependencies(&references)?;
                expression
            }
        };

        self.projection.order_by.push(OrderBy {
            expression,
            ascending: item.ascending,
        });
        Ok(())
    }

    /// Flushes every remaining constraint into the final SELECT and makes
    /// sure their dependency tables are joined in.
    fn exit_projection(&mut self) -> Result<(), TranslateError> {
        if let Some(constraint) = self.expressions.constraints.consume_all() {
            trace!(
                "final select consumes constraints over {:?}",
                constraint.dependencies.slice()
            );

            for dependency in constraint.dependencies.slice() {
                for clause in self.identifiers.build_from_clauses(&dependency)? {
                    self.push_projection_from(clause);
                }
            }

            self.projection.where_clause =
                Some(opt_and(self.projection.where_clause.take(), constraint.expression));
        }

        Ok(())
    }

    fn enter_node(&mut self, node: SyntaxNodeRef<'_>) -> Result<(), TranslateError> {
        match node {
            SyntaxNodeRef::MultiPartQuery(_) => Err(TranslateError::UnsupportedMultiPartQuery),

            SyntaxNodeRef::Match(match_clause) => {
                self.transition(State::Match);

                if match_clause.optional {
                    Err(TranslateError::unsupported("optional match"))
                } else {
                    Ok(())
                }
            }

            SyntaxNodeRef::PatternPart(part) => self.enter_pattern_part(part),
            SyntaxNodeRef::NodePattern(pattern) => self.enter_node_pattern(pattern),
            SyntaxNodeRef::RelationshipPattern(pattern) => {
                self.enter_relationship_pattern(pattern)
            }

            SyntaxNodeRef::Where(_) => {
                self.transition(State::Where);
                Ok(())
            }

            SyntaxNodeRef::Projection(projection) => {
                self.transition(State::Projection);
                self.has_projection = true;
                self.projection.distinct = projection.distinct;
                Ok(())
            }

            SyntaxNodeRef::Skip(skip) => {
                self.projection.offset = Some(self.translate_primitive(&skip.value)?);
                Ok(())
            }

            SyntaxNodeRef::Limit(limit) => {
                self.projection.limit = Some(self.translate_primitive(&limit.value)?);
                Ok(())
            }

            SyntaxNodeRef::Conjunction(conjunction) => {
                for _ in 1..conjunction.expressions.len() {
                    self.expressions.visit_operator(model::Operator::And);
                }
                Ok(())
            }

            SyntaxNodeRef::Disjunction(disjunction) => {
                for _ in 1..disjunction.expressions.len() {
                    self.expressions.visit_operator(model::Operator::Or);
                }
                Ok(())
            }

            SyntaxNodeRef::ExclusiveDisjunction(_) => Err(TranslateError::unsupported(
                "exclusive disjunction (xor)",
            )),

            SyntaxNodeRef::Parenthetical(_) => {
                self.expressions.enter_parenthetical();
                Ok(())
            }

            SyntaxNodeRef::Variable(variable) => {
                let identifier = self.identifiers.lookup_alias(&variable.symbol)?;
                self.expressions
                    .push_operand(Expression::Identifier(identifier));
                Ok(())
            }

            SyntaxNodeRef::Literal(literal) => {
                self.expressions.push_operand(Expression::Literal(Literal {
                    value: literal_value(literal),
                }));
                Ok(())
            }

            SyntaxNodeRef::Parameter(parameter) => {
                self.expressions
                    .push_operand(Expression::Parameter(Parameter {
                        name: Identifier::from(parameter.symbol.clone()),
                        value: literal_value(&parameter.value),
                    }));
                Ok(())
            }

            SyntaxNodeRef::PropertyLookup(lookup) => self.enter_property_lookup(lookup),
            SyntaxNodeRef::KindMatcher(matcher) => self.enter_kind_matcher(matcher),
            SyntaxNodeRef::ListLiteral(list) => self.enter_list_literal(list),

            SyntaxNodeRef::MapLiteral(_) => Err(TranslateError::unsupported(
                "map literals outside pattern property matchers",
            )),

            _ => Ok(()),
        }
    }

    fn exit_node(&mut self, node: SyntaxNodeRef<'_>) -> Result<(), TranslateError> {
        match node {
            SyntaxNodeRef::PartialComparison(partial) => {
                self.expressions.complete_binary_expression(partial.operator)
            }

            SyntaxNodeRef::PartialArithmeticExpression(partial) => {
                self.expressions.complete_binary_expression(partial.operator)
            }

            SyntaxNodeRef::Conjunction(conjunction) => {
                for _ in 1..conjunction.expressions.len() {
                    self.expressions
                        .complete_binary_expression(model::Operator::And)?;
                }
                Ok(())
            }

            SyntaxNodeRef::Disjunction(disjunction) => {
                for _ in 1..disjunction.expressions.len() {
                    self.expressions
                        .complete_binary_expression(model::Operator::Or)?;
                }
                Ok(())
            }

            SyntaxNodeRef::Negation(_) => self.exit_negation(),

            SyntaxNodeRef::Parenthetical(_) => self.expressions.exit_parenthetical(),

            SyntaxNodeRef::FunctionInvocation(invocation) => {
                self.exit_function_invocation(invocation)
            }

            SyntaxNodeRef::Where(_) => self.expressions.constrain_remaining_operands(),

            SyntaxNodeRef::PatternPart(_) => {
                self.exit_pattern_part();
                Ok(())
            }

            SyntaxNodeRef::Match(_) => self.translate_match(),

            SyntaxNodeRef::ProjectionItem(item) => self.exit_projection_item(item),
            SyntaxNodeRef::SortItem(item) => self.exit_sort_item(item),
            SyntaxNodeRef::Projection(_) => self.exit_projection(),

            _ => Ok(()),
        }
    }
}

impl<'a> Visitor for Translator<'a> {
    type Error = TranslateError;

    fn enter(&mut self, node: SyntaxNodeRef<'_>) -> Result<(), TranslateError> {
        let result = self.enter_node(node);
        self.capture(result);
        Ok(())
    }

    fn exit(&mut self, node: SyntaxNodeRef<'_>) -> Result<(), TranslateError> {
        let result = self.exit_node(node);
        self.capture(result);
        Ok(())
    }
}

fn literal_value(literal: &model::Literal) -> Value {
    match literal {
        model::Literal::Null => Value::Null,
        model::Literal::Boolean(value) => Value::Boolean(*value),
        model::Literal::Integer(value) => Value::Int64(*value),
        model::Literal::Float(value) => Value::Float64(*value),
        model::Literal::String(value) => Value::Text(value.clone()),
    }
}

fn single_dependency(identifier: &Identifier) -> IdentifierSet {
    let mut dependencies = IdentifierSet::new();
    dependencies.add(identifier.clone());
    dependencies
}

fn pair_dependency(first: &Identifier, second: &Identifier) -> IdentifierSet {
    let mut dependencies = IdentifierSet::new();
    dependencies.add(first.clone());
    dependencies.add(second.clone());
    dependencies
}

fn kind_id_array(kind_ids: &[i16]) -> Expression {
    Expression::ArrayLiteral(ArrayLiteral {
        values: kind_ids.iter().map(|id| Expression::literal(*id)).collect(),
        type_hint: DataType::Int2Array,
    })
}

/// Nodes carry a multi-valued `kind_ids` column, matched by array overlap.
fn node_kind_constraint(identifier: &Identifier, kind_ids: &[i16]) -> Expression {
    BinaryExpression::new(
        Expression::column(identifier, schema::COLUMN_KIND_IDS),
        Operator::ArrayOverlap,
        kind_id_array(kind_ids),
    )
}

/// Edges carry exactly one `kind_id`, matched by array membership.
fn edge_kind_constraint(identifier: &Identifier, kind_ids: &[i16]) -> Expression {
    BinaryExpression::new(
        Expression::column(identifier, schema::COLUMN_KIND_ID),
        Operator::Equals,
        Expression::any(kind_id_array(kind_ids)),
    )
}
