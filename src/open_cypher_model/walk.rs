use super::ast::*;

/// Borrowed view of any model node, used by the walker to dispatch
/// `enter`/`exit` callbacks without cloning the tree.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNodeRef<'a> {
    RegularQuery(&'a RegularQuery),
    SinglePartQuery(&'a SinglePartQuery),
    MultiPartQuery(&'a MultiPartQuery),
    ReadingClause(&'a ReadingClause),
    Match(&'a Match),
    Where(&'a Where),
    PatternPart(&'a PatternPart),
    NodePattern(&'a NodePattern),
    RelationshipPattern(&'a RelationshipPattern),
    Projection(&'a Projection),
    ProjectionItem(&'a ProjectionItem),
    Order(&'a Order),
    SortItem(&'a SortItem),
    Skip(&'a Skip),
    Limit(&'a Limit),
    Variable(&'a Variable),
    Literal(&'a Literal),
    Parameter(&'a Parameter),
    PropertyLookup(&'a PropertyLookup),
    FunctionInvocation(&'a FunctionInvocation),
    Comparison(&'a Comparison),
    PartialComparison(&'a PartialComparison),
    ArithmeticExpression(&'a ArithmeticExpression),
    PartialArithmeticExpression(&'a PartialArithmeticExpression),
    Conjunction(&'a Conjunction),
    Disjunction(&'a Disjunction),
    ExclusiveDisjunction(&'a ExclusiveDisjunction),
    Negation(&'a Negation),
    Parenthetical(&'a Parenthetical),
    KindMatcher(&'a KindMatcher),
    ListLiteral(&'a ListLiteral),
    MapLiteral(&'a MapLiteral),
}

pub fn expression_ref(expression: &Expression) -> SyntaxNodeRef<'_> {
    match expression {
        Expression::Variable(variable) => SyntaxNodeRef::Variable(variable),
        Expression::Literal(literal) => SyntaxNodeRef::Literal(literal),
        Expression::Parameter(parameter) => SyntaxNodeRef::Parameter(parameter),
        Expression::PropertyLookup(lookup) => SyntaxNodeRef::PropertyLookup(lookup),
        Expression::FunctionInvocation(invocation) => {
            SyntaxNodeRef::FunctionInvocation(invocation)
        }
        Expression::Comparison(comparison) => SyntaxNodeRef::Comparison(comparison),
        Expression::Arithmetic(arithmetic) => SyntaxNodeRef::ArithmeticExpression(arithmetic),
        Expression::Conjunction(conjunction) => SyntaxNodeRef::Conjunction(conjunction),
        Expression::Disjunction(disjunction) => SyntaxNodeRef::Disjunction(disjunction),
        Expression::ExclusiveDisjunction(disjunction) => {
            SyntaxNodeRef::ExclusiveDisjunction(disjunction)
        }
        Expression::Negation(negation) => SyntaxNodeRef::Negation(negation),
        Expression::Parenthetical(parenthetical) => SyntaxNodeRef::Parenthetical(parenthetical),
        Expression::KindMatcher(matcher) => SyntaxNodeRef::KindMatcher(matcher),
        Expression::ListLiteral(list) => SyntaxNodeRef::ListLiteral(list),
        Expression::MapLiteral(map) => SyntaxNodeRef::MapLiteral(map),
    }
}

impl<'a> SyntaxNodeRef<'a> {
    /// Node-kind tag, used for tracing and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            SyntaxNodeRef::RegularQuery(_) => "RegularQuery",
            SyntaxNodeRef::SinglePartQuery(_) => "SinglePartQuery",
            SyntaxNodeRef::MultiPartQuery(_) => "MultiPartQuery",
            SyntaxNodeRef::ReadingClause(_) => "ReadingClause",
            SyntaxNodeRef::Match(_) => "Match",
            SyntaxNodeRef::Where(_) => "Where",
            SyntaxNodeRef::PatternPart(_) => "PatternPart",
            SyntaxNodeRef::NodePattern(_) => "NodePattern",
            SyntaxNodeRef::RelationshipPattern(_) => "RelationshipPattern",
            SyntaxNodeRef::Projection(_) => "Projection",
            SyntaxNodeRef::ProjectionItem(_) => "ProjectionItem",
            SyntaxNodeRef::Order(_) => "Order",
            SyntaxNodeRef::SortItem(_) => "SortItem",
            SyntaxNodeRef::Skip(_) => "Skip",
            SyntaxNodeRef::Limit(_) => "Limit",
            SyntaxNodeRef::Variable(_) => "Variable",
            SyntaxNodeRef::Literal(_) => "Literal",
            SyntaxNodeRef::Parameter(_) => "Parameter",
            SyntaxNodeRef::PropertyLookup(_) => "PropertyLookup",
            SyntaxNodeRef::FunctionInvocation(_) => "FunctionInvocation",
            SyntaxNodeRef::Comparison(_) => "Comparison",
            SyntaxNodeRef::PartialComparison(_) => "PartialComparison",
            SyntaxNodeRef::ArithmeticExpression(_) => "ArithmeticExpression",
            SyntaxNodeRef::PartialArithmeticExpression(_) => "PartialArithmeticExpression",
            SyntaxNodeRef::Conjunction(_) => "Conjunction",
            SyntaxNodeRef::Disjunction(_) => "Disjunction",
            SyntaxNodeRef::ExclusiveDisjunction(_) => "ExclusiveDisjunction",
            SyntaxNodeRef::Negation(_) => "Negation",
            SyntaxNodeRef::Parenthetical(_) => "Parenthetical",
            SyntaxNodeRef::KindMatcher(_) => "KindMatcher",
            SyntaxNodeRef::ListLiteral(_) => "ListLiteral",
            SyntaxNodeRef::MapLiteral(_) => "MapLiteral",
        }
    }

    /// Child nodes in source order.
    ///
    /// Property lookups, kind matchers, list and map literals are traversal
    /// leaves: their interior is consumed whole by visitors on `enter`.
    fn branches(&self) -> Vec<SyntaxNodeRef<'a>> {
        match self {
            SyntaxNodeRef::RegularQuery(query) => match &query.single_query {
                SingleQuery::SinglePart(part) => vec![SyntaxNodeRef::SinglePartQuery(part)],
                SingleQuery::MultiPart(multi) => vec![SyntaxNodeRef::MultiPartQuery(multi)],
            },

            SyntaxNodeRef::SinglePartQuery(query) => {
                let mut branches: Vec<SyntaxNodeRef<'a>> = query
                    .reading_clauses
                    .iter()
                    .map(SyntaxNodeRef::ReadingClause)
                    .collect();

                if let Some(projection) = &query.projection {
                    branches.push(SyntaxNodeRef::Projection(projection));
                }

                branches
            }

            SyntaxNodeRef::MultiPartQuery(query) => {
                let mut branches: Vec<SyntaxNodeRef<'a>> = query
                    .parts
                    .iter()
                    .map(SyntaxNodeRef::SinglePartQuery)
                    .collect();

                branches.push(SyntaxNodeRef::SinglePartQuery(&query.tail));
                branches
            }

            SyntaxNodeRef::ReadingClause(clause) => match clause {
                ReadingClause::Match(match_clause) => vec![SyntaxNodeRef::Match(match_clause)],
            },

            SyntaxNodeRef::Match(match_clause) => {
                let mut branches: Vec<SyntaxNodeRef<'a>> = match_clause
                    .pattern
                    .iter()
                    .map(SyntaxNodeRef::PatternPart)
                    .collect();

                if let Some(where_clause) = &match_clause.where_clause {
                    branches.push(SyntaxNodeRef::Where(where_clause));
                }

                branches
            }

            SyntaxNodeRef::Where(where_clause) => {
                where_clause.expressions.iter().map(expression_ref).collect()
            }

            SyntaxNodeRef::PatternPart(part) => part
                .elements
                .iter()
                .map(|element| match element {
                    PatternElement::Node(node) => SyntaxNodeRef::NodePattern(node),
                    PatternElement::Relationship(relationship) => {
                        SyntaxNodeRef::RelationshipPattern(relationship)
                    }
                })
                .collect(),

            SyntaxNodeRef::Projection(projection) => {
                let mut branches: Vec<SyntaxNodeRef<'a>> = projection
                    .items
                    .iter()
                    .map(SyntaxNodeRef::ProjectionItem)
                    .collect();

                if let Some(order) = &projection.order {
                    branches.push(SyntaxNodeRef::Order(order));
                }

                if let Some(skip) = &projection.skip {
                    branches.push(SyntaxNodeRef::Skip(skip));
                }

                if let Some(limit) = &projection.limit {
                    branches.push(SyntaxNodeRef::Limit(limit));
                }

                branches
            }

            SyntaxNodeRef::ProjectionItem(item) => vec![expression_ref(&item.expression)],

            SyntaxNodeRef::Order(order) => {
                order.items.iter().map(SyntaxNodeRef::SortItem).collect()
            }

            SyntaxNodeRef::SortItem(item) => vec![expression_ref(&item.expression)],

            SyntaxNodeRef::Comparison(comparison) => {
                let mut branches = vec![expression_ref(&comparison.left)];
                branches.extend(
                    comparison
                        .partials
                        .iter()
                        .map(SyntaxNodeRef::PartialComparison),
                );
                branches
            }

            SyntaxNodeRef::PartialComparison(partial) => vec![expression_ref(&partial.right)],

            SyntaxNodeRef::ArithmeticExpression(arithmetic) => {
                let mut branches = vec![expression_ref(&arithmetic.left)];
                branches.extend(
                    arithmetic
                        .partials
                        .iter()
                        .map(SyntaxNodeRef::PartialArithmeticExpression),
                );
                branches
            }

            SyntaxNodeRef::PartialArithmeticExpression(partial) => {
                vec![expression_ref(&partial.right)]
            }

            SyntaxNodeRef::Conjunction(conjunction) => {
                conjunction.expressions.iter().map(expression_ref).collect()
            }

            SyntaxNodeRef::Disjunction(disjunction) => {
                disjunction.expressions.iter().map(expression_ref).collect()
            }

            SyntaxNodeRef::ExclusiveDisjunction(disjunction) => {
                disjunction.expressions.iter().map(expression_ref).collect()
            }

            SyntaxNodeRef::FunctionInvocation(invocation) => {
                invocation.arguments.iter().map(expression_ref).collect()
            }

            SyntaxNodeRef::Negation(negation) => vec![expression_ref(&negation.expression)],

            SyntaxNodeRef::Parenthetical(parenthetical) => {
                vec![expression_ref(&parenthetical.expression)]
            }

            SyntaxNodeRef::NodePattern(_)
            | SyntaxNodeRef::RelationshipPattern(_)
            | SyntaxNodeRef::Skip(_)
            | SyntaxNodeRef::Limit(_)
            | SyntaxNodeRef::Variable(_)
            | SyntaxNodeRef::Literal(_)
            | SyntaxNodeRef::Parameter(_)
            | SyntaxNodeRef::PropertyLookup(_)
            | SyntaxNodeRef::KindMatcher(_)
            | SyntaxNodeRef::ListLiteral(_)
            | SyntaxNodeRef::MapLiteral(_) => Vec::new(),
        }
    }
}

/// Depth-first visitor callbacks. `enter` fires before a node's branches
/// are walked, `exit` after the last branch completes.
pub trait Visitor {
    type Error;

    fn enter(&mut self, node: SyntaxNodeRef<'_>) -> Result<(), Self::Error>;
    fn exit(&mut self, node: SyntaxNodeRef<'_>) -> Result<(), Self::Error>;
}

struct WalkFrame<'a> {
    node: SyntaxNodeRef<'a>,
    branches: Vec<SyntaxNodeRef<'a>>,
    next_branch: usize,
}

/// Walks the tree depth-first with an explicit frame stack, so deeply
/// right-nested expressions cannot exhaust the call stack.
pub fn walk<V: Visitor>(root: SyntaxNodeRef<'_>, visitor: &mut V) -> Result<(), V::Error> {
    let mut stack = Vec::new();

    visitor.enter(root)?;
    stack.push(WalkFrame {
        node: root,
        branches: root.branches(),
        next_branch: 0,
    });

    while !stack.is_empty() {
        let top = stack.len() - 1;

        if stack[top].next_branch < stack[top].branches.len() {
            let next = stack[top].branches[stack[top].next_branch];
            stack[top].next_branch += 1;

            visitor.enter(next)?;
            stack.push(WalkFrame {
                node: next,
                branches: next.branches(),
                next_branch: 0,
            });
        } else if let Some(frame) = stack.pop() {
            visitor.exit(frame.node)?;
        }
    }

    Ok(())
}
