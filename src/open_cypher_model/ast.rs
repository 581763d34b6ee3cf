use std::fmt;

/// Binary and unary operators as they appear in the source query language.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    And,
    Or,
    Xor,
    Not,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    PowerOf,
    In,
    StartsWith,
    EndsWith,
    Contains,
    RegexMatch,
    Is,
    IsNot,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Xor => "xor",
            Operator::Not => "not",
            Operator::Equals => "=",
            Operator::NotEquals => "<>",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqualTo => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqualTo => "<=",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::PowerOf => "^",
            Operator::In => "in",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::Contains => "contains",
            Operator::RegexMatch => "=~",
            Operator::Is => "is",
            Operator::IsNot => "is not",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traversal direction of a relationship pattern.
///
/// `(a)-[r]->(b)` is outbound, `(a)<-[r]-(b)` is inbound and `(a)-[r]-(b)`
/// leaves the direction unspecified.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Outbound,
    Inbound,
    Bidirectional,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => f.write_str("outbound"),
            Direction::Inbound => f.write_str("inbound"),
            Direction::Bidirectional => f.write_str("bidirectional"),
        }
    }
}

/// Root of a parsed query.
#[derive(Debug, PartialEq, Clone)]
pub struct RegularQuery {
    pub single_query: SingleQuery,
}

#[derive(Debug, PartialEq, Clone)]
pub enum SingleQuery {
    SinglePart(SinglePartQuery),
    MultiPart(MultiPartQuery),
}

#[derive(Debug, PartialEq, Clone)]
pub struct SinglePartQuery {
    pub reading_clauses: Vec<ReadingClause>,
    pub projection: Option<Projection>,
}

/// Multi-part query (`WITH`-chained parts). Carried in the model so query
/// shapes round-trip; the translator reports it as unsupported.
#[derive(Debug, PartialEq, Clone)]
pub struct MultiPartQuery {
    pub parts: Vec<SinglePartQuery>,
    pub tail: SinglePartQuery,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ReadingClause {
    Match(Match),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Match {
    pub optional: bool,
    pub pattern: Vec<PatternPart>,
    pub where_clause: Option<Where>,
}

/// WHERE clause. Holds a list of top-level expressions; a parser produces
/// exactly one, but visitors may split or rewrite entries in place.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Where {
    pub expressions: Vec<Expression>,
}

/// One pattern part of a MATCH clause, e.g. `p = (a)-[r]->(b)`.
#[derive(Debug, PartialEq, Clone)]
pub struct PatternPart {
    /// Path binding (`p = ...`), if any.
    pub binding: Option<String>,
    pub shortest_path: bool,
    pub all_shortest_paths: bool,
    pub elements: Vec<PatternElement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum PatternElement {
    Node(NodePattern),
    Relationship(RelationshipPattern),
}

#[derive(Debug, PartialEq, Clone)]
pub struct NodePattern {
    pub binding: Option<String>,
    pub kinds: Vec<String>,
    /// Inline property matcher, a map literal or parameter.
    pub properties: Option<Box<Expression>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RelationshipPattern {
    pub binding: Option<String>,
    pub kinds: Vec<String>,
    pub direction: Direction,
    pub range: Option<PatternRange>,
    pub properties: Option<Box<Expression>>,
}

/// Variable-length bounds of a relationship pattern (`*1..3`).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PatternRange {
    pub start_index: Option<i64>,
    pub end_index: Option<i64>,
}

/// RETURN clause body.
#[derive(Debug, PartialEq, Clone)]
pub struct Projection {
    pub distinct: bool,
    pub items: Vec<ProjectionItem>,
    pub order: Option<Order>,
    pub skip: Option<Skip>,
    pub limit: Option<Limit>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ProjectionItem {
    pub expression: Box<Expression>,
    /// `AS <binding>` alias, if any.
    pub binding: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Order {
    pub items: Vec<SortItem>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SortItem {
    pub ascending: bool,
    pub expression: Box<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Skip {
    pub value: Box<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Limit {
    pub value: Box<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Variable(Variable),
    Literal(Literal),
    Parameter(Parameter),
    PropertyLookup(PropertyLookup),
    FunctionInvocation(FunctionInvocation),
    Comparison(Comparison),
    Arithmetic(ArithmeticExpression),
    Conjunction(Conjunction),
    Disjunction(Disjunction),
    ExclusiveDisjunction(ExclusiveDisjunction),
    Negation(Negation),
    Parenthetical(Parenthetical),
    KindMatcher(KindMatcher),
    ListLiteral(ListLiteral),
    MapLiteral(MapLiteral),
}

impl Expression {
    pub fn variable(symbol: impl Into<String>) -> Self {
        Expression::Variable(Variable {
            symbol: symbol.into(),
        })
    }

    pub fn property(symbol: impl Into<String>, property: impl Into<String>) -> Self {
        Expression::PropertyLookup(PropertyLookup {
            atom: Box::new(Expression::variable(symbol)),
            symbols: vec![property.into()],
        })
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Variable {
    pub symbol: String,
}

/// Scalar literal values of the source language.
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_owned())
    }
}

/// Named query parameter (`$name`) and the value bound to it.
#[derive(Debug, PartialEq, Clone)]
pub struct Parameter {
    pub symbol: String,
    pub value: Literal,
}

/// Property access such as `n.name`. Chained lookups keep all trailing
/// symbols in order: `n.a.b` has symbols `["a", "b"]`.
#[derive(Debug, PartialEq, Clone)]
pub struct PropertyLookup {
    pub atom: Box<Expression>,
    pub symbols: Vec<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionInvocation {
    pub name: String,
    pub distinct: bool,
    pub arguments: Vec<Expression>,
}

/// Comparison chain: a left operand followed by one or more
/// operator/operand pairs (`a < b <= c`).
#[derive(Debug, PartialEq, Clone)]
pub struct Comparison {
    pub left: Box<Expression>,
    pub partials: Vec<PartialComparison>,
}

impl Comparison {
    pub fn new(left: Expression, operator: Operator, right: Expression) -> Self {
        Comparison {
            left: Box::new(left),
            partials: vec![PartialComparison {
                operator,
                right: Box::new(right),
            }],
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct PartialComparison {
    pub operator: Operator,
    pub right: Box<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ArithmeticExpression {
    pub left: Box<Expression>,
    pub partials: Vec<PartialArithmeticExpression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PartialArithmeticExpression {
    pub operator: Operator,
    pub right: Box<Expression>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Conjunction {
    pub expressions: Vec<Expression>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Disjunction {
    pub expressions: Vec<Expression>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct ExclusiveDisjunction {
    pub expressions: Vec<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Negation {
    pub expression: Box<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Parenthetical {
    pub expression: Box<Expression>,
}

/// Label test on a bound variable, e.g. `n:User` in a WHERE clause.
#[derive(Debug, PartialEq, Clone)]
pub struct KindMatcher {
    pub reference: Box<Expression>,
    pub kinds: Vec<String>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct ListLiteral {
    pub values: Vec<Expression>,
}

/// Map literal with insertion-ordered entries.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct MapLiteral {
    pub entries: Vec<(String, Expression)>,
}

/// Ordered expression collections that visitors may edit in place while
/// unwinding (`exit`): fold two entries into one, drop a rewritten entry,
/// or swap an entry for its replacement.
pub trait ExpressionList {
    fn expressions(&self) -> &[Expression];
    fn add(&mut self, expression: Expression);
    fn remove(&mut self, expression: &Expression) -> bool;
    fn replace(&mut self, index: usize, expression: Expression);
    fn index_of(&self, expression: &Expression) -> Option<usize>;

    fn len(&self) -> usize {
        self.expressions().len()
    }

    fn is_empty(&self) -> bool {
        self.expressions().is_empty()
    }
}

macro_rules! impl_expression_list {
    ($($type:ty),+) => {
        $(impl ExpressionList for $type {
            fn expressions(&self) -> &[Expression] {
                &self.expressions
            }

            fn add(&mut self, expression: Expression) {
                self.expressions.push(expression);
            }

            fn remove(&mut self, expression: &Expression) -> bool {
                match self.index_of(expression) {
                    Some(index) => {
                        self.expressions.remove(index);
                        true
                    }
                    None => false,
                }
            }

            fn replace(&mut self, index: usize, expression: Expression) {
                self.expressions[index] = expression;
            }

            fn index_of(&self, expression: &Expression) -> Option<usize> {
                self.expressions.iter().position(|next| next == expression)
            }
        })+
    };
}

impl_expression_list!(Where, Conjunction, Disjunction, ExclusiveDisjunction);
