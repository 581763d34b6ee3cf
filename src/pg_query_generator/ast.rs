use std::collections::BTreeSet;
use std::fmt;

use super::types::{DataType, Value};

/// An opaque SQL name: a table, column, binding or parameter identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier(value.to_owned())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier(value)
    }
}

/// Qualified reference such as `table.column`. The first element ("root")
/// is always the table or binding alias.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompoundIdentifier(pub Vec<Identifier>);

impl CompoundIdentifier {
    pub fn new(identifiers: Vec<Identifier>) -> Self {
        CompoundIdentifier(identifiers)
    }

    pub fn column(binding: &Identifier, column: &str) -> Self {
        CompoundIdentifier(vec![binding.clone(), Identifier::from(column)])
    }

    pub fn root(&self) -> &Identifier {
        &self.0[0]
    }
}

/// Unordered set of unique identifiers with the set algebra the constraint
/// tracker is built on. Backed by an ordered set so iteration, and with it
/// all emitted SQL, is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentifierSet {
    identifiers: BTreeSet<Identifier>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, identifier: Identifier) {
        self.identifiers.insert(identifier);
    }

    pub fn merge(&mut self, other: &IdentifierSet) {
        for identifier in &other.identifiers {
            self.identifiers.insert(identifier.clone());
        }
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.identifiers.contains(identifier)
    }

    /// True when every identifier in `other` is present in this set. This
    /// is the predicate that decides when a pending constraint becomes
    /// dischargeable.
    pub fn satisfies(&self, other: &IdentifierSet) -> bool {
        other.identifiers.is_subset(&self.identifiers)
    }

    /// Set equality.
    pub fn matches(&self, other: &IdentifierSet) -> bool {
        self.identifiers == other.identifiers
    }

    /// Members in sorted order.
    pub fn slice(&self) -> Vec<Identifier> {
        self.identifiers.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.identifiers.iter()
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

impl FromIterator<Identifier> for IdentifierSet {
    fn from_iter<T: IntoIterator<Item = Identifier>>(iter: T) -> Self {
        IdentifierSet {
            identifiers: iter.into_iter().collect(),
        }
    }
}

/// SQL operators emitted by the translator and formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
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
    Exponent,
    Concatenate,
    Like,
    RegexMatch,
    Is,
    IsNot,
    /// JSONB field access preserving the JSONB type (`->`).
    JsonField,
    /// JSONB field access as text (`->>`).
    JsonTextField,
    /// Array overlap against the node `kind_ids` column.
    ArrayOverlap,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
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
            Operator::Exponent => "^",
            Operator::Concatenate => "||",
            Operator::Like => "like",
            Operator::RegexMatch => "~",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::JsonField => "->",
            Operator::JsonTextField => "->>",
            Operator::ArrayOverlap => "operator(pg_catalog.&&)",
        }
    }

}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Parameter(Parameter),
    Identifier(Identifier),
    CompoundIdentifier(CompoundIdentifier),
    Unary(Box<UnaryExpression>),
    Binary(Box<BinaryExpression>),
    FunctionCall(FunctionCall),
    Parenthetical(Box<Parenthetical>),
    ArrayLiteral(ArrayLiteral),
    CompositeValue(CompositeValue),
    Any(Box<AnyExpression>),
    All(Box<AllExpression>),
    Subquery(Box<Query>),
    Wildcard,
}

impl Expression {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(Literal {
            value: value.into(),
        })
    }

    pub fn column(binding: &Identifier, column: &str) -> Self {
        Expression::CompoundIdentifier(CompoundIdentifier::column(binding, column))
    }

    pub fn parenthetical(expression: Expression) -> Self {
        Expression::Parenthetical(Box::new(Parenthetical { expression }))
    }

    pub fn any(expression: Expression) -> Self {
        Expression::Any(Box::new(AnyExpression { expression }))
    }
}

/// Conjoins `expression` onto `optional` when one is already present.
pub fn opt_and(optional: Option<Expression>, expression: Expression) -> Expression {
    match optional {
        Some(existing) => BinaryExpression::new(existing, Operator::And, expression),
        None => expression,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
}

impl Literal {
    pub fn type_hint(&self) -> DataType {
        self.value.type_hint()
    }
}

/// Named placeholder plus the value bound to it. The formatter either
/// inlines the value or emits `@name` and records the binding out of band.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Identifier,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: Operator,
    pub operand: Expression,
}

impl UnaryExpression {
    pub fn new(operator: Operator, operand: Expression) -> Expression {
        Expression::Unary(Box::new(UnaryExpression { operator, operand }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: Operator,
    pub left_operand: Expression,
    pub right_operand: Expression,
}

impl BinaryExpression {
    pub fn new(left_operand: Expression, operator: Operator, right_operand: Expression) -> Expression {
        Expression::Binary(Box::new(BinaryExpression {
            operator,
            left_operand,
            right_operand,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub distinct: bool,
    pub function: Identifier,
    pub parameters: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parenthetical {
    pub expression: Expression,
}

/// `array[...]` literal, cast to `type_hint` when one is known.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub values: Vec<Expression>,
    pub type_hint: DataType,
}

/// Row value cast to a composite type, e.g.
/// `(n0.id, n0.kind_ids, n0.properties)::nodecomposite`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValue {
    pub values: Vec<Expression>,
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnyExpression {
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllExpression {
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(Query),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Merge(Merge),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub common_table_expressions: Option<With>,
    pub body: SetExpression,
}

impl Query {
    pub fn single_select(select: Select) -> Self {
        Query {
            common_table_expressions: None,
            body: SetExpression::Select(select),
        }
    }

    pub fn add_cte(&mut self, cte: CommonTableExpression) {
        self.common_table_expressions
            .get_or_insert_with(With::default)
            .expressions
            .push(cte);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct With {
    pub recursive: bool,
    pub expressions: Vec<CommonTableExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpression {
    pub alias: TableAlias,
    pub materialized: Option<bool>,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableAlias {
    pub name: Identifier,
    pub shape: Option<RowShape>,
}

impl TableAlias {
    pub fn new(name: Identifier) -> Self {
        TableAlias { name, shape: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowShape {
    pub columns: Vec<Identifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetExpression {
    Query(Box<Query>),
    Select(Select),
    Operation(Box<SetOperation>),
    Values(Values),
}

impl Default for SetExpression {
    fn default() -> Self {
        SetExpression::Select(Select::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl SetOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOperator::Union => "union",
            SetOperator::Intersect => "intersect",
            SetOperator::Except => "except",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
    pub operator: SetOperator,
    pub all: bool,
    pub left_operand: SetExpression,
    pub right_operand: SetExpression,
}

/// A single `values (...)` row constructor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Values {
    pub values: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub distinct: bool,
    pub projection: Vec<SelectItem>,
    pub from: Vec<FromClause>,
    pub where_clause: Option<Expression>,
    pub group_by: Vec<Expression>,
    pub having: Option<Expression>,
    pub order_by: Vec<OrderBy>,
    pub offset: Option<Expression>,
    pub limit: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Expression(Expression),
    Aliased {
        expression: Expression,
        alias: Identifier,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expression: Expression,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub source: TableReference,
    pub joins: Vec<Join>,
}

impl FromClause {
    pub fn table(name: Identifier, binding: Option<Identifier>) -> Self {
        FromClause {
            source: TableReference {
                name: CompoundIdentifier(vec![name]),
                binding,
            },
            joins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableReference {
    pub name: CompoundIdentifier,
    pub binding: Option<Identifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableReference,
    pub join_operator: JoinOperator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOperator {
    pub join_type: JoinType,
    pub constraint: Option<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: TableReference,
    pub shape: Vec<Identifier>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict>,
    pub returning: Vec<SelectItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Values(Values),
    Query(Box<Query>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnConflict {
    pub target: Option<ConflictTarget>,
    pub action: ConflictAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictTarget {
    Columns(Vec<Identifier>),
    Constraint(CompoundIdentifier),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    DoNothing,
    DoUpdate {
        assignments: Vec<Assignment>,
        where_clause: Option<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: CompoundIdentifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: TableReference,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: TableReference,
    pub where_clause: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub into: TableReference,
    pub source: TableReference,
    pub join_target: Expression,
    pub actions: Vec<MergeAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeAction {
    MatchedUpdate {
        predicate: Option<Expression>,
        assignments: Vec<Assignment>,
    },
    MatchedDelete {
        predicate: Option<Expression>,
    },
    UnmatchedInsert {
        predicate: Option<Expression>,
        shape: Vec<Identifier>,
        values: Values,
    },
}
