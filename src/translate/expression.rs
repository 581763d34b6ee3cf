use log::trace;

use crate::open_cypher_model::Operator as SourceOperator;
use crate::pg_query_generator::{
    BinaryExpression, Expression, IdentifierSet, Operator, Parameter, Value,
};

use super::errors::TranslateError;
use super::tracking::ConstraintTracker;

/// Converts source boolean/arithmetic expression trees into target binary
/// expression trees, deciding per boolean operator whether a sub-expression
/// folds into the tree being built or is hoisted out as an independent
/// constraint.
///
/// ANDs not nested inside any disjunction or parenthetical are split into
/// per-dependency-set constraints; ORs are never split, since one side of a
/// disjunction is meaningless on its own.
#[derive(Debug, Default)]
pub struct ExpressionTreeTranslator {
    pub constraints: ConstraintTracker,

    operands: Vec<Expression>,
    parenthetical_depth: usize,
    disjunction_depth: usize,
    conjunction_depth: usize,
}

impl ExpressionTreeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_operand(&mut self, expression: Expression) {
        self.operands.push(expression);
    }

    pub fn pop_operand(&mut self) -> Result<Expression, TranslateError> {
        self.operands.pop().ok_or(TranslateError::EmptyOperandStack)
    }

    /// Builds the nested JSONB lookup for a property access and pushes it:
    /// `binding.properties -> 'a' -> 'b'` for symbols `["a", "b"]`.
    pub fn push_property_lookup(&mut self, properties: Expression, symbols: &[String]) {
        let mut lookup = properties;

        for symbol in symbols {
            lookup = BinaryExpression::new(
                lookup,
                Operator::JsonField,
                Expression::literal(symbol.as_str()),
            );
        }

        self.push_operand(lookup);
    }

    pub fn enter_parenthetical(&mut self) {
        self.parenthetical_depth += 1;
    }

    pub fn exit_parenthetical(&mut self) -> Result<(), TranslateError> {
        let inner = self.pop_operand()?;
        self.push_operand(Expression::parenthetical(inner));
        self.parenthetical_depth -= 1;
        Ok(())
    }

    /// Tracks operator entry for expression tree extraction.
    pub fn visit_operator(&mut self, operator: SourceOperator) {
        match operator {
            SourceOperator::And => self.conjunction_depth += 1,
            SourceOperator::Or => self.disjunction_depth += 1,
            _ => {}
        }
    }

    /// Completes a binary operator as its node exits the walk.
    pub fn complete_binary_expression(
        &mut self,
        operator: SourceOperator,
    ) -> Result<(), TranslateError> {
        match operator {
            SourceOperator::And => {
                if self.parenthetical_depth == 0 && self.disjunction_depth == 0 {
                    // Extractable conjunction: the popped operand becomes an
                    // independent constraint.
                    return self.constrain_top_operand();
                }

                self.conjunction_depth -= 1;
                let right = self.pop_operand()?;
                let left = self.pop_operand()?;
                self.push_operand(BinaryExpression::new(left, Operator::And, right));
                Ok(())
            }

            SourceOperator::Or => {
                if self.parenthetical_depth == 0 && self.conjunction_depth == 0 {
                    return self.constrain_disjoint_operand_pair();
                }

                self.disjunction_depth -= 1;
                let right = self.pop_operand()?;
                let left = self.pop_operand()?;
                self.push_operand(BinaryExpression::new(left, Operator::Or, right));
                Ok(())
            }

            SourceOperator::Xor => Err(TranslateError::unsupported(
                "exclusive disjunction (xor)",
            )),

            other => {
                let right = self.pop_operand()?;
                let left = self.pop_operand()?;
                let rewritten = rewrite_binary_expression(left, other, right)?;
                self.push_operand(rewritten);
                Ok(())
            }
        }
    }

    /// Pops the top operand and registers it as a constraint keyed by the
    /// identifiers it references.
    fn constrain_top_operand(&mut self) -> Result<(), TranslateError> {
        let expression = self.pop_operand()?;
        let dependencies = extract_identifier_references(&expression)?;

        trace!(
            "extracting constraint over {:?}",
            dependencies.slice()
        );

        self.constraints.constrain(dependencies, expression);
        Ok(())
    }

    /// Completes one OR pairing. The right operand is popped first; if the
    /// stack is then empty this operand sits at the top of the disjunction
    /// chain and becomes a constraint, otherwise the pair folds back into a
    /// binary OR for the next pairing to consume.
    fn constrain_disjoint_operand_pair(&mut self) -> Result<(), TranslateError> {
        let right = self.pop_operand()?;

        if self.operands.is_empty() {
            let dependencies = extract_identifier_references(&right)?;
            self.constraints.constrain(dependencies, right);
            Ok(())
        } else {
            let left = self.pop_operand()?;
            self.push_operand(BinaryExpression::new(left, Operator::Or, right));
            Ok(())
        }
    }

    /// Flushes whatever operands remain as constraints. Called when a WHERE
    /// clause completes.
    pub fn constrain_remaining_operands(&mut self) -> Result<(), TranslateError> {
        while !self.operands.is_empty() {
            self.constrain_top_operand()?;
        }

        self.conjunction_depth = 0;
        self.disjunction_depth = 0;
        Ok(())
    }
}

/// The identifiers an expression depends on: identifiers contribute
/// themselves, compound identifiers their root (the binding alias), values
/// nothing.
pub fn extract_identifier_references(
    expression: &Expression,
) -> Result<IdentifierSet, TranslateError> {
    let mut references = IdentifierSet::new();
    let mut stack = vec![expression];

    while let Some(next) = stack.pop() {
        match next {
            Expression::Identifier(identifier) => references.add(identifier.clone()),
            Expression::CompoundIdentifier(compound) => references.add(compound.root().clone()),

            Expression::Binary(binary) => {
                stack.push(&binary.left_operand);
                stack.push(&binary.right_operand);
            }

            Expression::Unary(unary) => stack.push(&unary.operand),
            Expression::Parenthetical(parenthetical) => stack.push(&parenthetical.expression),
            Expression::Any(any) => stack.push(&any.expression),
            Expression::All(all) => stack.push(&all.expression),
            Expression::FunctionCall(call) => stack.extend(call.parameters.iter()),
            Expression::ArrayLiteral(array) => stack.extend(array.values.iter()),
            Expression::CompositeValue(composite) => stack.extend(composite.values.iter()),

            Expression::Literal(_) | Expression::Parameter(_) | Expression::Wildcard => {}

            Expression::Subquery(_) => {
                return Err(TranslateError::unsupported(
                    "dependency extraction for subqueries",
                ))
            }
        }
    }

    Ok(references)
}

fn map_operator(operator: SourceOperator) -> Result<Operator, TranslateError> {
    match operator {
        SourceOperator::Equals => Ok(Operator::Equals),
        SourceOperator::NotEquals => Ok(Operator::NotEquals),
        SourceOperator::GreaterThan => Ok(Operator::GreaterThan),
        SourceOperator::GreaterThanOrEqualTo => Ok(Operator::GreaterThanOrEqualTo),
        SourceOperator::LessThan => Ok(Operator::LessThan),
        SourceOperator::LessThanOrEqualTo => Ok(Operator::LessThanOrEqualTo),
        SourceOperator::Subtract => Ok(Operator::Subtract),
        SourceOperator::Multiply => Ok(Operator::Multiply),
        SourceOperator::Divide => Ok(Operator::Divide),
        SourceOperator::Modulo => Ok(Operator::Modulo),
        SourceOperator::PowerOf => Ok(Operator::Exponent),
        SourceOperator::Is => Ok(Operator::Is),
        SourceOperator::IsNot => Ok(Operator::IsNot),
        SourceOperator::RegexMatch => Ok(Operator::RegexMatch),
        other => Err(TranslateError::unsupported(format!(
            "binary operator {}",
            other
        ))),
    }
}

fn is_text_operand(expression: &Expression) -> bool {
    match expression {
        Expression::Literal(literal) => matches!(literal.value, Value::Text(_)),
        Expression::Parameter(parameter) => matches!(parameter.value, Value::Text(_)),
        Expression::Binary(binary) => binary.operator == Operator::JsonTextField,
        _ => false,
    }
}

/// Affixes LIKE wildcards onto a text operand, rewriting the literal (or
/// the parameter's bound value) in place.
fn affix_like_wildcards(
    expression: Expression,
    prefix: &str,
    suffix: &str,
) -> Result<Expression, TranslateError> {
    match expression {
        Expression::Literal(literal) => match literal.value {
            Value::Text(text) => Ok(Expression::literal(format!("{prefix}{text}{suffix}"))),
            other => Err(TranslateError::unsupported(format!(
                "string matching against a {} value",
                other.type_hint()
            ))),
        },

        Expression::Parameter(parameter) => match parameter.value {
            Value::Text(text) => Ok(Expression::Parameter(Parameter {
                name: parameter.name,
                value: Value::Text(format!("{prefix}{text}{suffix}")),
            })),
            other => Err(TranslateError::unsupported(format!(
                "string matching against a {} parameter",
                other.type_hint()
            ))),
        },

        _ => Err(TranslateError::unsupported(
            "string matching requires a text literal or parameter",
        )),
    }
}

/// Builds the target expression for one completed source operator,
/// applying the operator rewrites the target language needs.
fn rewrite_binary_expression(
    left: Expression,
    operator: SourceOperator,
    right: Expression,
) -> Result<Expression, TranslateError> {
    match operator {
        SourceOperator::StartsWith => Ok(BinaryExpression::new(
            left,
            Operator::Like,
            affix_like_wildcards(right, "", "%")?,
        )),

        SourceOperator::EndsWith => Ok(BinaryExpression::new(
            left,
            Operator::Like,
            affix_like_wildcards(right, "%", "")?,
        )),

        SourceOperator::Contains => Ok(BinaryExpression::new(
            left,
            Operator::Like,
            affix_like_wildcards(right, "%", "%")?,
        )),

        SourceOperator::In => match right {
            array @ Expression::ArrayLiteral(_) => Ok(BinaryExpression::new(
                left,
                Operator::Equals,
                Expression::any(array),
            )),
            _ => Err(TranslateError::unsupported(
                "in operator requires a list literal right operand",
            )),
        },

        SourceOperator::Add => {
            let operator = if is_text_operand(&left) || is_text_operand(&right) {
                Operator::Concatenate
            } else {
                Operator::Add
            };

            Ok(BinaryExpression::new(left, operator, right))
        }

        other => Ok(BinaryExpression::new(left, map_operator(other)?, right)),
    }
}
