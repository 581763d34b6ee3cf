use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ast::*;
use super::errors::FormatError;
use super::types::Value;

/// Formatter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatOptions {
    /// When set, parameter values are inlined as literals instead of being
    /// emitted as `@name` placeholders with a side table. Inlined output is
    /// meant for display and debugging, not execution.
    pub materialize_parameters: bool,
}

impl FormatOptions {
    pub fn materialized() -> Self {
        FormatOptions {
            materialize_parameters: true,
        }
    }
}

/// Formatted SQL plus the parameter bindings collected while formatting.
/// The parameter table is empty in materializing mode.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedQuery {
    pub sql: String,
    pub parameters: BTreeMap<String, Value>,
}

/// Serializes a statement, terminated with `;`.
pub fn format_statement(
    statement: &Statement,
    options: &FormatOptions,
) -> Result<FormattedQuery, FormatError> {
    let mut builder = OutputBuilder::new(options);

    match statement {
        Statement::Query(query) => format_query(&mut builder, query)?,
        Statement::Insert(insert) => format_insert(&mut builder, insert)?,
        Statement::Update(update) => format_update(&mut builder, update)?,
        Statement::Delete(delete) => format_delete(&mut builder, delete)?,
        Statement::Merge(merge) => format_merge(&mut builder, merge)?,
    }

    builder.write(";");
    Ok(builder.finish())
}

/// Serializes a bare expression, with no statement terminator.
pub fn format_expression(
    expression: &Expression,
    options: &FormatOptions,
) -> Result<FormattedQuery, FormatError> {
    let mut builder = OutputBuilder::new(options);
    format_expression_into(&mut builder, expression)?;
    Ok(builder.finish())
}

struct OutputBuilder<'a> {
    options: &'a FormatOptions,
    buffer: String,
    parameters: BTreeMap<String, Value>,
}

impl<'a> OutputBuilder<'a> {
    fn new(options: &'a FormatOptions) -> Self {
        OutputBuilder {
            options,
            buffer: String::new(),
            parameters: BTreeMap::new(),
        }
    }

    fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn finish(self) -> FormattedQuery {
        FormattedQuery {
            sql: self.buffer,
            parameters: self.parameters,
        }
    }
}

fn format_value(value: &Value) -> Result<String, FormatError> {
    match value {
        Value::Null => Ok("null".to_owned()),
        Value::Boolean(value) => Ok(value.to_string()),
        Value::Int16(value) => Ok(value.to_string()),
        Value::Int32(value) => Ok(value.to_string()),
        Value::Int64(value) => Ok(value.to_string()),
        Value::Float64(value) => {
            if value.is_finite() {
                Ok(value.to_string())
            } else {
                Err(FormatError::NonFiniteFloat(*value))
            }
        }
        Value::Text(value) => Ok(format!("'{}'", value.replace('\'', "''"))),
    }
}

fn format_compound_identifier(
    builder: &mut OutputBuilder<'_>,
    compound: &CompoundIdentifier,
) -> Result<(), FormatError> {
    if compound.0.is_empty() {
        return Err(FormatError::EmptyCompoundIdentifier);
    }

    for (index, identifier) in compound.0.iter().enumerate() {
        if index > 0 {
            builder.write(".");
        }
        builder.write(identifier.as_str());
    }

    Ok(())
}

/// One entry on the explicit formatting stack: either a tree node still to
/// be expanded or a literal text fragment ready to emit.
enum StackItem<'a> {
    Expression(&'a Expression),
    Text(&'static str),
    Owned(String),
}

/// Emits an expression tree without using the call stack for expression
/// nesting: each popped node either writes itself or pushes its fragments
/// and children in reverse, so popping restores left-to-right order.
fn format_expression_into(
    builder: &mut OutputBuilder<'_>,
    expression: &Expression,
) -> Result<(), FormatError> {
    let mut stack = vec![StackItem::Expression(expression)];

    while let Some(item) = stack.pop() {
        match item {
            StackItem::Text(text) => builder.write(text),
            StackItem::Owned(text) => builder.write(&text),

            StackItem::Expression(expression) => match expression {
                Expression::Literal(literal) => {
                    let text = format_value(&literal.value)?;
                    builder.write(&text);
                }

                Expression::Parameter(parameter) => {
                    if builder.options.materialize_parameters {
                        let text = format_value(&parameter.value)?;
                        builder.write(&text);
                    } else {
                        builder.write("@");
                        builder.write(parameter.name.as_str());
                        builder
                            .parameters
                            .insert(parameter.name.0.clone(), parameter.value.clone());
                    }
                }

                Expression::Identifier(identifier) => builder.write(identifier.as_str()),

                Expression::CompoundIdentifier(compound) => {
                    format_compound_identifier(builder, compound)?;
                }

                Expression::Unary(unary) => {
                    stack.push(StackItem::Expression(&unary.operand));
                    stack.push(StackItem::Owned(format!("{} ", unary.operator)));
                }

                Expression::Binary(binary) => {
                    stack.push(StackItem::Expression(&binary.right_operand));
                    stack.push(StackItem::Owned(format!(" {} ", binary.operator)));
                    stack.push(StackItem::Expression(&binary.left_operand));
                }

                Expression::FunctionCall(call) => {
                    stack.push(StackItem::Text(")"));

                    for (index, parameter) in call.parameters.iter().enumerate().rev() {
                        stack.push(StackItem::Expression(parameter));
                        if index > 0 {
                            stack.push(StackItem::Text(", "));
                        }
                    }

                    if call.distinct {
                        stack.push(StackItem::Text("distinct "));
                    }

                    stack.push(StackItem::Owned(format!("{}(", call.function)));
                }

                Expression::Parenthetical(parenthetical) => {
                    stack.push(StackItem::Text(")"));
                    stack.push(StackItem::Expression(&parenthetical.expression));
                    stack.push(StackItem::Text("("));
                }

                Expression::ArrayLiteral(array) => {
                    if array.type_hint != super::types::DataType::Unknown {
                        stack.push(StackItem::Owned(format!("]::{}", array.type_hint)));
                    } else {
                        stack.push(StackItem::Text("]"));
                    }

                    for (index, value) in array.values.iter().enumerate().rev() {
                        stack.push(StackItem::Expression(value));
                        if index > 0 {
                            stack.push(StackItem::Text(", "));
                        }
                    }

                    stack.push(StackItem::Text("array["));
                }

                Expression::CompositeValue(composite) => {
                    stack.push(StackItem::Owned(format!(")::{}", composite.data_type)));

                    for (index, value) in composite.values.iter().enumerate().rev() {
                        stack.push(StackItem::Expression(value));
                        if index > 0 {
                            stack.push(StackItem::Text(", "));
                        }
                    }

                    stack.push(StackItem::Text("("));
                }

                Expression::Any(any) => {
                    stack.push(StackItem::Text(")"));
                    stack.push(StackItem::Expression(&any.expression));
                    stack.push(StackItem::Text("any("));
                }

                Expression::All(all) => {
                    stack.push(StackItem::Text(")"));
                    stack.push(StackItem::Expression(&all.expression));
                    stack.push(StackItem::Text("all("));
                }

                Expression::Subquery(query) => {
                    builder.write("(");
                    format_query(builder, query)?;
                    builder.write(")");
                }

                Expression::Wildcard => builder.write("*"),
            },
        }
    }

    Ok(())
}

fn format_query(builder: &mut OutputBuilder<'_>, query: &Query) -> Result<(), FormatError> {
    if let Some(with) = &query.common_table_expressions {
        if !with.expressions.is_empty() {
            builder.write("with ");

            if with.recursive {
                builder.write("recursive ");
            }

            for (index, cte) in with.expressions.iter().enumerate() {
                if index > 0 {
                    builder.write(", ");
                }
                format_common_table_expression(builder, cte)?;
            }

            builder.write(" ");
        }
    }

    format_set_expression(builder, &query.body)
}

fn format_common_table_expression(
    builder: &mut OutputBuilder<'_>,
    cte: &CommonTableExpression,
) -> Result<(), FormatError> {
    builder.write(cte.alias.name.as_str());

    if let Some(shape) = &cte.alias.shape {
        builder.write("(");
        for (index, column) in shape.columns.iter().enumerate() {
            if index > 0 {
                builder.write(", ");
            }
            builder.write(column.as_str());
        }
        builder.write(")");
    }

    builder.write(" as ");

    match cte.materialized {
        Some(true) => builder.write("materialized "),
        Some(false) => builder.write("not materialized "),
        None => {}
    }

    builder.write("(");
    format_query(builder, &cte.query)?;
    builder.write(")");

    Ok(())
}

fn format_set_expression(
    builder: &mut OutputBuilder<'_>,
    set_expression: &SetExpression,
) -> Result<(), FormatError> {
    match set_expression {
        SetExpression::Query(query) => format_query(builder, query),
        SetExpression::Select(select) => format_select(builder, select),
        SetExpression::Values(values) => format_values(builder, values),

        SetExpression::Operation(operation) => {
            format_set_expression(builder, &operation.left_operand)?;

            builder.write(" ");
            builder.write(operation.operator.as_str());
            if operation.all {
                builder.write(" all");
            }
            builder.write(" ");

            format_set_expression(builder, &operation.right_operand)
        }
    }
}

fn format_values(builder: &mut OutputBuilder<'_>, values: &Values) -> Result<(), FormatError> {
    builder.write("values (");

    for (index, value) in values.values.iter().enumerate() {
        if index > 0 {
            builder.write(", ");
        }
        format_expression_into(builder, value)?;
    }

    builder.write(")");
    Ok(())
}

fn format_select(builder: &mut OutputBuilder<'_>, select: &Select) -> Result<(), FormatError> {
    if select.projection.is_empty() {
        return Err(FormatError::EmptyProjection);
    }

    builder.write("select ");

    if select.distinct {
        builder.write("distinct ");
    }

    for (index, item) in select.projection.iter().enumerate() {
        if index > 0 {
            builder.write(", ");
        }

        match item {
            SelectItem::Expression(expression) => format_expression_into(builder, expression)?,
            SelectItem::Aliased { expression, alias } => {
                format_expression_into(builder, expression)?;
                builder.write(" as ");
                builder.write(alias.as_str());
            }
        }
    }

    if !select.from.is_empty() {
        builder.write(" from ");

        for (index, from_clause) in select.from.iter().enumerate() {
            if index > 0 {
                builder.write(", ");
            }
            format_from_clause(builder, from_clause)?;
        }
    }

    if let Some(where_clause) = &select.where_clause {
        builder.write(" where ");
        format_expression_into(builder, where_clause)?;
    }

    if !select.group_by.is_empty() {
        builder.write(" group by ");
        for (index, expression) in select.group_by.iter().enumerate() {
            if index > 0 {
                builder.write(", ");
            }
            format_expression_into(builder, expression)?;
        }
    }

    if let Some(having) = &select.having {
        builder.write(" having ");
        format_expression_into(builder, having)?;
    }

    if !select.order_by.is_empty() {
        builder.write(" order by ");
        for (index, order_by) in select.order_by.iter().enumerate() {
            if index > 0 {
                builder.write(", ");
            }

            format_expression_into(builder, &order_by.expression)?;
            if !order_by.ascending {
                builder.write(" desc");
            }
        }
    }

    if let Some(limit) = &select.limit {
        builder.write(" limit ");
        format_expression_into(builder, limit)?;
    }

    if let Some(offset) = &select.offset {
        builder.write(" offset ");
        format_expression_into(builder, offset)?;
    }

    Ok(())
}

fn format_table_reference(
    builder: &mut OutputBuilder<'_>,
    table: &TableReference,
) -> Result<(), FormatError> {
    format_compound_identifier(builder, &table.name)?;

    if let Some(binding) = &table.binding {
        builder.write(" ");
        builder.write(binding.as_str());
    }

    Ok(())
}

fn format_from_clause(
    builder: &mut OutputBuilder<'_>,
    from_clause: &FromClause,
) -> Result<(), FormatError> {
    format_table_reference(builder, &from_clause.source)?;

    for join in &from_clause.joins {
        match join.join_operator.join_type {
            JoinType::Inner => builder.write(" join "),
            JoinType::LeftOuter => builder.write(" left join "),
            JoinType::RightOuter => builder.write(" right join "),
            JoinType::FullOuter => builder.write(" full outer join "),
            JoinType::Cross => builder.write(" cross join "),
        }

        format_table_reference(builder, &join.table)?;

        if let Some(constraint) = &join.join_operator.constraint {
            builder.write(" on ");
            format_expression_into(builder, constraint)?;
        }
    }

    Ok(())
}

fn format_assignments(
    builder: &mut OutputBuilder<'_>,
    assignments: &[Assignment],
) -> Result<(), FormatError> {
    for (index, assignment) in assignments.iter().enumerate() {
        if index > 0 {
            builder.write(", ");
        }

        format_compound_identifier(builder, &assignment.column)?;
        builder.write(" = ");
        format_expression_into(builder, &assignment.value)?;
    }

    Ok(())
}

fn format_insert(builder: &mut OutputBuilder<'_>, insert: &Insert) -> Result<(), FormatError> {
    builder.write("insert into ");
    format_table_reference(builder, &insert.table)?;

    if !insert.shape.is_empty() {
        builder.write(" (");
        for (index, column) in insert.shape.iter().enumerate() {
            if index > 0 {
                builder.write(", ");
            }
            builder.write(column.as_str());
        }
        builder.write(")");
    }

    builder.write(" ");

    match &insert.source {
        InsertSource::Values(values) => format_values(builder, values)?,
        InsertSource::Query(query) => format_query(builder, query)?,
    }

    if let Some(on_conflict) = &insert.on_conflict {
        builder.write(" on conflict");

        match &on_conflict.target {
            Some(ConflictTarget::Columns(columns)) => {
                builder.write(" (");
                for (index, column) in columns.iter().enumerate() {
                    if index > 0 {
                        builder.write(", ");
                    }
                    builder.write(column.as_str());
                }
                builder.write(")");
            }
            Some(ConflictTarget::Constraint(constraint)) => {
                builder.write(" on constraint ");
                format_compound_identifier(builder, constraint)?;
            }
            None => {}
        }

        match &on_conflict.action {
            ConflictAction::DoNothing => builder.write(" do nothing"),
            ConflictAction::DoUpdate {
                assignments,
                where_clause,
            } => {
                builder.write(" do update set ");
                format_assignments(builder, assignments)?;

                if let Some(where_clause) = where_clause {
                    builder.write(" where ");
                    format_expression_into(builder, where_clause)?;
                }
            }
        }
    }

    if !insert.returning.is_empty() {
        builder.write(" returning ");

        for (index, item) in insert.returning.iter().enumerate() {
            if index > 0 {
                builder.write(", ");
            }

            match item {
                SelectItem::Expression(expression) => format_expression_into(builder, expression)?,
                SelectItem::Aliased { expression, alias } => {
                    format_expression_into(builder, expression)?;
                    builder.write(" as ");
                    builder.write(alias.as_str());
                }
            }
        }
    }

    Ok(())
}

fn format_update(builder: &mut OutputBuilder<'_>, update: &Update) -> Result<(), FormatError> {
    builder.write("update ");
    format_table_reference(builder, &update.table)?;

    builder.write(" set ");
    format_assignments(builder, &update.assignments)?;

    if let Some(where_clause) = &update.where_clause {
        builder.write(" where ");
        format_expression_into(builder, where_clause)?;
    }

    Ok(())
}

fn format_delete(builder: &mut OutputBuilder<'_>, delete: &Delete) -> Result<(), FormatError> {
    builder.write("delete from ");
    format_table_reference(builder, &delete.table)?;

    if let Some(where_clause) = &delete.where_clause {
        builder.write(" where ");
        format_expression_into(builder, where_clause)?;
    }

    Ok(())
}

fn format_merge(builder: &mut OutputBuilder<'_>, merge: &Merge) -> Result<(), FormatError> {
    builder.write("merge into ");
    format_table_reference(builder, &merge.into)?;

    builder.write(" using ");
    format_table_reference(builder, &merge.source)?;

    builder.write(" on ");
    format_expression_into(builder, &merge.join_target)?;

    for action in &merge.actions {
        match action {
            MergeAction::MatchedUpdate {
                predicate,
                assignments,
            } => {
                builder.write(" when matched");

                if let Some(predicate) = predicate {
                    builder.write(" and ");
                    format_expression_into(builder, predicate)?;
                }

                builder.write(" then update set ");
                format_assignments(builder, assignments)?;
            }

            MergeAction::MatchedDelete { predicate } => {
                builder.write(" when matched");

                if let Some(predicate) = predicate {
                    builder.write(" and ");
                    format_expression_into(builder, predicate)?;
                }

                builder.write(" then delete");
            }

            MergeAction::UnmatchedInsert {
                predicate,
                shape,
                values,
            } => {
                if !shape.is_empty() && shape.len() != values.values.len() {
                    return Err(FormatError::MergeActionShapeMismatch {
                        shape: shape.len(),
                        values: values.values.len(),
                    });
                }

                builder.write(" when not matched");

                if let Some(predicate) = predicate {
                    builder.write(" and ");
                    format_expression_into(builder, predicate)?;
                }

                builder.write(" then insert");

                if !shape.is_empty() {
                    builder.write(" (");
                    for (index, column) in shape.iter().enumerate() {
                        if index > 0 {
                            builder.write(", ");
                        }
                        builder.write(column.as_str());
                    }
                    builder.write(")");
                }

                builder.write(" ");
                format_values(builder, values)?;
            }
        }
    }

    Ok(())
}
