//! Serialization coverage for the writable statement forms: insert with
//! conflict handling, update, delete, merge, and set operations.

#[cfg(test)]
mod statement_formatting_tests {
    use graphsql::pg_query_generator::{
        Assignment, BinaryExpression, CommonTableExpression, CompoundIdentifier, ConflictAction,
        ConflictTarget, DataType, Expression, FormatError, FunctionCall, Identifier, Insert,
        InsertSource, Merge, MergeAction, OnConflict, Operator, Query, Select, SelectItem,
        SetExpression, SetOperation, SetOperator, Statement, TableAlias, TableReference, Update,
        Values,
    };
    use graphsql::pg_query_generator::{ArrayLiteral, Delete, FromClause, Value};
    use graphsql::{format_statement, FormatOptions};

    fn sql(statement: &Statement) -> String {
        format_statement(statement, &FormatOptions::default())
            .expect("statement should format")
            .sql
    }

    fn table(name: &str) -> TableReference {
        TableReference {
            name: CompoundIdentifier(vec![Identifier::from(name)]),
            binding: None,
        }
    }

    fn bound_table(name: &str, binding: &str) -> TableReference {
        TableReference {
            name: CompoundIdentifier(vec![Identifier::from(name)]),
            binding: Some(Identifier::from(binding)),
        }
    }

    fn column(binding: &str, name: &str) -> Expression {
        Expression::column(&Identifier::from(binding), name)
    }

    fn assign(column: &str, value: Expression) -> Assignment {
        Assignment {
            column: CompoundIdentifier(vec![Identifier::from(column)]),
            value,
        }
    }

    #[test]
    fn insert_with_conflict_update_and_returning() {
        let statement = Statement::Insert(Insert {
            table: table("node"),
            shape: vec![
                Identifier::from("id"),
                Identifier::from("kind_ids"),
                Identifier::from("properties"),
            ],
            source: InsertSource::Values(Values {
                values: vec![
                    Expression::literal(1i64),
                    Expression::ArrayLiteral(ArrayLiteral {
                        values: vec![Expression::literal(Value::Int16(2))],
                        type_hint: DataType::Int2Array,
                    }),
                    Expression::literal("{}"),
                ],
            }),
            on_conflict: Some(OnConflict {
                target: Some(ConflictTarget::Columns(vec![Identifier::from("id")])),
                action: ConflictAction::DoUpdate {
                    assignments: vec![assign("properties", Expression::literal("{}"))],
                    where_clause: None,
                },
            }),
            returning: vec![SelectItem::Expression(Expression::Identifier(
                Identifier::from("id"),
            ))],
        });

        assert_eq!(
            sql(&statement),
            "insert into node (id, kind_ids, properties) \
             values (1, array[2]::int2[], '{}') \
             on conflict (id) do update set properties = '{}' \
             returning id;"
        );
    }

    #[test]
    fn insert_conflict_do_nothing_without_target() {
        let statement = Statement::Insert(Insert {
            table: table("edge"),
            shape: Vec::new(),
            source: InsertSource::Values(Values {
                values: vec![Expression::literal(1i64), Expression::literal(2i64)],
            }),
            on_conflict: Some(OnConflict {
                target: None,
                action: ConflictAction::DoNothing,
            }),
            returning: Vec::new(),
        });

        assert_eq!(
            sql(&statement),
            "insert into edge values (1, 2) on conflict do nothing;"
        );
    }

    #[test]
    fn update_with_binding_and_filter() {
        let statement = Statement::Update(Update {
            table: bound_table("edge", "e0"),
            assignments: vec![assign("properties", Expression::literal("{}"))],
            where_clause: Some(BinaryExpression::new(
                column("e0", "id"),
                Operator::Equals,
                Expression::literal(7i64),
            )),
        });

        assert_eq!(
            sql(&statement),
            "update edge e0 set properties = '{}' where e0.id = 7;"
        );
    }

    #[test]
    fn delete_with_filter() {
        let statement = Statement::Delete(Delete {
            table: table("edge"),
            where_clause: Some(BinaryExpression::new(
                column("edge", "kind_id"),
                Operator::Equals,
                Expression::literal(Value::Int16(3)),
            )),
        });

        assert_eq!(sql(&statement), "delete from edge where edge.kind_id = 3;");
    }

    #[test]
    fn merge_with_matched_and_unmatched_actions() {
        let statement = Statement::Merge(Merge {
            into: table("node"),
            source: table("staging"),
            join_target: BinaryExpression::new(
                column("node", "id"),
                Operator::Equals,
                column("staging", "id"),
            ),
            actions: vec![
                MergeAction::MatchedUpdate {
                    predicate: None,
                    assignments: vec![assign("properties", column("staging", "properties"))],
                },
                MergeAction::UnmatchedInsert {
                    predicate: None,
                    shape: vec![Identifier::from("id"), Identifier::from("properties")],
                    values: Values {
                        values: vec![column("staging", "id"), column("staging", "properties")],
                    },
                },
            ],
        });

        assert_eq!(
            sql(&statement),
            "merge into node using staging on node.id = staging.id \
             when matched then update set properties = staging.properties \
             when not matched then insert (id, properties) values (staging.id, staging.properties);"
        );
    }

    #[test]
    fn merge_insert_shape_mismatch_is_an_error() {
        let statement = Statement::Merge(Merge {
            into: table("node"),
            source: table("staging"),
            join_target: BinaryExpression::new(
                column("node", "id"),
                Operator::Equals,
                column("staging", "id"),
            ),
            actions: vec![MergeAction::UnmatchedInsert {
                predicate: None,
                shape: vec![Identifier::from("id"), Identifier::from("properties")],
                values: Values {
                    values: vec![column("staging", "id")],
                },
            }],
        });

        let error = format_statement(&statement, &FormatOptions::default()).unwrap_err();
        assert!(matches!(
            error,
            FormatError::MergeActionShapeMismatch {
                shape: 2,
                values: 1
            }
        ));
    }

    #[test]
    fn union_all_of_two_selects() {
        let select = |value: i64| Select {
            projection: vec![SelectItem::Expression(Expression::literal(value))],
            ..Select::default()
        };

        let statement = Statement::Query(Query {
            common_table_expressions: None,
            body: SetExpression::Operation(Box::new(SetOperation {
                operator: SetOperator::Union,
                all: true,
                left_operand: SetExpression::Select(select(1)),
                right_operand: SetExpression::Select(select(2)),
            })),
        });

        assert_eq!(sql(&statement), "select 1 union all select 2;");
    }

    #[test]
    fn group_by_with_having() {
        let count = Expression::FunctionCall(FunctionCall {
            distinct: false,
            function: Identifier::from("count"),
            parameters: vec![Expression::Wildcard],
        });

        let statement = Statement::Query(Query::single_select(Select {
            projection: vec![
                SelectItem::Expression(column("e0", "kind_id")),
                SelectItem::Expression(count.clone()),
            ],
            from: vec![FromClause::table(
                Identifier::from("edge"),
                Some(Identifier::from("e0")),
            )],
            group_by: vec![column("e0", "kind_id")],
            having: Some(BinaryExpression::new(
                count,
                Operator::GreaterThan,
                Expression::literal(10i64),
            )),
            ..Select::default()
        }));

        assert_eq!(
            sql(&statement),
            "select e0.kind_id, count(*) from edge e0 group by e0.kind_id having count(*) > 10;"
        );
    }

    #[test]
    fn not_materialized_cte_hint() {
        let mut query = Query::single_select(Select {
            projection: vec![SelectItem::Expression(Expression::Wildcard)],
            from: vec![FromClause::table(Identifier::from("small"), None)],
            ..Select::default()
        });
        query.add_cte(CommonTableExpression {
            alias: TableAlias::new(Identifier::from("small")),
            materialized: Some(false),
            query: Query::single_select(Select {
                projection: vec![SelectItem::Expression(Expression::literal(1i64))],
                ..Select::default()
            }),
        });

        assert_eq!(
            sql(&Statement::Query(query)),
            "with small as not materialized (select 1) select * from small;"
        );
    }

    #[test]
    fn bare_values_statement() {
        let statement = Statement::Query(Query {
            common_table_expressions: None,
            body: SetExpression::Values(Values {
                values: vec![Expression::literal(1i64), Expression::literal("x")],
            }),
        });

        assert_eq!(sql(&statement), "values (1, 'x');");
    }
}
