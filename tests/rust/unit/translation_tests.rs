//! End-to-end translation scenarios: source query model in, SQL text out.

#[cfg(test)]
mod translation_tests {
    use graphsql::open_cypher_model::{
        Comparison, Conjunction, Direction, Disjunction, ExclusiveDisjunction, Expression,
        FunctionInvocation, KindMatcher, Limit, ListLiteral, Literal, MapLiteral, MultiPartQuery,
        Operator, Order, Parameter, Projection, RegularQuery, SinglePartQuery, SingleQuery, Skip,
        SortItem,
    };
    use graphsql::pg_query_generator::Value;
    use graphsql::{translate, FormatOptions, TranslateError};

    use crate::support::*;

    fn count_of(symbol: &str) -> Expression {
        Expression::FunctionInvocation(FunctionInvocation {
            name: "count".to_owned(),
            distinct: false,
            arguments: vec![Expression::variable(symbol)],
        })
    }

    fn integer(value: i64) -> Expression {
        Expression::Literal(Literal::Integer(value))
    }

    fn text(value: &str) -> Expression {
        Expression::Literal(Literal::String(value.to_owned()))
    }

    fn compare(left: Expression, operator: Operator, right: Expression) -> Expression {
        Expression::Comparison(Comparison::new(left, operator, right))
    }

    #[test]
    fn in_list_membership_filters_inside_the_cte() {
        // match (n) where n.prop in [1, 2, 3, 4] return count(n)
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![node(Some("n"), &[])])],
                where_clause(compare(
                    Expression::property("n", "prop"),
                    Operator::In,
                    Expression::ListLiteral(ListLiteral {
                        values: vec![integer(1), integer(2), integer(3), integer(4)],
                    }),
                )),
            )],
            returning(vec![item(count_of("n"))]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0 where n0.properties -> 'prop' = any(array[1, 2, 3, 4]::int8[])) select count(*) from n0;"
        );
    }

    #[test]
    fn kind_filtered_node_projects_the_composite() {
        // match (n:Domain) return n
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![node(Some("n"), &["Domain"])])],
                None,
            )],
            returning(vec![item(Expression::variable("n"))]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[("Domain", 23)])),
            "with n0 as (select * from node n0 where n0.kind_ids operator(pg_catalog.&&) array[23]::int2[]) select (n0.id, n0.kind_ids, n0.properties)::nodecomposite as n from n0;"
        );
    }

    #[test]
    fn traversal_emits_a_cte_per_binding() {
        // match (a)-[r:HasSession]->(b) return a, b
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![
                    node(Some("a"), &[]),
                    edge(Some("r"), &["HasSession"], Direction::Outbound),
                    node(Some("b"), &[]),
                ])],
                None,
            )],
            returning(vec![
                item(Expression::variable("a")),
                item(Expression::variable("b")),
            ]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[("HasSession", 3)])),
            "with n0 as (select * from node n0), \
             e0 as (select * from edge e0, n0 where e0.kind_id = any(array[3]::int2[]) and n0.id = e0.start_id), \
             n1 as (select * from node n1, e0 where n1.id = e0.end_id) \
             select (n0.id, n0.kind_ids, n0.properties)::nodecomposite as a, (n1.id, n1.kind_ids, n1.properties)::nodecomposite as b from n0, n1;"
        );
    }

    #[test]
    fn two_hop_traversal_chains_through_shared_nodes() {
        // match (a)-[r1]->(b)-[r2]->(c) return c
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![
                    node(Some("a"), &[]),
                    edge(Some("r1"), &[], Direction::Outbound),
                    node(Some("b"), &[]),
                    edge(Some("r2"), &[], Direction::Outbound),
                    node(Some("c"), &[]),
                ])],
                None,
            )],
            returning(vec![item(Expression::variable("c"))]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0), \
             e0 as (select * from edge e0, n0 where n0.id = e0.start_id), \
             n1 as (select * from node n1, e0 where n1.id = e0.end_id), \
             e1 as (select * from edge e1, n1 where n1.id = e1.start_id), \
             n2 as (select * from node n2, e1 where n2.id = e1.end_id) \
             select (n2.id, n2.kind_ids, n2.properties)::nodecomposite as c from n2;"
        );
    }

    #[test]
    fn inbound_direction_swaps_the_join_columns() {
        // match (a)<-[r]-(b) return a
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![
                    node(Some("a"), &[]),
                    edge(Some("r"), &[], Direction::Inbound),
                    node(Some("b"), &[]),
                ])],
                None,
            )],
            returning(vec![item(Expression::variable("a"))]),
        );

        let sql = to_sql(&query, &MapKindMapper::new(&[]));
        assert!(sql.contains("n0.id = e0.end_id"));
        assert!(sql.contains("n1.id = e0.start_id"));
    }

    #[test]
    fn conjunction_splits_to_the_narrowest_cte() {
        // match (x)-[r]->(y) where x.v > y.v and x.kind = 1 return x
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![
                    node(Some("x"), &[]),
                    edge(Some("r"), &[], Direction::Outbound),
                    node(Some("y"), &[]),
                ])],
                where_clause(Expression::Conjunction(Conjunction {
                    expressions: vec![
                        compare(
                            Expression::property("x", "v"),
                            Operator::GreaterThan,
                            Expression::property("y", "v"),
                        ),
                        compare(Expression::property("x", "kind"), Operator::Equals, integer(1)),
                    ],
                })),
            )],
            returning(vec![item(Expression::variable("x"))]),
        );

        // The single-identifier predicate lands in x's own CTE; the
        // two-identifier predicate waits until both CTEs exist.
        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0 where n0.properties -> 'kind' = 1), \
             e0 as (select * from edge e0, n0 where n0.id = e0.start_id), \
             n1 as (select * from node n1, e0, n0 where n0.properties -> 'v' > n1.properties -> 'v' and n1.id = e0.end_id) \
             select (n0.id, n0.kind_ids, n0.properties)::nodecomposite as x from n0;"
        );
    }

    #[test]
    fn disjunction_is_kept_whole() {
        // match (n) where n.v = 1 or n.w = 2 return n
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![node(Some("n"), &[])])],
                where_clause(Expression::Disjunction(Disjunction {
                    expressions: vec![
                        compare(Expression::property("n", "v"), Operator::Equals, integer(1)),
                        compare(Expression::property("n", "w"), Operator::Equals, integer(2)),
                    ],
                })),
            )],
            returning(vec![item(Expression::variable("n"))]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0 where n0.properties -> 'v' = 1 or n0.properties -> 'w' = 2) \
             select (n0.id, n0.kind_ids, n0.properties)::nodecomposite as n from n0;"
        );
    }

    #[test]
    fn cyclic_pattern_reuses_the_binding() {
        // match (a)-[r]->(a) return a
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![
                    node(Some("a"), &[]),
                    edge(Some("r"), &[], Direction::Outbound),
                    node(Some("a"), &[]),
                ])],
                None,
            )],
            returning(vec![item(Expression::variable("a"))]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0), \
             e0 as (select * from edge e0, n0 where n0.id = e0.start_id) \
             select (n0.id, n0.kind_ids, n0.properties)::nodecomposite as a from n0, e0 where n0.id = e0.end_id;"
        );
    }

    #[test]
    fn path_binding_projects_the_path_composite() {
        // match p = (a)-[r]->(b) return p
        let query = regular_query(
            vec![match_clause(
                vec![bound_pattern(
                    "p",
                    vec![
                        node(Some("a"), &[]),
                        edge(Some("r"), &[], Direction::Outbound),
                        node(Some("b"), &[]),
                    ],
                )],
                None,
            )],
            returning(vec![item(Expression::variable("p"))]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0), \
             e0 as (select * from edge e0, n0 where n0.id = e0.start_id), \
             n1 as (select * from node n1, e0 where n1.id = e0.end_id) \
             select (array[(n0.id, n0.kind_ids, n0.properties)::nodecomposite, (n1.id, n1.kind_ids, n1.properties)::nodecomposite]::nodecomposite[], \
             array[(e0.id, e0.start_id, e0.end_id, e0.kind_id, e0.properties)::edgecomposite]::edgecomposite[])::pathcomposite as p \
             from n0, e0, n1 where n0.id = e0.start_id and n1.id = e0.end_id;"
        );
    }

    #[test]
    fn inline_property_matcher_becomes_a_cte_filter() {
        // match (n {name: 'x'}) return n
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![node_with_properties(
                    Some("n"),
                    Expression::MapLiteral(MapLiteral {
                        entries: vec![("name".to_owned(), text("x"))],
                    }),
                )])],
                None,
            )],
            returning(vec![item(Expression::variable("n"))]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0 where n0.properties -> 'name' = 'x') \
             select (n0.id, n0.kind_ids, n0.properties)::nodecomposite as n from n0;"
        );
    }

    #[test]
    fn where_kind_matcher_filters_by_overlap() {
        // match (n) where n:User return n
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![node(Some("n"), &[])])],
                where_clause(Expression::KindMatcher(KindMatcher {
                    reference: Box::new(Expression::variable("n")),
                    kinds: vec!["User".to_owned()],
                })),
            )],
            returning(vec![item(Expression::variable("n"))]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[("User", 9)])),
            "with n0 as (select * from node n0 where n0.kind_ids operator(pg_catalog.&&) array[9]::int2[]) \
             select (n0.id, n0.kind_ids, n0.properties)::nodecomposite as n from n0;"
        );
    }

    #[test]
    fn starts_with_rewrites_to_like() {
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![node(Some("n"), &[])])],
                where_clause(compare(
                    Expression::property("n", "name"),
                    Operator::StartsWith,
                    text("ad"),
                )),
            )],
            returning(vec![item(Expression::variable("n"))]),
        );

        let sql = to_sql(&query, &MapKindMapper::new(&[]));
        assert!(sql.contains("n0.properties -> 'name' like 'ad%'"));
    }

    #[test]
    fn regex_match_rewrites_to_tilde() {
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![node(Some("n"), &[])])],
                where_clause(compare(
                    Expression::property("n", "name"),
                    Operator::RegexMatch,
                    text("a.*"),
                )),
            )],
            returning(vec![item(Expression::variable("n"))]),
        );

        let sql = to_sql(&query, &MapKindMapper::new(&[]));
        assert!(sql.contains("n0.properties -> 'name' ~ 'a.*'"));
    }

    #[test]
    fn aliased_property_projection() {
        // match (n) return n.name as name
        let query = regular_query(
            vec![match_clause(vec![pattern(vec![node(Some("n"), &[])])], None)],
            returning(vec![aliased_item(Expression::property("n", "name"), "name")]),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0) select n0.properties -> 'name' as name from n0;"
        );
    }

    #[test]
    fn distinct_projection() {
        let query = regular_query(
            vec![match_clause(vec![pattern(vec![node(Some("n"), &[])])], None)],
            Some(Projection {
                distinct: true,
                items: vec![item(Expression::property("n", "name"))],
                order: None,
                skip: None,
                limit: None,
            }),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0) select distinct n0.properties -> 'name' from n0;"
        );
    }

    #[test]
    fn order_skip_limit_carry_to_the_final_select() {
        // match (n) return n order by n.name skip 2 limit 10
        let query = regular_query(
            vec![match_clause(vec![pattern(vec![node(Some("n"), &[])])], None)],
            Some(Projection {
                distinct: false,
                items: vec![item(Expression::variable("n"))],
                order: Some(Order {
                    items: vec![SortItem {
                        ascending: true,
                        expression: Box::new(Expression::property("n", "name")),
                    }],
                }),
                skip: Some(Skip {
                    value: Box::new(integer(2)),
                }),
                limit: Some(Limit {
                    value: Box::new(integer(10)),
                }),
            }),
        );

        assert_eq!(
            to_sql(&query, &MapKindMapper::new(&[])),
            "with n0 as (select * from node n0) \
             select (n0.id, n0.kind_ids, n0.properties)::nodecomposite as n from n0 \
             order by n0.properties -> 'name' limit 10 offset 2;"
        );
    }

    fn parameter_query() -> RegularQuery {
        // match (n) where n.name = $name return count(n)
        regular_query(
            vec![match_clause(
                vec![pattern(vec![node(Some("n"), &[])])],
                where_clause(compare(
                    Expression::property("n", "name"),
                    Operator::Equals,
                    Expression::Parameter(Parameter {
                        symbol: "name".to_owned(),
                        value: Literal::String("alice".to_owned()),
                    }),
                )),
            )],
            returning(vec![item(count_of("n"))]),
        )
    }

    #[test]
    fn parameters_flow_to_the_side_table() {
        let statement = translate(&parameter_query(), &MapKindMapper::new(&[])).unwrap();
        let preserved =
            graphsql::format_statement(&statement, &FormatOptions::default()).unwrap();

        assert_eq!(
            preserved.sql,
            "with n0 as (select * from node n0 where n0.properties -> 'name' = @name) select count(*) from n0;"
        );
        assert_eq!(
            preserved.parameters.get("name"),
            Some(&Value::Text("alice".to_owned()))
        );
        assert_eq!(
            serde_json::to_string(&preserved.parameters).unwrap(),
            r#"{"name":"alice"}"#
        );
    }

    #[test]
    fn parameter_modes_differ_only_in_value_representation() {
        let statement = translate(&parameter_query(), &MapKindMapper::new(&[])).unwrap();

        let materialized =
            graphsql::format_statement(&statement, &FormatOptions::materialized()).unwrap();
        let preserved =
            graphsql::format_statement(&statement, &FormatOptions::default()).unwrap();

        assert!(materialized.parameters.is_empty());
        assert_eq!(materialized.sql, preserved.sql.replace("@name", "'alice'"));
    }

    #[test]
    fn translation_is_deterministic() {
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![
                    node(Some("a"), &["User"]),
                    edge(Some("r"), &["MemberOf"], Direction::Outbound),
                    node(Some("b"), &["Group"]),
                ])],
                where_clause(compare(
                    Expression::property("a", "enabled"),
                    Operator::Equals,
                    Expression::Literal(Literal::Boolean(true)),
                )),
            )],
            returning(vec![item(Expression::variable("b"))]),
        );

        let mapper = MapKindMapper::new(&[("User", 1), ("MemberOf", 2), ("Group", 3)]);
        assert_eq!(to_sql(&query, &mapper), to_sql(&query, &mapper));
    }

    #[test]
    fn unknown_alias_is_reported() {
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![node(Some("n"), &[])])],
                where_clause(compare(
                    Expression::property("missing", "prop"),
                    Operator::Equals,
                    integer(1),
                )),
            )],
            returning(vec![item(Expression::variable("n"))]),
        );

        let error = translate(&query, &MapKindMapper::new(&[])).unwrap_err();
        assert!(error.to_string().contains("missing"));
    }

    #[test]
    fn reusing_a_node_variable_as_an_edge_is_an_error() {
        // match (a)-[a]->(b) return b
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![
                    node(Some("a"), &[]),
                    edge(Some("a"), &[], Direction::Outbound),
                    node(Some("b"), &[]),
                ])],
                None,
            )],
            returning(vec![item(Expression::variable("b"))]),
        );

        let error = translate(&query, &MapKindMapper::new(&[])).unwrap_err();
        assert!(error
            .to_string()
            .contains("variable a is bound as nodecomposite but referenced as edgecomposite"));
    }

    #[test]
    fn unknown_kind_propagates_from_the_mapper() {
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![
                    node(Some("a"), &[]),
                    edge(Some("r"), &["Nonexistent"], Direction::Outbound),
                    node(Some("b"), &[]),
                ])],
                None,
            )],
            returning(vec![item(Expression::variable("a"))]),
        );

        let error = translate(&query, &MapKindMapper::new(&[])).unwrap_err();
        assert!(error.to_string().contains("unknown kinds: Nonexistent"));
    }

    #[test]
    fn bidirectional_traversal_is_unsupported() {
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![
                    node(Some("a"), &[]),
                    edge(Some("r"), &[], Direction::Bidirectional),
                    node(Some("b"), &[]),
                ])],
                None,
            )],
            returning(vec![item(Expression::variable("a"))]),
        );

        assert!(matches!(
            translate(&query, &MapKindMapper::new(&[])).unwrap_err(),
            TranslateError::UnsupportedDirection(Direction::Bidirectional)
        ));
    }

    #[test]
    fn multi_part_queries_are_unsupported() {
        let query = RegularQuery {
            single_query: SingleQuery::MultiPart(MultiPartQuery {
                parts: vec![SinglePartQuery {
                    reading_clauses: vec![match_clause(
                        vec![pattern(vec![node(Some("n"), &[])])],
                        None,
                    )],
                    projection: None,
                }],
                tail: SinglePartQuery {
                    reading_clauses: Vec::new(),
                    projection: returning(vec![item(Expression::variable("n"))]),
                },
            }),
        };

        assert!(matches!(
            translate(&query, &MapKindMapper::new(&[])).unwrap_err(),
            TranslateError::UnsupportedMultiPartQuery
        ));
    }

    #[test]
    fn exclusive_disjunction_is_unsupported() {
        let query = regular_query(
            vec![match_clause(
                vec![pattern(vec![node(Some("n"), &[])])],
                where_clause(Expression::ExclusiveDisjunction(ExclusiveDisjunction {
                    expressions: vec![
                        compare(Expression::property("n", "v"), Operator::Equals, integer(1)),
                        compare(Expression::property("n", "w"), Operator::Equals, integer(2)),
                    ],
                })),
            )],
            returning(vec![item(Expression::variable("n"))]),
        );

        let error = translate(&query, &MapKindMapper::new(&[])).unwrap_err();
        assert!(error.to_string().contains("xor"));
    }
}
