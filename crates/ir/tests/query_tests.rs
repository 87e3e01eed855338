// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Unit tests for IR query representation

use unilake_sql_ir::{
    BinaryOp, ColumnRef, CommonTableExpr, Dialect, Expr, Join, JoinCondition, JoinType, Literal,
    OrderBy, Query, SelectItem, SelectStatement, SetOp, SortDirection, TableFactor, TableRef,
};

#[test]
fn test_query_new() {
    let query = Query::new(Dialect::MySQL);
    assert_eq!(query.dialect, Dialect::MySQL);
    assert!(matches!(query.body, SetOp::Select(_)));
}

#[test]
fn test_query_with_limit_and_offset() {
    let query = Query::new(Dialect::MySQL)
        .with_limit(Expr::integer(10))
        .with_offset(Expr::integer(20));

    assert!(matches!(query.limit, Some(Expr::Literal(Literal::Integer(10)))));
    assert!(matches!(query.offset, Some(Expr::Literal(Literal::Integer(20)))));
}

#[test]
fn test_query_with_order_by() {
    let order_by = vec![OrderBy {
        expr: Expr::column("id"),
        direction: Some(SortDirection::Asc),
    }];

    let query = Query::new(Dialect::PostgreSQL).with_order_by(order_by);
    assert_eq!(query.order_by.as_ref().unwrap().len(), 1);
}

#[test]
fn test_select_statement_with_projection() {
    let mut select = SelectStatement::default();
    select.projection = vec![
        SelectItem::UnnamedExpr(Expr::column("id")),
        SelectItem::AliasedExpr {
            expr: Expr::column("name"),
            alias: "n".to_string(),
        },
    ];
    assert_eq!(select.projection.len(), 2);
}

#[test]
fn test_table_ref_base_table_alias_falls_back() {
    let table = TableRef::table("users");
    assert_eq!(table.effective_alias(), "users");
    assert!(table.joins.is_empty());
}

#[test]
fn test_table_ref_derived_subquery_is_its_own_scope() {
    let inner = Query::new(Dialect::Generic);
    let table = TableRef {
        factor: TableFactor::Derived {
            query: Box::new(inner),
            alias: "_q_0".to_string(),
        },
        joins: Vec::new(),
    };
    assert_eq!(table.effective_alias(), "_q_0");
}

#[test]
fn test_join_construction() {
    let join = Join {
        join_type: JoinType::Left,
        table: TableRef::table("orders"),
        condition: JoinCondition::On(Expr::BinaryOp {
            left: Box::new(Expr::qualified_column("users", "id")),
            op: BinaryOp::Eq,
            right: Box::new(Expr::qualified_column("orders", "user_id")),
        }),
    };
    assert!(matches!(join.join_type, JoinType::Left));
    assert!(matches!(join.condition, JoinCondition::On(_)));
}

#[test]
fn test_select_item_wildcards() {
    assert!(matches!(SelectItem::Wildcard, SelectItem::Wildcard));
    let qw = SelectItem::QualifiedWildcard("users".to_string());
    assert!(matches!(qw, SelectItem::QualifiedWildcard(_)));
}

#[test]
fn test_query_with_ctes_in_declared_order() {
    let mut query = Query::new(Dialect::PostgreSQL);
    query.ctes = vec![
        CommonTableExpr {
            name: "first".to_string(),
            columns: Vec::new(),
            query: Box::new(Query::new(Dialect::PostgreSQL)),
            materialized: None,
        },
        CommonTableExpr {
            name: "second".to_string(),
            columns: Vec::new(),
            query: Box::new(Query::new(Dialect::PostgreSQL)),
            materialized: None,
        },
    ];
    assert_eq!(query.ctes.len(), 2);
    assert_eq!(query.ctes[0].name, "first");
    assert_eq!(query.ctes[1].name, "second");
}

#[test]
fn test_select_statement_with_where_and_group_by() {
    let mut select = SelectStatement::default();
    select.where_clause = Some(Expr::BinaryOp {
        left: Box::new(Expr::column("id")),
        op: BinaryOp::Gt,
        right: Box::new(Expr::integer(10)),
    });
    select.group_by = vec![Expr::column("category"), Expr::column("status")];

    assert!(select.where_clause.is_some());
    assert_eq!(select.group_by.len(), 2);
}

#[test]
fn column_ref_used_in_column_ref_helper() {
    let col = ColumnRef::new("id").with_table("users");
    assert_eq!(col.qualified(), "users.id");
}
