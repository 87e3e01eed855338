// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Scope traversal (C3)
//!
//! A *scope* is a contiguous SELECT body: the outermost query, each CTE
//! body, each derived-table subquery in a FROM clause, and each branch of a
//! set operation. `walk_scopes`/`walk_scopes_mut` is the single traversal
//! both the scan extractor and the transpiler's masking/filter passes key
//! on, so the two can never assign a column to a different scope id than
//! the one the other pass numbered it under.
//!
//! Numbering is post-order: every scope nested inside another (a CTE body,
//! a derived-table subquery, a set-operation branch) is assigned its id
//! before the scope that contains it. For a plain `WITH a AS (...), b AS
//! (...) SELECT ... FROM a JOIN b` this reduces to the textbook case — CTEs
//! numbered in declaration order, the outer SELECT last — because CTE
//! bodies are walked to completion, in order, before the outer body is
//! visited at all.

use unilake_sql_ir::{Query, SelectStatement, SetOp, Statement, TableFactor, TableRef};

/// Walk every scope reachable from `stmt`'s embedded query (if any),
/// invoking `visit` once per scope in post-order. Returns the number of
/// scopes visited. `UPDATE`/`DELETE`/`Command`/`Other`/query-less `CREATE`/
/// `TRUNCATE` statements have no embedded SELECT and visit zero scopes —
/// masking and filtering leave them untouched (statement-kind flow gating,
/// spec §4.10).
pub fn walk_scopes_mut(stmt: &mut Statement, visit: &mut dyn FnMut(usize, &mut SelectStatement)) -> usize {
    let mut next_id = 0usize;
    match stmt {
        Statement::Query(query) => walk_query_mut(query, visit, &mut next_id),
        Statement::Insert(insert) => {
            if let unilake_sql_ir::InsertSource::Query(query) = &mut insert.source {
                walk_query_mut(query, visit, &mut next_id);
            }
        }
        Statement::Create(create) => {
            if let Some(query) = &mut create.query {
                walk_query_mut(query, visit, &mut next_id);
            }
        }
        Statement::Update(_)
        | Statement::Delete(_)
        | Statement::Truncate(_)
        | Statement::Command(_)
        | Statement::Other { .. } => {}
    }
    next_id
}

/// Read-only counterpart of [`walk_scopes_mut`], for the scan extractor.
pub fn walk_scopes(stmt: &Statement, visit: &mut dyn FnMut(usize, &SelectStatement)) -> usize {
    let mut next_id = 0usize;
    match stmt {
        Statement::Query(query) => walk_query(query, visit, &mut next_id),
        Statement::Insert(insert) => {
            if let unilake_sql_ir::InsertSource::Query(query) = &insert.source {
                walk_query(query, visit, &mut next_id);
            }
        }
        Statement::Create(create) => {
            if let Some(query) = &create.query {
                walk_query(query, visit, &mut next_id);
            }
        }
        Statement::Update(_)
        | Statement::Delete(_)
        | Statement::Truncate(_)
        | Statement::Command(_)
        | Statement::Other { .. } => {}
    }
    next_id
}

fn walk_query_mut(query: &mut Query, visit: &mut dyn FnMut(usize, &mut SelectStatement), next_id: &mut usize) {
    for cte in &mut query.ctes {
        walk_query_mut(&mut cte.query, visit, next_id);
    }
    walk_set_op_mut(&mut query.body, visit, next_id);
}

fn walk_set_op_mut(body: &mut SetOp, visit: &mut dyn FnMut(usize, &mut SelectStatement), next_id: &mut usize) {
    match body {
        SetOp::Select(select) => {
            for table_ref in &mut select.from {
                walk_table_ref_mut(table_ref, visit, next_id);
            }
            let id = *next_id;
            *next_id += 1;
            visit(id, select);
        }
        SetOp::Union { left, right, .. }
        | SetOp::Intersect { left, right, .. }
        | SetOp::Except { left, right, .. } => {
            walk_query_mut(left, visit, next_id);
            walk_query_mut(right, visit, next_id);
        }
    }
}

fn walk_table_ref_mut(table_ref: &mut TableRef, visit: &mut dyn FnMut(usize, &mut SelectStatement), next_id: &mut usize) {
    if let TableFactor::Derived { query, .. } = &mut table_ref.factor {
        walk_query_mut(query, visit, next_id);
    }
    for join in &mut table_ref.joins {
        walk_table_ref_mut(&mut join.table, visit, next_id);
    }
}

fn walk_query(query: &Query, visit: &mut dyn FnMut(usize, &SelectStatement), next_id: &mut usize) {
    for cte in &query.ctes {
        walk_query(&cte.query, visit, next_id);
    }
    walk_set_op(&query.body, visit, next_id);
}

fn walk_set_op(body: &SetOp, visit: &mut dyn FnMut(usize, &SelectStatement), next_id: &mut usize) {
    match body {
        SetOp::Select(select) => {
            for table_ref in &select.from {
                walk_table_ref(table_ref, visit, next_id);
            }
            let id = *next_id;
            *next_id += 1;
            visit(id, select);
        }
        SetOp::Union { left, right, .. }
        | SetOp::Intersect { left, right, .. }
        | SetOp::Except { left, right, .. } => {
            walk_query(left, visit, next_id);
            walk_query(right, visit, next_id);
        }
    }
}

fn walk_table_ref(table_ref: &TableRef, visit: &mut dyn FnMut(usize, &SelectStatement), next_id: &mut usize) {
    if let TableFactor::Derived { query, .. } = &table_ref.factor {
        walk_query(query, visit, next_id);
    }
    for join in &table_ref.joins {
        walk_table_ref(&join.table, visit, next_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unilake_sql_ir::{CommonTableExpr, Dialect, SelectItem};

    fn select_from(table: &str) -> SelectStatement {
        let mut select = SelectStatement::default();
        select.from.push(TableRef::table(table));
        select.projection.push(SelectItem::UnnamedExpr(expr_column("id")));
        select
    }

    fn expr_column(name: &str) -> unilake_sql_ir::Expr {
        unilake_sql_ir::Expr::column(name)
    }

    #[test]
    fn single_select_is_scope_zero() {
        let mut stmt = Statement::Query(Box::new(Query {
            body: SetOp::Select(Box::new(select_from("b"))),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect: Dialect::Generic,
        }));
        let mut seen = Vec::new();
        let count = walk_scopes_mut(&mut stmt, &mut |id, _| seen.push(id));
        assert_eq!(count, 1);
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn ctes_numbered_before_outer_select() {
        let cte_query = Query {
            body: SetOp::Select(Box::new(select_from("cte_src"))),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect: Dialect::Generic,
        };
        let mut stmt = Statement::Query(Box::new(Query {
            body: SetOp::Select(Box::new(select_from("b"))),
            order_by: None,
            limit: None,
            offset: None,
            ctes: vec![CommonTableExpr {
                name: "a".to_string(),
                columns: Vec::new(),
                query: Box::new(cte_query),
                materialized: None,
            }],
            dialect: Dialect::Generic,
        }));
        let mut seen = Vec::new();
        walk_scopes_mut(&mut stmt, &mut |id, _| seen.push(id));
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn derived_subquery_scope_precedes_its_enclosing_select() {
        let inner_query = Query {
            body: SetOp::Select(Box::new(select_from("inner_tbl"))),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect: Dialect::Generic,
        };
        let mut outer_select = SelectStatement::default();
        outer_select.from.push(TableRef {
            factor: TableFactor::Derived {
                query: Box::new(inner_query),
                alias: "d".to_string(),
            },
            joins: Vec::new(),
        });
        let mut stmt = Statement::Query(Box::new(Query {
            body: SetOp::Select(Box::new(outer_select)),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect: Dialect::Generic,
        }));
        let mut seen = Vec::new();
        walk_scopes_mut(&mut stmt, &mut |id, _| seen.push(id));
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn update_statement_has_no_scopes() {
        let mut stmt = Statement::Update(unilake_sql_ir::UpdateStatement {
            table: TableRef::table("b"),
            assignments: Vec::new(),
            where_clause: None,
        });
        let count = walk_scopes_mut(&mut stmt, &mut |_, _| {});
        assert_eq!(count, 0);
    }

    #[test]
    fn create_as_select_exposes_its_embedded_scope() {
        let mut stmt = Statement::Create(unilake_sql_ir::CreateStatement {
            catalog: None,
            db: None,
            table: "summary".to_string(),
            object: unilake_sql_ir::CreateObject::Table,
            or_replace: false,
            if_not_exists: false,
            query: Some(Box::new(Query {
                body: SetOp::Select(Box::new(select_from("raw"))),
                order_by: None,
                limit: None,
                offset: None,
                ctes: Vec::new(),
                dialect: Dialect::Generic,
            })),
            raw: "CREATE TABLE summary AS SELECT id FROM raw".to_string(),
        });
        let mut seen = Vec::new();
        let count = walk_scopes_mut(&mut stmt, &mut |id, _| seen.push(id));
        assert_eq!(count, 1);
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn plain_create_table_has_no_scopes() {
        let mut stmt = Statement::Create(unilake_sql_ir::CreateStatement {
            catalog: None,
            db: None,
            table: "t".to_string(),
            object: unilake_sql_ir::CreateObject::Table,
            or_replace: false,
            if_not_exists: false,
            query: None,
            raw: "CREATE TABLE t (id INT)".to_string(),
        });
        let count = walk_scopes_mut(&mut stmt, &mut |_, _| {});
        assert_eq!(count, 0);
    }
}
