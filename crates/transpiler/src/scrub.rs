// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Literal scrubber (C9)
//!
//! When `secure_output` is requested, every literal in the statement is
//! replaced by the token `?` before star expansion runs — string literals
//! stay quoted (`'?'`), numeric/boolean literals render bare. Runs over the
//! whole statement unconditionally, not just SELECT scopes: a literal in an
//! `UPDATE ... SET`/`INSERT ... VALUES` is just as much "the original S" as
//! one in a WHERE clause.

use crate::walk::walk_expr_mut;
use unilake_sql_ir::{
    CommonTableExpr, DeleteStatement, Expr, InsertSource, InsertStatement, Literal, Query, SetOp,
    Statement, TableFactor, TableRef, UpdateStatement,
};

pub fn scrub_literals(stmt: &mut Statement) {
    match stmt {
        Statement::Query(query) => scrub_query(query),
        Statement::Insert(insert) => scrub_insert(insert),
        Statement::Update(update) => scrub_update(update),
        Statement::Delete(delete) => scrub_delete(delete),
        Statement::Create(create) => {
            if let Some(query) = &mut create.query {
                scrub_query(query);
            }
        }
        Statement::Truncate(_) | Statement::Command(_) | Statement::Other { .. } => {}
    }
}

fn scrub_expr(expr: &mut Expr) {
    walk_expr_mut(expr, &mut |e| {
        if let Expr::Literal(lit) = e {
            *lit = scrub_literal(lit);
        }
        true
    });
}

fn scrub_literal(lit: &Literal) -> Literal {
    match lit {
        Literal::String(_) => Literal::String("?".to_string()),
        Literal::Integer(_) | Literal::Float(_) | Literal::Boolean(_) => Literal::Placeholder,
        Literal::Null | Literal::Placeholder => lit.clone(),
    }
}

fn scrub_query(query: &mut Query) {
    for cte in &mut query.ctes {
        scrub_cte(cte);
    }
    scrub_set_op(&mut query.body);
    if let Some(order_by) = &mut query.order_by {
        for ob in order_by {
            scrub_expr(&mut ob.expr);
        }
    }
    if let Some(limit) = &mut query.limit {
        scrub_expr(limit);
    }
    if let Some(offset) = &mut query.offset {
        scrub_expr(offset);
    }
}

fn scrub_cte(cte: &mut CommonTableExpr) {
    scrub_query(&mut cte.query);
}

fn scrub_set_op(body: &mut SetOp) {
    match body {
        SetOp::Select(select) => {
            for item in &mut select.projection {
                scrub_select_item(item);
            }
            for table_ref in &mut select.from {
                scrub_table_ref(table_ref);
            }
            if let Some(where_clause) = &mut select.where_clause {
                scrub_expr(where_clause);
            }
            for expr in &mut select.group_by {
                scrub_expr(expr);
            }
            if let Some(having) = &mut select.having {
                scrub_expr(having);
            }
        }
        SetOp::Union { left, right, .. }
        | SetOp::Intersect { left, right, .. }
        | SetOp::Except { left, right, .. } => {
            scrub_query(left);
            scrub_query(right);
        }
    }
}

fn scrub_select_item(item: &mut unilake_sql_ir::SelectItem) {
    match item {
        unilake_sql_ir::SelectItem::UnnamedExpr(expr) => scrub_expr(expr),
        unilake_sql_ir::SelectItem::AliasedExpr { expr, .. } => scrub_expr(expr),
        unilake_sql_ir::SelectItem::QualifiedWildcard(_) | unilake_sql_ir::SelectItem::Wildcard => {}
    }
}

fn scrub_table_ref(table_ref: &mut TableRef) {
    if let TableFactor::Derived { query, .. } = &mut table_ref.factor {
        scrub_query(query);
    }
    for join in &mut table_ref.joins {
        if let unilake_sql_ir::JoinCondition::On(expr) = &mut join.condition {
            scrub_expr(expr);
        }
        scrub_table_ref(&mut join.table);
    }
}

fn scrub_insert(insert: &mut InsertStatement) {
    match &mut insert.source {
        InsertSource::Values(rows) => {
            for row in rows {
                for expr in row {
                    scrub_expr(expr);
                }
            }
        }
        InsertSource::Query(query) => scrub_query(query),
    }
}

fn scrub_update(update: &mut UpdateStatement) {
    for assignment in &mut update.assignments {
        scrub_expr(&mut assignment.value);
    }
    if let Some(where_clause) = &mut update.where_clause {
        scrub_expr(where_clause);
    }
}

fn scrub_delete(delete: &mut DeleteStatement) {
    if let Some(where_clause) = &mut delete.where_clause {
        scrub_expr(where_clause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unilake_sql_ir::{BinaryOp, Dialect, SelectItem, SelectStatement};

    fn select_with_where(where_clause: Expr) -> Statement {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::UnnamedExpr(Expr::column("firstname")));
        select.from.push(TableRef::table("b"));
        select.where_clause = Some(where_clause);
        Statement::Query(Box::new(Query {
            body: SetOp::Select(Box::new(select)),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect: Dialect::Generic,
        }))
    }

    #[test]
    fn string_literal_becomes_quoted_placeholder() {
        let mut stmt = select_with_where(Expr::BinaryOp {
            left: Box::new(Expr::column("username")),
            op: BinaryOp::Eq,
            right: Box::new(Expr::string("admin")),
        });
        scrub_literals(&mut stmt);
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                assert_eq!(s.where_clause, Some(Expr::BinaryOp {
                    left: Box::new(Expr::column("username")),
                    op: BinaryOp::Eq,
                    right: Box::new(Expr::string("?")),
                }));
            }
        }
    }

    #[test]
    fn numeric_literal_becomes_bare_placeholder() {
        let mut stmt = select_with_where(Expr::BinaryOp {
            left: Box::new(Expr::column("age")),
            op: BinaryOp::Gt,
            right: Box::new(Expr::integer(30)),
        });
        scrub_literals(&mut stmt);
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                assert_eq!(
                    s.where_clause,
                    Some(Expr::BinaryOp {
                        left: Box::new(Expr::column("age")),
                        op: BinaryOp::Gt,
                        right: Box::new(Expr::Literal(Literal::Placeholder)),
                    })
                );
            }
        }
    }

    #[test]
    fn in_list_literals_are_all_scrubbed() {
        let mut stmt = select_with_where(Expr::BinaryOp {
            left: Box::new(Expr::column("country")),
            op: BinaryOp::In,
            right: Box::new(Expr::List(vec![Expr::string("USA"), Expr::string("Canada")])),
        });
        scrub_literals(&mut stmt);
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                assert_eq!(
                    s.where_clause,
                    Some(Expr::BinaryOp {
                        left: Box::new(Expr::column("country")),
                        op: BinaryOp::In,
                        right: Box::new(Expr::List(vec![Expr::string("?"), Expr::string("?")])),
                    })
                );
            }
        }
    }
}
