// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Filter rewriter (C7)
//!
//! For every scope, every `Filter` targeting that scope is AND-appended to
//! the WHERE clause (creating one if absent), regardless of whether the
//! filtered attribute is actually projected — the column reference comes
//! from the filter's own `attribute`, not from a matching SELECT item.
//! Filters are applied in the order they appear in the input list.

use unilake_sql_ir::{BinaryOp, ColumnRef, Expr, Filter, ParserError, SelectStatement, Statement};

pub fn apply_filters(stmt: &mut Statement, filters: &[Filter]) -> Result<(), ParserError> {
    if filters.is_empty() {
        return Ok(());
    }
    let mut error = None;
    unilake_sql_semantic::walk_scopes_mut(stmt, &mut |scope_id, select| {
        if error.is_some() {
            return;
        }
        if let Err(e) = apply_to_scope(select, scope_id, filters) {
            error = Some(e);
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn apply_to_scope(select: &mut SelectStatement, scope_id: usize, filters: &[Filter]) -> Result<(), ParserError> {
    let mut predicates = Vec::new();
    for filter in filters.iter().filter(|f| f.scope == scope_id) {
        let column = parse_quoted_attribute(&filter.attribute);
        let condition = unilake_sql_parser::parse_condition(&filter.filter_definition.expression)?;
        predicates.push(substitute_placeholder(condition, &column));
    }
    if predicates.is_empty() {
        return Ok(());
    }
    select.where_clause = Some(match select.where_clause.take() {
        Some(existing) => {
            let base = if needs_parens_under_and(&existing) {
                Expr::Paren(Box::new(existing))
            } else {
                existing
            };
            fold_and(std::iter::once(base).chain(predicates))
        }
        None => fold_and(predicates.into_iter()),
    });
    Ok(())
}

/// `AND` binds tighter than `OR`, so an un-parenthesized `OR` at the top of
/// the existing WHERE would change meaning once more clauses are ANDed on.
fn needs_parens_under_and(expr: &Expr) -> bool {
    matches!(expr, Expr::BinaryOp { op: BinaryOp::Or, .. })
}

fn fold_and(mut exprs: impl Iterator<Item = Expr>) -> Expr {
    let first = exprs.next().expect("at least one predicate");
    exprs.fold(first, |acc, next| Expr::BinaryOp {
        left: Box::new(acc),
        op: BinaryOp::And,
        right: Box::new(next),
    })
}

fn substitute_placeholder(expr: Expr, column: &ColumnRef) -> Expr {
    match expr {
        Expr::Literal(unilake_sql_ir::Literal::Placeholder) => Expr::Column(column.clone()),
        Expr::BinaryOp { left, op, right } => Expr::BinaryOp {
            left: Box::new(substitute_placeholder(*left, column)),
            op,
            right: Box::new(substitute_placeholder(*right, column)),
        },
        Expr::UnaryOp { op, expr } => Expr::UnaryOp { op, expr: Box::new(substitute_placeholder(*expr, column)) },
        Expr::Function { name, args, distinct } => Expr::Function {
            name,
            args: args.into_iter().map(|a| substitute_placeholder(a, column)).collect(),
            distinct,
        },
        Expr::Paren(inner) => Expr::Paren(Box::new(substitute_placeholder(*inner, column))),
        Expr::List(items) => Expr::List(items.into_iter().map(|i| substitute_placeholder(i, column)).collect()),
        Expr::Cast { expr, type_name } => Expr::Cast { expr: Box::new(substitute_placeholder(*expr, column)), type_name },
        other => other,
    }
}

/// Parse the `` "table"."column" `` (or bare `` "column" ``) form back into
/// a [`ColumnRef`] — the inverse of [`ColumnRef::quoted`].
fn parse_quoted_attribute(attribute: &str) -> ColumnRef {
    let trimmed = attribute.trim();
    match trimmed.find("\".\"") {
        Some(idx) => {
            let table = trimmed[1..idx].to_string();
            let column = trimmed[idx + 3..trimmed.len().saturating_sub(1)].to_string();
            ColumnRef::new(column).with_table(table)
        }
        None => ColumnRef::new(trimmed.trim_matches('"').to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unilake_sql_ir::{Dialect, FilterDefinition, Query, SelectItem, SetOp, TableRef};

    fn stmt_select_c_from_b() -> Statement {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::UnnamedExpr(Expr::qualified_column("b", "c")));
        select.from.push(TableRef::table("b"));
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
    fn parses_quoted_attribute_with_table() {
        let col = parse_quoted_attribute("\"b\".\"a\"");
        assert_eq!(col, ColumnRef::new("a").with_table("b"));
    }

    #[test]
    fn applies_filter_even_when_column_not_projected() {
        let mut stmt = stmt_select_c_from_b();
        let filters = vec![Filter {
            scope: 0,
            attribute: "\"b\".\"a\"".to_string(),
            filter_id: "f1".into(),
            filter_definition: FilterDefinition { expression: "? > 0".to_string() },
        }];
        apply_filters(&mut stmt, &filters).unwrap();
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                assert_eq!(
                    s.where_clause,
                    Some(Expr::BinaryOp {
                        left: Box::new(Expr::qualified_column("b", "a")),
                        op: BinaryOp::Gt,
                        right: Box::new(Expr::integer(0)),
                    })
                );
            }
        }
    }

    #[test]
    fn wraps_existing_or_where_in_parens() {
        let mut stmt = stmt_select_c_from_b();
        if let Statement::Query(q) = &mut stmt {
            if let SetOp::Select(s) = &mut q.body {
                s.where_clause = Some(Expr::BinaryOp {
                    left: Box::new(Expr::BinaryOp {
                        left: Box::new(Expr::qualified_column("b", "a")),
                        op: BinaryOp::Lt,
                        right: Box::new(Expr::integer(10000)),
                    }),
                    op: BinaryOp::Or,
                    right: Box::new(Expr::BinaryOp {
                        left: Box::new(Expr::qualified_column("b", "a")),
                        op: BinaryOp::Lt,
                        right: Box::new(Expr::integer(0)),
                    }),
                });
            }
        }
        let filters = vec![Filter {
            scope: 0,
            attribute: "\"b\".\"a\"".to_string(),
            filter_id: "f1".into(),
            filter_definition: FilterDefinition { expression: "? > 0".to_string() },
        }];
        apply_filters(&mut stmt, &filters).unwrap();
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                match s.where_clause.as_ref().unwrap() {
                    Expr::BinaryOp { left, op: BinaryOp::And, .. } => {
                        assert!(matches!(**left, Expr::Paren(_)));
                    }
                    other => panic!("expected an AND at the top, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn malformed_filter_expression_is_an_error() {
        let mut stmt = stmt_select_c_from_b();
        let filters = vec![Filter {
            scope: 0,
            attribute: "\"b\".\"a\"".to_string(),
            filter_id: "f1".into(),
            filter_definition: FilterDefinition { expression: "? > (".to_string() },
        }];
        assert!(apply_filters(&mut stmt, &filters).is_err());
    }
}
