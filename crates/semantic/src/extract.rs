// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Scan extractor (C4)
//!
//! Walks every scope `scope::walk_scopes` finds and, per scope, collects
//! the set of referenced [`ScanEntity`]/[`ScanAttribute`] plus whether the
//! scope aggregates (has a non-empty `GROUP BY`). Assumes the statement has
//! already been through the parser's permissive qualifier — a bare `*`
//! still needs the FROM clause to resolve its alias, but a column's table
//! alias is expected to already be filled in.

use crate::scope::walk_scopes;
use std::collections::BTreeSet;
use unilake_sql_ir::{
    Expr, JoinCondition, ScanAttribute, ScanEntity, ScanOutputObject, SelectItem, SelectStatement,
    Statement, TableFactor, TableRef,
};

pub fn extract(stmt: &Statement) -> Vec<ScanOutputObject> {
    let mut objects = Vec::new();
    walk_scopes(stmt, &mut |scope, select| {
        objects.push(extract_scope(scope, select));
    });
    objects
}

fn extract_scope(scope: usize, select: &SelectStatement) -> ScanOutputObject {
    let mut entities = BTreeSet::new();
    let mut attributes = BTreeSet::new();

    for table_ref in &select.from {
        collect_entities(table_ref, &mut entities);
    }

    for item in &select.projection {
        match item {
            SelectItem::UnnamedExpr(e) | SelectItem::AliasedExpr { expr: e, .. } => {
                collect_attributes(e, &mut attributes)
            }
            SelectItem::QualifiedWildcard(alias) => {
                attributes.insert(ScanAttribute::star(alias.clone()));
            }
            SelectItem::Wildcard => {
                if let Some(alias) = select.from.first().map(|t| t.effective_alias().to_string()) {
                    attributes.insert(ScanAttribute::star(alias));
                }
            }
        }
    }

    if let Some(where_clause) = &select.where_clause {
        collect_attributes(where_clause, &mut attributes);
    }
    for expr in &select.group_by {
        collect_attributes(expr, &mut attributes);
    }
    if let Some(having) = &select.having {
        collect_attributes(having, &mut attributes);
    }
    for table_ref in &select.from {
        collect_join_attributes(table_ref, &mut attributes);
    }

    let is_agg = !select.group_by.is_empty();

    ScanOutputObject {
        scope,
        entities,
        attributes,
        is_agg,
    }
}

fn collect_entities(table_ref: &TableRef, out: &mut BTreeSet<ScanEntity>) {
    push_entity(&table_ref.factor, out);
    for join in &table_ref.joins {
        push_entity(&join.table.factor, out);
    }
}

fn push_entity(factor: &TableFactor, out: &mut BTreeSet<ScanEntity>) {
    if let TableFactor::Table { catalog, db, name, alias } = factor {
        out.insert(ScanEntity {
            catalog: catalog.clone(),
            db: db.clone(),
            name: name.clone(),
            alias: alias.clone().unwrap_or_else(|| name.clone()),
        });
    }
    // `TableFactor::Derived` is its own scope; the entities it references
    // are collected when that scope is visited, not here.
}

fn collect_join_attributes(table_ref: &TableRef, out: &mut BTreeSet<ScanAttribute>) {
    for join in &table_ref.joins {
        if let JoinCondition::On(e) = &join.condition {
            collect_attributes(e, out);
        }
    }
}

/// A bare `*` inside a function call (`COUNT(*)`) is not extracted; only a
/// `*`/`t.*` that stands alone in a projection is. Elsewhere in an
/// expression tree (`WHERE`, `GROUP BY`, join conditions) a `Star` node
/// can't appear except inside a function argument list, so the recursion
/// below simply never emits one for those positions.
fn collect_attributes(expr: &Expr, out: &mut BTreeSet<ScanAttribute>) {
    match expr {
        Expr::Column(col) => {
            let alias = col.table.clone().unwrap_or_default();
            out.insert(ScanAttribute {
                entity_alias: alias,
                name: col.column.clone(),
            });
        }
        Expr::BinaryOp { left, right, .. } => {
            collect_attributes(left, out);
            collect_attributes(right, out);
        }
        Expr::UnaryOp { expr, .. } | Expr::Cast { expr, .. } | Expr::Paren(expr) => {
            collect_attributes(expr, out)
        }
        Expr::Function { args, .. } => {
            for a in args {
                collect_attributes(a, out);
            }
        }
        Expr::Case { conditions, results, else_result } => {
            for c in conditions {
                collect_attributes(c, out);
            }
            for r in results {
                collect_attributes(r, out);
            }
            if let Some(e) = else_result {
                collect_attributes(e, out);
            }
        }
        Expr::List(items) => {
            for i in items {
                collect_attributes(i, out);
            }
        }
        Expr::Literal(_) | Expr::Star | Expr::QualifiedStar(_) | Expr::Placeholder | Expr::Var(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unilake_sql_ir::{Dialect, Query, SetOp};

    fn wrap(select: SelectStatement) -> Statement {
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
    fn extracts_entity_and_attribute() {
        let mut select = SelectStatement::default();
        select.from.push(TableRef {
            factor: TableFactor::Table {
                catalog: Some("catalog".into()),
                db: Some("database".into()),
                name: "b".into(),
                alias: Some("b".into()),
            },
            joins: Vec::new(),
        });
        select
            .projection
            .push(SelectItem::UnnamedExpr(Expr::qualified_column("b", "a")));

        let objects = extract(&wrap(select));
        assert_eq!(objects.len(), 1);
        let obj = &objects[0];
        assert_eq!(obj.entities.len(), 1);
        assert!(obj.attributes.contains(&ScanAttribute {
            entity_alias: "b".into(),
            name: "a".into(),
        }));
    }

    #[test]
    fn bare_star_in_projection_is_extracted_against_the_single_from_table() {
        let mut select = SelectStatement::default();
        select.from.push(TableRef::table("b"));
        select.projection.push(SelectItem::Wildcard);

        let objects = extract(&wrap(select));
        assert!(objects[0].attributes.contains(&ScanAttribute::star("b".to_string())));
    }

    #[test]
    fn star_inside_function_call_is_not_extracted() {
        let mut select = SelectStatement::default();
        select.from.push(TableRef::table("b"));
        select
            .projection
            .push(SelectItem::UnnamedExpr(Expr::func("COUNT", vec![Expr::Star])));

        let objects = extract(&wrap(select));
        assert!(!objects[0].attributes.iter().any(|a| a.name == "*"));
    }

    #[test]
    fn group_by_sets_is_agg() {
        let mut select = SelectStatement::default();
        select.from.push(TableRef::table("b"));
        select.group_by.push(Expr::qualified_column("b", "a"));

        let objects = extract(&wrap(select));
        assert!(objects[0].is_agg);
    }
}
