// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Masking pass (C6 glue)
//!
//! Applies [`MaskingRegistry`] across every scope: for each `Rule`, any
//! `Column` node anywhere in that scope's projection/WHERE/GROUP BY/HAVING/
//! join-ON whose quoted form matches `rule.attribute` is replaced by the
//! rule's expression. When two rules target the same `(scope, attribute)`
//! the later one in `rules` wins — the source's own dict-keyed lookup
//! silently overwrote on collision, and the spec leaves this undefined, so
//! the simplest deterministic reading of "last one wins" was kept.

use crate::walk::walk_expr_mut;
use std::collections::BTreeMap;
use std::mem;
use unilake_sql_ir::{Expr, JoinCondition, Rule, SelectItem, SelectStatement, Statement};
use unilake_sql_masking::MaskingRegistry;

pub fn apply_masks(stmt: &mut Statement, rules: &[Rule]) {
    if rules.is_empty() {
        return;
    }
    let mut lookup: BTreeMap<(usize, String), &Rule> = BTreeMap::new();
    for rule in rules {
        lookup.insert((rule.scope, rule.attribute.clone()), rule);
    }
    let registry = MaskingRegistry::new();
    unilake_sql_semantic::walk_scopes_mut(stmt, &mut |scope_id, select| {
        mask_scope(select, scope_id, &lookup, &registry);
    });
}

fn mask_scope(
    select: &mut SelectStatement,
    scope_id: usize,
    lookup: &BTreeMap<(usize, String), &Rule>,
    registry: &MaskingRegistry,
) {
    for item in &mut select.projection {
        let taken = mem::replace(item, SelectItem::Wildcard);
        *item = mask_projection_item(taken, scope_id, lookup, registry);
    }
    if let Some(where_clause) = &mut select.where_clause {
        mask_expr(where_clause, scope_id, lookup, registry);
    }
    for expr in &mut select.group_by {
        mask_expr(expr, scope_id, lookup, registry);
    }
    if let Some(having) = &mut select.having {
        mask_expr(having, scope_id, lookup, registry);
    }
    for table_ref in &mut select.from {
        for join in &mut table_ref.joins {
            if let JoinCondition::On(expr) = &mut join.condition {
                mask_expr(expr, scope_id, lookup, registry);
            }
        }
    }
}

/// Masks a single projection item. A bare `UnnamedExpr(Column)` that a rule
/// actually rewrites is promoted to `AliasedExpr` under the column's own
/// name — otherwise the generator has no name left to hang an implicit
/// `AS` off of once the column is gone.
fn mask_projection_item(
    item: SelectItem,
    scope_id: usize,
    lookup: &BTreeMap<(usize, String), &Rule>,
    registry: &MaskingRegistry,
) -> SelectItem {
    match item {
        SelectItem::UnnamedExpr(mut expr) => {
            let original_name = match &expr {
                Expr::Column(col) => Some(col.column.clone()),
                _ => None,
            };
            mask_expr(&mut expr, scope_id, lookup, registry);
            match original_name {
                Some(name) if !matches!(expr, Expr::Column(_)) => SelectItem::AliasedExpr { expr, alias: name },
                _ => SelectItem::UnnamedExpr(expr),
            }
        }
        SelectItem::AliasedExpr { mut expr, alias } => {
            mask_expr(&mut expr, scope_id, lookup, registry);
            SelectItem::AliasedExpr { expr, alias }
        }
        other @ (SelectItem::QualifiedWildcard(_) | SelectItem::Wildcard) => other,
    }
}

fn mask_expr(
    expr: &mut Expr,
    scope_id: usize,
    lookup: &BTreeMap<(usize, String), &Rule>,
    registry: &MaskingRegistry,
) {
    walk_expr_mut(expr, &mut |e| {
        let rule = match e {
            Expr::Column(col) => lookup.get(&(scope_id, col.quoted())),
            _ => None,
        };
        match rule {
            Some(rule) => {
                *e = registry.apply(&rule.rule_definition.name, e, &rule.rule_definition.properties);
                false
            }
            None => true,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use unilake_sql_ir::{ColumnRef, Dialect, Query, RuleDefinition, SelectStatement, SetOp, TableRef};

    fn stmt_select_a_from_b() -> Statement {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::UnnamedExpr(Expr::qualified_column("b", "a")));
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
    fn masks_the_matching_projected_column() {
        let mut stmt = stmt_select_a_from_b();
        let rules = vec![Rule {
            scope: 0,
            attribute: ColumnRef::new("a").with_table("b").quoted(),
            rule_id: "r1".into(),
            rule_definition: RuleDefinition { name: "xxhash3".into(), properties: None },
        }];
        apply_masks(&mut stmt, &rules);
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                match &s.projection[0] {
                    SelectItem::UnnamedExpr(Expr::Function { name, .. }) => assert_eq!(name, "XX_HASH3_128"),
                    other => panic!("expected masked function, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn last_rule_wins_on_duplicate_key() {
        let mut stmt = stmt_select_a_from_b();
        let attribute = ColumnRef::new("a").with_table("b").quoted();
        let rules = vec![
            Rule {
                scope: 0,
                attribute: attribute.clone(),
                rule_id: "r1".into(),
                rule_definition: RuleDefinition { name: "replace_null".into(), properties: None },
            },
            Rule {
                scope: 0,
                attribute,
                rule_id: "r2".into(),
                rule_definition: RuleDefinition { name: "xxhash3".into(), properties: None },
            },
        ];
        apply_masks(&mut stmt, &rules);
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                match &s.projection[0] {
                    SelectItem::UnnamedExpr(Expr::Function { name, .. }) => assert_eq!(name, "XX_HASH3_128"),
                    other => panic!("expected xxhash3 to win, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn rule_on_a_different_scope_does_not_apply() {
        let mut stmt = stmt_select_a_from_b();
        let rules = vec![Rule {
            scope: 1,
            attribute: ColumnRef::new("a").with_table("b").quoted(),
            rule_id: "r1".into(),
            rule_definition: RuleDefinition { name: "xxhash3".into(), properties: None },
        }];
        apply_masks(&mut stmt, &rules);
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                assert!(matches!(&s.projection[0], SelectItem::UnnamedExpr(Expr::Column(_))));
            }
        }
    }
}
