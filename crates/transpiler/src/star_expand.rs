// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Star expansion (C8)
//!
//! Only runs when a `visible_schema` was supplied. Expands `*` and `t.*`
//! projections into one explicit, aliased column per schema entry,
//! preserving the schema's declared column order. A wildcard whose table
//! isn't known to the schema is left unexpanded and reported as a
//! `ParserError` — the caller asked for schema-driven expansion and the
//! schema didn't cover what the query actually references.

use unilake_sql_catalog::SchemaCatalog;
use unilake_sql_ir::{ErrorMessage, ParserError, SelectItem, Statement, TableFactor, TableRef};

pub fn expand_stars(stmt: &mut Statement, schema: &SchemaCatalog) -> Result<(), ParserError> {
    let mut error = None;
    unilake_sql_semantic::walk_scopes_mut(stmt, &mut |_scope_id, select| {
        if error.is_some() {
            return;
        }
        if let Err(e) = expand_scope(select, schema) {
            error = Some(e);
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn expand_scope(select: &mut unilake_sql_ir::SelectStatement, schema: &SchemaCatalog) -> Result<(), ParserError> {
    if !select.projection.iter().any(|item| matches!(item, SelectItem::Wildcard | SelectItem::QualifiedWildcard(_))) {
        return Ok(());
    }
    let sources = table_sources(&select.from);
    let mut expanded = Vec::with_capacity(select.projection.len());
    for item in select.projection.drain(..) {
        match item {
            SelectItem::Wildcard => {
                for source in &sources {
                    expanded.extend(columns_for(source, schema)?);
                }
            }
            SelectItem::QualifiedWildcard(alias) => {
                let source = sources
                    .iter()
                    .find(|s| s.alias == alias)
                    .ok_or_else(|| unmatched_wildcard_error(&alias))?;
                expanded.extend(columns_for(source, schema)?);
            }
            other => expanded.push(other),
        }
    }
    select.projection = expanded;
    Ok(())
}

struct Source<'a> {
    alias: &'a str,
    catalog: &'a str,
    db: &'a str,
    table: &'a str,
}

fn table_sources(from: &[TableRef]) -> Vec<Source<'_>> {
    let mut sources = Vec::new();
    for table_ref in from {
        push_source(&table_ref.factor, &mut sources);
        for join in &table_ref.joins {
            push_source(&join.table.factor, &mut sources);
        }
    }
    sources
}

fn push_source<'a>(factor: &'a TableFactor, out: &mut Vec<Source<'a>>) {
    if let TableFactor::Table { catalog: Some(catalog), db: Some(db), name, alias } = factor {
        out.push(Source {
            alias: alias.as_deref().unwrap_or(name),
            catalog,
            db,
            table: name,
        });
    }
}

fn columns_for(source: &Source<'_>, schema: &SchemaCatalog) -> Result<Vec<SelectItem>, ParserError> {
    if !schema.knows_table(source.catalog, source.db, source.table) {
        return Err(unmatched_wildcard_error(source.alias));
    }
    let columns = schema
        .columns_of(source.catalog, source.db, source.table)
        .map_err(|e| ParserError::parse(e.to_string(), vec![ErrorMessage::new(e.to_string())]))?;
    Ok(columns
        .into_iter()
        .map(|(name, _type)| SelectItem::AliasedExpr {
            expr: unilake_sql_ir::Expr::qualified_column(source.alias, name.clone()),
            alias: name,
        })
        .collect())
}

fn unmatched_wildcard_error(alias: &str) -> ParserError {
    let message = format!("visible_schema does not cover table referenced as `{alias}`");
    ParserError::parse(message.clone(), vec![ErrorMessage::new(message)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use unilake_sql_ir::{BinaryOp, Dialect, Expr, Join, JoinCondition, JoinType, Query, SelectStatement, SetOp, VisibleSchema};

    fn schema_with_b() -> SchemaCatalog {
        let schema: VisibleSchema = serde_json::from_value(serde_json::json!({
            "catalog": {"database": {"b": {"a": "INT", "b": "VARCHAR"}}}
        }))
        .unwrap();
        SchemaCatalog::new(schema)
    }

    fn schema_with_b_and_c() -> SchemaCatalog {
        let schema: VisibleSchema = serde_json::from_value(serde_json::json!({
            "catalog": {"database": {
                "b": {"a": "INT"},
                "c": {"x": "INT"}
            }}
        }))
        .unwrap();
        SchemaCatalog::new(schema)
    }

    fn qualified_table(name: &str) -> TableFactor {
        TableFactor::Table {
            catalog: Some("catalog".to_string()),
            db: Some("database".to_string()),
            name: name.to_string(),
            alias: None,
        }
    }

    fn stmt_select_star_from_b() -> Statement {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::Wildcard);
        select.from.push(TableRef {
            factor: TableFactor::Table {
                catalog: Some("catalog".to_string()),
                db: Some("database".to_string()),
                name: "b".to_string(),
                alias: None,
            },
            joins: Vec::new(),
        });
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
    fn expands_bare_star_in_schema_order() {
        let mut stmt = stmt_select_star_from_b();
        expand_stars(&mut stmt, &schema_with_b()).unwrap();
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                assert_eq!(s.projection.len(), 2);
                assert_eq!(
                    s.projection[0],
                    SelectItem::AliasedExpr {
                        expr: unilake_sql_ir::Expr::qualified_column("b", "a"),
                        alias: "a".to_string(),
                    }
                );
            }
        }
    }

    #[test]
    fn expands_bare_star_across_a_join() {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::Wildcard);
        select.from.push(TableRef {
            factor: qualified_table("b"),
            joins: vec![Join {
                join_type: JoinType::Inner,
                table: TableRef {
                    factor: qualified_table("c"),
                    joins: Vec::new(),
                },
                condition: JoinCondition::On(Expr::BinaryOp {
                    left: Box::new(Expr::qualified_column("b", "a")),
                    op: BinaryOp::Eq,
                    right: Box::new(Expr::qualified_column("c", "x")),
                }),
            }],
        });
        let mut stmt = Statement::Query(Box::new(Query {
            body: SetOp::Select(Box::new(select)),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect: Dialect::Generic,
        }));
        expand_stars(&mut stmt, &schema_with_b_and_c()).unwrap();
        if let Statement::Query(q) = &stmt {
            if let SetOp::Select(s) = &q.body {
                assert_eq!(s.projection.len(), 2);
                assert_eq!(
                    s.projection[1],
                    SelectItem::AliasedExpr {
                        expr: unilake_sql_ir::Expr::qualified_column("c", "x"),
                        alias: "x".to_string(),
                    }
                );
            }
        }
    }

    #[test]
    fn unmatched_table_is_an_error() {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::Wildcard);
        select.from.push(TableRef {
            factor: TableFactor::Table {
                catalog: Some("catalog".to_string()),
                db: Some("database".to_string()),
                name: "missing".to_string(),
                alias: None,
            },
            joins: Vec::new(),
        });
        let mut stmt = Statement::Query(Box::new(Query {
            body: SetOp::Select(Box::new(select)),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect: Dialect::Generic,
        }));
        assert!(expand_stars(&mut stmt, &schema_with_b()).is_err());
    }
}
