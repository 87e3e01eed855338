// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Qualifier (C2, second half)
//!
//! Fills in the catalog/db of every unqualified table reference from the
//! caller's defaults, and resolves the table alias of every unqualified
//! column reference when it is unambiguous within its scope. Runs in one
//! of two modes:
//!
//! - **Permissive** (`schema = None`, used by `scan`): best-effort column
//!   resolution, no validation. An ambiguous column is left unqualified
//!   rather than erroring — the scanner only needs entities/attributes,
//!   not a hard guarantee every column resolved.
//! - **Strict** (`schema = Some(_)`, used by `transpile` whenever a
//!   `visible_schema` is supplied): an ambiguous or unresolvable column
//!   reference is a [`ParserError`]; a column that doesn't exist in the
//!   schema is a [`ParserError`] too. Star expansion itself is C8, owned
//!   by `unilake-sql-transpiler` — this module only validates.

use std::collections::BTreeSet;
use unilake_sql_catalog::SchemaCatalog;
use unilake_sql_ir::{ColumnRef, CommonTableExpr, ErrorMessage, Expr, ParserError, Query, SelectStatement, SetOp, TableFactor, TableRef};

#[derive(Debug, Clone, Copy)]
pub struct QualifyOptions<'a> {
    pub default_catalog: &'a str,
    pub default_db: &'a str,
    pub schema: Option<&'a SchemaCatalog>,
    pub validate_qualify_columns: bool,
}

/// One table source visible to unqualified-column resolution within a scope:
/// its alias, and (when known) the catalog/db/table it resolves to.
#[derive(Debug, Clone)]
struct VisibleTable {
    alias: String,
    catalog: Option<String>,
    db: Option<String>,
    table: Option<String>,
}

pub fn qualify(query: &mut Query, opts: &QualifyOptions) -> Result<(), ParserError> {
    let mut ctes = BTreeSet::new();
    qualify_with_ctes(query, opts, &mut ctes)
}

/// `ctes` accumulates every CTE name declared by an enclosing query, so a
/// table reference resolving to a CTE (rather than a real catalog object)
/// is left with `catalog`/`db` as `None` instead of being defaulted —
/// entities from CTE references carry no catalog/db by definition.
fn qualify_with_ctes(query: &mut Query, opts: &QualifyOptions, ctes: &mut BTreeSet<String>) -> Result<(), ParserError> {
    for cte in &mut query.ctes {
        ctes.insert(cte.name.clone());
    }
    for cte in &mut query.ctes {
        qualify_cte(cte, opts, ctes)?;
    }
    qualify_set_op(&mut query.body, opts, ctes)?;
    Ok(())
}

fn qualify_cte(cte: &mut CommonTableExpr, opts: &QualifyOptions, ctes: &mut BTreeSet<String>) -> Result<(), ParserError> {
    qualify_with_ctes(&mut cte.query, opts, ctes)
}

fn qualify_set_op(body: &mut SetOp, opts: &QualifyOptions, ctes: &mut BTreeSet<String>) -> Result<(), ParserError> {
    match body {
        SetOp::Select(select) => qualify_select(select, opts, ctes),
        SetOp::Union { left, right, .. }
        | SetOp::Intersect { left, right, .. }
        | SetOp::Except { left, right, .. } => {
            qualify_with_ctes(left, opts, ctes)?;
            qualify_with_ctes(right, opts, ctes)
        }
    }
}

fn qualify_select(select: &mut SelectStatement, opts: &QualifyOptions, ctes: &mut BTreeSet<String>) -> Result<(), ParserError> {
    let mut visible = Vec::new();
    for table_ref in &mut select.from {
        qualify_table_ref(table_ref, opts, ctes)?;
        collect_visible(table_ref, &mut visible);
    }

    for item in &mut select.projection {
        match item {
            unilake_sql_ir::SelectItem::UnnamedExpr(e) => qualify_expr(e, &visible, opts)?,
            unilake_sql_ir::SelectItem::AliasedExpr { expr, .. } => qualify_expr(expr, &visible, opts)?,
            _ => {}
        }
    }
    if let Some(where_clause) = &mut select.where_clause {
        qualify_expr(where_clause, &visible, opts)?;
    }
    for expr in &mut select.group_by {
        qualify_expr(expr, &visible, opts)?;
    }
    if let Some(having) = &mut select.having {
        qualify_expr(having, &visible, opts)?;
    }
    Ok(())
}

fn qualify_table_ref(table_ref: &mut TableRef, opts: &QualifyOptions, ctes: &mut BTreeSet<String>) -> Result<(), ParserError> {
    match &mut table_ref.factor {
        TableFactor::Table { catalog, db, name, .. } => {
            if !ctes.contains(name) {
                if catalog.is_none() {
                    *catalog = Some(opts.default_catalog.to_string());
                }
                if db.is_none() {
                    *db = Some(opts.default_db.to_string());
                }
            }
        }
        TableFactor::Derived { query, .. } => qualify_with_ctes(query, opts, ctes)?,
    }
    for join in &mut table_ref.joins {
        qualify_table_ref(&mut join.table, opts, ctes)?;
        if let unilake_sql_ir::JoinCondition::On(e) = &mut join.condition {
            // Joined tables are visible to their own ON clause even before
            // the full `visible` list for the scope is assembled; permissive
            // since join-local qualification never needs strict validation.
            let local = vec![];
            qualify_expr(e, &local, opts)?;
        }
    }
    Ok(())
}

fn collect_visible(table_ref: &TableRef, out: &mut Vec<VisibleTable>) {
    push_visible(&table_ref.factor, out);
    for join in &table_ref.joins {
        push_visible(&join.table.factor, out);
    }
}

fn push_visible(factor: &TableFactor, out: &mut Vec<VisibleTable>) {
    match factor {
        TableFactor::Table { catalog, db, name, alias } => out.push(VisibleTable {
            alias: alias.clone().unwrap_or_else(|| name.clone()),
            catalog: catalog.clone(),
            db: db.clone(),
            table: Some(name.clone()),
        }),
        TableFactor::Derived { alias, .. } => out.push(VisibleTable {
            alias: alias.clone(),
            catalog: None,
            db: None,
            table: None,
        }),
    }
}

fn qualify_expr(expr: &mut Expr, visible: &[VisibleTable], opts: &QualifyOptions) -> Result<(), ParserError> {
    match expr {
        Expr::Column(col_ref) => qualify_column(col_ref, visible, opts),
        Expr::BinaryOp { left, right, .. } => {
            qualify_expr(left, visible, opts)?;
            qualify_expr(right, visible, opts)
        }
        Expr::UnaryOp { expr, .. } | Expr::Cast { expr, .. } | Expr::Paren(expr) => {
            qualify_expr(expr, visible, opts)
        }
        Expr::Function { args, .. } => {
            for a in args {
                qualify_expr(a, visible, opts)?;
            }
            Ok(())
        }
        Expr::Case { conditions, results, else_result } => {
            for c in conditions {
                qualify_expr(c, visible, opts)?;
            }
            for r in results {
                qualify_expr(r, visible, opts)?;
            }
            if let Some(e) = else_result {
                qualify_expr(e, visible, opts)?;
            }
            Ok(())
        }
        Expr::List(items) => {
            for i in items {
                qualify_expr(i, visible, opts)?;
            }
            Ok(())
        }
        Expr::Literal(_) | Expr::Star | Expr::QualifiedStar(_) | Expr::Placeholder | Expr::Var(_) => Ok(()),
    }
}

fn qualify_column(col_ref: &mut ColumnRef, visible: &[VisibleTable], opts: &QualifyOptions) -> Result<(), ParserError> {
    if col_ref.table.is_some() {
        return validate_column(col_ref, visible, opts);
    }

    let matches: Vec<&VisibleTable> = visible.iter().collect();
    match matches.len() {
        0 => Ok(()),
        1 => {
            col_ref.table = Some(matches[0].alias.clone());
            validate_column(col_ref, visible, opts)
        }
        _ => {
            if opts.validate_qualify_columns && opts.schema.is_some() {
                Err(ambiguous_column_error(&col_ref.column))
            } else {
                Ok(())
            }
        }
    }
}

fn validate_column(col_ref: &ColumnRef, visible: &[VisibleTable], opts: &QualifyOptions) -> Result<(), ParserError> {
    let Some(schema) = opts.schema else { return Ok(()) };
    let Some(table_alias) = &col_ref.table else { return Ok(()) };

    let Some(source) = visible.iter().find(|t| &t.alias == table_alias) else {
        return Ok(());
    };
    let (Some(catalog), Some(db), Some(table)) = (&source.catalog, &source.db, &source.table) else {
        return Ok(());
    };
    if !schema.knows_table(catalog, db, table) {
        return Ok(());
    }
    schema
        .validate_column(catalog, db, table, &col_ref.column)
        .map_err(|_| unknown_column_error(table_alias, &col_ref.column))
}

fn ambiguous_column_error(column: &str) -> ParserError {
    let message = format!("ambiguous column reference: {column}");
    ParserError::parse(message.clone(), vec![ErrorMessage::new(message)])
}

fn unknown_column_error(table_alias: &str, column: &str) -> ParserError {
    let message = format!("unknown column {table_alias}.{column}");
    ParserError::parse(message.clone(), vec![ErrorMessage::new(message)])
}
