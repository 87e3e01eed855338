// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Generator (C10)
//!
//! Serializes a [`Statement`] in the fixed `OUT_DIALECT`: backtick-quoted
//! identifiers, uppercase keywords/function names, projections of the form
//! `` `alias`.`col` AS `out` ``. No precedence inference — [`Expr::Paren`]
//! nodes are printed exactly where the tree has them (the mask/filter passes
//! are responsible for inserting one whenever regrouping would otherwise
//! change meaning), so this module never has to re-derive operator binding.

use unilake_sql_ir::{
    BinaryOp, Command, CommonTableExpr, CreateObject, CreateStatement, DeleteStatement, Expr,
    InsertSource, InsertStatement, Join, JoinCondition, JoinType, Literal, OrderBy, Query,
    SelectItem, SelectStatement, SetOp, SortDirection, Statement, TableFactor, TableRef,
    TruncateStatement, UnaryOp, UpdateStatement,
};

/// Serialize `stmt` in OUT_DIALECT.
pub fn generate(stmt: &Statement) -> String {
    match stmt {
        Statement::Query(query) => generate_query(query),
        Statement::Insert(insert) => generate_insert(insert),
        Statement::Update(update) => generate_update(update),
        Statement::Delete(delete) => generate_delete(delete),
        Statement::Create(create) => generate_create(create),
        Statement::Truncate(truncate) => generate_truncate(truncate),
        Statement::Command(command) => generate_command(command),
        Statement::Other { raw, .. } => raw.clone(),
    }
}

fn quote_ident(name: &str) -> String {
    format!("`{name}`")
}

fn generate_command(command: &Command) -> String {
    format!("{} {}", command.head, command.payload)
}

fn generate_query(query: &Query) -> String {
    let mut parts = Vec::new();
    if !query.ctes.is_empty() {
        parts.push(generate_with(&query.ctes));
    }
    parts.push(generate_set_op(&query.body));
    if let Some(order_by) = &query.order_by {
        if !order_by.is_empty() {
            parts.push(format!("ORDER BY {}", generate_order_by_list(order_by)));
        }
    }
    if let Some(limit) = &query.limit {
        parts.push(format!("LIMIT {}", generate_expr(limit)));
    }
    if let Some(offset) = &query.offset {
        parts.push(format!("OFFSET {}", generate_expr(offset)));
    }
    parts.join(" ")
}

fn generate_with(ctes: &[CommonTableExpr]) -> String {
    let items = ctes
        .iter()
        .map(|cte| {
            let cols = if cte.columns.is_empty() {
                String::new()
            } else {
                format!(
                    " ({})",
                    cte.columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", ")
                )
            };
            format!("{}{} AS ({})", quote_ident(&cte.name), cols, generate_query(&cte.query))
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("WITH {items}")
}

fn generate_set_op(body: &SetOp) -> String {
    match body {
        SetOp::Select(select) => generate_select(select),
        SetOp::Union { left, right, all } => {
            let keyword = if *all { "UNION ALL" } else { "UNION" };
            format!("{} {keyword} {}", generate_query(left), generate_query(right))
        }
        SetOp::Intersect { left, right, distinct } => {
            let keyword = if *distinct { "INTERSECT" } else { "INTERSECT ALL" };
            format!("{} {keyword} {}", generate_query(left), generate_query(right))
        }
        SetOp::Except { left, right, distinct } => {
            let keyword = if *distinct { "EXCEPT" } else { "EXCEPT ALL" };
            format!("{} {keyword} {}", generate_query(left), generate_query(right))
        }
    }
}

fn generate_select(select: &SelectStatement) -> String {
    let mut out = String::from("SELECT ");
    if select.distinct {
        out.push_str("DISTINCT ");
    }
    out.push_str(
        &select
            .projection
            .iter()
            .map(generate_select_item)
            .collect::<Vec<_>>()
            .join(", "),
    );
    if !select.from.is_empty() {
        out.push_str(" FROM ");
        out.push_str(&select.from.iter().map(generate_table_ref).collect::<Vec<_>>().join(", "));
    }
    if let Some(where_clause) = &select.where_clause {
        out.push_str(" WHERE ");
        out.push_str(&generate_expr(where_clause));
    }
    if !select.group_by.is_empty() {
        out.push_str(" GROUP BY ");
        out.push_str(&select.group_by.iter().map(generate_expr).collect::<Vec<_>>().join(", "));
    }
    if let Some(having) = &select.having {
        out.push_str(" HAVING ");
        out.push_str(&generate_expr(having));
    }
    out
}

/// A plain column projection gets its column name as an implicit alias
/// (`` `b`.`a` AS `a` ``); an explicit alias always wins; everything else
/// is printed bare.
fn generate_select_item(item: &SelectItem) -> String {
    match item {
        SelectItem::AliasedExpr { expr, alias } => {
            format!("{} AS {}", generate_expr(expr), quote_ident(alias))
        }
        SelectItem::UnnamedExpr(Expr::Column(col)) => {
            format!("{} AS {}", generate_expr(&Expr::Column(col.clone())), quote_ident(&col.column))
        }
        SelectItem::UnnamedExpr(expr) => generate_expr(expr),
        SelectItem::QualifiedWildcard(alias) => format!("{}.*", quote_ident(alias)),
        SelectItem::Wildcard => "*".to_string(),
    }
}

fn generate_table_ref(table_ref: &TableRef) -> String {
    let mut out = generate_table_factor(&table_ref.factor);
    for join in &table_ref.joins {
        out.push(' ');
        out.push_str(&generate_join(join));
    }
    out
}

fn generate_table_factor(factor: &TableFactor) -> String {
    match factor {
        TableFactor::Table { catalog, db, name, alias } => {
            let mut parts = Vec::new();
            if let Some(catalog) = catalog {
                parts.push(quote_ident(catalog));
            }
            if let Some(db) = db {
                parts.push(quote_ident(db));
            }
            parts.push(quote_ident(name));
            let qualified = parts.join(".");
            let effective_alias = alias.as_deref().unwrap_or(name);
            format!("{qualified} AS {}", quote_ident(effective_alias))
        }
        TableFactor::Derived { query, alias } => {
            format!("({}) AS {}", generate_query(query), quote_ident(alias))
        }
    }
}

fn generate_join(join: &Join) -> String {
    let keyword = match join.join_type {
        JoinType::Inner => "JOIN",
        JoinType::Left => "LEFT JOIN",
        JoinType::Right => "RIGHT JOIN",
        JoinType::Full => "FULL JOIN",
        JoinType::Cross => "CROSS JOIN",
    };
    let table = generate_table_ref(&join.table);
    match &join.condition {
        JoinCondition::On(expr) => format!("{keyword} {table} ON {}", generate_expr(expr)),
        JoinCondition::Using(cols) => {
            let cols = cols.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", ");
            format!("{keyword} {table} USING ({cols})")
        }
        JoinCondition::Natural => format!("NATURAL {keyword} {table}"),
    }
}

fn generate_order_by_list(order_by: &[OrderBy]) -> String {
    order_by
        .iter()
        .map(|ob| {
            let dir = match ob.direction {
                Some(SortDirection::Asc) => " ASC",
                Some(SortDirection::Desc) => " DESC",
                None => "",
            };
            format!("{}{dir}", generate_expr(&ob.expr))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn generate_insert(insert: &InsertStatement) -> String {
    let mut target = Vec::new();
    if let Some(catalog) = &insert.catalog {
        target.push(quote_ident(catalog));
    }
    if let Some(db) = &insert.db {
        target.push(quote_ident(db));
    }
    target.push(quote_ident(&insert.table));
    let columns = if insert.columns.is_empty() {
        String::new()
    } else {
        format!(
            " ({})",
            insert.columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", ")
        )
    };
    let source = match &insert.source {
        InsertSource::Values(rows) => {
            let rows = rows
                .iter()
                .map(|row| format!("({})", row.iter().map(generate_expr).collect::<Vec<_>>().join(", ")))
                .collect::<Vec<_>>()
                .join(", ");
            format!("VALUES {rows}")
        }
        InsertSource::Query(query) => generate_query(query),
    };
    format!("INSERT INTO {}{columns} {source}", target.join("."))
}

fn generate_update(update: &UpdateStatement) -> String {
    let assignments = update
        .assignments
        .iter()
        .map(|a| format!("{} = {}", quote_ident(&a.column), generate_expr(&a.value)))
        .collect::<Vec<_>>()
        .join(", ");
    let mut out = format!("UPDATE {} SET {assignments}", generate_table_ref(&update.table));
    if let Some(where_clause) = &update.where_clause {
        out.push_str(" WHERE ");
        out.push_str(&generate_expr(where_clause));
    }
    out
}

fn generate_delete(delete: &DeleteStatement) -> String {
    let mut out = format!("DELETE FROM {}", generate_table_ref(&delete.table));
    if let Some(where_clause) = &delete.where_clause {
        out.push_str(" WHERE ");
        out.push_str(&generate_expr(where_clause));
    }
    out
}

/// A `CREATE ... AS SELECT` is regenerated from its target name and embedded
/// query, since the query may carry rewrites; a query-less `CREATE TABLE
/// (coldefs...)` has nothing to rewrite, so its own original rendering is
/// printed unchanged.
fn generate_create(create: &CreateStatement) -> String {
    let Some(query) = &create.query else {
        return create.raw.clone();
    };
    let object = match create.object {
        CreateObject::Table => "TABLE",
        CreateObject::View => "VIEW",
    };
    let mut out = String::from("CREATE ");
    if create.or_replace {
        out.push_str("OR REPLACE ");
    }
    out.push_str(object);
    out.push(' ');
    if create.if_not_exists {
        out.push_str("IF NOT EXISTS ");
    }
    let mut target = Vec::new();
    if let Some(catalog) = &create.catalog {
        target.push(quote_ident(catalog));
    }
    if let Some(db) = &create.db {
        target.push(quote_ident(db));
    }
    target.push(quote_ident(&create.table));
    out.push_str(&target.join("."));
    out.push_str(" AS ");
    out.push_str(&generate_query(query));
    out
}

/// No embedded scope to rewrite, so the statement's own rendering is always
/// printed unchanged.
fn generate_truncate(truncate: &TruncateStatement) -> String {
    truncate.raw.clone()
}

fn generate_expr(expr: &Expr) -> String {
    match expr {
        Expr::Column(col) => match &col.table {
            Some(table) => format!("{}.{}", quote_ident(table), quote_ident(&col.column)),
            None => quote_ident(&col.column),
        },
        Expr::Literal(lit) => generate_literal(lit),
        Expr::BinaryOp { left, op, right } => {
            format!("{} {} {}", generate_expr(left), generate_binary_op(*op), generate_expr(right))
        }
        Expr::UnaryOp { op, expr } => generate_unary_op(*op, expr),
        Expr::Function { name, args, distinct } => {
            let args_str = args.iter().map(generate_expr).collect::<Vec<_>>().join(", ");
            let distinct = if *distinct { "DISTINCT " } else { "" };
            format!("{name}({distinct}{args_str})")
        }
        Expr::Case { conditions, results, else_result } => {
            let mut out = String::from("CASE");
            for (cond, res) in conditions.iter().zip(results.iter()) {
                out.push_str(&format!(" WHEN {} THEN {}", generate_expr(cond), generate_expr(res)));
            }
            if let Some(else_result) = else_result {
                out.push_str(&format!(" ELSE {}", generate_expr(else_result)));
            }
            out.push_str(" END");
            out
        }
        Expr::Cast { expr, type_name } => format!("CAST({} AS {type_name})", generate_expr(expr)),
        Expr::Paren(inner) => format!("({})", generate_expr(inner)),
        Expr::List(items) => format!("({})", items.iter().map(generate_expr).collect::<Vec<_>>().join(", ")),
        Expr::Star => "*".to_string(),
        Expr::QualifiedStar(table) => format!("{}.*", quote_ident(table)),
        Expr::Placeholder => "?".to_string(),
        Expr::Var(name) => name.clone(),
    }
}

fn generate_unary_op(op: UnaryOp, expr: &Expr) -> String {
    match op {
        UnaryOp::Neg => format!("-{}", generate_expr(expr)),
        UnaryOp::Not => format!("NOT {}", generate_expr(expr)),
        UnaryOp::Exists => format!("EXISTS {}", generate_expr(expr)),
    }
}

fn generate_binary_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Eq => "=",
        BinaryOp::NotEq => "<>",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::And => "AND",
        BinaryOp::Or => "OR",
        BinaryOp::Like => "LIKE",
        BinaryOp::NotLike => "NOT LIKE",
        BinaryOp::ILike => "ILIKE",
        BinaryOp::NotILike => "NOT ILIKE",
        BinaryOp::In => "IN",
        BinaryOp::NotIn => "NOT IN",
        BinaryOp::Is => "IS",
        BinaryOp::IsNot => "IS NOT",
    }
}

fn generate_literal(lit: &Literal) -> String {
    match lit {
        Literal::Null => "NULL".to_string(),
        Literal::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Literal::Integer(i) => i.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::String(s) => format!("'{s}'"),
        Literal::Placeholder => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unilake_sql_ir::{ColumnRef, Dialect, SelectItem};

    fn simple_select() -> Statement {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::UnnamedExpr(Expr::column("a")));
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
    fn plain_column_gets_implicit_alias() {
        assert_eq!(generate(&simple_select()), "SELECT `a` AS `a` FROM `b` AS `b`");
    }

    #[test]
    fn qualified_table_includes_catalog_and_db() {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::UnnamedExpr(Expr::qualified_column("b", "a")));
        select.from.push(TableRef {
            factor: TableFactor::Table {
                catalog: Some("catalog".to_string()),
                db: Some("database".to_string()),
                name: "b".to_string(),
                alias: None,
            },
            joins: Vec::new(),
        });
        let stmt = Statement::Query(Box::new(Query {
            body: SetOp::Select(Box::new(select)),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect: Dialect::Generic,
        }));
        assert_eq!(
            generate(&stmt),
            "SELECT `b`.`a` AS `a` FROM `catalog`.`database`.`b` AS `b`"
        );
    }

    #[test]
    fn masked_projection_keeps_original_column_name_as_alias() {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::AliasedExpr {
            expr: Expr::func("XX_HASH3_128", vec![Expr::Column(ColumnRef::new("a").with_table("b"))]),
            alias: "a".to_string(),
        });
        select.from.push(TableRef::table("b"));
        let stmt = Statement::Query(Box::new(Query {
            body: SetOp::Select(Box::new(select)),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect: Dialect::Generic,
        }));
        assert_eq!(
            generate(&stmt),
            "SELECT XX_HASH3_128(`b`.`a`) AS `a` FROM `b` AS `b`"
        );
    }

    #[test]
    fn create_table_as_select_regenerates_the_embedded_query() {
        let mut select = SelectStatement::default();
        select.projection.push(SelectItem::UnnamedExpr(Expr::column("a")));
        select.from.push(TableRef::table("raw"));
        let stmt = Statement::Create(CreateStatement {
            catalog: None,
            db: None,
            table: "summary".to_string(),
            object: CreateObject::Table,
            or_replace: false,
            if_not_exists: true,
            query: Some(Box::new(Query {
                body: SetOp::Select(Box::new(select)),
                order_by: None,
                limit: None,
                offset: None,
                ctes: Vec::new(),
                dialect: Dialect::Generic,
            })),
            raw: "stale rendering from before any rewrite".to_string(),
        });
        assert_eq!(
            generate(&stmt),
            "CREATE TABLE IF NOT EXISTS `summary` AS SELECT `a` AS `a` FROM `raw` AS `raw`"
        );
    }

    #[test]
    fn plain_create_table_falls_back_to_raw() {
        let stmt = Statement::Create(CreateStatement {
            catalog: None,
            db: None,
            table: "t".to_string(),
            object: CreateObject::Table,
            or_replace: false,
            if_not_exists: false,
            query: None,
            raw: "CREATE TABLE t (id INT)".to_string(),
        });
        assert_eq!(generate(&stmt), "CREATE TABLE t (id INT)");
    }

    #[test]
    fn in_list_renders_parenthesized() {
        let expr = Expr::BinaryOp {
            left: Box::new(Expr::column("country")),
            op: BinaryOp::In,
            right: Box::new(Expr::List(vec![Expr::string("USA"), Expr::string("Canada")])),
        };
        assert_eq!(generate_expr(&expr), "`country` IN ('USA', 'Canada')");
    }
}
