// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lowering: `sqlparser` AST -> IR
//!
//! Converts `sqlparser::ast::Statement` into `unilake_sql_ir::Statement`.
//! Structure mirrors the teacher's `Lowering` trait (one function per node
//! family, bottom-up) even though the tree walked here is `sqlparser`'s AST
//! rather than a `tree-sitter` CST.
//!
//! Statements this crate doesn't need full structure for (CREATE, ALTER,
//! DROP, TRUNCATE, DESCRIBE, SET) are lowered only far enough to report a
//! [`StatementKind`]; `unilake-sql-semantic` never has to walk into them.

use crate::error::LoweringError;
use sqlparser::ast as sql;
use unilake_sql_ir::{
    Assignment, BinaryOp, CommonTableExpr, CreateObject, CreateStatement, DeleteStatement,
    Dialect as IrDialect, Expr, InsertSource, InsertStatement, Join, JoinCondition, JoinType,
    Literal, OrderBy, Query, SelectItem, SelectStatement, SetOp, SortDirection, Statement,
    StatementKind, TableFactor, TableRef, TruncateStatement, UnaryOp, UpdateStatement,
};

type LowerResult<T> = Result<T, LoweringError>;

pub fn lower_statement(stmt: &sql::Statement, dialect: IrDialect) -> LowerResult<Statement> {
    match stmt {
        sql::Statement::Query(query) => Ok(Statement::Query(Box::new(lower_query(query, dialect)?))),
        sql::Statement::Insert(insert) => Ok(Statement::Insert(lower_insert(insert, dialect)?)),
        sql::Statement::Update { table, assignments, selection, .. } => {
            Ok(Statement::Update(UpdateStatement {
                table: lower_table_with_joins(table, dialect)?,
                assignments: assignments
                    .iter()
                    .map(|a| lower_assignment(a))
                    .collect::<LowerResult<Vec<_>>>()?,
                where_clause: selection.as_ref().map(lower_expr).transpose()?,
            }))
        }
        sql::Statement::Delete(delete) => Ok(Statement::Delete(lower_delete(delete, dialect)?)),
        sql::Statement::CreateTable(create) => Ok(Statement::Create(lower_create_table(create, stmt, dialect)?)),
        sql::Statement::CreateView { name, or_replace, if_not_exists, query, .. } => {
            Ok(Statement::Create(lower_create_view(name, *or_replace, *if_not_exists, query, stmt, dialect)?))
        }
        sql::Statement::AlterTable { .. } => Ok(other_statement(StatementKind::Alter, stmt)),
        sql::Statement::Drop { .. } => Ok(other_statement(StatementKind::Drop, stmt)),
        sql::Statement::Truncate { table_name, .. } => {
            let (catalog, db, table) = split_qualified_name(table_name)?;
            Ok(Statement::Truncate(TruncateStatement { catalog, db, table, raw: stmt.to_string() }))
        }
        sql::Statement::ExplainTable { .. } | sql::Statement::Explain { .. } => {
            Ok(other_statement(StatementKind::Describe, stmt))
        }
        sql::Statement::SetVariable { .. } => Ok(other_statement(StatementKind::Set, stmt)),
        other => {
            tracing::debug!(statement = ?other, "statement recognized only as UNKNOWN");
            Ok(other_statement(StatementKind::Unknown, stmt))
        }
    }
}

/// Build a classification-only [`Statement::Other`], keeping `sqlparser`'s
/// own rendering of the statement as `raw` so the generator can pass it
/// through unchanged (these statement kinds receive no rewrites, spec §4.10).
fn other_statement(kind: StatementKind, stmt: &sql::Statement) -> Statement {
    Statement::Other { kind, raw: stmt.to_string() }
}

fn lower_create_table(create: &sql::CreateTable, stmt: &sql::Statement, dialect: IrDialect) -> LowerResult<CreateStatement> {
    let (catalog, db, table) = split_qualified_name(&create.name)?;
    let query = create
        .query
        .as_ref()
        .map(|q| lower_query(q, dialect))
        .transpose()?
        .map(Box::new);
    Ok(CreateStatement {
        catalog,
        db,
        table,
        object: CreateObject::Table,
        or_replace: create.or_replace,
        if_not_exists: create.if_not_exists,
        query,
        raw: stmt.to_string(),
    })
}

fn lower_create_view(
    name: &sql::ObjectName,
    or_replace: bool,
    if_not_exists: bool,
    query: &sql::Query,
    stmt: &sql::Statement,
    dialect: IrDialect,
) -> LowerResult<CreateStatement> {
    let (catalog, db, table) = split_qualified_name(name)?;
    Ok(CreateStatement {
        catalog,
        db,
        table,
        object: CreateObject::View,
        or_replace,
        if_not_exists,
        query: Some(Box::new(lower_query(query, dialect)?)),
        raw: stmt.to_string(),
    })
}

/// Splits a (possibly catalog/db-qualified) object name the same way
/// `lower_table_factor`/`lower_insert` do, for the statement kinds whose
/// target name is read structurally (`CREATE`, `TRUNCATE`).
fn split_qualified_name(name: &sql::ObjectName) -> LowerResult<(Option<String>, Option<String>, String)> {
    let parts: Vec<String> = name.0.iter().map(|p| p.to_string()).collect();
    match parts.len() {
        0 => Err(LoweringError::new("empty table name")),
        1 => Ok((None, None, parts[0].clone())),
        2 => Ok((None, Some(parts[0].clone()), parts[1].clone())),
        _ => Ok((
            Some(parts[parts.len() - 3].clone()),
            Some(parts[parts.len() - 2].clone()),
            parts[parts.len() - 1].clone(),
        )),
    }
}

/// Classification-only fallback for statement forms `sqlparser` itself
/// doesn't model (warehouse extensions like `REFRESH MATERIALIZED VIEW` /
/// `EXPORT DATA`), used when the full parse fails but the input is
/// recognizable from its leading keyword.
pub fn classify_kind_from_prefix(sql_text: &str) -> Option<StatementKind> {
    let upper = sql_text.trim_start().to_ascii_uppercase();
    if upper.starts_with("REFRESH") {
        Some(StatementKind::Refresh)
    } else if upper.starts_with("EXPORT") {
        Some(StatementKind::Export)
    } else {
        None
    }
}

fn lower_query(query: &sql::Query, dialect: IrDialect) -> LowerResult<Query> {
    let ctes = match &query.with {
        Some(with) => with
            .cte_tables
            .iter()
            .map(|cte| lower_cte(cte, dialect))
            .collect::<LowerResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    let body = lower_set_expr(&query.body, dialect)?;

    let order_by = lower_order_by(query)?;
    let (limit, offset) = lower_limit_offset(query)?;

    Ok(Query {
        body,
        order_by,
        limit,
        offset,
        ctes,
        dialect,
    })
}

fn lower_order_by(query: &sql::Query) -> LowerResult<Option<Vec<OrderBy>>> {
    let items = match &query.order_by {
        Some(ob) => &ob.exprs,
        None => return Ok(None),
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(OrderBy {
            expr: lower_expr(&item.expr)?,
            direction: item.options.asc.map(|asc| {
                if asc {
                    SortDirection::Asc
                } else {
                    SortDirection::Desc
                }
            }),
        });
    }
    Ok(Some(out))
}

fn lower_limit_offset(query: &sql::Query) -> LowerResult<(Option<Expr>, Option<Expr>)> {
    let limit = query.limit.as_ref().map(lower_expr).transpose()?;
    let offset = query
        .offset
        .as_ref()
        .map(|o| lower_expr(&o.value))
        .transpose()?;
    Ok((limit, offset))
}

fn lower_cte(cte: &sql::Cte, dialect: IrDialect) -> LowerResult<CommonTableExpr> {
    Ok(CommonTableExpr {
        name: cte.alias.name.value.clone(),
        columns: cte.alias.columns.iter().map(|c| c.name.value.clone()).collect(),
        query: Box::new(lower_query(&cte.query, dialect)?),
        materialized: cte.materialized.as_ref().map(|m| {
            matches!(m, sql::CteAsMaterialized::Materialized)
        }),
    })
}

fn lower_set_expr(expr: &sql::SetExpr, dialect: IrDialect) -> LowerResult<SetOp> {
    match expr {
        sql::SetExpr::Select(select) => Ok(SetOp::Select(Box::new(lower_select(select, dialect)?))),
        sql::SetExpr::Query(q) => lower_set_expr(&q.body, dialect),
        sql::SetExpr::SetOperation { op, left, right, set_quantifier, .. } => {
            let left_q = set_expr_to_query(left, dialect)?;
            let right_q = set_expr_to_query(right, dialect)?;
            let distinct = !matches!(set_quantifier, sql::SetQuantifier::All);
            Ok(match op {
                sql::SetOperator::Union => SetOp::Union {
                    left: Box::new(left_q),
                    right: Box::new(right_q),
                    all: !distinct,
                },
                sql::SetOperator::Intersect => SetOp::Intersect {
                    left: Box::new(left_q),
                    right: Box::new(right_q),
                    distinct,
                },
                sql::SetOperator::Except => SetOp::Except {
                    left: Box::new(left_q),
                    right: Box::new(right_q),
                    distinct,
                },
            })
        }
        other => Err(LoweringError::new(format!("unsupported set expression: {other:?}"))),
    }
}

fn set_expr_to_query(expr: &sql::SetExpr, dialect: IrDialect) -> LowerResult<Query> {
    Ok(Query {
        body: lower_set_expr(expr, dialect)?,
        order_by: None,
        limit: None,
        offset: None,
        ctes: Vec::new(),
        dialect,
    })
}

fn lower_select(select: &sql::Select, dialect: IrDialect) -> LowerResult<SelectStatement> {
    let projection = select
        .projection
        .iter()
        .map(lower_select_item)
        .collect::<LowerResult<Vec<_>>>()?;

    let from = select
        .from
        .iter()
        .map(|t| lower_table_with_joins(t, dialect))
        .collect::<LowerResult<Vec<_>>>()?;

    let where_clause = select.selection.as_ref().map(lower_expr).transpose()?;

    let group_by = match &select.group_by {
        sql::GroupByExpr::Expressions(exprs, _) => {
            exprs.iter().map(lower_expr).collect::<LowerResult<Vec<_>>>()?
        }
        sql::GroupByExpr::All(_) => Vec::new(),
    };

    let having = select.having.as_ref().map(lower_expr).transpose()?;

    Ok(SelectStatement {
        distinct: select.distinct.is_some(),
        projection,
        from,
        where_clause,
        group_by,
        having,
        window: Vec::new(),
    })
}

fn lower_select_item(item: &sql::SelectItem) -> LowerResult<SelectItem> {
    Ok(match item {
        sql::SelectItem::UnnamedExpr(e) => SelectItem::UnnamedExpr(lower_expr(e)?),
        sql::SelectItem::ExprWithAlias { expr, alias } => SelectItem::AliasedExpr {
            expr: lower_expr(expr)?,
            alias: alias.value.clone(),
        },
        sql::SelectItem::QualifiedWildcard(kind, _) => {
            SelectItem::QualifiedWildcard(object_name_prefix(kind))
        }
        sql::SelectItem::Wildcard(_) => SelectItem::Wildcard,
    })
}

fn object_name_prefix(kind: &sql::SelectItemQualifiedWildcardKind) -> String {
    match kind {
        sql::SelectItemQualifiedWildcardKind::ObjectName(name) => object_name_to_string(name),
        sql::SelectItemQualifiedWildcardKind::Expr(e) => format!("{e}"),
    }
}

fn object_name_to_string(name: &sql::ObjectName) -> String {
    name.0
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn lower_table_with_joins(twj: &sql::TableWithJoins, dialect: IrDialect) -> LowerResult<TableRef> {
    let factor = lower_table_factor(&twj.relation, dialect)?;
    let joins = twj
        .joins
        .iter()
        .map(|j| lower_join(j, dialect))
        .collect::<LowerResult<Vec<_>>>()?;
    Ok(TableRef { factor, joins })
}

fn lower_table_factor(factor: &sql::TableFactor, dialect: IrDialect) -> LowerResult<TableFactor> {
    match factor {
        sql::TableFactor::Table { name, alias, .. } => {
            let parts: Vec<String> = name.0.iter().map(|p| p.to_string()).collect();
            let (catalog, db, table_name) = match parts.len() {
                1 => (None, None, parts[0].clone()),
                2 => (None, Some(parts[0].clone()), parts[1].clone()),
                3 => (Some(parts[0].clone()), Some(parts[1].clone()), parts[2].clone()),
                0 => return Err(LoweringError::new("empty table name")),
                _ => (
                    Some(parts[parts.len() - 3].clone()),
                    Some(parts[parts.len() - 2].clone()),
                    parts[parts.len() - 1].clone(),
                ),
            };
            Ok(TableFactor::Table {
                catalog,
                db,
                name: table_name,
                alias: alias.as_ref().map(|a| a.name.value.clone()),
            })
        }
        sql::TableFactor::Derived { subquery, alias, .. } => {
            let alias_name = alias
                .as_ref()
                .map(|a| a.name.value.clone())
                .ok_or_else(|| LoweringError::new("derived table requires an alias"))?;
            Ok(TableFactor::Derived {
                query: Box::new(lower_query(subquery, dialect)?),
                alias: alias_name,
            })
        }
        other => Err(LoweringError::new(format!("unsupported table factor: {other:?}"))),
    }
}

fn lower_join(join: &sql::Join, dialect: IrDialect) -> LowerResult<Join> {
    let table = lower_table_factor(&join.relation, dialect).map(|factor| TableRef {
        factor,
        joins: Vec::new(),
    })?;

    let (join_type, condition) = match &join.join_operator {
        sql::JoinOperator::Inner(c) => (JoinType::Inner, lower_join_constraint(c)?),
        sql::JoinOperator::LeftOuter(c) => (JoinType::Left, lower_join_constraint(c)?),
        sql::JoinOperator::RightOuter(c) => (JoinType::Right, lower_join_constraint(c)?),
        sql::JoinOperator::FullOuter(c) => (JoinType::Full, lower_join_constraint(c)?),
        sql::JoinOperator::CrossJoin => (JoinType::Cross, JoinCondition::Natural),
        other => return Err(LoweringError::new(format!("unsupported join operator: {other:?}"))),
    };

    Ok(Join {
        join_type,
        table,
        condition,
    })
}

fn lower_join_constraint(c: &sql::JoinConstraint) -> LowerResult<JoinCondition> {
    Ok(match c {
        sql::JoinConstraint::On(e) => JoinCondition::On(lower_expr(e)?),
        sql::JoinConstraint::Using(cols) => {
            JoinCondition::Using(cols.iter().map(|c| c.to_string()).collect())
        }
        sql::JoinConstraint::Natural => JoinCondition::Natural,
        sql::JoinConstraint::None => JoinCondition::Natural,
    })
}

fn lower_assignment(a: &sql::Assignment) -> LowerResult<Assignment> {
    let column = match &a.target {
        sql::AssignmentTarget::ColumnName(name) => object_name_to_string(name),
        other => format!("{other}"),
    };
    Ok(Assignment {
        column,
        value: lower_expr(&a.value)?,
    })
}

fn lower_delete(delete: &sql::Delete, dialect: IrDialect) -> LowerResult<DeleteStatement> {
    let table = match &delete.from {
        sql::FromTable::WithFromKeyword(tables) | sql::FromTable::WithoutKeyword(tables) => tables
            .first()
            .ok_or_else(|| LoweringError::new("DELETE with no target table"))
            .and_then(|t| lower_table_with_joins(t, dialect))?,
    };
    Ok(DeleteStatement {
        table,
        where_clause: delete.selection.as_ref().map(lower_expr).transpose()?,
    })
}

fn lower_insert(insert: &sql::Insert, dialect: IrDialect) -> LowerResult<InsertStatement> {
    let parts: Vec<String> = insert.table_name.0.iter().map(|p| p.to_string()).collect();
    let (catalog, db, table) = match parts.len() {
        1 => (None, None, parts[0].clone()),
        2 => (None, Some(parts[0].clone()), parts[1].clone()),
        _ => (
            Some(parts[parts.len() - 3.min(parts.len() - 1)].clone()),
            Some(parts[parts.len() - 2].clone()),
            parts[parts.len() - 1].clone(),
        ),
    };

    let columns = insert.columns.iter().map(|c| c.value.clone()).collect();

    let source = match &insert.source {
        Some(query) => match query.body.as_ref() {
            sql::SetExpr::Values(values) => InsertSource::Values(
                values
                    .rows
                    .iter()
                    .map(|row| row.iter().map(lower_expr).collect::<LowerResult<Vec<_>>>())
                    .collect::<LowerResult<Vec<_>>>()?,
            ),
            _ => InsertSource::Query(Box::new(lower_query(query, dialect)?)),
        },
        None => InsertSource::Values(Vec::new()),
    };

    Ok(InsertStatement {
        catalog,
        db,
        table,
        columns,
        source,
    })
}

pub fn lower_expr(expr: &sql::Expr) -> LowerResult<Expr> {
    Ok(match expr {
        sql::Expr::Identifier(ident) => Expr::column(ident.value.clone()),
        sql::Expr::CompoundIdentifier(parts) => {
            let mut parts = parts.iter().map(|p| p.value.clone()).collect::<Vec<_>>();
            let column = parts.pop().unwrap_or_default();
            let table = parts.pop();
            match table {
                Some(t) => Expr::qualified_column(t, column),
                None => Expr::column(column),
            }
        }
        sql::Expr::Value(value) => Expr::Literal(lower_value(&value.value)),
        sql::Expr::BinaryOp { left, op, right } => Expr::BinaryOp {
            left: Box::new(lower_expr(left)?),
            op: lower_binary_op(op)?,
            right: Box::new(lower_expr(right)?),
        },
        sql::Expr::UnaryOp { op, expr } => Expr::UnaryOp {
            op: lower_unary_op(op)?,
            expr: Box::new(lower_expr(expr)?),
        },
        sql::Expr::Nested(inner) => Expr::Paren(Box::new(lower_expr(inner)?)),
        sql::Expr::Function(func) => lower_function(func)?,
        sql::Expr::Case {
            conditions,
            else_result,
            ..
        } => {
            let mut conds = Vec::with_capacity(conditions.len());
            let mut results = Vec::with_capacity(conditions.len());
            for when in conditions {
                conds.push(lower_expr(&when.condition)?);
                results.push(lower_expr(&when.result)?);
            }
            Expr::Case {
                conditions: conds,
                results,
                else_result: else_result
                    .as_ref()
                    .map(|e| lower_expr(e))
                    .transpose()?
                    .map(Box::new),
            }
        }
        sql::Expr::Cast { expr, data_type, .. } => Expr::Cast {
            expr: Box::new(lower_expr(expr)?),
            type_name: data_type.to_string(),
        },
        sql::Expr::InList { expr, list, negated } => {
            let list_expr = Expr::List(list.iter().map(lower_expr).collect::<LowerResult<Vec<_>>>()?);
            let in_op = Expr::BinaryOp {
                left: Box::new(lower_expr(expr)?),
                op: if *negated { BinaryOp::NotIn } else { BinaryOp::In },
                right: Box::new(list_expr),
            };
            in_op
        }
        sql::Expr::IsNull(inner) => Expr::BinaryOp {
            left: Box::new(lower_expr(inner)?),
            op: BinaryOp::Is,
            right: Box::new(Expr::Literal(Literal::Null)),
        },
        sql::Expr::IsNotNull(inner) => Expr::BinaryOp {
            left: Box::new(lower_expr(inner)?),
            op: BinaryOp::IsNot,
            right: Box::new(Expr::Literal(Literal::Null)),
        },
        sql::Expr::Like { expr, pattern, negated, .. } => Expr::BinaryOp {
            left: Box::new(lower_expr(expr)?),
            op: if *negated { BinaryOp::NotLike } else { BinaryOp::Like },
            right: Box::new(lower_expr(pattern)?),
        },
        sql::Expr::Wildcard(_) => Expr::Star,
        other => return Err(LoweringError::new(format!("unsupported expression: {other:?}"))),
    })
}

fn lower_function(func: &sql::Function) -> LowerResult<Expr> {
    let name = object_name_to_string(&func.name);
    let (args, distinct) = match &func.args {
        sql::FunctionArguments::List(list) => {
            let distinct = matches!(list.duplicate_treatment, Some(sql::DuplicateTreatment::Distinct));
            let mut args = Vec::with_capacity(list.args.len());
            for arg in &list.args {
                args.push(lower_function_arg(arg)?);
            }
            (args, distinct)
        }
        sql::FunctionArguments::None => (Vec::new(), false),
        sql::FunctionArguments::Subquery(_) => {
            return Err(LoweringError::new("subquery function arguments are unsupported"))
        }
    };
    Ok(Expr::Function { name, args, distinct })
}

fn lower_function_arg(arg: &sql::FunctionArg) -> LowerResult<Expr> {
    match arg {
        sql::FunctionArg::Unnamed(sql::FunctionArgExpr::Expr(e)) => lower_expr(e),
        sql::FunctionArg::Unnamed(sql::FunctionArgExpr::Wildcard) => Ok(Expr::Star),
        sql::FunctionArg::Named { arg: sql::FunctionArgExpr::Expr(e), .. } => lower_expr(e),
        other => Err(LoweringError::new(format!("unsupported function argument: {other:?}"))),
    }
}

fn lower_value(value: &sql::Value) -> Literal {
    match value {
        sql::Value::Number(n, _) => {
            if let Ok(i) = n.parse::<i64>() {
                Literal::Integer(i)
            } else {
                Literal::Float(n.parse::<f64>().unwrap_or(0.0))
            }
        }
        sql::Value::SingleQuotedString(s) | sql::Value::DoubleQuotedString(s) => {
            Literal::String(s.clone())
        }
        sql::Value::Boolean(b) => Literal::Boolean(*b),
        sql::Value::Null => Literal::Null,
        sql::Value::Placeholder(_) => Literal::Placeholder,
        other => Literal::String(other.to_string()),
    }
}

fn lower_binary_op(op: &sql::BinaryOperator) -> LowerResult<BinaryOp> {
    Ok(match op {
        sql::BinaryOperator::Plus => BinaryOp::Add,
        sql::BinaryOperator::Minus => BinaryOp::Sub,
        sql::BinaryOperator::Multiply => BinaryOp::Mul,
        sql::BinaryOperator::Divide => BinaryOp::Div,
        sql::BinaryOperator::Modulo => BinaryOp::Mod,
        sql::BinaryOperator::Eq => BinaryOp::Eq,
        sql::BinaryOperator::NotEq => BinaryOp::NotEq,
        sql::BinaryOperator::Lt => BinaryOp::Lt,
        sql::BinaryOperator::LtEq => BinaryOp::LtEq,
        sql::BinaryOperator::Gt => BinaryOp::Gt,
        sql::BinaryOperator::GtEq => BinaryOp::GtEq,
        sql::BinaryOperator::And => BinaryOp::And,
        sql::BinaryOperator::Or => BinaryOp::Or,
        other => return Err(LoweringError::new(format!("unsupported binary operator: {other:?}"))),
    })
}

fn lower_unary_op(op: &sql::UnaryOperator) -> LowerResult<UnaryOp> {
    Ok(match op {
        sql::UnaryOperator::Minus => UnaryOp::Neg,
        sql::UnaryOperator::Not => UnaryOp::Not,
        other => return Err(LoweringError::new(format!("unsupported unary operator: {other:?}"))),
    })
}
