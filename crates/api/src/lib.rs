// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # `unilake-sql-api`
//!
//! The two-function callable surface a proxy actually calls: [`scan`] (parse
//! + qualify + scope/attribute extraction) and [`transpile`] (rewrite +
//! reprint). Wires together the dialect registry and parser/qualifier (C1,
//! C2), the scope analyzer and scan extractor (C3, C4), and the transpiler
//! crate (C6-C10). Neither function ever panics or propagates an error to
//! the caller — every failure mode lands in the output's `error` field.

use unilake_sql_ir::{
    ParserError, ScanOutput, ScanOutputObject, Statement, TableFactor, TableRef, TranspilerInput,
    TranspilerOutput,
};
use unilake_sql_parser::{qualify_query, QualifyOptions};

/// `transpile`'s `source` argument: either a JSON-encoded payload (parsed as
/// `TranspilerInput` first) or an already-structured value.
pub enum TranspileSource {
    Json(String),
    Structured(Box<TranspilerInput>),
}

/// Parse `sql` under `dialect`, qualify every reference against the fallback
/// `(catalog, database)` namespace, and extract per-scope entities and
/// attributes.
pub fn scan(sql: &str, dialect: &str, catalog: &str, database: &str) -> ScanOutput {
    if sql.trim().is_empty() {
        let (ir_dialect, _) = unilake_sql_parser::DialectRegistry::resolve(dialect);
        let mut out = ScanOutput::empty_unknown();
        out.dialect = ir_dialect;
        return out;
    }

    let mut stmt = match unilake_sql_parser::parse(sql, dialect) {
        Ok((stmt, _)) => stmt,
        Err(err) => {
            let (ir_dialect, _) = unilake_sql_parser::DialectRegistry::resolve(dialect);
            return ScanOutput::failed(ir_dialect, err);
        }
    };
    let ir_dialect = stmt_dialect(&stmt, dialect);

    let embedded_query = match &mut stmt {
        Statement::Query(query) => Some(query.as_mut()),
        Statement::Create(create) => create.query.as_deref_mut(),
        _ => None,
    };
    if let Some(query) = embedded_query {
        let opts = QualifyOptions {
            default_catalog: catalog,
            default_db: database,
            schema: None,
            validate_qualify_columns: false,
        };
        if let Err(err) = qualify_query(query, &opts) {
            return ScanOutput::failed(ir_dialect, err);
        }
    }

    let mut objects = unilake_sql_semantic::extract(&stmt);
    if objects.is_empty() {
        objects.push(ScanOutputObject::new(0));
    }

    ScanOutput {
        objects,
        dialect: ir_dialect,
        query: serde_json::to_value(&stmt).ok(),
        kind: stmt.kind(),
        error: None,
        target_entity: target_entity(&stmt),
    }
}

/// The statement itself doesn't carry its own dialect outside `Query`, so
/// fall back to re-resolving the caller's name for `Insert`/`Update`/etc.
fn stmt_dialect(stmt: &Statement, dialect_name: &str) -> unilake_sql_ir::Dialect {
    match stmt {
        Statement::Query(query) => query.dialect,
        _ => unilake_sql_parser::DialectRegistry::resolve(dialect_name).0,
    }
}

fn target_entity(stmt: &Statement) -> Option<String> {
    match stmt {
        Statement::Insert(insert) => Some(quoted_target(insert.catalog.as_deref(), insert.db.as_deref(), &insert.table)),
        Statement::Update(update) => table_ref_target(&update.table),
        Statement::Create(create) => Some(quoted_target(create.catalog.as_deref(), create.db.as_deref(), &create.table)),
        Statement::Truncate(truncate) => Some(quoted_target(truncate.catalog.as_deref(), truncate.db.as_deref(), &truncate.table)),
        _ => None,
    }
}

fn table_ref_target(table_ref: &TableRef) -> Option<String> {
    match &table_ref.factor {
        TableFactor::Table { catalog, db, name, .. } => Some(quoted_target(catalog.as_deref(), db.as_deref(), name)),
        TableFactor::Derived { .. } => None,
    }
}

fn quoted_target(catalog: Option<&str>, db: Option<&str>, name: &str) -> String {
    let mut parts = Vec::new();
    if let Some(catalog) = catalog {
        parts.push(format!("\"{catalog}\""));
    }
    if let Some(db) = db {
        parts.push(format!("\"{db}\""));
    }
    parts.push(format!("\"{name}\""));
    parts.join(".")
}

/// Rewrite a previously-scanned query under the given rules/filters/schema
/// and re-serialize it in OUT_DIALECT.
pub fn transpile(source: TranspileSource, secure_output: bool) -> TranspilerOutput {
    let input = match source {
        TranspileSource::Structured(input) => *input,
        TranspileSource::Json(text) => match serde_json::from_str(&text) {
            Ok(input) => input,
            Err(err) => return TranspilerOutput::failed(invalid_input(err.to_string())),
        },
    };
    unilake_sql_transpiler::transpile(input, secure_output)
}

fn invalid_input(detail: impl Into<String>) -> ParserError {
    let detail = detail.into();
    ParserError::parse("Invalid input", vec![unilake_sql_ir::ErrorMessage::new(detail)])
}
