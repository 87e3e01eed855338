// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect registry (C1)
//!
//! `DialectRegistry::resolve` maps the name a caller passes to `scan`/
//! `transpile` onto either a `sqlparser` dialect object or the local
//! `unilake` command extension. Unknown names fall back to
//! `sqlparser::dialect::GenericDialect` with a logged warning rather than an
//! error — this crate never panics or raises on malformed/unrecognized
//! caller input.

use sqlparser::dialect::{
    AnsiDialect, BigQueryDialect, ClickHouseDialect, DatabricksDialect, Dialect as SqlParserDialect,
    DuckDbDialect, GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
    RedshiftSqlDialect, SQLiteDialect, SnowflakeDialect,
};
use unilake_sql_ir::Dialect;

/// A resolved parser: either delegated straight to `sqlparser`, or the
/// local `unilake` extension (recognized by [`crate::unilake::recognize_command`]
/// before falling through to the generic grammar for anything else).
pub enum DialectHandle {
    Delegated(Box<dyn SqlParserDialect>),
    Unilake,
}

pub struct DialectRegistry;

impl DialectRegistry {
    /// Resolve a caller-supplied dialect name. Falls back to
    /// [`GenericDialect`] for names `sqlparser` and the `unilake` extension
    /// don't recognize.
    pub fn resolve(name: &str) -> (Dialect, DialectHandle) {
        match Dialect::from_name(name) {
            Some(Dialect::Unilake) => (Dialect::Unilake, DialectHandle::Unilake),
            Some(dialect) => (dialect, DialectHandle::Delegated(Self::delegate(dialect))),
            None => {
                tracing::warn!(name, "unrecognized dialect name, falling back to generic");
                (Dialect::Generic, DialectHandle::Delegated(Box::new(GenericDialect {})))
            }
        }
    }

    fn delegate(dialect: Dialect) -> Box<dyn SqlParserDialect> {
        match dialect {
            Dialect::MySQL => Box::new(MySqlDialect {}),
            Dialect::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Dialect::MsSql => Box::new(MsSqlDialect {}),
            Dialect::Snowflake => Box::new(SnowflakeDialect {}),
            Dialect::Hive => Box::new(HiveDialect {}),
            Dialect::BigQuery => Box::new(BigQueryDialect {}),
            Dialect::ClickHouse => Box::new(ClickHouseDialect {}),
            Dialect::Databricks => Box::new(DatabricksDialect {}),
            Dialect::Redshift => Box::new(RedshiftSqlDialect {}),
            Dialect::Sqlite => Box::new(SQLiteDialect {}),
            Dialect::DuckDb => Box::new(DuckDbDialect {}),
            Dialect::Ansi => Box::new(AnsiDialect {}),
            Dialect::Generic | Dialect::Unilake => Box::new(GenericDialect {}),
        }
    }
}
