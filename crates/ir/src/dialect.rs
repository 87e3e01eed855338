// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect support
//!
//! A [`Dialect`] names the SQL surface a statement was written in (the
//! *source* dialect, supplied by the caller of `scan`/`transpile`) or the one
//! statements are rendered into (the fixed *output* dialect, [`OUT_DIALECT`]).
//!
//! Most dialects here delegate parsing to the `sqlparser` crate's own dialect
//! objects; [`Dialect::Unilake`] is the one local extension, recognized by
//! `unilake-sql-parser` rather than by `sqlparser`.

use serde::{Deserialize, Serialize};

/// Supported SQL source dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Dialect {
    Generic,
    Ansi,
    MySQL,
    PostgreSQL,
    MsSql,
    Snowflake,
    Hive,
    BigQuery,
    ClickHouse,
    Databricks,
    Redshift,
    Sqlite,
    DuckDb,
    /// The local `unilake` extension dialect: standard SQL plus the
    /// `TRANSPILE` / `SCAN TAGS` / `CREATE MASKING RULESET` command forms.
    Unilake,
}

/// The fixed output dialect every generated statement is rendered in,
/// regardless of the statement's source dialect. Backtick-quoted
/// identifiers, uppercase keywords and function names, StarRocks-compatible
/// function vocabulary (`XX_HASH3_128`, `CONCAT_WS`, `CHAR_LENGTH`, ...).
pub const OUT_DIALECT: Dialect = Dialect::Generic;

impl Dialect {
    /// Parse a dialect name the way callers pass it to `scan`/`transpile`:
    /// case-insensitively, matching the names `sqlparser` itself accepts plus
    /// `"unilake"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "generic" => Dialect::Generic,
            "ansi" => Dialect::Ansi,
            "mysql" => Dialect::MySQL,
            "postgresql" | "postgres" => Dialect::PostgreSQL,
            "tsql" | "mssql" => Dialect::MsSql,
            "snowflake" => Dialect::Snowflake,
            "hive" => Dialect::Hive,
            "bigquery" => Dialect::BigQuery,
            "clickhouse" => Dialect::ClickHouse,
            "databricks" => Dialect::Databricks,
            "redshift" => Dialect::Redshift,
            "sqlite" => Dialect::Sqlite,
            "duckdb" => Dialect::DuckDb,
            "unilake" => Dialect::Unilake,
            _ => return None,
        })
    }

    /// Whether this dialect is the local command-extension dialect rather
    /// than a delegate to `sqlparser`.
    pub fn is_unilake(&self) -> bool {
        matches!(self, Dialect::Unilake)
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Generic
    }
}
