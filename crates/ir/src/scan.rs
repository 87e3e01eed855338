// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Scan output data model
//!
//! The shapes produced by `scan`: one [`ScanOutputObject`] per scope,
//! wrapped in a [`ScanOutput`] that also carries the statement's dialect,
//! kind, serialized IR and (if parsing failed) error.

use crate::dialect::Dialect;
use crate::error::ParserError;
use crate::query::StatementKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A table (or CTE/derived-subquery) referenced in a scope.
/// `catalog`/`db` are absent when the reference resolved to a CTE or a
/// derived subquery rather than a base table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScanEntity {
    pub catalog: Option<String>,
    pub db: Option<String>,
    pub name: String,
    pub alias: String,
}

/// A column (or `*`) referenced in a scope, keyed by the alias of the
/// entity it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScanAttribute {
    pub entity_alias: String,
    pub name: String,
}

impl ScanAttribute {
    pub fn star(entity_alias: impl Into<String>) -> Self {
        Self {
            entity_alias: entity_alias.into(),
            name: "*".to_string(),
        }
    }
}

/// Everything extracted from one scope. Entities and attributes are sets:
/// referencing the same table or column twice within a scope contributes
/// one member, not two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutputObject {
    pub scope: usize,
    pub entities: BTreeSet<ScanEntity>,
    pub attributes: BTreeSet<ScanAttribute>,
    pub is_agg: bool,
}

impl ScanOutputObject {
    pub fn new(scope: usize) -> Self {
        Self {
            scope,
            entities: BTreeSet::new(),
            attributes: BTreeSet::new(),
            is_agg: false,
        }
    }
}

/// The full result of a `scan` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutput {
    pub objects: Vec<ScanOutputObject>,
    /// Misspelled on the wire (`dialects`, not `dialect`) for backward
    /// compatibility with existing callers; still a single dialect value.
    #[serde(rename = "dialects")]
    pub dialect: Dialect,
    /// Serialized IR (see `unilake_sql_ir::codec`), or `None` on any
    /// failure that prevented a usable AST from existing.
    pub query: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub kind: StatementKind,
    pub error: Option<ParserError>,
    /// Quoted identifier of the object being written/altered
    /// (INSERT/UPDATE/CREATE/TRUNCATE target); `None` for read-only
    /// statements.
    pub target_entity: Option<String>,
}

impl ScanOutput {
    pub fn empty_unknown() -> Self {
        Self {
            objects: Vec::new(),
            dialect: Dialect::Generic,
            query: None,
            kind: StatementKind::Unknown,
            error: None,
            target_entity: None,
        }
    }

    pub fn failed(dialect: Dialect, error: ParserError) -> Self {
        Self {
            objects: Vec::new(),
            dialect,
            query: None,
            kind: StatementKind::Unknown,
            error: Some(error),
            target_entity: None,
        }
    }
}
