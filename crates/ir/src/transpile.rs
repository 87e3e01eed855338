// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Transpiler input/output data model
//!
//! `visible_schema` is the nested map `catalog -> db -> table -> column ->
//! type` described in spec §4.8; it's a plain alias here rather than a
//! dedicated struct so `unilake-sql-catalog` can own the richer
//! lookup/validation API without this crate depending on it.

use crate::error::ParserError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `catalog -> db -> table -> column -> type`. The innermost map is
/// order-preserving: `*` expansion walks columns in the order the schema
/// declares them, so a plain `BTreeMap` (which re-sorts keys) would silently
/// reorder projections.
pub type VisibleSchema =
    BTreeMap<String, BTreeMap<String, BTreeMap<String, IndexMap<String, String>>>>;

/// A masking rule to apply to one attribute in one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub scope: usize,
    /// Quoted column form, e.g. `"b"."a"`.
    pub attribute: String,
    pub rule_id: String,
    pub rule_definition: RuleDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    #[serde(default)]
    pub properties: Option<BTreeMap<String, String>>,
}

/// A row filter to AND-append to one scope's WHERE clause, gated on one
/// attribute being referenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub scope: usize,
    pub attribute: String,
    pub filter_id: String,
    pub filter_definition: FilterDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    /// A condition containing exactly one `?` placeholder, substituted with
    /// the concrete column reference for `attribute`.
    pub expression: String,
}

/// The full input to `transpile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranspilerInput {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub visible_schema: Option<VisibleSchema>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(rename = "query")]
    pub query_ir: Option<serde_json::Value>,
    #[serde(default)]
    pub request_url: Option<String>,
}

impl TranspilerInput {
    /// Whether there's anything to actually transpile.
    pub fn has_query(&self) -> bool {
        self.query_ir.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranspilerOutput {
    pub sql_transformed: String,
    pub error: Option<ParserError>,
}

impl TranspilerOutput {
    pub fn ok(sql: impl Into<String>) -> Self {
        Self {
            sql_transformed: sql.into(),
            error: None,
        }
    }

    pub fn failed(error: ParserError) -> Self {
        Self {
            sql_transformed: String::new(),
            error: Some(error),
        }
    }
}
