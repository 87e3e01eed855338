// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for visible-schema resolution

use serde::Serialize;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while resolving a table or column against a caller-supplied
/// `visible_schema`, surfaced by the star-expansion pass as `PARSE_ERROR`.
#[derive(Debug, Error, Clone, Serialize, PartialEq, Eq)]
pub enum CatalogError {
    #[error("table '{catalog}.{db}.{table}' is not present in the visible schema")]
    UnknownTable {
        catalog: String,
        db: String,
        table: String,
    },

    #[error("column '{table}.{column}' is not present in the visible schema")]
    UnknownColumn { table: String, column: String },
}
