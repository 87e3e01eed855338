// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Visible schema lookup
//!
//! Wraps the caller-supplied `catalog -> db -> table -> column -> type`
//! map (`unilake_sql_ir::VisibleSchema`) with the lookups the star-expansion
//! pass needs: resolve a table's column list (in schema-declared order, for
//! `*` expansion) and validate a single column's existence (for strict
//! qualification). There is no live introspection here — the caller is the
//! sole source of truth, matching this crate's predecessor's `StaticCatalog`
//! in spirit but with no connection, no cache, and no async surface.

use crate::error::{CatalogError, CatalogResult};
use indexmap::IndexMap;
use unilake_sql_ir::VisibleSchema;

/// Read-only view over a `visible_schema` payload.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schema: VisibleSchema,
}

impl SchemaCatalog {
    pub fn new(schema: VisibleSchema) -> Self {
        Self { schema }
    }

    fn table_columns(
        &self,
        catalog: &str,
        db: &str,
        table: &str,
    ) -> CatalogResult<&IndexMap<String, String>> {
        self.schema
            .get(catalog)
            .and_then(|dbs| dbs.get(db))
            .and_then(|tables| tables.get(table))
            .ok_or_else(|| CatalogError::UnknownTable {
                catalog: catalog.to_string(),
                db: db.to_string(),
                table: table.to_string(),
            })
    }

    /// Columns of `table`, in the order the schema map declares them —
    /// the order `*` expands into.
    pub fn columns_of(
        &self,
        catalog: &str,
        db: &str,
        table: &str,
    ) -> CatalogResult<Vec<(String, String)>> {
        let cols = self.table_columns(catalog, db, table)?;
        Ok(cols.iter().map(|(c, t)| (c.clone(), t.clone())).collect())
    }

    /// Whether `table.column` exists in the visible schema.
    pub fn has_column(&self, catalog: &str, db: &str, table: &str, column: &str) -> bool {
        self.table_columns(catalog, db, table)
            .map(|cols| cols.contains_key(column))
            .unwrap_or(false)
    }

    /// Validate a single column reference, for strict qualification.
    pub fn validate_column(
        &self,
        catalog: &str,
        db: &str,
        table: &str,
        column: &str,
    ) -> CatalogResult<()> {
        let cols = self.table_columns(catalog, db, table)?;
        if cols.contains_key(column) {
            Ok(())
        } else {
            Err(CatalogError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            })
        }
    }

    /// Whether the schema mentions this table at all — used to decide
    /// whether an unmatched reference should be skipped (rather than
    /// erroring) during star expansion.
    pub fn knows_table(&self, catalog: &str, db: &str, table: &str) -> bool {
        self.table_columns(catalog, db, table).is_ok()
    }
}
