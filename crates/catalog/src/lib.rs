// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Unilake SQL — Catalog
//!
//! The only schema source this crate supports is the one callers already
//! give `transpile`: a `visible_schema` map, not a live database connection.
//! [`SchemaCatalog`] wraps that map with the two lookups star expansion
//! needs — ordered column listing and column-existence validation.

pub mod error;
pub mod schema;

pub use error::{CatalogError, CatalogResult};
pub use schema::SchemaCatalog;
