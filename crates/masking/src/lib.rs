// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # `unilake-sql-masking`
//!
//! The masking transform library (C6): a closed registry of named
//! column-rewrite rules, applied by `unilake-sql-transpiler` to every
//! projected column whose quoted form matches a `Rule`'s `(scope,
//! attribute)` key.

pub mod registry;
pub mod rules;

pub use registry::MaskingRegistry;
