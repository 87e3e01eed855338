// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Unilake SQL — Intermediate Representation
//!
//! The data model shared by every other crate in this workspace: the
//! expression/query AST ([`expr`], [`query`]), the scan wire types
//! ([`scan`]), the transpiler wire types ([`transpile`]), the dialect
//! registry's vocabulary ([`dialect`]), and the shared error model
//! ([`error`]).
//!
//! This crate has no parsing or rewriting logic of its own — it only
//! defines the shapes `unilake-sql-parser`, `unilake-sql-semantic`,
//! `unilake-sql-masking` and `unilake-sql-transpiler` operate on, so that
//! the wire format (`serde_json` on these exact types) is defined in one
//! place.

pub mod dialect;
pub mod error;
pub mod expr;
pub mod query;
pub mod scan;
pub mod transpile;

pub use dialect::{Dialect, OUT_DIALECT};
pub use error::{ErrorMessage, ErrorType, ParserError};
pub use expr::{BinaryOp, ColumnRef, Expr, Literal, UnaryOp};
pub use query::{
    Assignment, Command, CommonTableExpr, CreateObject, CreateStatement, DeleteStatement,
    InsertSource, InsertStatement, Join, JoinCondition, JoinType, OrderBy, Query, SelectItem,
    SelectStatement, SetOp, SortDirection, Statement, StatementKind, TableFactor, TableRef,
    TruncateStatement, UpdateStatement, WindowDef, WindowFrame, WindowFrameBound, WindowFrameUnits,
};
pub use scan::{ScanAttribute, ScanEntity, ScanOutput, ScanOutputObject};
pub use transpile::{Filter, FilterDefinition, Rule, RuleDefinition, TranspilerInput, TranspilerOutput, VisibleSchema};
