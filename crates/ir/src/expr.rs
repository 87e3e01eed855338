// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expressions
//!
//! Expressions are the building blocks of the rewritten SELECT/WHERE/GROUP BY
//! trees that the masking and filter passes operate over. The shape is
//! deliberately small: every masking transform in the registry is expressible
//! as a composition of [`Expr::Function`], [`Expr::BinaryOp`], [`Expr::Cast`]
//! and [`Literal`] nodes, so the IR doesn't need a node type per SQL builtin.
//!
//! ## Column references
//!
//! [`ColumnRef`] carries the table *alias* a column was qualified by (not a
//! catalog/db path — those live on the owning [`crate::query::TableRef`]).
//! Its [`ColumnRef::quoted`] rendering (`` `alias`.`column` `` style but with
//! double quotes) is what masking rules and filters key on.

use serde::{Deserialize, Serialize};

/// A SQL expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Expr {
    /// Column reference (e.g., `table.column` or just `column`).
    Column(ColumnRef),

    /// Literal value.
    Literal(Literal),

    /// Binary operation (e.g., `a + b`, `x = 5`).
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary operation (e.g., `-x`, `NOT a`).
    UnaryOp { op: UnaryOp, expr: Box<Expr> },

    /// Function call (e.g., `COUNT(*)`, `XX_HASH3_128(col)`).
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },

    /// CASE expression.
    Case {
        conditions: Vec<Expr>,
        results: Vec<Expr>,
        else_result: Option<Box<Expr>>,
    },

    /// CAST expression.
    Cast { expr: Box<Expr>, type_name: String },

    /// Parenthesized expression, kept explicit so the generator can preserve
    /// author-written grouping instead of re-deriving precedence.
    Paren(Box<Expr>),

    /// List of expressions (e.g., for an IN clause).
    List(Vec<Expr>),

    /// Bare `*` in a projection or inside `COUNT(*)`.
    Star,

    /// `table.*` in a projection.
    QualifiedStar(String),

    /// A bound placeholder (`?`) inside a filter expression template, before
    /// substitution with the concrete masked attribute.
    Placeholder,

    /// A free-standing identifier that is not a column reference — used for
    /// named command payloads and for function arguments that name a
    /// keyword rather than a value (e.g. `TRUNC(ts, 'DAY')`'s unit name is a
    /// [`Literal::String`], but a bare `DAY` keyword would be a `Var`).
    Var(String),
}

impl Expr {
    pub fn column(column: impl Into<String>) -> Self {
        Expr::Column(ColumnRef::new(column))
    }

    pub fn qualified_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Column(ColumnRef::new(column).with_table(table))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn integer(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }

    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function {
            name: name.into(),
            args,
            distinct: false,
        }
    }
}

/// Column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Optional table/alias name.
    pub table: Option<String>,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn qualified(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table, self.column),
            None => self.column.clone(),
        }
    }

    /// The double-quoted form masking rules and filters key on, e.g.
    /// `"b"."a"`. Matches the wire format of `Rule::attribute` /
    /// `Filter::attribute` exactly.
    pub fn quoted(&self) -> String {
        match &self.table {
            Some(table) => format!("\"{}\".\"{}\"", table, self.column),
            None => format!("\"{}\"", self.column),
        }
    }
}

/// Literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// A scrubbed literal produced by the secure-output pass. Numeric
    /// literals become a bare `?`; string literals become `Literal::String`
    /// with value `"?"` so the generator still quotes them.
    Placeholder,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    And,
    Or,

    Like,
    NotLike,
    ILike,
    NotILike,

    In,
    NotIn,
    Is,
    IsNot,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum UnaryOp {
    Neg,
    Not,
    Exists,
}
