// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement and query representation
//!
//! [`Statement`] is the top-level node every parsed input lowers to. Most
//! statements are a [`Query`] (a SELECT or set operation, optionally wrapped
//! in CTEs); INSERT/UPDATE/DELETE/CREATE/TRUNCATE get their own thin variants
//! since masking needs to reach into an `INSERT ... SELECT`'s or
//! `CREATE ... AS SELECT`'s embedded query, and `target_entity` needs a
//! structured name to read for all five; anything else recognized only well
//! enough to classify (`ALTER`, `DROP`, ...) stays a [`StatementKind`] tag
//! with no further structure; and the `unilake` dialect's `TRANSPILE` /
//! `SCAN TAGS` / `CREATE MASKING RULESET` forms lower to [`Command`],
//! carrying their raw payload unparsed.
//!
//! ## Scopes
//!
//! A *scope* is a contiguous SELECT body: the outermost query, each CTE
//! body, each derived-table subquery in a FROM clause, and each branch of a
//! set operation. [`Query`] and [`TableFactor::Derived`] are exactly the
//! places a new scope begins; `unilake-sql-semantic::scope` walks this tree
//! to assign the dense, stable scope ids the scanner and transpiler both key
//! on.

use crate::dialect::Dialect;
use crate::expr::Expr;
use serde::{Deserialize, Serialize};

/// Coarse classification of a parsed statement, reported on [`crate::scan::ScanOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Describe,
    Truncate,
    Alter,
    Drop,
    Refresh,
    Command,
    Export,
    Set,
    Unknown,
}

/// A parsed top-level statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Query(Box<Query>),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Create(CreateStatement),
    Truncate(TruncateStatement),
    Command(Command),
    /// Recognized only well enough to report a [`StatementKind`]; no deeper
    /// structure is modeled (DESCRIBE/ALTER/DROP/REFRESH/EXPORT/SET).
    /// `raw` keeps the statement's own rendering so the generator can still
    /// pass it through unchanged, since these statements receive no rewrites.
    Other { kind: StatementKind, raw: String },
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Query(_) => StatementKind::Select,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
            Statement::Create(_) => StatementKind::Create,
            Statement::Truncate(_) => StatementKind::Truncate,
            Statement::Command(_) => StatementKind::Command,
            Statement::Other { kind, .. } => *kind,
        }
    }
}

/// `CREATE TABLE`/`CREATE VIEW`. `query` holds the embedded `SELECT` for a
/// `CREATE ... AS SELECT` — a scope the masking/filter/star-expansion passes
/// reach the same way they reach `InsertSource::Query`. A plain `CREATE
/// TABLE (coldefs...)` has no embedded scope, so `query` is `None` and `raw`
/// (the statement's own rendering) is printed verbatim, since there is
/// nothing in it a rewrite pass could touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStatement {
    pub catalog: Option<String>,
    pub db: Option<String>,
    pub table: String,
    pub object: CreateObject,
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub query: Option<Box<Query>>,
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateObject {
    Table,
    View,
}

/// `TRUNCATE TABLE`. No embedded scope — carried structurally only so
/// `target_entity` has a name to read; the generator prints `raw` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruncateStatement {
    pub catalog: Option<String>,
    pub db: Option<String>,
    pub table: String,
    pub raw: String,
}

/// The `unilake` dialect's recognized command forms (`TRANSPILE`,
/// `SCAN TAGS`, `CREATE TAG`, `CREATE MASKING RULESET`). Only the leading
/// keyword and the raw remainder are captured; these statements carry no
/// executable semantics in this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub head: String,
    pub payload: String,
}

/// A SQL query: a SELECT or set operation, optionally preceded by CTEs and
/// followed by ORDER BY / LIMIT / OFFSET.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub body: SetOp,
    pub order_by: Option<Vec<OrderBy>>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub ctes: Vec<CommonTableExpr>,
    pub dialect: Dialect,
}

impl Query {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            body: SetOp::Select(Box::default()),
            order_by: None,
            limit: None,
            offset: None,
            ctes: Vec::new(),
            dialect,
        }
    }

    pub fn with_ctes(mut self, ctes: impl IntoIterator<Item = CommonTableExpr>) -> Self {
        self.ctes = ctes.into_iter().collect();
        self
    }

    pub fn with_limit(mut self, limit: Expr) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: Expr) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_order_by(mut self, order_by: Vec<OrderBy>) -> Self {
        self.order_by = Some(order_by);
        self
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new(Dialect::Generic)
    }
}

/// Set operation (UNION/INTERSECT/EXCEPT) or a bare SELECT. Each branch of a
/// set operation is its own scope; the combinator itself is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SetOp {
    Select(Box<SelectStatement>),
    Union {
        left: Box<Query>,
        right: Box<Query>,
        all: bool,
    },
    Intersect {
        left: Box<Query>,
        right: Box<Query>,
        distinct: bool,
    },
    Except {
        left: Box<Query>,
        right: Box<Query>,
        distinct: bool,
    },
}

/// A single SELECT statement body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub distinct: bool,
    pub projection: Vec<SelectItem>,
    pub from: Vec<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub window: Vec<WindowDef>,
}

impl Default for SelectStatement {
    fn default() -> Self {
        Self {
            distinct: false,
            projection: Vec::new(),
            from: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            window: Vec::new(),
        }
    }
}

/// Item in a SELECT projection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectItem {
    UnnamedExpr(Expr),
    AliasedExpr { expr: Expr, alias: String },
    /// `table.*`
    QualifiedWildcard(String),
    /// `*`
    Wildcard,
}

/// A table source in a FROM clause, plus any joins hanging off it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub factor: TableFactor,
    pub joins: Vec<Join>,
}

impl TableRef {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            factor: TableFactor::Table {
                catalog: None,
                db: None,
                name: name.into(),
                alias: None,
            },
            joins: Vec::new(),
        }
    }

    /// The alias this source is addressed by elsewhere in the scope: the
    /// explicit alias if one was given, otherwise the bare table name.
    pub fn effective_alias(&self) -> &str {
        match &self.factor {
            TableFactor::Table { alias, name, .. } => alias.as_deref().unwrap_or(name),
            TableFactor::Derived { alias, .. } => alias,
        }
    }
}

/// What a [`TableRef`] names: a base table (possibly catalog/db-qualified)
/// or a derived table — a subquery in FROM position, and therefore a scope
/// boundary of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableFactor {
    Table {
        catalog: Option<String>,
        db: Option<String>,
        name: String,
        alias: Option<String>,
    },
    Derived {
        query: Box<Query>,
        alias: String,
    },
}

/// JOIN clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub condition: JoinCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinCondition {
    On(Expr),
    Using(Vec<String>),
    Natural,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub expr: Expr,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A single `WITH name AS (...)` entry. CTEs are scopes in the order they
/// are declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpr {
    pub name: String,
    pub columns: Vec<String>,
    pub query: Box<Query>,
    pub materialized: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDef {
    pub name: Option<String>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderBy>,
    pub window_frame: Option<WindowFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub units: WindowFrameUnits,
    pub start_bound: WindowFrameBound,
    pub end_bound: Option<WindowFrameBound>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowFrameUnits {
    Rows,
    Range,
    Groups,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WindowFrameBound {
    CurrentRow,
    Preceding(Option<Expr>),
    Following(Option<Expr>),
}

/// `INSERT INTO target (cols) <source>`. `source` is itself a scope when it
/// is a `SELECT` rather than a `VALUES` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub catalog: Option<String>,
    pub db: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),
    Query(Box<Query>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub table: TableRef,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub table: TableRef,
    pub where_clause: Option<Expr>,
}
