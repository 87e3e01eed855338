// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # `unilake-sql-parser`
//!
//! Dialect registry (C1) and parser + qualifier (C2). The entry point is
//! [`parse`]: resolve the caller's dialect name, try the `unilake` command
//! recognizer first, then fall through to `sqlparser`, and lower whatever
//! comes back into [`unilake_sql_ir::Statement`]. [`qualify`] is a separate
//! step run only on the `Query` half of a statement — call sites that don't
//! need qualification (a `Command`, a DDL statement) never invoke it.

pub mod dialect;
pub mod error;
pub mod lower;
pub mod qualify;
pub mod unilake;

pub use dialect::{DialectHandle, DialectRegistry};
pub use qualify::{qualify as qualify_query, QualifyOptions};

use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use unilake_sql_ir::{Dialect, Expr, ParserError, Statement};

/// Parse `sql` under the named dialect. Tries the `unilake` command forms
/// first (regardless of the resolved dialect — a `TRANSPILE ...` payload
/// is recognized the same way no matter which dialect name was passed),
/// then delegates to `sqlparser`.
pub fn parse(sql: &str, dialect_name: &str) -> Result<(Statement, Dialect), ParserError> {
    let (ir_dialect, handle) = DialectRegistry::resolve(dialect_name);

    if let Some(command) = unilake::recognize_command(sql) {
        return Ok((Statement::Command(command), ir_dialect));
    }

    let sqlparser_dialect: &dyn sqlparser::dialect::Dialect = match &handle {
        DialectHandle::Delegated(d) => d.as_ref(),
        DialectHandle::Unilake => &sqlparser::dialect::GenericDialect {},
    };

    match Parser::parse_sql(sqlparser_dialect, sql) {
        Ok(mut statements) => {
            if statements.is_empty() {
                return Err(empty_input_error());
            }
            let stmt = statements.remove(0);
            let lowered = lower::lower_statement(&stmt, ir_dialect).map_err(ParserError::from)?;
            Ok((lowered, ir_dialect))
        }
        Err(err) => {
            if let Some(kind) = lower::classify_kind_from_prefix(sql) {
                Ok((Statement::Other { kind, raw: sql.to_string() }, ir_dialect))
            } else {
                Err(error::from_sqlparser_error(err))
            }
        }
    }
}

/// Parse a standalone expression (e.g. a filter's `? > 0` template) under
/// the fixed output dialect, the same way the filter rewriter's generator
/// step does. Always `GenericDialect` — a filter's `expression` is written
/// against OUT_DIALECT, not the source statement's dialect.
pub fn parse_condition(expr_sql: &str) -> Result<Expr, ParserError> {
    let dialect = GenericDialect {};
    let mut parser = Parser::new(&dialect)
        .try_with_sql(expr_sql)
        .map_err(error::from_sqlparser_error)?;
    let expr = parser.parse_expr().map_err(error::from_sqlparser_error)?;
    lower::lower_expr(&expr).map_err(ParserError::from)
}

fn empty_input_error() -> ParserError {
    use unilake_sql_ir::ErrorMessage;
    ParserError::parse("empty input".to_string(), vec![ErrorMessage::new("empty input")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_select() {
        let (stmt, dialect) = parse("SELECT a FROM b", "generic").unwrap();
        assert_eq!(dialect, Dialect::Generic);
        assert!(matches!(stmt, Statement::Query(_)));
    }

    #[test]
    fn recognizes_unilake_command_regardless_of_parse_success() {
        let (stmt, _) = parse("TRANSPILE { }", "unilake").unwrap();
        match stmt {
            Statement::Command(c) => assert_eq!(c.head, "TRANSPILE"),
            _ => panic!("expected Command"),
        }
    }

    #[test]
    fn empty_sql_is_a_parse_error() {
        let result = parse("", "generic");
        assert!(result.is_err());
    }

    #[test]
    fn unrecognized_prefix_after_failed_parse_is_an_error() {
        let result = parse("@!#$ not sql", "generic");
        assert!(result.is_err());
    }

    #[test]
    fn parses_a_filter_condition_with_a_placeholder() {
        let expr = parse_condition("? > 0").unwrap();
        assert!(matches!(
            expr,
            Expr::BinaryOp { op: unilake_sql_ir::BinaryOp::Gt, .. }
        ));
    }

    #[test]
    fn malformed_condition_is_an_error() {
        assert!(parse_condition("? > (").is_err());
    }
}
