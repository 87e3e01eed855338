// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Conversion of `sqlparser`'s own error type, and this crate's own lowering
//! failures, into the shared [`unilake_sql_ir::ParserError`] wire type.

use sqlparser::parser::ParserError as SqlParserError;
use unilake_sql_ir::{ErrorMessage, ParserError};

pub fn from_sqlparser_error(err: SqlParserError) -> ParserError {
    let message = err.to_string();
    ParserError::parse(message.clone(), vec![ErrorMessage::new(message)])
}

/// Raised while turning a `sqlparser` AST node into our IR — a construct the
/// front-end parser accepts but this crate does not yet lower (e.g. an
/// exotic join type). Kept distinct from a parse failure since the input
/// SQL itself was syntactically valid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported construct: {0}")]
pub struct LoweringError(pub String);

impl LoweringError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<LoweringError> for ParserError {
    fn from(err: LoweringError) -> Self {
        ParserError::parse(err.0.clone(), vec![ErrorMessage::new(err.0)])
    }
}
