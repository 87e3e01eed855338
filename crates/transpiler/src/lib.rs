// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL transpiler
//!
//! Takes a previously-parsed [`Statement`] (round-tripped through JSON as
//! `TranspilerInput.query`) and rewrites it in place: scrub literals, expand
//! `*` against a caller-supplied schema, apply masking rules, AND-append row
//! filters, then print the result under the fixed output dialect. Every
//! failure is captured into `TranspilerOutput.error` rather than propagated —
//! callers get a result object back, never a panic or a bubbled `Result`.

mod filter;
mod generator;
mod mask;
mod scrub;
mod star_expand;
mod walk;

use unilake_sql_catalog::SchemaCatalog;
use unilake_sql_ir::{ErrorMessage, ParserError, Statement, TranspilerInput, TranspilerOutput};

pub fn transpile(input: TranspilerInput, secure_output: bool) -> TranspilerOutput {
    match try_transpile(input, secure_output) {
        Ok(sql) => TranspilerOutput::ok(sql),
        Err(error) => TranspilerOutput::failed(error),
    }
}

fn try_transpile(input: TranspilerInput, secure_output: bool) -> Result<String, ParserError> {
    let query_ir = input.query_ir.ok_or_else(missing_input)?;
    if query_ir.is_null() {
        return Err(missing_input());
    }
    let mut stmt: Statement = serde_json::from_value(query_ir).map_err(|e| invalid_input(e.to_string()))?;

    if secure_output {
        scrub::scrub_literals(&mut stmt);
    }

    if let Some(visible_schema) = input.visible_schema {
        let schema = SchemaCatalog::new(visible_schema);
        star_expand::expand_stars(&mut stmt, &schema)?;
    }

    mask::apply_masks(&mut stmt, &input.rules);
    filter::apply_filters(&mut stmt, &input.filters)?;

    Ok(generator::generate(&stmt))
}

fn missing_input() -> ParserError {
    ParserError::parse("Missing input", vec![ErrorMessage::new("no query was supplied to transpile")])
}

fn invalid_input(detail: impl Into<String>) -> ParserError {
    let detail = detail.into();
    ParserError::parse("Invalid input", vec![ErrorMessage::new(detail)])
}
