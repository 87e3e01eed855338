// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error model
//!
//! `scan`/`transpile` never raise: every failure is captured into one of
//! these types and returned on the `error` field of the output. [`ErrorType`]
//! is the wire-level `error_type` tag; [`ParserError`] is what `scan` and the
//! filter-parsing step of `transpile` report; [`ErrorMessage`] is the
//! location-bearing leaf record both of them carry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire-level error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    /// Input SQL, or a filter's `expression`, failed to parse — or
    /// qualification failed under a strict `visible_schema`.
    #[serde(rename = "PARSE_ERROR")]
    ParseError,
    /// Surfaced by the qualifier; folded into `PARSE_ERROR` at the outer
    /// shell, kept as a distinct variant internally for diagnostics.
    #[serde(rename = "OPTIMIZE_ERROR")]
    OptimizeError,
    /// Catch-all for unexpected failures.
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

/// A single location-bearing diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub description: String,
    pub line: u32,
    pub col: u32,
    #[serde(default)]
    pub start_context: Option<String>,
    #[serde(default)]
    pub highlight: Option<String>,
    #[serde(default)]
    pub end_context: Option<String>,
    #[serde(default)]
    pub into_expression: Option<String>,
}

impl ErrorMessage {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            line: 1,
            col: 1,
            start_context: None,
            highlight: None,
            end_context: None,
            into_expression: None,
        }
    }
}

/// The error payload carried on `ScanOutput.error` and, after being folded
/// into `PARSE_ERROR`/`INTERNAL_ERROR`, on `TranspilerOutput.error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{error_type:?}: {message}")]
pub struct ParserError {
    pub error_type: ErrorType,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorMessage>,
}

impl ParserError {
    pub fn parse(message: impl Into<String>, errors: Vec<ErrorMessage>) -> Self {
        Self {
            error_type: ErrorType::ParseError,
            message: message.into(),
            errors,
        }
    }

    pub fn optimize(message: impl Into<String>, errors: Vec<ErrorMessage>) -> Self {
        Self {
            error_type: ErrorType::OptimizeError,
            message: message.into(),
            errors,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::InternalError,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// `OPTIMIZE_ERROR` is reported to callers as `PARSE_ERROR` (spec's
    /// "same wire `error_type`" rule); internal diagnostics keep the finer
    /// distinction until this boundary.
    pub fn into_wire(mut self) -> Self {
        if self.error_type == ErrorType::OptimizeError {
            self.error_type = ErrorType::ParseError;
        }
        self
    }
}
