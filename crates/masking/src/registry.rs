// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Masking registry
//!
//! A closed, name-keyed dispatch table the same shape as the teacher's
//! `FunctionRegistry`: `apply` looks up a rule by its `rule_definition.name`
//! and rewrites the column expression accordingly. Unknown names and the
//! explicitly reserved-but-unimplemented ones (`is_reserved`) both fall
//! through to [`rules::identity`] — the caller never needs to special-case
//! "no transform happened" versus "this name isn't real yet".

use crate::rules;
use std::collections::BTreeMap;
use unilake_sql_ir::Expr;

/// Names accepted by the registry but intentionally left as a no-op —
/// either genuinely unimplemented upstream (`cc_*`, `ip_hash_pres`) or
/// requiring machinery this crate doesn't have (`custom`, `semi_structured`).
const RESERVED_UNIMPLEMENTED: &[&str] = &[
    "mail_hash_pres",
    "mail_mask_pres",
    "cc_hash_pres",
    "cc_mask_pres",
    "cc_last_four",
    "ip_hash_pres",
    "semi_structured",
    "custom",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MaskingRegistry;

impl MaskingRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Whether `name` is recognized but deliberately left unimplemented.
    /// Distinct from "not recognized at all" only for diagnostics — both
    /// cases mask identically.
    pub fn is_reserved(&self, name: &str) -> bool {
        RESERVED_UNIMPLEMENTED.contains(&name)
    }

    /// Rewrite `col` per the named rule. A name neither implemented nor
    /// reserved is logged and treated the same as a reserved one: the
    /// column passes through unchanged.
    pub fn apply(&self, name: &str, col: &Expr, properties: &Option<BTreeMap<String, String>>) -> Expr {
        match name {
            "xxhash3" => rules::xxhash3(col, properties),
            "replace_null" => rules::replace_null(col, properties),
            "replace_char" => rules::replace_char(col, properties),
            "replace_string" => rules::replace_string(col, properties),
            "mask_except_last" => rules::mask_except_last(col, properties),
            "mask_except_first" => rules::mask_except_first(col, properties),
            "rounding" => rules::rounding(col, properties),
            "left" => rules::left(col, properties),
            "right" => rules::right(col, properties),
            "mail_mask_username" => rules::mail_mask_username(col, properties),
            "mail_mask_domain" => rules::mail_mask_domain(col, properties),
            "date_year_only" => rules::date_year_only(col, properties),
            "date_month_only" => rules::date_month_only(col, properties),
            "ip_anonymize" => rules::ip_anonymize(col, properties),
            "ip_mask_pres" => rules::ip_mask_pres(col, properties),
            "random_number" => rules::random_number(col, properties),
            "random_multiplication" => rules::random_multiplication(col, properties),
            name if self.is_reserved(name) => rules::identity(col, properties),
            other => {
                tracing::debug!(rule = other, "unrecognized masking rule name, leaving column unchanged");
                rules::identity(col, properties)
            }
        }
    }
}
