// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # The `unilake` dialect extension
//!
//! Grounded in `dialects/unilake.py` of the original implementation: a set
//! of reserved words demoted to plain identifiers so they don't collide
//! with ordinary column/table names, plus a small command dispatcher that
//! recognizes three leading keyword sequences and routes them to a
//! [`unilake_sql_ir::Command`] node. Nothing about a command's payload is
//! parsed further — classification only.

use unilake_sql_ir::Command;

/// Reserved words the base grammar would otherwise treat as keywords;
/// the `unilake` dialect demotes all of them to generic identifiers so
/// `MASKING`, `POLICY`, etc. can still be used as ordinary column names
/// outside of a recognized command form.
pub const DEMOTED_KEYWORDS: &[&str] = &[
    "MASKING",
    "RULESET",
    "POLICY",
    "CONDITION",
    "SECURITY",
    "DATASET",
    "ACCESS",
    "USAGE",
    "TRANSPILE",
    "SCAN",
];

/// Recognize one of the three command forms this dialect adds on top of
/// standard SQL: `TRANSPILE ...`, `SCAN TAGS ...`, `CREATE {TAG|MASKING
/// RULESET} ...`. Returns `None` for anything else, so the caller falls
/// through to ordinary statement parsing.
pub fn recognize_command(sql: &str) -> Option<Command> {
    let trimmed = sql.trim_start();
    let upper = trimmed.to_ascii_uppercase();

    if let Some(rest) = strip_keyword(&upper, trimmed, "TRANSPILE") {
        return Some(Command {
            head: "TRANSPILE".to_string(),
            payload: rest.trim().to_string(),
        });
    }

    if upper.starts_with("SCAN") {
        let after_scan = trimmed["SCAN".len()..].trim_start();
        let after_scan_upper = after_scan.to_ascii_uppercase();
        if after_scan_upper.starts_with("TAGS") {
            let payload = after_scan["TAGS".len()..].trim_start();
            return Some(Command {
                head: "SCAN TAGS".to_string(),
                payload: payload.trim().to_string(),
            });
        }
    }

    if upper.starts_with("CREATE") {
        let after_create = trimmed["CREATE".len()..].trim_start();
        let after_create_upper = after_create.to_ascii_uppercase();
        if after_create_upper.starts_with("TAG") {
            return Some(Command {
                head: "CREATE TAG".to_string(),
                payload: after_create["TAG".len()..].trim().to_string(),
            });
        }
        if after_create_upper.starts_with("MASKING") {
            let rest = after_create["MASKING".len()..].trim_start();
            let rest_upper = rest.to_ascii_uppercase();
            if rest_upper.starts_with("RULESET") {
                return Some(Command {
                    head: "CREATE MASKING RULESET".to_string(),
                    payload: rest["RULESET".len()..].trim().to_string(),
                });
            }
        }
    }

    None
}

fn strip_keyword<'a>(upper: &str, original: &'a str, keyword: &str) -> Option<&'a str> {
    if upper.starts_with(keyword) {
        Some(&original[keyword.len()..])
    } else {
        None
    }
}
