// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # `unilake-sql-semantic`
//!
//! Scope analyzer (C3) and scan extractor (C4), built on one shared
//! traversal ([`scope::walk_scopes`]/[`scope::walk_scopes_mut`]) so scan
//! numbering and transpile numbering can never drift apart.

pub mod extract;
pub mod scope;

pub use extract::extract;
pub use scope::{walk_scopes, walk_scopes_mut};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use unilake_sql_catalog::SchemaCatalog;
    use unilake_sql_parser::{qualify_query, QualifyOptions};

    #[test]
    fn scopes_and_extraction_agree_on_a_join() {
        let (mut stmt, _) = unilake_sql_parser::parse(
            "SELECT b.a, c.x FROM b JOIN c ON b.id = c.id",
            "generic",
        )
        .unwrap();

        if let unilake_sql_ir::Statement::Query(query) = &mut stmt {
            let opts = QualifyOptions {
                default_catalog: "catalog",
                default_db: "database",
                schema: None,
                validate_qualify_columns: false,
            };
            qualify_query(query, &opts).unwrap();
        }

        let objects = extract(&stmt);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].entities.len(), 2);
        assert_eq!(objects[0].attributes.len(), 2);
        let _ = SchemaCatalog::default();
    }
}
