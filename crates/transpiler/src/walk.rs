// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Shared expression traversal
//!
//! One generic recursive walk reused by the literal scrubber and the
//! masking pass. `visit` runs on every node before its children; returning
//! `false` skips descending into that node's (possibly just-replaced)
//! children — the masking pass needs this so a rule that wraps the matched
//! column inside a new call (`XX_HASH3_128(col)`) doesn't immediately
//! re-match that same embedded column and recurse forever.

use unilake_sql_ir::Expr;

pub fn walk_expr_mut(expr: &mut Expr, visit: &mut dyn FnMut(&mut Expr) -> bool) {
    if !visit(expr) {
        return;
    }
    match expr {
        Expr::BinaryOp { left, right, .. } => {
            walk_expr_mut(left, visit);
            walk_expr_mut(right, visit);
        }
        Expr::UnaryOp { expr, .. } => walk_expr_mut(expr, visit),
        Expr::Function { args, .. } => {
            for arg in args {
                walk_expr_mut(arg, visit);
            }
        }
        Expr::Case { conditions, results, else_result } => {
            for cond in conditions {
                walk_expr_mut(cond, visit);
            }
            for res in results {
                walk_expr_mut(res, visit);
            }
            if let Some(else_result) = else_result {
                walk_expr_mut(else_result, visit);
            }
        }
        Expr::Cast { expr, .. } => walk_expr_mut(expr, visit),
        Expr::Paren(inner) => walk_expr_mut(inner, visit),
        Expr::List(items) => {
            for item in items {
                walk_expr_mut(item, visit);
            }
        }
        Expr::Column(_)
        | Expr::Literal(_)
        | Expr::Star
        | Expr::QualifiedStar(_)
        | Expr::Placeholder
        | Expr::Var(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unilake_sql_ir::Literal;

    #[test]
    fn visits_every_node_in_a_binary_tree() {
        let mut expr = Expr::BinaryOp {
            left: Box::new(Expr::column("a")),
            op: unilake_sql_ir::BinaryOp::Gt,
            right: Box::new(Expr::integer(0)),
        };
        let mut seen = 0;
        walk_expr_mut(&mut expr, &mut |_| {
            seen += 1;
            true
        });
        assert_eq!(seen, 3);
    }

    #[test]
    fn returning_false_skips_the_replacement_subtree() {
        let mut expr = Expr::column("a");
        walk_expr_mut(&mut expr, &mut |e| {
            if matches!(e, Expr::Column(_)) {
                *e = Expr::func("WRAP", vec![e.clone()]);
                false
            } else {
                true
            }
        });
        assert_eq!(expr, Expr::func("WRAP", vec![Expr::column("a")]));
        let _ = Literal::Null;
    }
}
