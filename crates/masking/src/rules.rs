// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Masking transforms
//!
//! One function per named rule, each rewriting a single qualified column
//! reference into the `Expr` tree that replaces it in the projection.
//! Mirrors `transpiler.py`'s `_transform_mask` `match` arms one for one;
//! the expression shapes (which builtins, in what order) are copied from
//! there, just rebuilt on `unilake_sql_ir::Expr` instead of `sqlglot.exp`.

use std::collections::BTreeMap;
use unilake_sql_ir::{BinaryOp, Expr, Literal};

type Props = Option<BTreeMap<String, String>>;

fn prop<'a>(props: &'a Props, key: &str) -> Option<&'a str> {
    props.as_ref().and_then(|p| p.get(key)).map(|s| s.as_str())
}

fn prop_int(props: &Props, key: &str) -> i64 {
    prop(props, key).and_then(|s| s.parse().ok()).unwrap_or(0)
}

fn prop_string(props: &Props, key: &str) -> String {
    prop(props, key).unwrap_or_default().to_string()
}

fn length_of(col: &Expr) -> Expr {
    Expr::func("LENGTH", vec![col.clone()])
}

fn char_length_of(expr: Expr) -> Expr {
    Expr::func("CHAR_LENGTH", vec![expr])
}

fn split_part(col: &Expr, sep: &str, index: i64) -> Expr {
    Expr::func(
        "SPLIT_PART",
        vec![col.clone(), Expr::string(sep), Expr::integer(index)],
    )
}

fn repeat(value: Expr, times: Expr) -> Expr {
    Expr::func("REPEAT", vec![value, times])
}

fn sub(left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op: BinaryOp::Sub,
        right: Box::new(right),
    }
}

fn add(left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op: BinaryOp::Add,
        right: Box::new(right),
    }
}

fn mul(left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op: BinaryOp::Mul,
        right: Box::new(right),
    }
}

fn rand() -> Expr {
    Expr::func("RAND", Vec::new())
}

pub fn xxhash3(col: &Expr, _props: &Props) -> Expr {
    Expr::func("XX_HASH3_128", vec![col.clone()])
}

pub fn replace_null(_col: &Expr, _props: &Props) -> Expr {
    Expr::Literal(Literal::Null)
}

pub fn replace_char(col: &Expr, props: &Props) -> Expr {
    let replacement = prop_string(props, "replacement");
    repeat(Expr::string(replacement), length_of(col))
}

pub fn replace_string(_col: &Expr, props: &Props) -> Expr {
    Expr::string(prop_string(props, "replacement"))
}

pub fn mask_except_last(col: &Expr, props: &Props) -> Expr {
    let value = Expr::string(prop_string(props, "value"));
    let len = Expr::integer(prop_int(props, "len"));
    Expr::func(
        "CONCAT",
        vec![
            repeat(value, sub(length_of(col), len.clone())),
            Expr::func("RIGHT", vec![col.clone(), len]),
        ],
    )
}

pub fn mask_except_first(col: &Expr, props: &Props) -> Expr {
    let value = Expr::string(prop_string(props, "value"));
    let len = Expr::integer(prop_int(props, "len"));
    Expr::func(
        "CONCAT",
        vec![
            Expr::func("LEFT", vec![col.clone(), len.clone()]),
            repeat(value, sub(length_of(col), len)),
        ],
    )
}

pub fn rounding(col: &Expr, props: &Props) -> Expr {
    Expr::func("ROUND", vec![col.clone(), Expr::integer(prop_int(props, "value"))])
}

pub fn left(col: &Expr, props: &Props) -> Expr {
    Expr::func("LEFT", vec![col.clone(), Expr::integer(prop_int(props, "len"))])
}

pub fn right(col: &Expr, props: &Props) -> Expr {
    Expr::func("RIGHT", vec![col.clone(), Expr::integer(prop_int(props, "len"))])
}

pub fn mail_mask_username(col: &Expr, _props: &Props) -> Expr {
    let at_pos = Expr::func("LOCATE", vec![Expr::string("@"), col.clone()]);
    Expr::func(
        "CONCAT_WS",
        vec![
            Expr::string("@"),
            repeat(Expr::string("x"), sub(at_pos, Expr::integer(1))),
            split_part(col, "@", 2),
        ],
    )
}

pub fn mail_mask_domain(col: &Expr, _props: &Props) -> Expr {
    let local_domain = split_part(col, "@", 2);
    let tld = split_part(&local_domain, ".", -1);
    let times = sub(char_length_of(local_domain.clone()), char_length_of(tld.clone()));
    let times = sub(times, Expr::integer(1));
    Expr::func(
        "CONCAT_WS",
        vec![
            Expr::string("@"),
            split_part(col, "@", 1),
            Expr::func(
                "CONCAT",
                vec![repeat(Expr::string("x"), times), Expr::string("."), tld],
            ),
        ],
    )
}

pub fn date_year_only(col: &Expr, _props: &Props) -> Expr {
    Expr::func("DATE_TRUNC", vec![Expr::string("YEAR"), col.clone()])
}

pub fn date_month_only(col: &Expr, _props: &Props) -> Expr {
    Expr::func("DATE_TRUNC", vec![Expr::string("MONTH"), col.clone()])
}

pub fn random_number(_col: &Expr, props: &Props) -> Expr {
    let min = Expr::integer(prop_int(props, "min"));
    let max = Expr::integer(prop_int(props, "max"));
    let span = add(sub(max, min.clone()), Expr::integer(1));
    Expr::func("FLOOR", vec![add(mul(span, rand()), min)])
}

pub fn random_multiplication(_col: &Expr, props: &Props) -> Expr {
    let max = Expr::integer(prop_int(props, "max"));
    mul(rand(), max)
}

pub fn ip_anonymize(col: &Expr, _props: &Props) -> Expr {
    Expr::func(
        "CONCAT_WS",
        vec![
            Expr::string("."),
            split_part(col, ".", 1),
            split_part(col, ".", 2),
            Expr::string("0"),
            Expr::string("0"),
        ],
    )
}

pub fn ip_mask_pres(col: &Expr, _props: &Props) -> Expr {
    let octet = |n: i64| repeat(Expr::string("*"), char_length_of(split_part(col, ".", n)));
    Expr::func(
        "CONCAT_WS",
        vec![Expr::string("."), octet(1), octet(2), octet(3), octet(4)],
    )
}

/// Reserved but unimplemented: `mail_hash_pres`, `mail_mask_pres`,
/// `cc_hash_pres`, `cc_mask_pres`, `cc_last_four`, `ip_hash_pres`,
/// `semi_structured`, `custom`, and any name the registry doesn't
/// recognize. Leaves the column unchanged.
pub fn identity(col: &Expr, _props: &Props) -> Expr {
    col.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use unilake_sql_ir::ColumnRef;

    fn col() -> Expr {
        Expr::Column(ColumnRef::new("a").with_table("b"))
    }

    #[test]
    fn xxhash3_wraps_in_function() {
        let out = xxhash3(&col(), &None);
        assert!(matches!(out, Expr::Function { ref name, .. } if name == "XX_HASH3_128"));
    }

    #[test]
    fn replace_null_is_null_literal() {
        assert_eq!(replace_null(&col(), &None), Expr::Literal(Literal::Null));
    }

    #[test]
    fn replace_string_uses_replacement_property() {
        let mut props = BTreeMap::new();
        props.insert("replacement".to_string(), "REDACTED".to_string());
        let out = replace_string(&col(), &Some(props));
        assert_eq!(out, Expr::string("REDACTED"));
    }

    #[test]
    fn identity_is_a_no_op() {
        assert_eq!(identity(&col(), &None), col());
    }

    #[test]
    fn random_number_wraps_in_floor() {
        let out = random_number(&col(), &None);
        assert!(matches!(out, Expr::Function { ref name, .. } if name == "FLOOR"));
    }

    #[test]
    fn random_multiplication_multiplies_rand_by_max() {
        let mut props = BTreeMap::new();
        props.insert("max".to_string(), "100".to_string());
        let out = random_multiplication(&col(), &Some(props));
        assert!(matches!(
            out,
            Expr::BinaryOp { op: BinaryOp::Mul, .. }
        ));
    }
}
