//! Filter expressions of the form `[?@.<prop> <op> <literal>]`.
//!
//! A filter body is parsed once, when the enclosing bracket group is lexed,
//! into a typed [`FilterExpr`]. Evaluation never re-parses query text.

use core::fmt;

use serde_json::Value;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CmpOp {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmpOp::Eq => f.write_str("=="),
            CmpOp::Ne => f.write_str("!="),
            CmpOp::Ge => f.write_str(">="),
            CmpOp::Gt => f.write_str(">"),
            CmpOp::Le => f.write_str("<="),
            CmpOp::Lt => f.write_str("<"),
        }
    }
}

/// A single-condition comparison against a property of the current element.
///
/// The literal is kept as written (quotes included); quote stripping happens
/// during equality checks so `[?@.name == 'rust']` and `[?@.name == rust]`
/// select the same elements.
#[derive(Debug, PartialEq, Clone)]
pub enum FilterExpr {
    Comparison {
        prop: String,
        op: CmpOp,
        literal: String,
    },
}

// Two-character operators first so `>=` wins over `>` at the same offset.
const OPERATORS: [(&str, CmpOp); 7] = [
    (">=", CmpOp::Ge),
    ("<=", CmpOp::Le),
    ("==", CmpOp::Eq),
    ("!=", CmpOp::Ne),
    (">", CmpOp::Gt),
    ("<", CmpOp::Lt),
    ("=", CmpOp::Eq),
];

impl FilterExpr {
    /// Parse a bracket body like `?@.price > 10` or `? @.name == 'rust'`.
    ///
    /// Returns `None` for anything that does not fit the
    /// `@.<prop> <op> <literal>` shape.
    pub fn parse(body: &str) -> Option<Self> {
        let rest = body.trim().strip_prefix('?')?.trim_start();
        let rest = rest.strip_prefix('@')?.strip_prefix('.')?;

        let mut found: Option<(usize, &str, CmpOp)> = None;
        for (text, op) in OPERATORS {
            if let Some(pos) = rest.find(text) {
                match found {
                    Some((best, _, _)) if best <= pos => {}
                    _ => found = Some((pos, text, op)),
                }
            }
        }

        let (pos, text, op) = found?;
        let prop = rest[..pos].trim();
        let literal = rest[pos + text.len()..].trim();

        if prop.is_empty() || literal.is_empty() || !prop.chars().all(is_prop_char) {
            return None;
        }

        Some(FilterExpr::Comparison {
            prop: prop.to_string(),
            op,
            literal: literal.to_string(),
        })
    }

    /// True when `element` satisfies the comparison. Elements that are not
    /// objects, or that lack the property, are excluded rather than errors.
    pub fn selects(&self, element: &Value) -> bool {
        let FilterExpr::Comparison { prop, op, literal } = self;
        let value = match element.get(prop) {
            Some(value) => value,
            None => return false,
        };

        match op {
            CmpOp::Eq => eq(value, literal),
            CmpOp::Ne => !eq(value, literal),
            CmpOp::Gt => cmp_numbers(value, literal, |l, r| l > r),
            CmpOp::Lt => cmp_numbers(value, literal, |l, r| l < r),
            CmpOp::Ge => cmp_numbers(value, literal, |l, r| l >= r),
            CmpOp::Le => cmp_numbers(value, literal, |l, r| l <= r),
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let FilterExpr::Comparison { prop, op, literal } = self;
        write!(f, "@.{} {} {}", prop, op, literal)
    }
}

fn is_prop_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Scalars compare by their display text, quotes stripped from the literal.
/// Arrays and objects never compare equal to anything.
fn eq(value: &Value, literal: &str) -> bool {
    let text = match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => return false,
    };
    text == unquote(literal)
}

fn unquote(literal: &str) -> &str {
    let bytes = literal.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &literal[1..literal.len() - 1]
    } else {
        literal
    }
}

/// Ordering comparisons coerce both sides to numbers; a side that cannot be
/// coerced makes the comparison fail.
fn cmp_numbers(value: &Value, literal: &str, cmp: fn(f64, f64) -> bool) -> bool {
    match (coerce_number(value), literal.trim().parse::<f64>().ok()) {
        (Some(left), Some(right)) => cmp(left, right),
        _ => false,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Bool(true) => Some(1.0),
        Value::Bool(false) => Some(0.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_numeric_comparison() {
        assert_eq!(
            FilterExpr::parse("?@.price > 10"),
            Some(FilterExpr::Comparison {
                prop: String::from("price"),
                op: CmpOp::Gt,
                literal: String::from("10"),
            })
        );
    }

    #[test]
    fn parse_two_char_operator_wins() {
        assert_eq!(
            FilterExpr::parse("?@.price >= 10.5"),
            Some(FilterExpr::Comparison {
                prop: String::from("price"),
                op: CmpOp::Ge,
                literal: String::from("10.5"),
            })
        );
    }

    #[test]
    fn parse_single_equals() {
        assert_eq!(
            FilterExpr::parse("? @.name = 'rust'"),
            Some(FilterExpr::Comparison {
                prop: String::from("name"),
                op: CmpOp::Eq,
                literal: String::from("'rust'"),
            })
        );
    }

    #[test]
    fn parse_rejects_missing_current_node() {
        assert_eq!(FilterExpr::parse("?price > 10"), None);
    }

    #[test]
    fn parse_rejects_missing_literal() {
        assert_eq!(FilterExpr::parse("?@.price >"), None);
    }

    #[test]
    fn parse_rejects_missing_operator() {
        assert_eq!(FilterExpr::parse("?@.price"), None);
    }

    #[test]
    fn selects_by_number() {
        let expr = FilterExpr::parse("?@.price > 10").unwrap();
        assert!(expr.selects(&json!({"price": 12})));
        assert!(!expr.selects(&json!({"price": 10})));
        assert!(!expr.selects(&json!({"price": "cheap"})));
    }

    #[test]
    fn selects_coerces_strings_and_bools() {
        let expr = FilterExpr::parse("?@.qty >= 1").unwrap();
        assert!(expr.selects(&json!({"qty": "3"})));
        assert!(expr.selects(&json!({"qty": true})));
        assert!(!expr.selects(&json!({"qty": false})));
        assert!(!expr.selects(&json!({"qty": null})));
    }

    #[test]
    fn selects_by_string_equality() {
        let expr = FilterExpr::parse("?@.name == 'rust'").unwrap();
        assert!(expr.selects(&json!({"name": "rust"})));
        assert!(!expr.selects(&json!({"name": "go"})));
    }

    #[test]
    fn equality_renders_scalars() {
        let expr = FilterExpr::parse("?@.count == 3").unwrap();
        assert!(expr.selects(&json!({"count": 3})));

        let expr = FilterExpr::parse("?@.flag == true").unwrap();
        assert!(expr.selects(&json!({"flag": true})));
    }

    #[test]
    fn containers_never_compare_equal() {
        let expr = FilterExpr::parse("?@.tags == 'rust'").unwrap();
        assert!(!expr.selects(&json!({"tags": ["rust"]})));
    }

    #[test]
    fn absent_property_is_excluded() {
        let expr = FilterExpr::parse("?@.price != 10").unwrap();
        assert!(!expr.selects(&json!({"cost": 10})));
        assert!(!expr.selects(&json!(42)));
    }
}
