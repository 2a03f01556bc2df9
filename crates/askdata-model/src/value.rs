use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A single dataset cell.
///
/// Serialized untagged so JSON output reads naturally: numbers, strings, booleans and `null`
/// for missing cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing / empty cell.
    Blank,
    Boolean(bool),
    Number(OrderedFloat<f64>),
    Text(Arc<str>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Blank
    }
}

impl Value {
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Blank)
    }

    /// Numeric reading of the cell. Booleans count as `1` and `0`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.0),
            Value::Boolean(b) => Some(f64::from(u8::from(*b))),
            _ => None,
        }
    }

    /// Lowercase text form used when looking for this value inside free text.
    ///
    /// Returns `None` for missing cells and for whitespace-only text, which would otherwise match
    /// every question.
    pub fn match_text(&self) -> Option<String> {
        match self {
            Value::Blank => None,
            Value::Text(s) if s.trim().is_empty() => None,
            other => Some(other.to_string().to_lowercase()),
        }
    }

    /// Ascending order used by numeric sorts: numbers first, then every other value.
    ///
    /// Non-numeric values compare equal to each other so a stable sort leaves them in input order.
    pub fn cmp_for_sort(&self, other: &Value) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Blank => Ok(()),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => fmt_number(n.0, f),
            Value::Text(s) => f.write_str(s),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Integral values print without a trailing `.0` (CSV integers are stored as f64).
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(OrderedFloat(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(OrderedFloat(value as f64))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(OrderedFloat(value as f64))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<Option<f64>> for Value {
    fn from(value: Option<f64>) -> Self {
        value.map(Value::from).unwrap_or(Value::Blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(Value::from(30.0).to_string(), "30");
        assert_eq!(Value::from(-2.0).to_string(), "-2");
        assert_eq!(Value::from(20.5).to_string(), "20.5");
        assert_eq!(Value::Blank.to_string(), "");
    }

    #[test]
    fn match_text_lowercases_and_skips_missing() {
        assert_eq!(Value::from("LinkedIn").match_text().as_deref(), Some("linkedin"));
        assert_eq!(Value::from(true).match_text().as_deref(), Some("true"));
        assert_eq!(Value::from("   ").match_text(), None);
        assert_eq!(Value::Blank.match_text(), None);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::from(1.5),
            Value::from("east"),
            Value::from(false),
            Value::Blank,
        ])
        .unwrap();
        assert_eq!(json, r#"[1.5,"east",false,null]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back,
            vec![
                Value::from(1.5),
                Value::from("east"),
                Value::from(false),
                Value::Blank
            ]
        );
    }

    #[test]
    fn non_numbers_sort_after_numbers() {
        assert_eq!(Value::from(1.0).cmp_for_sort(&Value::from(2.0)), Ordering::Less);
        assert_eq!(Value::from("a").cmp_for_sort(&Value::from(2.0)), Ordering::Greater);
        assert_eq!(Value::Blank.cmp_for_sort(&Value::from(-5.0)), Ordering::Greater);
        assert_eq!(Value::from("a").cmp_for_sort(&Value::Blank), Ordering::Equal);
        assert_eq!(Value::from(true).cmp_for_sort(&Value::from(0.5)), Ordering::Greater);
    }

    #[test]
    fn booleans_read_as_zero_or_one() {
        assert_eq!(Value::from(true).as_number(), Some(1.0));
        assert_eq!(Value::from(false).as_number(), Some(0.0));
        assert_eq!(Value::from("1").as_number(), None);
        assert_eq!(Value::Blank.as_number(), None);
    }
}
