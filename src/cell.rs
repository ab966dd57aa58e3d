//! Typed cell values produced by column accessors.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A value extracted from one record for one column.
///
/// Ordering across variants: empty first, then booleans, then numbers, then
/// text. Integers and floats compare numerically with each other.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Text(_) => 3,
        }
    }

    /// Total order used by sorting.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64).total_cmp(b),
            (CellValue::Float(a), CellValue::Int(b)) => a.total_cmp(&(*b as f64)),
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(true) => write!(f, "Yes"),
            CellValue::Bool(false) => write!(f, "No"),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_across_variants() {
        assert_eq!(CellValue::Int(2).compare(&CellValue::Float(2.5)), Ordering::Less);
        assert_eq!(CellValue::Float(3.0).compare(&CellValue::Int(3)), Ordering::Equal);
    }

    #[test]
    fn text_ignores_case_before_breaking_ties() {
        let lower = CellValue::from("alpha");
        let upper = CellValue::from("Beta");
        assert_eq!(lower.compare(&upper), Ordering::Less);
        assert_eq!(
            CellValue::from("A").compare(&CellValue::from("a")),
            Ordering::Less
        );
    }

    #[test]
    fn empty_sorts_before_everything() {
        assert_eq!(CellValue::Empty.compare(&CellValue::Bool(false)), Ordering::Less);
        assert_eq!(CellValue::from("x").compare(&CellValue::Empty), Ordering::Greater);
    }

    #[test]
    fn option_none_becomes_empty() {
        let missing: Option<&str> = None;
        assert!(CellValue::from(missing).is_empty());
        assert_eq!(CellValue::from(Some(7_i64)).to_string(), "7");
    }
}
