use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// A literal carried by a query: a comparison operand, an inserted or
/// assigned value, or a value read back from a backend.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Date and time without a time zone
    Date(NaiveDateTime),

    /// 64-bit float
    F64(f64),

    /// Signed 64-bit integer
    I64(i64),

    /// Null value
    #[default]
    Null,

    /// String value
    String(String),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Orders two values the way a SQL backend would. Integers and floats
    /// compare numerically; any other mix of variants, or a null on either
    /// side, has no ordering.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        use Value::*;

        match (self, other) {
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Bytes(a), Bytes(b)) => Some(a.cmp(b)),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (F64(a), F64(b)) => a.partial_cmp(b),
            (I64(a), I64(b)) => Some(a.cmp(b)),
            (I64(a), F64(b)) => (*a as f64).partial_cmp(b),
            (F64(a), I64(b)) => a.partial_cmp(&(*b as f64)),
            (String(a), String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used when sorting rows in memory. Nulls sort first, then
    /// values are grouped by variant.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|| self.rank().cmp(&other.rank()))
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::I64(_) | Self::F64(_) => 2,
            Self::String(_) => 3,
            Self::Date(_) => 4,
            Self::Bytes(_) => 5,
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src.into())
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(src: NaiveDateTime) -> Self {
        Self::Date(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Value::String(val) if val == other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Value::I64(val) if val == other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_compare_crosses_variants() {
        assert_eq!(
            Value::I64(2).compare(&Value::F64(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::F64(3.0).compare(&Value::I64(3)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn null_has_no_ordering() {
        assert_eq!(Value::Null.compare(&Value::Null), None);
        assert_eq!(Value::I64(1).compare(&Value::Null), None);
        assert_eq!(Value::Null.sort_cmp(&Value::I64(1)), Ordering::Less);
    }
}
