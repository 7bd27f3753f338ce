use serde::{Deserialize, Serialize};

/// Header names expected in an incoming snapshot file
pub const COLUMN_FIELD1: &str = "Field1";
pub const COLUMN_FIELD2: &str = "Field2";
pub const COLUMN_FIELD3: &str = "Field3";
pub const COLUMN_FIELD4: &str = "Field4";
pub const COLUMN_FIELD5: &str = "Field5";

/// Payload columns, in storage order
pub const PAYLOAD_COLUMNS: [&str; 3] = [COLUMN_FIELD3, COLUMN_FIELD4, COLUMN_FIELD5];

/// Composite natural key of a record
///
/// Ordering is `field1` first, then `field2`, which gives reconciled output a
/// stable order inside each status group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub field1: i64,
    pub field2: String,
}

impl RecordKey {
    pub fn new(field1: i64, field2: impl Into<String>) -> Self {
        Self {
            field1,
            field2: field2.into(),
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {:?})", self.field1, self.field2)
    }
}

/// A raw payload cell as it was read, before integer coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Classify a raw text cell
    ///
    /// Returns `None` for an empty (or whitespace-only) cell, which is the
    /// explicit absent value.
    pub fn parse(raw: &str) -> Option<Value> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Some(Value::Int(i));
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Some(Value::Float(f));
        }
        Some(Value::Text(trimmed.to_string()))
    }

    /// Coerce to an integer
    ///
    /// Floats are accepted only when they are whole and within `i64` range;
    /// text is accepted only when it parses as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64
                {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            Value::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Payload attributes of a record; each may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub field3: Option<Value>,
    pub field4: Option<Value>,
    pub field5: Option<Value>,
}

impl Payload {
    /// Build a fully-populated integer payload
    pub fn ints(field3: i64, field4: i64, field5: i64) -> Self {
        Self {
            field3: Some(Value::Int(field3)),
            field4: Some(Value::Int(field4)),
            field5: Some(Value::Int(field5)),
        }
    }

    /// Cells paired with their column names, in storage order
    pub fn cells(&self) -> [(&'static str, Option<&Value>); 3] {
        [
            (COLUMN_FIELD3, self.field3.as_ref()),
            (COLUMN_FIELD4, self.field4.as_ref()),
            (COLUMN_FIELD5, self.field5.as_ref()),
        ]
    }
}

/// One row of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: RecordKey,
    pub payload: Payload,
}

impl Record {
    pub fn new(key: RecordKey, payload: Payload) -> Self {
        Self { key, payload }
    }

    /// Shorthand for a record whose payload cells are all integers
    pub fn ints(field1: i64, field2: &str, field3: i64, field4: i64, field5: i64) -> Self {
        Self::new(
            RecordKey::new(field1, field2),
            Payload::ints(field3, field4, field5),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_parse_classifies_cells() {
        assert_eq!(Value::parse(""), None);
        assert_eq!(Value::parse("   "), None);
        assert_eq!(Value::parse("42"), Some(Value::Int(42)));
        assert_eq!(Value::parse(" -7 "), Some(Value::Int(-7)));
        assert_eq!(Value::parse("10.0"), Some(Value::Float(10.0)));
        assert_eq!(Value::parse("abc"), Some(Value::Text("abc".to_string())));
    }

    #[test]
    fn test_value_as_i64() {
        assert_eq!(Value::Int(3).as_i64(), Some(3));
        assert_eq!(Value::Float(10.0).as_i64(), Some(10));
        assert_eq!(Value::Float(10.5).as_i64(), None);
        assert_eq!(Value::Float(f64::NAN).as_i64(), None);
        assert_eq!(Value::Text("12".to_string()).as_i64(), Some(12));
        assert_eq!(Value::Text("twelve".to_string()).as_i64(), None);
    }

    #[test]
    fn test_key_ordering_and_display() {
        let a = RecordKey::new(1, "b");
        let b = RecordKey::new(2, "a");
        let c = RecordKey::new(1, "c");
        assert!(a < b);
        assert!(a < c);
        assert_eq!(a.to_string(), "(1, \"b\")");
    }
}
