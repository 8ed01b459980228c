//! Raw receipt access and the normalized record shape.

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Untrusted receipt object as read from disk.
#[derive(Debug, Clone)]
pub struct RawReceipt {
    fields: Map<String, Value>,
}

impl RawReceipt {
    /// Wrap a parsed JSON value. Anything other than an object is not a receipt.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn value_at(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut cursor = self.fields.get(*first)?;
        for part in rest {
            cursor = cursor.get(*part)?;
        }
        Some(cursor)
    }

    /// String field, ignoring non-string values and empty strings.
    pub fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.value_at(&[key])
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn number_at(&self, path: &[&str]) -> Option<&Number> {
        match self.value_at(path)? {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Scalar rendered as text: strings verbatim, numbers and booleans via
    /// their JSON form, everything else empty.
    pub fn scalar_text(&self, key: &str) -> String {
        match self.value_at(&[key]) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub cid: String,
    pub tx: String,
    pub file: String,
    pub sha256: String,
    pub gw: Option<String>,
    pub ts: String,
    pub ts_min: Option<String>,
    pub ts_max: Option<String>,
    pub count: Option<Number>,
    pub points: Option<Number>,
    pub status: String,
    pub slot: Option<Number>,
    pub source: String,
    pub team: String,
}

impl NormalizedRecord {
    pub fn has_tx(&self) -> bool {
        !self.tx.is_empty()
    }
}
