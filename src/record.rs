//! The flat key/value record submitted by the request form.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single submitted field value.
///
/// Only scalars are accepted: `null`, arrays and nested objects fail to
/// deserialize, which rejects the whole record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => {
                if *n == 0.0 {
                    f.write_str("0")
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    // Integral values print without a decimal point
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

/// Field key to value mapping. Keys must match the template's placeholder
/// names for a full substitution.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DataRecord {
    fields: BTreeMap<String, Scalar>,
}

impl DataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for DataRecord
where
    K: Into<String>,
    V: Into<Scalar>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = DataRecord::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}
