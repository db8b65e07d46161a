//! Request params and their wire encodings.
//!
//! `Params` keeps keys in insertion order (`serde_json` is built with
//! `preserve_order`), so every encoding below is deterministic.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Ordered key/value params for a single request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Params from a JSON object. Any other JSON value is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Encode(format!("params must be a JSON object, got {other}"))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// `key=value&...` with form-encoding rules, in insertion order.
///
/// Arrays and objects have no flat representation and are rejected.
pub fn encode_query(params: &Params) -> Result<String> {
    let pairs = params
        .iter()
        .map(|(key, value)| flat_value(key, value).map(|value| (key, value)))
        .collect::<Result<Vec<_>>>()?;
    serde_urlencoded::to_string(&pairs).map_err(|e| Error::Encode(e.to_string()))
}

/// Form bodies share the query-string encoding.
pub fn encode_form(params: &Params) -> Result<String> {
    encode_query(params)
}

pub fn encode_json(params: &Params) -> Result<String> {
    serde_json::to_string(params).map_err(|e| Error::Encode(e.to_string()))
}

/// Inverse of `encode_query`. Every value comes back as a string.
pub fn decode_query(query: &str) -> Result<Vec<(String, String)>> {
    serde_urlencoded::from_str(query).map_err(|e| Error::Encode(e.to_string()))
}

fn flat_value(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(Error::Encode(format!(
            "`{key}` is nested; nested params are only valid in JSON bodies"
        ))),
    }
}
