use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::MetadataError;

/// Portable scalar carried by an export entry.
///
/// Strategy by field type:
/// - strings (`version`, `hostAddress`): `Str`
/// - signed counters (`latencyMs`): `I64`
/// - unsigned counters, ids, ports: `U64`
/// - monotonic timestamps in seconds: `F64`
/// - path attributes (`cellular`, `viaProxy`): `Bool`
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
}

impl ExportValue {
    /// Scalar type name, reported as `found` in mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            ExportValue::Str(_) => "string",
            ExportValue::I64(_) => "i64",
            ExportValue::U64(_) => "u64",
            ExportValue::F64(_) => "f64",
            ExportValue::Bool(_) => "bool",
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            ExportValue::Str(v) => serde_json::Value::String(v.clone()),
            ExportValue::I64(v) => serde_json::Value::from(*v),
            ExportValue::U64(v) => serde_json::Value::from(*v),
            // Non-finite floats have no JSON form and map to null.
            ExportValue::F64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ExportValue::Bool(v) => serde_json::Value::Bool(*v),
        }
    }

    fn json_type_name(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }

    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(ExportValue::Str(s.clone())),
            serde_json::Value::Bool(b) => Some(ExportValue::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Some(ExportValue::U64(u))
                } else if let Some(i) = n.as_i64() {
                    Some(ExportValue::I64(i))
                } else {
                    n.as_f64().map(ExportValue::F64)
                }
            }
            _ => None,
        }
    }
}

impl Serialize for ExportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExportValue::Str(v) => serializer.serialize_str(v),
            ExportValue::I64(v) => serializer.serialize_i64(*v),
            ExportValue::U64(v) => serializer.serialize_u64(*v),
            ExportValue::F64(v) => serializer.serialize_f64(*v),
            ExportValue::Bool(v) => serializer.serialize_bool(*v),
        }
    }
}

/// Flat, ordered key → scalar mapping produced by `StreamMetadata::export`.
///
/// Owns its values, so it is unaffected by whatever happens to the record
/// afterwards. Readers use the typed getters; no parsing needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportMap {
    entries: Vec<(String, ExportValue)>,
}

impl ExportMap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or overwrite `name`. New keys keep insertion order.
    pub fn set(&mut self, name: impl Into<String>, value: ExportValue) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == &name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&ExportValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ExportValue::Str(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(ExportValue::I64(v)) => Some(*v),
            Some(ExportValue::U64(v)) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn get_u64(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(ExportValue::U64(v)) => Some(*v),
            // JSON and most consumers lack an unsigned type. Accept non-negative i64.
            Some(ExportValue::I64(v)) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ExportValue::F64(v)) => Some(*v),
            // An unset timestamp exported to JSON reads back as the integer 0.
            Some(ExportValue::U64(v)) => Some(*v as f64),
            Some(ExportValue::I64(v)) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(ExportValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExportValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Flat JSON object, keys in export order.
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(object)
    }

    /// Parse a flat JSON object of scalars. Nested values and nulls are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, MetadataError> {
        let serde_json::Value::Object(object) = value else {
            return Err(MetadataError::NotAnObject);
        };
        let mut map = Self::with_capacity(object.len());
        for (key, raw) in object {
            let value = ExportValue::from_json(raw).ok_or_else(|| MetadataError::TypeMismatch {
                key: key.clone(),
                expected: "scalar",
                found: ExportValue::json_type_name(raw),
            })?;
            map.set(key.clone(), value);
        }
        Ok(map)
    }

    pub fn from_json_str(s: &str) -> Result<Self, MetadataError> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Self::from_json(&value)
    }
}

impl Serialize for ExportMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
