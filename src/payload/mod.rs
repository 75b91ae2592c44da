//! Turns raw form strings into the typed feature payload sent to the backend.

use crate::form::FormData;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A single normalized form value: numeric when the raw string looks like a
/// number, otherwise the trimmed string verbatim (empty string included).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Integral values go out as JSON integers so the backend sees
            // 2020, not 2020.0.
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                serializer.serialize_i64(*n as i64)
            }
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric pattern is valid"))
}

/// Trims the raw string and coerces it to a number when it matches the
/// integer-or-decimal pattern and converts to a finite value. Anything else,
/// including the empty string, is kept as text.
pub fn normalize(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    if numeric_pattern().is_match(trimmed) {
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return FieldValue::Number(n);
            }
        }
    }
    FieldValue::Text(trimmed.to_string())
}

/// The normalized field mapping for one submission. Serialized wrapped under
/// a `features` key, which is the one request shape this client speaks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeaturePayload {
    fields: BTreeMap<String, FieldValue>,
}

impl FeaturePayload {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FeaturePayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Builds the payload for one submission. Every submitted field is mapped;
/// empty fields are kept rather than dropped so the backend sees the full
/// column set.
pub fn build_payload(form: &FormData) -> FeaturePayload {
    let mut fields = BTreeMap::new();
    for (name, raw) in form.entries() {
        fields.insert(name.to_string(), normalize(raw));
    }
    FeaturePayload { fields }
}
