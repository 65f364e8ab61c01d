// ── Host object-model wire types ──
//
// Shapes follow the host's published client typings: camelCase field names
// on the wire, every field defaultable so older host revisions that omit
// fields still decode.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property map attached to an object: property name → value record.
pub type PropertyMap = HashMap<String, PropertyValue>;

/// One entry in a children listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildInfo {
    pub path: String,
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub description: String,
    /// Present only when the listing was requested with property names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Vec<String>>,
}

impl ChildInfo {
    pub fn new(path: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            type_name: type_name.into(),
            description: String::new(),
            property_names: None,
        }
    }
}

/// Full object information: path, type, and property records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    pub path: String,
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// A property value record as reported by the host.
///
/// `value` is the raw JSON value; the host encodes 64-bit integers as
/// `{"high": .., "low": .., "unsigned": ..}` objects. `presentation_value`
/// carries the host's human-readable rendering when it produced one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub is_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
    #[serde(default)]
    pub status: i64,
}

impl PropertyValue {
    /// A plain string property.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Value::String(value.into()),
            ..Self::default()
        }
    }

    /// A plain string property with a distinct presentation value.
    pub fn with_presentation(value: impl Into<String>, presentation: impl Into<String>) -> Self {
        Self {
            value: Value::String(value.into()),
            presentation_value: Some(presentation.into()),
            ..Self::default()
        }
    }

    /// A 64-bit integer property in the host's `{high, low, unsigned}` form.
    pub fn long(low: i64) -> Self {
        Self {
            value: serde_json::json!({ "high": 0, "low": low, "unsigned": false }),
            ..Self::default()
        }
    }

    /// Read the value as an integer.
    ///
    /// Accepts both plain JSON numbers and the host's `{high, low,
    /// unsigned}` encoding; the 64-bit form yields its low word, which is
    /// how status flags are consumed.
    pub fn as_i64(&self) -> Option<i64> {
        match &self.value {
            Value::Number(n) => n.as_i64(),
            Value::Object(map) => map.get("low").and_then(Value::as_i64),
            _ => None,
        }
    }

    /// Read the value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Human-readable rendering: the presentation value when the host
    /// supplied one, otherwise a plain rendering of the raw value.
    pub fn display_text(&self) -> String {
        if let Some(text) = self.presentation_value.as_deref() {
            if !text.is_empty() {
                return text.to_owned();
            }
        }
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}
