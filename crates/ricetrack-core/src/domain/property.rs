//! Record properties
//!
//! Each property is a named, typed field with its own reporter-authorization
//! list. Values are tagged with the ledger's wire field names
//! (`stringValue` / `intValue` / `locationValue`).

use crate::identifiers::PublicKey;
use serde::{Deserialize, Serialize};

/// Data type of a property, fixed at record creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyDataType {
    /// Free-form text (e.g. rice variety)
    String,
    /// Signed integer, also used for millisecond timestamps and prices
    Int,
    /// Geographic coordinate pair
    Location,
}

/// A geographic coordinate in millionths of a degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude, -90e6..=90e6
    pub latitude: i64,
    /// Longitude, -180e6..=180e6
    pub longitude: i64,
}

/// A typed property value, tagged with its wire field name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Text value
    #[serde(rename = "stringValue")]
    String(String),
    /// Integer value
    #[serde(rename = "intValue")]
    Int(i64),
    /// Coordinate value
    #[serde(rename = "locationValue")]
    Location(Location),
}

impl PropertyValue {
    /// The data type this value satisfies
    pub fn data_type(&self) -> PropertyDataType {
        match self {
            PropertyValue::String(_) => PropertyDataType::String,
            PropertyValue::Int(_) => PropertyDataType::Int,
            PropertyValue::Location(_) => PropertyDataType::Location,
        }
    }

    /// Integer content, if this is an `Int` value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Text content, if this is a `String` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Coordinate content, if this is a `Location` value
    pub fn as_location(&self) -> Option<Location> {
        match self {
            PropertyValue::Location(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<Location> for PropertyValue {
    fn from(v: Location) -> Self {
        PropertyValue::Location(v)
    }
}

/// A named property on a record snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Property name, unique within the record
    pub name: String,
    /// Declared data type
    pub data_type: PropertyDataType,
    /// Most recently reported value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropertyValue>,
    /// Identities currently authorized to update this property
    #[serde(default)]
    pub reporters: Vec<PublicKey>,
}

impl Property {
    /// True when `key` is authorized to report on this property
    pub fn has_reporter(&self, key: &PublicKey) -> bool {
        self.reporters.contains(key)
    }
}
