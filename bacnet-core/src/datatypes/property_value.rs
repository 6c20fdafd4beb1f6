//! Raw property values as carried on the wire

use serde::{Deserialize, Serialize};
use std::fmt;

/// Container holding a property value sent to or received from a device
///
/// Mirrors the BACnet application tags the driver deals with. The transport proxy
/// reports every read value as one of these and every write carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Null (also used to relinquish a priority slot)
    Null,
    /// Boolean value
    Boolean(bool),
    /// Unsigned integer
    Unsigned(u64),
    /// Signed integer
    Signed(i64),
    /// Single precision float
    Real(f32),
    /// Double precision float
    Double(f64),
    /// Octet string
    OctetString(Vec<u8>),
    /// Character string
    CharacterString(String),
    /// Enumerated value
    Enumerated(u32),
}

/// Application tag of a [`PropertyValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationTag {
    Null = 0,
    Boolean = 1,
    UnsignedInteger = 2,
    SignedInteger = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    Enumerated = 9,
}

impl PropertyValue {
    /// Get the application tag of this value
    pub fn tag(&self) -> ApplicationTag {
        match self {
            PropertyValue::Null => ApplicationTag::Null,
            PropertyValue::Boolean(_) => ApplicationTag::Boolean,
            PropertyValue::Unsigned(_) => ApplicationTag::UnsignedInteger,
            PropertyValue::Signed(_) => ApplicationTag::SignedInteger,
            PropertyValue::Real(_) => ApplicationTag::Real,
            PropertyValue::Double(_) => ApplicationTag::Double,
            PropertyValue::OctetString(_) => ApplicationTag::OctetString,
            PropertyValue::CharacterString(_) => ApplicationTag::CharacterString,
            PropertyValue::Enumerated(_) => ApplicationTag::Enumerated,
        }
    }

    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Unsigned(u) => write!(f, "{}", u),
            PropertyValue::Signed(i) => write!(f, "{}", i),
            PropertyValue::Real(r) => write!(f, "{}", r),
            PropertyValue::Double(d) => write!(f, "{}", d),
            PropertyValue::OctetString(bytes) => write!(f, "octets[{}]", bytes.len()),
            PropertyValue::CharacterString(s) => write!(f, "{:?}", s),
            PropertyValue::Enumerated(e) => write!(f, "enum({})", e),
        }
    }
}

/// Per-property result of a read as reported by the transport proxy
///
/// A read-property-multiple reply can carry a value for one property and an
/// error for the next; both are kept in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyOutcome {
    Value(PropertyValue),
    Error { class: String, code: String },
}

impl PropertyOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, PropertyOutcome::Error { .. })
    }
}

impl From<PropertyValue> for PropertyOutcome {
    fn from(value: PropertyValue) -> Self {
        PropertyOutcome::Value(value)
    }
}
