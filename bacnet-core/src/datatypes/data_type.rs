//! Declared point data types and their codec table
//!
//! Every register declares one [`DataType`]. Conversion between wire values
//! ([`PropertyValue`]) and point values ([`PointValue`]) goes through the
//! [`Codec`] that type owns, so there is no runtime inspection of the register
//! beyond picking the table entry.

use crate::datatypes::property_value::{ApplicationTag, PropertyValue};
use crate::error::{BacnetError, BacnetResult};
use crate::object_identifier::{normalize_name, ObjectType};
use crate::property::PropertyIdentifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data type a register is declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Bool,
    Int,
    Float,
    Enum,
    String,
}

/// Decoded value of a point, as reported to the scheduling layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PointValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Enum(u32),
    String(String),
}

impl PointValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PointValue::Int(i) => Some(*i as f64),
            PointValue::Float(f) => Some(*f),
            PointValue::Enum(e) => Some(*e as f64),
            PointValue::Bool(_) | PointValue::String(_) => None,
        }
    }

    /// The data type this value naturally belongs to
    pub fn data_type(&self) -> DataType {
        match self {
            PointValue::Bool(_) => DataType::Bool,
            PointValue::Int(_) => DataType::Int,
            PointValue::Float(_) => DataType::Float,
            PointValue::Enum(_) => DataType::Enum,
            PointValue::String(_) => DataType::String,
        }
    }
}

impl fmt::Display for PointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointValue::Bool(b) => write!(f, "{}", b),
            PointValue::Int(i) => write!(f, "{}", i),
            PointValue::Float(v) => write!(f, "{}", v),
            PointValue::Enum(e) => write!(f, "{}", e),
            PointValue::String(s) => f.write_str(s),
        }
    }
}

/// Conversion functions for one data type
pub struct Codec {
    /// Wire value to point value; a tag the type does not accept is a decode error
    pub decode: fn(&PropertyValue) -> BacnetResult<PointValue>,
    /// Caller-supplied value to a value of this type; incompatible input is a type mismatch
    pub coerce: fn(&PointValue) -> BacnetResult<PointValue>,
    /// Coerced value to the wire value the object/property expects
    pub encode: fn(&PointValue, ObjectType, PropertyIdentifier) -> BacnetResult<PropertyValue>,
}

static BOOL_CODEC: Codec = Codec {
    decode: decode_bool,
    coerce: coerce_bool,
    encode: encode_bool,
};

static INT_CODEC: Codec = Codec {
    decode: decode_int,
    coerce: coerce_int,
    encode: encode_int,
};

static FLOAT_CODEC: Codec = Codec {
    decode: decode_float,
    coerce: coerce_float,
    encode: encode_float,
};

static ENUM_CODEC: Codec = Codec {
    decode: decode_enum,
    coerce: coerce_enum,
    encode: encode_enum,
};

static STRING_CODEC: Codec = Codec {
    decode: decode_string,
    coerce: coerce_string,
    encode: encode_string,
};

impl DataType {
    /// Codec table entry for this data type
    pub fn codec(&self) -> &'static Codec {
        match self {
            DataType::Bool => &BOOL_CODEC,
            DataType::Int => &INT_CODEC,
            DataType::Float => &FLOAT_CODEC,
            DataType::Enum => &ENUM_CODEC,
            DataType::String => &STRING_CODEC,
        }
    }

    /// Decode a wire value
    pub fn decode(&self, raw: &PropertyValue) -> BacnetResult<PointValue> {
        (self.codec().decode)(raw)
    }

    /// Coerce a caller-supplied value into this type
    pub fn coerce(&self, value: &PointValue) -> BacnetResult<PointValue> {
        (self.codec().coerce)(value)
    }

    /// Encode a value of this type for the given object/property
    pub fn encode(
        &self,
        value: &PointValue,
        object_type: ObjectType,
        property: PropertyIdentifier,
    ) -> BacnetResult<PropertyValue> {
        let coerced = self.coerce(value)?;
        (self.codec().encode)(&coerced, object_type, property)
    }

    /// Whether a linear transform may be applied to values of this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    /// Data types valid for an object/property pair; the first entry is the default
    ///
    /// Returns an empty slice when the pair carries no scalar value the driver handles.
    pub fn allowed_for(object_type: ObjectType, property: PropertyIdentifier) -> &'static [DataType] {
        use PropertyIdentifier::*;

        match property {
            PresentValue | RelinquishDefault | PriorityArray => {
                if object_type.is_binary() {
                    &[DataType::Bool, DataType::Enum, DataType::Int]
                } else if object_type.is_multi_state() {
                    &[DataType::Int, DataType::Enum]
                } else if object_type == ObjectType::CharacterStringValue {
                    &[DataType::String]
                } else if object_type.is_integer() {
                    &[DataType::Int, DataType::Float]
                } else if object_type == ObjectType::Device {
                    &[]
                } else {
                    &[DataType::Float, DataType::Int]
                }
            }
            CovIncrement | MinPresValue | MaxPresValue | HighLimit | LowLimit | Deadband
            | Resolution => &[DataType::Float],
            Units | EventState | Reliability | Polarity | SegmentationSupported | SystemStatus => {
                &[DataType::Enum, DataType::Int]
            }
            OutOfService => &[DataType::Bool],
            NumberOfStates | MaxApduLengthAccepted | ProtocolVersion => &[DataType::Int],
            ObjectName | Description | StateText | ActiveText | InactiveText | VendorName
            | ModelName | FirmwareRevision | ApplicationSoftwareVersion => &[DataType::String],
        }
    }

    /// Default data type for an object/property pair
    pub fn default_for(object_type: ObjectType, property: PropertyIdentifier) -> Option<DataType> {
        Self::allowed_for(object_type, property).first().copied()
    }
}

impl FromStr for DataType {
    type Err = BacnetError;

    fn from_str(s: &str) -> BacnetResult<Self> {
        match normalize_name(s).as_str() {
            "bool" | "boolean" => Ok(DataType::Bool),
            "int" | "integer" | "unsigned" | "signed" => Ok(DataType::Int),
            "float" | "real" | "double" => Ok(DataType::Float),
            "enum" | "enumerated" => Ok(DataType::Enum),
            "string" | "str" | "characterstring" => Ok(DataType::String),
            _ => Err(BacnetError::Configuration(format!("Unsupported data type: {}", s))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Enum => "enum",
            DataType::String => "string",
        };
        f.write_str(name)
    }
}

fn unexpected_tag(expected: DataType, raw: &PropertyValue) -> BacnetError {
    BacnetError::Decode(format!("expected {} value, got {:?} ({})", expected, raw.tag(), raw))
}

fn mismatch(expected: DataType, value: &PointValue) -> BacnetError {
    BacnetError::TypeMismatch(format!("{} value {} is not compatible with {}", value.data_type(), value, expected))
}

fn decode_bool(raw: &PropertyValue) -> BacnetResult<PointValue> {
    match raw {
        PropertyValue::Boolean(b) => Ok(PointValue::Bool(*b)),
        PropertyValue::Enumerated(0) => Ok(PointValue::Bool(false)),
        PropertyValue::Enumerated(1) => Ok(PointValue::Bool(true)),
        _ => Err(unexpected_tag(DataType::Bool, raw)),
    }
}

fn decode_int(raw: &PropertyValue) -> BacnetResult<PointValue> {
    match raw {
        PropertyValue::Unsigned(u) => i64::try_from(*u)
            .map(PointValue::Int)
            .map_err(|_| BacnetError::Decode(format!("unsigned value {} overflows int", u))),
        PropertyValue::Signed(i) => Ok(PointValue::Int(*i)),
        PropertyValue::Enumerated(e) => Ok(PointValue::Int(i64::from(*e))),
        _ => Err(unexpected_tag(DataType::Int, raw)),
    }
}

fn decode_float(raw: &PropertyValue) -> BacnetResult<PointValue> {
    match raw {
        PropertyValue::Real(r) => Ok(PointValue::Float(f64::from(*r))),
        PropertyValue::Double(d) => Ok(PointValue::Float(*d)),
        PropertyValue::Unsigned(u) => Ok(PointValue::Float(*u as f64)),
        PropertyValue::Signed(i) => Ok(PointValue::Float(*i as f64)),
        _ => Err(unexpected_tag(DataType::Float, raw)),
    }
}

fn decode_enum(raw: &PropertyValue) -> BacnetResult<PointValue> {
    match raw {
        PropertyValue::Enumerated(e) => Ok(PointValue::Enum(*e)),
        PropertyValue::Unsigned(u) => u32::try_from(*u)
            .map(PointValue::Enum)
            .map_err(|_| BacnetError::Decode(format!("unsigned value {} overflows enum", u))),
        PropertyValue::Boolean(b) => Ok(PointValue::Enum(u32::from(*b))),
        _ => Err(unexpected_tag(DataType::Enum, raw)),
    }
}

fn decode_string(raw: &PropertyValue) -> BacnetResult<PointValue> {
    match raw {
        PropertyValue::CharacterString(s) => Ok(PointValue::String(s.clone())),
        _ => Err(unexpected_tag(DataType::String, raw)),
    }
}

fn coerce_bool(value: &PointValue) -> BacnetResult<PointValue> {
    match value {
        PointValue::Bool(b) => Ok(PointValue::Bool(*b)),
        PointValue::Int(0) | PointValue::Enum(0) => Ok(PointValue::Bool(false)),
        PointValue::Int(1) | PointValue::Enum(1) => Ok(PointValue::Bool(true)),
        _ => Err(mismatch(DataType::Bool, value)),
    }
}

fn coerce_int(value: &PointValue) -> BacnetResult<PointValue> {
    match value {
        PointValue::Int(i) => Ok(PointValue::Int(*i)),
        PointValue::Enum(e) => Ok(PointValue::Int(i64::from(*e))),
        PointValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Ok(PointValue::Int(*f as i64))
        }
        _ => Err(mismatch(DataType::Int, value)),
    }
}

fn coerce_float(value: &PointValue) -> BacnetResult<PointValue> {
    match value {
        PointValue::Float(f) if f.is_finite() => Ok(PointValue::Float(*f)),
        PointValue::Int(i) => Ok(PointValue::Float(*i as f64)),
        _ => Err(mismatch(DataType::Float, value)),
    }
}

fn coerce_enum(value: &PointValue) -> BacnetResult<PointValue> {
    match value {
        PointValue::Enum(e) => Ok(PointValue::Enum(*e)),
        PointValue::Int(i) => u32::try_from(*i)
            .map(PointValue::Enum)
            .map_err(|_| mismatch(DataType::Enum, value)),
        PointValue::Bool(b) => Ok(PointValue::Enum(u32::from(*b))),
        _ => Err(mismatch(DataType::Enum, value)),
    }
}

fn coerce_string(value: &PointValue) -> BacnetResult<PointValue> {
    match value {
        PointValue::String(s) => Ok(PointValue::String(s.clone())),
        _ => Err(mismatch(DataType::String, value)),
    }
}

/// Properties whose value follows the object's present-value encoding
fn follows_present_value(property: PropertyIdentifier) -> bool {
    matches!(
        property,
        PropertyIdentifier::PresentValue
            | PropertyIdentifier::RelinquishDefault
            | PropertyIdentifier::PriorityArray
    )
}

/// Application tag a numeric property is carried in
///
/// Present-value style properties take the tag of the object's present value;
/// limits and increments follow the object family. Returns `None` for properties
/// that carry no number.
fn numeric_wire_tag(object_type: ObjectType, property: PropertyIdentifier) -> Option<ApplicationTag> {
    use PropertyIdentifier::*;

    let tag = match property {
        PresentValue | RelinquishDefault | PriorityArray => match object_type {
            ObjectType::LargeAnalogValue => ApplicationTag::Double,
            ObjectType::IntegerValue => ApplicationTag::SignedInteger,
            ObjectType::PositiveIntegerValue | ObjectType::Accumulator => ApplicationTag::UnsignedInteger,
            t if t.is_binary() => ApplicationTag::Enumerated,
            t if t.is_multi_state() => ApplicationTag::UnsignedInteger,
            t if t.is_analog() || t == ObjectType::PulseConverter => ApplicationTag::Real,
            _ => return None,
        },
        MinPresValue | MaxPresValue | HighLimit | LowLimit => match object_type {
            ObjectType::LargeAnalogValue => ApplicationTag::Double,
            ObjectType::IntegerValue => ApplicationTag::SignedInteger,
            ObjectType::PositiveIntegerValue => ApplicationTag::UnsignedInteger,
            _ => ApplicationTag::Real,
        },
        CovIncrement | Deadband | Resolution => match object_type {
            ObjectType::LargeAnalogValue => ApplicationTag::Double,
            ObjectType::IntegerValue | ObjectType::PositiveIntegerValue => ApplicationTag::UnsignedInteger,
            _ => ApplicationTag::Real,
        },
        Units | EventState | Reliability | Polarity | SegmentationSupported | SystemStatus => {
            ApplicationTag::Enumerated
        }
        NumberOfStates | MaxApduLengthAccepted | ProtocolVersion => ApplicationTag::UnsignedInteger,
        _ => return None,
    };
    Some(tag)
}

fn out_of_range(value: &PointValue, tag: ApplicationTag, object_type: ObjectType, property: PropertyIdentifier) -> BacnetError {
    BacnetError::TypeMismatch(format!(
        "{} does not fit the {:?} encoding of {} {}",
        value, tag, object_type, property
    ))
}

/// Narrow to a REAL; finite values beyond the f32 range cannot be carried
fn to_real(value: f64) -> Option<f32> {
    let narrowed = value as f32;
    narrowed.is_finite().then_some(narrowed)
}

/// Convert to an integer only when no fractional part or range would be lost
fn to_integer(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    (value.is_finite() && value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64)
        .then_some(value as i64)
}

fn encode_number(
    value: &PointValue,
    object_type: ObjectType,
    property: PropertyIdentifier,
) -> BacnetResult<PropertyValue> {
    let tag = numeric_wire_tag(object_type, property).ok_or_else(|| {
        BacnetError::TypeMismatch(format!("{} {} does not carry a number", object_type, property))
    })?;
    let encoded = match (value, tag) {
        (PointValue::Int(i), ApplicationTag::Real) => to_real(*i as f64).map(PropertyValue::Real),
        (PointValue::Float(f), ApplicationTag::Real) => to_real(*f).map(PropertyValue::Real),
        (PointValue::Int(i), ApplicationTag::Double) => Some(PropertyValue::Double(*i as f64)),
        (PointValue::Float(f), ApplicationTag::Double) => Some(PropertyValue::Double(*f)),
        (PointValue::Int(i), ApplicationTag::SignedInteger) => Some(PropertyValue::Signed(*i)),
        (PointValue::Float(f), ApplicationTag::SignedInteger) => to_integer(*f).map(PropertyValue::Signed),
        (PointValue::Int(i), ApplicationTag::UnsignedInteger) => u64::try_from(*i).ok().map(PropertyValue::Unsigned),
        (PointValue::Float(f), ApplicationTag::UnsignedInteger) => to_integer(*f)
            .and_then(|i| u64::try_from(i).ok())
            .map(PropertyValue::Unsigned),
        (PointValue::Int(i), ApplicationTag::Enumerated) => u32::try_from(*i).ok().map(PropertyValue::Enumerated),
        _ => None,
    };
    encoded.ok_or_else(|| out_of_range(value, tag, object_type, property))
}

fn encode_bool(
    value: &PointValue,
    object_type: ObjectType,
    property: PropertyIdentifier,
) -> BacnetResult<PropertyValue> {
    let PointValue::Bool(b) = value else {
        return Err(mismatch(DataType::Bool, value));
    };
    // BACnetBinaryPV is an enumeration (inactive/active)
    if object_type.is_binary() && follows_present_value(property) {
        Ok(PropertyValue::Enumerated(u32::from(*b)))
    } else {
        Ok(PropertyValue::Boolean(*b))
    }
}

fn encode_int(
    value: &PointValue,
    object_type: ObjectType,
    property: PropertyIdentifier,
) -> BacnetResult<PropertyValue> {
    if !matches!(value, PointValue::Int(_)) {
        return Err(mismatch(DataType::Int, value));
    }
    encode_number(value, object_type, property)
}

fn encode_float(
    value: &PointValue,
    object_type: ObjectType,
    property: PropertyIdentifier,
) -> BacnetResult<PropertyValue> {
    if !matches!(value, PointValue::Float(_)) {
        return Err(mismatch(DataType::Float, value));
    }
    encode_number(value, object_type, property)
}

fn encode_enum(
    value: &PointValue,
    object_type: ObjectType,
    property: PropertyIdentifier,
) -> BacnetResult<PropertyValue> {
    let PointValue::Enum(e) = value else {
        return Err(mismatch(DataType::Enum, value));
    };
    // multi-state present values are state numbers, not enumerations
    match numeric_wire_tag(object_type, property) {
        Some(ApplicationTag::UnsignedInteger) => Ok(PropertyValue::Unsigned(u64::from(*e))),
        _ => Ok(PropertyValue::Enumerated(*e)),
    }
}

fn encode_string(
    value: &PointValue,
    _object_type: ObjectType,
    _property: PropertyIdentifier,
) -> BacnetResult<PropertyValue> {
    match value {
        PointValue::String(s) => Ok(PropertyValue::CharacterString(s.clone())),
        _ => Err(mismatch(DataType::String, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_decode_widens_wire_width() {
        let v = DataType::Float.decode(&PropertyValue::Real(72.5)).unwrap();
        assert_eq!(v, PointValue::Float(72.5));
        let v = DataType::Float.decode(&PropertyValue::Unsigned(3)).unwrap();
        assert_eq!(v, PointValue::Float(3.0));
    }

    #[test]
    fn test_bool_decode_from_binary_pv() {
        assert_eq!(
            DataType::Bool.decode(&PropertyValue::Enumerated(1)).unwrap(),
            PointValue::Bool(true)
        );
        assert!(DataType::Bool.decode(&PropertyValue::Enumerated(2)).is_err());
    }

    #[test]
    fn test_decode_tag_mismatch() {
        let err = DataType::Float
            .decode(&PropertyValue::CharacterString("x".into()))
            .unwrap_err();
        assert!(matches!(err, BacnetError::Decode(_)));
        assert!(DataType::String.decode(&PropertyValue::Null).is_err());
        assert!(DataType::Int.decode(&PropertyValue::Unsigned(u64::MAX)).is_err());
    }

    #[test]
    fn test_encode_follows_object_type() {
        let real = DataType::Float
            .encode(&PointValue::Float(72.5), ObjectType::AnalogOutput, PropertyIdentifier::PresentValue)
            .unwrap();
        assert_eq!(real, PropertyValue::Real(72.5));

        let double = DataType::Float
            .encode(&PointValue::Int(2), ObjectType::LargeAnalogValue, PropertyIdentifier::PresentValue)
            .unwrap();
        assert_eq!(double, PropertyValue::Double(2.0));

        let binary = DataType::Bool
            .encode(&PointValue::Bool(true), ObjectType::BinaryOutput, PropertyIdentifier::PresentValue)
            .unwrap();
        assert_eq!(binary, PropertyValue::Enumerated(1));

        let oos = DataType::Bool
            .encode(&PointValue::Bool(true), ObjectType::BinaryOutput, PropertyIdentifier::OutOfService)
            .unwrap();
        assert_eq!(oos, PropertyValue::Boolean(true));

        let signed = DataType::Int
            .encode(&PointValue::Int(-4), ObjectType::IntegerValue, PropertyIdentifier::PresentValue)
            .unwrap();
        assert_eq!(signed, PropertyValue::Signed(-4));
    }

    #[test]
    fn test_encode_rejects_incompatible_values() {
        let err = DataType::Float
            .encode(&PointValue::String("hot".into()), ObjectType::AnalogValue, PropertyIdentifier::PresentValue)
            .unwrap_err();
        assert!(matches!(err, BacnetError::TypeMismatch(_)));

        let err = DataType::Int
            .encode(&PointValue::Int(-1), ObjectType::MultiStateValue, PropertyIdentifier::PresentValue)
            .unwrap_err();
        assert!(matches!(err, BacnetError::TypeMismatch(_)));
    }

    #[test]
    fn test_encode_uses_object_present_value_tag() {
        let pv = PropertyIdentifier::PresentValue;

        // int register on an analog object is still a REAL, negatives included
        assert_eq!(
            DataType::Int.encode(&PointValue::Int(5), ObjectType::AnalogValue, pv).unwrap(),
            PropertyValue::Real(5.0)
        );
        assert_eq!(
            DataType::Int.encode(&PointValue::Int(-5), ObjectType::AnalogValue, pv).unwrap(),
            PropertyValue::Real(-5.0)
        );

        // float register on integer objects takes their integer tag
        assert_eq!(
            DataType::Float.encode(&PointValue::Float(3.0), ObjectType::IntegerValue, pv).unwrap(),
            PropertyValue::Signed(3)
        );
        assert_eq!(
            DataType::Float.encode(&PointValue::Float(-3.0), ObjectType::IntegerValue, pv).unwrap(),
            PropertyValue::Signed(-3)
        );
        assert_eq!(
            DataType::Float.encode(&PointValue::Float(7.0), ObjectType::PositiveIntegerValue, pv).unwrap(),
            PropertyValue::Unsigned(7)
        );
        assert_eq!(
            DataType::Int.encode(&PointValue::Int(9), ObjectType::Accumulator, pv).unwrap(),
            PropertyValue::Unsigned(9)
        );
        assert_eq!(
            DataType::Enum.encode(&PointValue::Enum(2), ObjectType::MultiStateOutput, pv).unwrap(),
            PropertyValue::Unsigned(2)
        );
        assert_eq!(
            DataType::Enum.encode(&PointValue::Enum(1), ObjectType::BinaryValue, pv).unwrap(),
            PropertyValue::Enumerated(1)
        );
        assert_eq!(
            DataType::Enum.encode(&PointValue::Enum(62), ObjectType::AnalogInput, PropertyIdentifier::Units).unwrap(),
            PropertyValue::Enumerated(62)
        );
    }

    #[test]
    fn test_encode_rejects_values_the_tag_cannot_carry() {
        let pv = PropertyIdentifier::PresentValue;
        let rejected = [
            (DataType::Float, PointValue::Float(1e300), ObjectType::AnalogValue),
            (DataType::Float, PointValue::Float(-1e39), ObjectType::AnalogOutput),
            (DataType::Float, PointValue::Float(3.5), ObjectType::IntegerValue),
            (DataType::Float, PointValue::Float(-1.0), ObjectType::PositiveIntegerValue),
            (DataType::Float, PointValue::Float(1e300), ObjectType::IntegerValue),
            (DataType::Int, PointValue::Int(-2), ObjectType::Accumulator),
        ];
        for (data_type, value, object_type) in rejected {
            let err = data_type.encode(&value, object_type, pv).unwrap_err();
            assert!(
                matches!(err, BacnetError::TypeMismatch(_)),
                "{} on {} gave {:?}",
                value,
                object_type,
                err
            );
        }

        // Double carries what REAL cannot
        assert_eq!(
            DataType::Float.encode(&PointValue::Float(1e300), ObjectType::LargeAnalogValue, pv).unwrap(),
            PropertyValue::Double(1e300)
        );
    }

    #[test]
    fn test_allowed_for() {
        assert_eq!(
            DataType::default_for(ObjectType::AnalogInput, PropertyIdentifier::PresentValue),
            Some(DataType::Float)
        );
        assert_eq!(
            DataType::default_for(ObjectType::BinaryValue, PropertyIdentifier::PresentValue),
            Some(DataType::Bool)
        );
        assert_eq!(
            DataType::default_for(ObjectType::AnalogInput, PropertyIdentifier::Units),
            Some(DataType::Enum)
        );
        assert!(DataType::allowed_for(ObjectType::Device, PropertyIdentifier::PresentValue).is_empty());
    }

    #[test]
    fn test_data_type_parse() {
        assert_eq!("REAL".parse::<DataType>().unwrap(), DataType::Float);
        assert_eq!("boolean".parse::<DataType>().unwrap(), DataType::Bool);
        assert!("bitstring".parse::<DataType>().is_err());
    }
}
