use crate::error::{BacnetError, BacnetResult};
use crate::property::PropertyIdentifier;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest usable object instance number (4194303 is the wildcard instance)
pub const MAX_INSTANCE: u32 = 4_194_302;

static OBJECT_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z _-]*?)\s*[:,]\s*(\d+)\s*$").expect("valid object id pattern")
});

/// BACnet object types handled by the driver
///
/// Only object types with a present-value style property (plus the device object
/// itself) are modelled. The discriminant is the standard object type number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ObjectType {
    AnalogInput = 0,
    AnalogOutput = 1,
    AnalogValue = 2,
    BinaryInput = 3,
    BinaryOutput = 4,
    BinaryValue = 5,
    Device = 8,
    MultiStateInput = 13,
    MultiStateOutput = 14,
    MultiStateValue = 19,
    Accumulator = 23,
    PulseConverter = 24,
    CharacterStringValue = 40,
    IntegerValue = 45,
    LargeAnalogValue = 46,
    PositiveIntegerValue = 48,
}

impl ObjectType {
    /// Standard object type number
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Name as written in registry files (e.g. `analogInput`)
    pub fn name(&self) -> &'static str {
        match self {
            ObjectType::AnalogInput => "analogInput",
            ObjectType::AnalogOutput => "analogOutput",
            ObjectType::AnalogValue => "analogValue",
            ObjectType::BinaryInput => "binaryInput",
            ObjectType::BinaryOutput => "binaryOutput",
            ObjectType::BinaryValue => "binaryValue",
            ObjectType::Device => "device",
            ObjectType::MultiStateInput => "multiStateInput",
            ObjectType::MultiStateOutput => "multiStateOutput",
            ObjectType::MultiStateValue => "multiStateValue",
            ObjectType::Accumulator => "accumulator",
            ObjectType::PulseConverter => "pulseConverter",
            ObjectType::CharacterStringValue => "characterstringValue",
            ObjectType::IntegerValue => "integerValue",
            ObjectType::LargeAnalogValue => "largeAnalogValue",
            ObjectType::PositiveIntegerValue => "positiveIntegerValue",
        }
    }

    /// Look up an object type by its standard number
    pub fn from_code(code: u16) -> Option<Self> {
        ALL_OBJECT_TYPES.iter().copied().find(|t| t.code() == code)
    }

    /// Analog family (REAL or Double present value)
    pub fn is_analog(&self) -> bool {
        matches!(
            self,
            ObjectType::AnalogInput
                | ObjectType::AnalogOutput
                | ObjectType::AnalogValue
                | ObjectType::LargeAnalogValue
        )
    }

    /// Binary family (BACnetBinaryPV present value)
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            ObjectType::BinaryInput | ObjectType::BinaryOutput | ObjectType::BinaryValue
        )
    }

    /// Multi-state family (Unsigned state number present value)
    pub fn is_multi_state(&self) -> bool {
        matches!(
            self,
            ObjectType::MultiStateInput | ObjectType::MultiStateOutput | ObjectType::MultiStateValue
        )
    }

    /// Integer-valued objects
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ObjectType::IntegerValue
                | ObjectType::PositiveIntegerValue
                | ObjectType::Accumulator
        )
    }

    /// Objects whose present value is written through a priority array
    pub fn is_commandable(&self) -> bool {
        matches!(
            self,
            ObjectType::AnalogOutput
                | ObjectType::AnalogValue
                | ObjectType::BinaryOutput
                | ObjectType::BinaryValue
                | ObjectType::MultiStateOutput
                | ObjectType::MultiStateValue
                | ObjectType::CharacterStringValue
                | ObjectType::IntegerValue
                | ObjectType::LargeAnalogValue
                | ObjectType::PositiveIntegerValue
        )
    }

    /// Whether objects of this type carry the given property
    pub fn supports(&self, property: PropertyIdentifier) -> bool {
        use PropertyIdentifier::*;

        match property {
            ObjectName | Description | OutOfService | Reliability | EventState => {
                *self != ObjectType::Device || matches!(property, ObjectName | Description)
            }
            PresentValue => *self != ObjectType::Device,
            PriorityArray | RelinquishDefault => self.is_commandable(),
            Units => {
                self.is_analog() || self.is_integer() || *self == ObjectType::PulseConverter
            }
            CovIncrement | MinPresValue | MaxPresValue | HighLimit | LowLimit | Deadband
            | Resolution => {
                self.is_analog()
                    || *self == ObjectType::IntegerValue
                    || *self == ObjectType::PositiveIntegerValue
            }
            NumberOfStates | StateText => self.is_multi_state(),
            ActiveText | InactiveText | Polarity => self.is_binary(),
            VendorName | ModelName | FirmwareRevision | ApplicationSoftwareVersion
            | MaxApduLengthAccepted | SegmentationSupported | ProtocolVersion | SystemStatus => {
                *self == ObjectType::Device
            }
        }
    }
}

const ALL_OBJECT_TYPES: [ObjectType; 16] = [
    ObjectType::AnalogInput,
    ObjectType::AnalogOutput,
    ObjectType::AnalogValue,
    ObjectType::BinaryInput,
    ObjectType::BinaryOutput,
    ObjectType::BinaryValue,
    ObjectType::Device,
    ObjectType::MultiStateInput,
    ObjectType::MultiStateOutput,
    ObjectType::MultiStateValue,
    ObjectType::Accumulator,
    ObjectType::PulseConverter,
    ObjectType::CharacterStringValue,
    ObjectType::IntegerValue,
    ObjectType::LargeAnalogValue,
    ObjectType::PositiveIntegerValue,
];

/// Lowercase a registry name and drop separators so that `analogInput`,
/// `analog-input` and `ANALOG_INPUT` compare equal
pub(crate) fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl FromStr for ObjectType {
    type Err = BacnetError;

    fn from_str(s: &str) -> BacnetResult<Self> {
        let wanted = normalize_name(s);
        ALL_OBJECT_TYPES
            .iter()
            .copied()
            .find(|t| normalize_name(t.name()) == wanted)
            .ok_or_else(|| BacnetError::Configuration(format!("Unsupported object type: {}", s)))
    }
}

impl TryFrom<String> for ObjectType {
    type Error = BacnetError;

    fn try_from(value: String) -> BacnetResult<Self> {
        value.parse()
    }
}

impl From<ObjectType> for String {
    fn from(value: ObjectType) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// BACnet object identifier (object type + instance number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectIdentifier {
    object_type: ObjectType,
    instance: u32,
}

impl ObjectIdentifier {
    /// Create a new object identifier
    ///
    /// # Errors
    /// Returns a configuration error if `instance` exceeds [`MAX_INSTANCE`]
    pub fn new(object_type: ObjectType, instance: u32) -> BacnetResult<Self> {
        if instance > MAX_INSTANCE {
            return Err(BacnetError::Configuration(format!(
                "Instance {} of {} exceeds the maximum instance {}",
                instance, object_type, MAX_INSTANCE
            )));
        }
        Ok(Self {
            object_type,
            instance,
        })
    }

    /// Parse an object identifier from string format
    ///
    /// Supports formats like:
    /// - "analogInput:3000741"
    /// - "analog-input, 12"
    pub fn from_string(s: &str) -> BacnetResult<Self> {
        let caps = OBJECT_ID_PATTERN.captures(s).ok_or_else(|| {
            BacnetError::Configuration(format!("Invalid object identifier format: {}", s))
        })?;
        let object_type: ObjectType = caps[1].parse()?;
        let instance = caps[2].parse::<u32>().map_err(|_| {
            BacnetError::Configuration(format!("Invalid instance number: {}", &caps[2]))
        })?;
        Self::new(object_type, instance)
    }

    /// Get the object type
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Get the instance number
    pub fn instance(&self) -> u32 {
        self.instance
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.instance)
    }
}
