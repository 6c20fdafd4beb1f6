//! BACnet property identifiers

use crate::error::{BacnetError, BacnetResult};
use crate::object_identifier::normalize_name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Property identifiers the driver can address
///
/// The discriminant is the standard property identifier number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PropertyIdentifier {
    ActiveText = 4,
    ApplicationSoftwareVersion = 12,
    CovIncrement = 22,
    Deadband = 25,
    Description = 28,
    EventState = 36,
    FirmwareRevision = 44,
    HighLimit = 45,
    InactiveText = 46,
    LowLimit = 59,
    MaxApduLengthAccepted = 62,
    MaxPresValue = 65,
    MinPresValue = 69,
    ModelName = 70,
    NumberOfStates = 74,
    ObjectName = 77,
    OutOfService = 81,
    Polarity = 84,
    PresentValue = 85,
    PriorityArray = 87,
    ProtocolVersion = 98,
    Reliability = 103,
    RelinquishDefault = 104,
    Resolution = 106,
    SegmentationSupported = 107,
    StateText = 110,
    SystemStatus = 112,
    Units = 117,
    VendorName = 121,
}

const ALL_PROPERTIES: [PropertyIdentifier; 29] = [
    PropertyIdentifier::ActiveText,
    PropertyIdentifier::ApplicationSoftwareVersion,
    PropertyIdentifier::CovIncrement,
    PropertyIdentifier::Deadband,
    PropertyIdentifier::Description,
    PropertyIdentifier::EventState,
    PropertyIdentifier::FirmwareRevision,
    PropertyIdentifier::HighLimit,
    PropertyIdentifier::InactiveText,
    PropertyIdentifier::LowLimit,
    PropertyIdentifier::MaxApduLengthAccepted,
    PropertyIdentifier::MaxPresValue,
    PropertyIdentifier::MinPresValue,
    PropertyIdentifier::ModelName,
    PropertyIdentifier::NumberOfStates,
    PropertyIdentifier::ObjectName,
    PropertyIdentifier::OutOfService,
    PropertyIdentifier::Polarity,
    PropertyIdentifier::PresentValue,
    PropertyIdentifier::PriorityArray,
    PropertyIdentifier::ProtocolVersion,
    PropertyIdentifier::Reliability,
    PropertyIdentifier::RelinquishDefault,
    PropertyIdentifier::Resolution,
    PropertyIdentifier::SegmentationSupported,
    PropertyIdentifier::StateText,
    PropertyIdentifier::SystemStatus,
    PropertyIdentifier::Units,
    PropertyIdentifier::VendorName,
];

impl PropertyIdentifier {
    /// Standard property identifier number
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Name as written in registry files (e.g. `presentValue`)
    pub fn name(&self) -> &'static str {
        use PropertyIdentifier::*;

        match self {
            ActiveText => "activeText",
            ApplicationSoftwareVersion => "applicationSoftwareVersion",
            CovIncrement => "covIncrement",
            Deadband => "deadband",
            Description => "description",
            EventState => "eventState",
            FirmwareRevision => "firmwareRevision",
            HighLimit => "highLimit",
            InactiveText => "inactiveText",
            LowLimit => "lowLimit",
            MaxApduLengthAccepted => "maxApduLengthAccepted",
            MaxPresValue => "maxPresValue",
            MinPresValue => "minPresValue",
            ModelName => "modelName",
            NumberOfStates => "numberOfStates",
            ObjectName => "objectName",
            OutOfService => "outOfService",
            Polarity => "polarity",
            PresentValue => "presentValue",
            PriorityArray => "priorityArray",
            ProtocolVersion => "protocolVersion",
            Reliability => "reliability",
            RelinquishDefault => "relinquishDefault",
            Resolution => "resolution",
            SegmentationSupported => "segmentationSupported",
            StateText => "stateText",
            SystemStatus => "systemStatus",
            Units => "units",
            VendorName => "vendorName",
        }
    }

    /// Look up a property by its standard number
    pub fn from_code(code: u32) -> Option<Self> {
        ALL_PROPERTIES.iter().copied().find(|p| p.code() == code)
    }

    /// Array-valued properties must be addressed with an array index
    pub fn is_array(&self) -> bool {
        matches!(self, PropertyIdentifier::PriorityArray | PropertyIdentifier::StateText)
    }
}

impl FromStr for PropertyIdentifier {
    type Err = BacnetError;

    fn from_str(s: &str) -> BacnetResult<Self> {
        let wanted = normalize_name(s);
        ALL_PROPERTIES
            .iter()
            .copied()
            .find(|p| normalize_name(p.name()) == wanted)
            .ok_or_else(|| BacnetError::Configuration(format!("Unsupported property: {}", s)))
    }
}

impl TryFrom<String> for PropertyIdentifier {
    type Error = BacnetError;

    fn try_from(value: String) -> BacnetResult<Self> {
        value.parse()
    }
}

impl From<PropertyIdentifier> for String {
    fn from(value: PropertyIdentifier) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for PropertyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_parse() {
        assert_eq!(
            "presentValue".parse::<PropertyIdentifier>().unwrap(),
            PropertyIdentifier::PresentValue
        );
        assert_eq!(
            "present-value".parse::<PropertyIdentifier>().unwrap(),
            PropertyIdentifier::PresentValue
        );
        assert!("logBuffer".parse::<PropertyIdentifier>().is_err());
    }

    #[test]
    fn test_property_codes() {
        assert_eq!(PropertyIdentifier::PresentValue.code(), 85);
        assert_eq!(PropertyIdentifier::from_code(87), Some(PropertyIdentifier::PriorityArray));
        for p in ALL_PROPERTIES {
            assert_eq!(PropertyIdentifier::from_code(p.code()), Some(p));
        }
    }

    #[test]
    fn test_property_is_array() {
        assert!(PropertyIdentifier::PriorityArray.is_array());
        assert!(!PropertyIdentifier::PresentValue.is_array());
    }
}
