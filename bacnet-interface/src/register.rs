//! Register model
//!
//! A register binds one logical point name to a BACnet object/property address,
//! the data type its value is decoded as, and how it may be written.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bacnet_core::{DataType, ObjectIdentifier, ObjectType, PropertyIdentifier, PropertyReference};
//! use bacnet_interface::RegisterModel;
//!
//! let object = ObjectIdentifier::new(ObjectType::AnalogValue, 3).unwrap();
//! let setpoint = RegisterModel::new("ZoneSetpoint", object, PropertyIdentifier::PresentValue, DataType::Float)
//!     .writable(Some(8))
//!     .with_units("degreesFahrenheit");
//! ```

use crate::scaling::LinearScale;
use bacnet_core::{DataType, ObjectIdentifier, ObjectType, PropertyIdentifier, PropertyReference};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One configured data point
///
/// Immutable once built; the resolver and the driver only ever share it
/// behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterModel {
    name: String,
    object: ObjectIdentifier,
    property: PropertyIdentifier,
    #[serde(default)]
    array_index: Option<u32>,
    data_type: DataType,
    #[serde(default)]
    writable: bool,
    #[serde(default)]
    write_priority: Option<u8>,
    #[serde(default)]
    units: String,
    #[serde(default)]
    unit_details: Option<String>,
    #[serde(default)]
    scale: Option<LinearScale>,
    #[serde(default)]
    notes: String,
}

impl RegisterModel {
    /// Create a read-only register
    ///
    /// # Arguments
    /// * `name` - Point name, unique within a device
    /// * `object` - Object the value lives on
    /// * `property` - Property to read
    /// * `data_type` - Declared data type
    pub fn new(
        name: impl Into<String>,
        object: ObjectIdentifier,
        property: PropertyIdentifier,
        data_type: DataType,
    ) -> Self {
        Self {
            name: name.into(),
            object,
            property,
            array_index: None,
            data_type,
            writable: false,
            write_priority: None,
            units: String::new(),
            unit_details: None,
            scale: None,
            notes: String::new(),
        }
    }

    /// Mark the register writable, optionally at a fixed priority
    pub fn writable(mut self, priority: Option<u8>) -> Self {
        self.writable = true;
        self.write_priority = priority;
        self
    }

    pub fn with_array_index(mut self, index: u32) -> Self {
        self.array_index = Some(index);
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_unit_details(mut self, details: impl Into<String>) -> Self {
        self.unit_details = Some(details.into());
        self
    }

    pub fn with_scale(mut self, scale: LinearScale) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object(&self) -> ObjectIdentifier {
        self.object
    }

    pub fn object_type(&self) -> ObjectType {
        self.object.object_type()
    }

    pub fn instance(&self) -> u32 {
        self.object.instance()
    }

    pub fn property(&self) -> PropertyIdentifier {
        self.property
    }

    pub fn array_index(&self) -> Option<u32> {
        self.array_index
    }

    /// Wire address of the value this register reads and writes
    pub fn reference(&self) -> PropertyReference {
        PropertyReference::new(self.object, self.property, self.array_index)
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Priority configured for writes, if any
    pub fn write_priority(&self) -> Option<u8> {
        self.write_priority
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn unit_details(&self) -> Option<&str> {
        self.unit_details.as_deref()
    }

    /// Configured transform, if any
    pub fn scale(&self) -> Option<LinearScale> {
        self.scale
    }

    /// Effective transform (identity when none is configured)
    pub fn transform(&self) -> LinearScale {
        self.scale.unwrap_or_default()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

impl fmt::Display for RegisterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {}", self.name, self.object, self.property)?;
        if let Some(index) = self.array_index {
            write!(f, "[{}]", index)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object() -> ObjectIdentifier {
        ObjectIdentifier::new(ObjectType::AnalogOutput, 1).unwrap()
    }

    #[test]
    fn test_builder() {
        let reg = RegisterModel::new("Damper", object(), PropertyIdentifier::PresentValue, DataType::Float)
            .writable(Some(10))
            .with_units("percent")
            .with_notes("OA damper");
        assert!(reg.is_writable());
        assert_eq!(reg.write_priority(), Some(10));
        assert_eq!(reg.units(), "percent");
        assert_eq!(reg.object_type(), ObjectType::AnalogOutput);
        assert!(reg.transform().is_identity());
    }

    #[test]
    fn test_display() {
        let reg = RegisterModel::new("Slot8", object(), PropertyIdentifier::PriorityArray, DataType::Float)
            .with_array_index(8);
        assert_eq!(format!("{}", reg), "Slot8 (analogOutput:1 priorityArray[8])");
    }
}
