//! Address resolution
//!
//! [`PointMap::resolve`] validates a register list against a device and produces
//! the ordered name → register map a driver snapshot owns. It never touches the
//! network; everything it rejects is a configuration error.

use crate::register::RegisterModel;
use bacnet_core::{BacnetError, BacnetResult, DataType, DeviceConfig, LOWEST_PRIORITY};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered mapping from point name to register, in declaration order
#[derive(Debug, Clone, Default)]
pub struct PointMap {
    registers: Vec<Arc<RegisterModel>>,
    index: HashMap<String, usize>,
}

impl PointMap {
    /// Resolve registers for a device
    ///
    /// # Arguments
    /// * `device` - Device the registers belong to
    /// * `registers` - Registers in declaration order
    ///
    /// # Returns
    /// A map holding every register, in the order given
    ///
    /// # Errors
    /// Returns `BacnetError::Configuration` on the first register that:
    /// - has an empty or duplicate name
    /// - addresses a property its object type does not carry
    /// - declares a data type the object/property cannot hold
    /// - addresses an array property without an index (or a scalar one with an index)
    /// - is writable without a priority while the device requires one
    /// - carries a priority outside 1..=16 or below the device minimum
    /// - carries a transform that is not invertible or sits on a non-numeric type
    pub fn resolve<I>(device: &DeviceConfig, registers: I) -> BacnetResult<Self>
    where
        I: IntoIterator<Item = RegisterModel>,
    {
        let mut map = PointMap::default();
        for register in registers {
            check_register(device, &register)?;
            if map.index.contains_key(register.name()) {
                return Err(BacnetError::Configuration(format!(
                    "Duplicate point name: {}",
                    register.name()
                )));
            }
            map.index.insert(register.name().to_string(), map.registers.len());
            map.registers.push(Arc::new(register));
        }
        Ok(map)
    }

    /// Look up a register by point name
    pub fn get(&self, name: &str) -> Option<&Arc<RegisterModel>> {
        self.index.get(name).map(|&i| &self.registers[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Registers in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RegisterModel>> {
        self.registers.iter()
    }

    /// Point names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.registers.iter().map(|r| r.name().to_string()).collect()
    }
}

fn invalid(register: &RegisterModel, reason: impl std::fmt::Display) -> BacnetError {
    BacnetError::Configuration(format!("Point {}: {}", register, reason))
}

fn check_register(device: &DeviceConfig, register: &RegisterModel) -> BacnetResult<()> {
    if register.name().trim().is_empty() {
        return Err(BacnetError::Configuration(format!(
            "Point at {} {} has an empty name",
            register.object(),
            register.property()
        )));
    }

    let object_type = register.object_type();
    let property = register.property();
    if !object_type.supports(property) {
        return Err(invalid(register, format!("{} has no {} property", object_type, property)));
    }

    let allowed = DataType::allowed_for(object_type, property);
    if !allowed.contains(&register.data_type()) {
        return Err(invalid(
            register,
            format!("data type {} is not valid for {} {}", register.data_type(), object_type, property),
        ));
    }

    match (property.is_array(), register.array_index()) {
        (true, None) => {
            return Err(invalid(register, "array property requires an array index"));
        }
        (false, Some(_)) => {
            return Err(invalid(register, "array index given for a scalar property"));
        }
        _ => {}
    }

    if register.is_writable() && register.write_priority().is_none() && device.require_write_priority {
        return Err(invalid(register, "writable point has no write priority"));
    }

    if let Some(priority) = register.write_priority() {
        if !(1..=LOWEST_PRIORITY).contains(&priority) {
            return Err(invalid(register, format!("write priority {} out of range 1..=16", priority)));
        }
        if priority < device.min_priority {
            return Err(invalid(
                register,
                format!("write priority {} is below the device minimum {}", priority, device.min_priority),
            ));
        }
    }

    if let Some(scale) = register.scale() {
        scale.validate().map_err(|e| invalid(register, e))?;
        if !register.data_type().is_numeric() {
            return Err(invalid(
                register,
                format!("linear transform on non-numeric data type {}", register.data_type()),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling::LinearScale;
    use bacnet_core::{ObjectIdentifier, ObjectType, PropertyIdentifier};

    fn device() -> DeviceConfig {
        DeviceConfig::new("10.0.0.9", 1200)
    }

    fn analog(name: &str, instance: u32) -> RegisterModel {
        RegisterModel::new(
            name,
            ObjectIdentifier::new(ObjectType::AnalogValue, instance).unwrap(),
            PropertyIdentifier::PresentValue,
            DataType::Float,
        )
    }

    fn assert_rejected(register: RegisterModel) {
        let err = PointMap::resolve(&device(), vec![register]).unwrap_err();
        assert!(err.is_configuration(), "unexpected error {:?}", err);
    }

    #[test]
    fn test_resolve_keeps_order_and_size() {
        let registers: Vec<_> = (0..5).map(|i| analog(&format!("P{}", i), i)).collect();
        let map = PointMap::resolve(&device(), registers).unwrap();
        assert_eq!(map.len(), 5);
        assert_eq!(map.names(), vec!["P0", "P1", "P2", "P3", "P4"]);
        assert_eq!(map.get("P3").unwrap().instance(), 3);
        assert!(map.get("P9").is_none());
    }

    #[test]
    fn test_resolve_rejects_duplicates() {
        let err = PointMap::resolve(&device(), vec![analog("Dup", 1), analog("Dup", 2)]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_resolve_rejects_empty_name() {
        assert_rejected(analog("  ", 1));
    }

    #[test]
    fn test_resolve_rejects_unsupported_property() {
        let register = RegisterModel::new(
            "AiPriority",
            ObjectIdentifier::new(ObjectType::AnalogInput, 1).unwrap(),
            PropertyIdentifier::PriorityArray,
            DataType::Float,
        )
        .with_array_index(8);
        assert_rejected(register);
    }

    #[test]
    fn test_resolve_rejects_bad_data_type() {
        let register = RegisterModel::new(
            "Temp",
            ObjectIdentifier::new(ObjectType::AnalogInput, 1).unwrap(),
            PropertyIdentifier::PresentValue,
            DataType::String,
        );
        assert_rejected(register);
    }

    #[test]
    fn test_resolve_array_index_rules() {
        let slot = RegisterModel::new(
            "Slot",
            ObjectIdentifier::new(ObjectType::AnalogOutput, 1).unwrap(),
            PropertyIdentifier::PriorityArray,
            DataType::Float,
        );
        assert_rejected(slot.clone());
        assert!(PointMap::resolve(&device(), vec![slot.with_array_index(8)]).is_ok());
        assert_rejected(analog("Pv", 1).with_array_index(1));
    }

    #[test]
    fn test_resolve_priority_rules() {
        assert_rejected(analog("High", 1).writable(Some(3)));
        assert_rejected(analog("Zero", 1).writable(Some(0)));
        assert_rejected(analog("Seventeen", 1).writable(Some(17)));
        assert!(PointMap::resolve(&device(), vec![analog("Ok", 1).writable(Some(8))]).is_ok());

        // no priority is fine unless the device requires one
        assert!(PointMap::resolve(&device(), vec![analog("Free", 1).writable(None)]).is_ok());
        let strict = device().with_require_write_priority(true);
        assert!(PointMap::resolve(&strict, vec![analog("Free", 1).writable(None)]).is_err());
    }

    #[test]
    fn test_resolve_transform_rules() {
        assert_rejected(analog("Zero", 1).with_scale(LinearScale::new(0.0, 1.0)));

        let binary = RegisterModel::new(
            "Fan",
            ObjectIdentifier::new(ObjectType::BinaryValue, 1).unwrap(),
            PropertyIdentifier::PresentValue,
            DataType::Bool,
        )
        .with_scale(LinearScale::new(2.0, 0.0));
        assert_rejected(binary);

        let ok = analog("Scaled", 1).with_scale(LinearScale::new(0.5, 32.0));
        assert!(PointMap::resolve(&device(), vec![ok]).is_ok());
    }
}
