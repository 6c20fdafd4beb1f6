//! Write preparation
//!
//! Turns a caller value into the wire value and priority for one register. All
//! checks that can fail without talking to the device happen here, so the driver
//! only reaches the network with a request that is well-formed.

use bacnet_core::{BacnetError, BacnetResult, DeviceConfig, PointValue, PropertyValue};
use bacnet_interface::RegisterModel;
use std::sync::Arc;

/// A write ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedWrite {
    /// Target register
    pub register: Arc<RegisterModel>,
    /// Encoded wire value (`Null` to relinquish)
    pub value: PropertyValue,
    /// Priority slot written
    pub priority: u8,
    /// Value as a subsequent read would report it (`None` for a relinquish)
    pub written: Option<PointValue>,
}

/// Builds write and relinquish requests
pub struct WriteService;

impl WriteService {
    /// Prepare a value write
    ///
    /// # Arguments
    /// * `register` - Target register
    /// * `value` - Engineering value supplied by the caller
    /// * `device` - Device the register belongs to (for the default priority)
    ///
    /// # Errors
    /// - `BacnetError::NotWritable` if the register is read-only
    /// - `BacnetError::TypeMismatch` if the value does not fit the register's data type
    pub fn prepare(
        register: &Arc<RegisterModel>,
        value: &PointValue,
        device: &DeviceConfig,
    ) -> BacnetResult<PreparedWrite> {
        if !register.is_writable() {
            return Err(BacnetError::NotWritable(register.name().to_string()));
        }

        let data_type = register.data_type();
        let transform = register.transform();
        let raw = transform.invert_point(value, data_type)?;
        let raw = data_type.coerce(&raw)?;
        let wire = data_type.encode(&raw, register.object_type(), register.property())?;

        Ok(PreparedWrite {
            register: register.clone(),
            value: wire,
            priority: register.write_priority().unwrap_or(device.default_priority),
            written: Some(transform.apply_point(raw)),
        })
    }

    /// Prepare a relinquish (NULL write) at the register's configured priority
    ///
    /// # Errors
    /// `BacnetError::NotWritable` if the register is read-only or has no configured priority
    pub fn prepare_relinquish(register: &Arc<RegisterModel>) -> BacnetResult<PreparedWrite> {
        if !register.is_writable() {
            return Err(BacnetError::NotWritable(register.name().to_string()));
        }
        let priority = register.write_priority().ok_or_else(|| {
            BacnetError::NotWritable(format!("{} has no configured write priority", register.name()))
        })?;
        Ok(PreparedWrite {
            register: register.clone(),
            value: PropertyValue::Null,
            priority,
            written: None,
        })
    }
}
