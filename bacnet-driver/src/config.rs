//! Driver configuration file
//!
//! The platform stores a device entry as JSON. Either the whole entry (with the
//! driver settings under `driver_config`) or the bare `driver_config` object is
//! accepted:
//!
//! ```json
//! {
//!     "driver_config": {"device_address": "10.0.0.1", "device_id": 506892},
//!     "driver_type": "bacnet",
//!     "registry_config": "config://bacnet.csv",
//!     "interval": 15
//! }
//! ```

use bacnet_core::{
    BacnetError, BacnetResult, DeviceConfig, Segmentation, DEFAULT_MAX_CONCURRENT_REQUESTS,
    MAX_APDU_LENGTH,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Driver settings for one device
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(alias = "target_address")]
    pub device_address: String,
    pub device_id: u32,
    #[serde(default)]
    pub max_apdu_length: Option<u16>,
    #[serde(default)]
    pub segmentation_supported: Option<String>,
    /// Per-attempt timeout in seconds
    #[serde(default)]
    pub timeout: Option<f64>,
    #[serde(default)]
    pub retries: Option<u8>,
    #[serde(default)]
    pub min_priority: Option<u8>,
    #[serde(default)]
    pub default_priority: Option<u8>,
    #[serde(default)]
    pub require_write_priority: Option<bool>,
    #[serde(default)]
    pub max_per_request: Option<usize>,
    #[serde(default)]
    pub use_read_multiple: Option<bool>,
    #[serde(default)]
    pub max_concurrent_requests: Option<usize>,
    /// Overall scrape cap in seconds
    #[serde(default)]
    pub scrape_timeout: Option<f64>,
}

fn seconds(field: &str, value: f64) -> BacnetResult<Duration> {
    Duration::try_from_secs_f64(value)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| BacnetError::Configuration(format!("{} must be a positive number of seconds, got {}", field, value)))
}

impl DriverConfig {
    /// Parse a device entry or a bare `driver_config` object
    pub fn from_json_str(json: &str) -> BacnetResult<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| BacnetError::Configuration(format!("Invalid driver config JSON: {}", e)))?;
        if let Some(inner) = value.get_mut("driver_config") {
            value = inner.take();
        }
        serde_json::from_value(value)
            .map_err(|e| BacnetError::Configuration(format!("Invalid driver config: {}", e)))
    }

    /// Build and validate the device configuration
    ///
    /// # Errors
    /// Returns `BacnetError::Configuration` for unknown segmentation names,
    /// non-positive durations and anything [`DeviceConfig::validate`] rejects
    pub fn into_device_config(self) -> BacnetResult<DeviceConfig> {
        let mut device = DeviceConfig::new(self.device_address, self.device_id)
            .with_max_apdu_length(self.max_apdu_length.unwrap_or(MAX_APDU_LENGTH));

        if let Some(segmentation) = self.segmentation_supported {
            device = device.with_segmentation(segmentation.parse::<Segmentation>()?);
        }
        if let Some(timeout) = self.timeout {
            device = device.with_timeout(seconds("timeout", timeout)?);
        }
        if let Some(retries) = self.retries {
            device = device.with_retries(retries);
        }
        if let Some(priority) = self.min_priority {
            device = device.with_min_priority(priority);
        }
        if let Some(priority) = self.default_priority {
            device = device.with_default_priority(priority);
        }
        if let Some(required) = self.require_write_priority {
            device = device.with_require_write_priority(required);
        }
        if let Some(max) = self.max_per_request {
            device = device.with_max_per_request(max);
        }
        if let Some(enabled) = self.use_read_multiple {
            device = device.with_read_multiple(enabled);
        }
        device = device.with_max_concurrent_requests(
            self.max_concurrent_requests.unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS),
        );
        if let Some(limit) = self.scrape_timeout {
            device = device.with_scrape_timeout(seconds("scrape_timeout", limit)?);
        }

        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_entry() {
        let json = r#"{
            "driver_config": {"device_address": "10.0.0.1", "device_id": 506892},
            "driver_type": "bacnet",
            "registry_config": "config://bacnet_test.csv",
            "timezone": "US/Pacific",
            "interval": 15
        }"#;
        let config = DriverConfig::from_json_str(json).unwrap();
        assert_eq!(config.device_address, "10.0.0.1");
        assert_eq!(config.device_id, 506892);

        let device = config.into_device_config().unwrap();
        assert_eq!(device.max_apdu_length, MAX_APDU_LENGTH);
        assert_eq!(device.segmentation, Segmentation::None);
        assert_eq!(device.min_priority, 8);
    }

    #[test]
    fn test_bare_config_with_options() {
        let json = r#"{
            "target_address": "192.168.1.20",
            "device_id": 1001,
            "max_apdu_length": 480,
            "segmentation_supported": "segmentedBoth",
            "timeout": 2.5,
            "retries": 3,
            "max_per_request": 20,
            "use_read_multiple": false,
            "max_concurrent_requests": 4,
            "scrape_timeout": 30
        }"#;
        let device = DriverConfig::from_json_str(json).unwrap().into_device_config().unwrap();
        assert_eq!(device.address, "192.168.1.20");
        assert_eq!(device.segmentation, Segmentation::Both);
        assert_eq!(device.timeout, Duration::from_millis(2500));
        assert_eq!(device.retries, 1);
        assert_eq!(device.max_per_request, Some(20));
        assert!(!device.use_read_multiple);
        assert_eq!(device.max_concurrent_requests, 4);
        assert_eq!(device.scrape_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_invalid_values() {
        let bad_timeout = r#"{"device_address": "a", "device_id": 1, "timeout": -1}"#;
        let err = DriverConfig::from_json_str(bad_timeout).unwrap().into_device_config().unwrap_err();
        assert!(err.is_configuration());

        let bad_apdu = r#"{"device_address": "a", "device_id": 1, "max_apdu_length": 20}"#;
        assert!(DriverConfig::from_json_str(bad_apdu).unwrap().into_device_config().is_err());

        let bad_segmentation = r#"{"device_address": "a", "device_id": 1, "segmentation_supported": "maybe"}"#;
        assert!(DriverConfig::from_json_str(bad_segmentation).unwrap().into_device_config().is_err());

        assert!(DriverConfig::from_json_str("{").is_err());
    }
}
