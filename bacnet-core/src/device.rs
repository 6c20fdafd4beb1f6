//! Device-level configuration
//!
//! A [`DeviceConfig`] describes one remote BACnet device as seen through the
//! transport proxy: where it lives, how large its replies may be and how long the
//! driver waits for it. It is immutable once a driver is configured with it.

use crate::error::{BacnetError, BacnetResult};
use crate::object_identifier::{normalize_name, MAX_INSTANCE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Smallest max-APDU-length a device may announce
pub const MIN_APDU_LENGTH: u16 = 50;
/// Largest max-APDU-length (BACnet/IP)
pub const MAX_APDU_LENGTH: u16 = 1476;
/// Per-attempt timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Retries on a busy proxy; more than one is never attempted
pub const MAX_RETRIES: u8 = 1;
/// Lowest-numbered priority a register may write at
pub const DEFAULT_MIN_PRIORITY: u8 = 8;
/// Priority used for writable registers that do not declare one
pub const DEFAULT_WRITE_PRIORITY: u8 = 16;
/// Highest (least important) BACnet priority
pub const LOWEST_PRIORITY: u8 = 16;
/// Group requests in flight at once during a scrape
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 1;

/// Segmentation support announced by a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Segmentation {
    #[default]
    None,
    Transmit,
    Receive,
    Both,
}

impl Segmentation {
    /// Whether the device can send segmented replies
    ///
    /// Read replies travel from the device to us, so only the transmit side matters
    /// when sizing read groups.
    pub fn can_transmit(&self) -> bool {
        matches!(self, Segmentation::Transmit | Segmentation::Both)
    }

    /// Whether the device can accept segmented requests
    pub fn can_receive(&self) -> bool {
        matches!(self, Segmentation::Receive | Segmentation::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Segmentation::None => "none",
            Segmentation::Transmit => "transmit",
            Segmentation::Receive => "receive",
            Segmentation::Both => "both",
        }
    }
}

impl FromStr for Segmentation {
    type Err = BacnetError;

    /// Accepts both the short names and the protocol enumeration names
    /// (`segmentedBoth`, `segmentedTransmit`, `segmentedReceive`, `noSegmentation`)
    fn from_str(s: &str) -> BacnetResult<Self> {
        match normalize_name(s).as_str() {
            "none" | "nosegmentation" => Ok(Segmentation::None),
            "transmit" | "segmentedtransmit" => Ok(Segmentation::Transmit),
            "receive" | "segmentedreceive" => Ok(Segmentation::Receive),
            "both" | "segmentedboth" => Ok(Segmentation::Both),
            _ => Err(BacnetError::Configuration(format!("Unknown segmentation support: {}", s))),
        }
    }
}

impl TryFrom<String> for Segmentation {
    type Error = BacnetError;

    fn try_from(value: String) -> BacnetResult<Self> {
        value.parse()
    }
}

impl From<Segmentation> for String {
    fn from(value: Segmentation) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Segmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_retries() -> u8 {
    MAX_RETRIES
}

fn default_min_priority() -> u8 {
    DEFAULT_MIN_PRIORITY
}

fn default_write_priority() -> u8 {
    DEFAULT_WRITE_PRIORITY
}

fn default_true() -> bool {
    true
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

/// Configuration of one remote device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Network address in the form the transport proxy understands
    pub address: String,
    /// Device object instance (0..=4194302)
    pub device_instance: u32,
    /// Negotiated max APDU length in bytes
    pub max_apdu_length: u16,
    #[serde(default)]
    pub segmentation: Segmentation,
    /// Per-attempt timeout
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// Retries on a busy proxy, clamped to [`MAX_RETRIES`]
    #[serde(default = "default_retries")]
    pub retries: u8,
    #[serde(default = "default_min_priority")]
    pub min_priority: u8,
    #[serde(default = "default_write_priority")]
    pub default_priority: u8,
    #[serde(default)]
    pub require_write_priority: bool,
    /// Cap on properties per read group
    #[serde(default)]
    pub max_per_request: Option<usize>,
    #[serde(default = "default_true")]
    pub use_read_multiple: bool,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
    /// Overall wall-clock cap on one scrape
    #[serde(default)]
    pub scrape_timeout: Option<Duration>,
}

impl DeviceConfig {
    /// Create a device configuration with default settings
    ///
    /// # Arguments
    /// * `address` - Device address as understood by the transport proxy
    /// * `device_instance` - Device object instance number
    ///
    /// # Default Settings
    /// - Max APDU length: 1476 bytes, no segmentation
    /// - Timeout: 10 seconds, 1 retry on busy
    /// - Min priority: 8, default write priority: 16
    pub fn new(address: impl Into<String>, device_instance: u32) -> Self {
        Self {
            address: address.into(),
            device_instance,
            max_apdu_length: MAX_APDU_LENGTH,
            segmentation: Segmentation::None,
            timeout: DEFAULT_TIMEOUT,
            retries: MAX_RETRIES,
            min_priority: DEFAULT_MIN_PRIORITY,
            default_priority: DEFAULT_WRITE_PRIORITY,
            require_write_priority: false,
            max_per_request: None,
            use_read_multiple: true,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            scrape_timeout: None,
        }
    }

    pub fn with_max_apdu_length(mut self, max_apdu_length: u16) -> Self {
        self.max_apdu_length = max_apdu_length;
        self
    }

    pub fn with_segmentation(mut self, segmentation: Segmentation) -> Self {
        self.segmentation = segmentation;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry count; anything above one is clamped
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries.min(MAX_RETRIES);
        self
    }

    pub fn with_min_priority(mut self, min_priority: u8) -> Self {
        self.min_priority = min_priority;
        self
    }

    pub fn with_default_priority(mut self, priority: u8) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn with_require_write_priority(mut self, required: bool) -> Self {
        self.require_write_priority = required;
        self
    }

    pub fn with_max_per_request(mut self, max_per_request: usize) -> Self {
        self.max_per_request = Some(max_per_request);
        self
    }

    pub fn with_read_multiple(mut self, enabled: bool) -> Self {
        self.use_read_multiple = enabled;
        self
    }

    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }

    pub fn with_scrape_timeout(mut self, scrape_timeout: Duration) -> Self {
        self.scrape_timeout = Some(scrape_timeout);
        self
    }

    /// Retry count actually used by the client
    pub fn effective_retries(&self) -> u8 {
        self.retries.min(MAX_RETRIES)
    }

    /// Validate ranges
    ///
    /// # Errors
    /// Returns `BacnetError::Configuration` naming the first offending field
    pub fn validate(&self) -> BacnetResult<()> {
        if self.address.trim().is_empty() {
            return Err(BacnetError::Configuration("Device address is empty".to_string()));
        }
        if self.device_instance > MAX_INSTANCE {
            return Err(BacnetError::Configuration(format!(
                "Device instance {} out of range 0..={}",
                self.device_instance, MAX_INSTANCE
            )));
        }
        if !(MIN_APDU_LENGTH..=MAX_APDU_LENGTH).contains(&self.max_apdu_length) {
            return Err(BacnetError::Configuration(format!(
                "Max APDU length {} out of range {}..={}",
                self.max_apdu_length, MIN_APDU_LENGTH, MAX_APDU_LENGTH
            )));
        }
        if self.timeout.is_zero() {
            return Err(BacnetError::Configuration("Timeout must be positive".to_string()));
        }
        if !(1..=LOWEST_PRIORITY).contains(&self.min_priority) {
            return Err(BacnetError::Configuration(format!(
                "Minimum priority {} out of range 1..={}",
                self.min_priority, LOWEST_PRIORITY
            )));
        }
        if self.default_priority < self.min_priority || self.default_priority > LOWEST_PRIORITY {
            return Err(BacnetError::Configuration(format!(
                "Default priority {} out of range {}..={}",
                self.default_priority, self.min_priority, LOWEST_PRIORITY
            )));
        }
        if self.max_per_request == Some(0) {
            return Err(BacnetError::Configuration("Max per request must be at least 1".to_string()));
        }
        if self.max_concurrent_requests == 0 {
            return Err(BacnetError::Configuration(
                "Max concurrent requests must be at least 1".to_string(),
            ));
        }
        if self.scrape_timeout.is_some_and(|t| t.is_zero()) {
            return Err(BacnetError::Configuration("Scrape timeout must be positive".to_string()));
        }
        Ok(())
    }
}
