//! Transport proxy contract
//!
//! The process owning the BACnet stack (the proxy) performs the actual device
//! requests. The driver talks to it through [`TransportProxy`]; any connector
//! implementing the trait can be plugged in.

use async_trait::async_trait;
use bacnet_core::{BacnetResult, PropertyOutcome, PropertyReference, PropertyValue};
use serde::{Deserialize, Serialize};

/// Read one or more properties from a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub device_address: String,
    pub device_instance: u32,
    /// Use ReadPropertyMultiple rather than one ReadProperty per reference
    pub use_read_multiple: bool,
    pub properties: Vec<PropertyReference>,
}

/// Reply to a [`ReadRequest`], one outcome per requested property in request order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadReply {
    pub values: Vec<PropertyOutcome>,
}

/// Write one property on a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteRequest {
    pub device_address: String,
    pub device_instance: u32,
    pub reference: PropertyReference,
    /// Value to write; `Null` relinquishes the priority slot
    pub value: PropertyValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

/// Remote transport proxy
///
/// Implementations report failures as:
/// - `BacnetError::Timeout` / `BacnetError::Transport` for request-level failures
/// - `BacnetError::Busy` when the proxy asks the caller to come back later
/// - `BacnetError::SegmentationNotSupported` when the reply would need segmentation
/// - `BacnetError::Rejected` when the device rejects or aborts a write
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransportProxy: Send + Sync {
    /// Read the listed properties
    async fn read_properties(&self, request: ReadRequest) -> BacnetResult<ReadReply>;

    /// Write a single property
    async fn write_property(&self, request: WriteRequest) -> BacnetResult<()>;
}
