//! Core types and utilities for the BACnet driver
//!
//! This crate provides fundamental types, error handling, and utilities
//! used throughout the driver workspace: object and property identifiers,
//! wire values, declared data types and device configuration.

pub mod datatypes;
pub mod device;
pub mod error;
pub mod object_identifier;
pub mod property;
pub mod reference;

pub use datatypes::{
    ApplicationTag, Codec, DataType, PointValue, PropertyOutcome, PropertyValue,
};
pub use device::{
    DeviceConfig, Segmentation, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_MIN_PRIORITY,
    DEFAULT_TIMEOUT, DEFAULT_WRITE_PRIORITY, LOWEST_PRIORITY, MAX_APDU_LENGTH, MAX_RETRIES,
    MIN_APDU_LENGTH,
};
pub use error::{BacnetError, BacnetResult};
pub use object_identifier::{ObjectIdentifier, ObjectType, MAX_INSTANCE};
pub use property::PropertyIdentifier;
pub use reference::PropertyReference;
