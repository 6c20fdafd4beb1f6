//! Application layer for the BACnet driver
//!
//! This crate provides the pure (no I/O) half of the driver engine: size
//! estimation, request batching, write preparation and result decoding.

pub mod decode;
pub mod encoding;
pub mod service;

pub use decode::{PointFailure, PointResult, ResultDecoder};
pub use encoding::{estimate_register, read_budget, PROPERTY_OVERHEAD, UNSEGMENTED_SAFETY_MARGIN};
pub use service::{BatchPlan, BatchPlanner, PreparedWrite, ReadGroup, WriteService};
