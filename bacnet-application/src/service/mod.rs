//! Service layer for the driver
//!
//! - **Read**: partition points into read groups that fit one reply
//! - **Write**: validate, transform and encode values for a write or relinquish

pub mod read;
pub mod write;

pub use read::{BatchPlan, BatchPlanner, ReadGroup};
pub use write::{PreparedWrite, WriteService};
