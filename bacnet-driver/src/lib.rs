//! BACnet driver facade
//!
//! This crate ties the lower layers together into the object a scheduling layer
//! drives:
//! - [`BacnetDriver`]: configure, scrape, read, write and revert points
//! - [`DriverConfig`]: the per-device configuration file
//! - [`ScrapeResult`]: per-point outcome of one scrape

pub mod config;
pub mod driver;
pub mod result;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod mock;

pub use config::DriverConfig;
pub use driver::BacnetDriver;
pub use result::{GroupResult, ScrapeResult, ScrapeStatus};
pub use snapshot::Snapshot;
pub use state::DriverState;
