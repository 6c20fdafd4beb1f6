//! Register model and address resolution for the BACnet driver
//!
//! This crate turns configuration into the addressing data the driver works from:
//! - [`RegisterModel`]: one point bound to an object/property address
//! - [`LinearScale`]: optional raw ↔ engineering transform
//! - [`registry`]: registry rows (CSV / JSON) and their conversion into registers
//! - [`PointMap`]: validated, ordered name → register map for one device

pub mod point_map;
pub mod register;
pub mod registry;
pub mod scaling;

pub use point_map::PointMap;
pub use register::RegisterModel;
pub use registry::{from_csv_reader, from_json_str, into_registers, RegistryRecord};
pub use scaling::LinearScale;
