//! Value types exchanged with devices and reported to callers

pub mod data_type;
pub mod property_value;

pub use data_type::{Codec, DataType, PointValue};
pub use property_value::{ApplicationTag, PropertyOutcome, PropertyValue};
