//! Encoded-size estimation for read requests
//!
//! The batcher has to keep each read-property-multiple reply under the device's
//! max APDU length without actually encoding anything. Each register is costed as
//! it would appear in the reply:
//!
//! ```text
//! PROPERTY_OVERHEAD + object identifier + property identifier + array index + value
//! ```
//!
//! Context-tagged unsigned fields cost one tag byte plus 1-4 content bytes.

use bacnet_core::{DataType, DeviceConfig};
use bacnet_interface::RegisterModel;

/// Opening/closing tags and list framing per property result
pub const PROPERTY_OVERHEAD: usize = 3;
/// Context tag plus four-byte object identifier
pub const OBJECT_IDENTIFIER_COST: usize = 5;
/// Headroom kept below max APDU when the device cannot segment its replies
pub const UNSEGMENTED_SAFETY_MARGIN: usize = 5;

/// Cost of a context-tagged unsigned value
fn tagged_unsigned_cost(value: u32) -> usize {
    let content = match value {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    };
    1 + content
}

/// Cost of the property identifier (2-4 bytes)
pub fn property_identifier_cost(code: u32) -> usize {
    tagged_unsigned_cost(code)
}

/// Cost of the optional array index (0 or 2-5 bytes)
pub fn array_index_cost(index: Option<u32>) -> usize {
    index.map_or(0, tagged_unsigned_cost)
}

/// Estimated encoded size of a value of the given type
pub fn value_estimate(data_type: DataType) -> usize {
    match data_type {
        DataType::Bool => 2,
        DataType::Enum => 3,
        DataType::Int => 5,
        DataType::Float => 5,
        DataType::String => 64,
    }
}

/// Estimated encoded size of one register in a read reply
pub fn estimate_register(register: &RegisterModel) -> usize {
    PROPERTY_OVERHEAD
        + OBJECT_IDENTIFIER_COST
        + property_identifier_cost(register.property().code())
        + array_index_cost(register.array_index())
        + value_estimate(register.data_type())
}

/// Size budget for one read group
///
/// The full max APDU length when the device can transmit segmented replies,
/// otherwise max APDU length less [`UNSEGMENTED_SAFETY_MARGIN`].
pub fn read_budget(device: &DeviceConfig) -> usize {
    let max_apdu = device.max_apdu_length as usize;
    if device.segmentation.can_transmit() {
        max_apdu
    } else {
        max_apdu.saturating_sub(UNSEGMENTED_SAFETY_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacnet_core::{ObjectIdentifier, ObjectType, PropertyIdentifier, Segmentation};

    #[test]
    fn test_float_present_value_costs_fifteen() {
        let register = RegisterModel::new(
            "Temp",
            ObjectIdentifier::new(ObjectType::AnalogInput, 1).unwrap(),
            PropertyIdentifier::PresentValue,
            DataType::Float,
        );
        assert_eq!(estimate_register(&register), 15);
    }

    #[test]
    fn test_array_index_cost() {
        assert_eq!(array_index_cost(None), 0);
        assert_eq!(array_index_cost(Some(8)), 2);
        assert_eq!(array_index_cost(Some(300)), 3);
        assert_eq!(array_index_cost(Some(u32::MAX)), 5);
    }

    #[test]
    fn test_read_budget() {
        let device = DeviceConfig::new("a", 1).with_max_apdu_length(480);
        assert_eq!(read_budget(&device), 475);
        let device = device.with_segmentation(Segmentation::Both);
        assert_eq!(read_budget(&device), 480);
        let device = device.with_segmentation(Segmentation::Receive);
        assert_eq!(read_budget(&device), 475);
    }
}
