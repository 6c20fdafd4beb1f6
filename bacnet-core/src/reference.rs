use crate::object_identifier::{ObjectIdentifier, ObjectType};
use crate::property::PropertyIdentifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of one property value on a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyReference {
    pub object_type: ObjectType,
    pub instance: u32,
    pub property: PropertyIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_index: Option<u32>,
}

impl PropertyReference {
    pub fn new(object: ObjectIdentifier, property: PropertyIdentifier, array_index: Option<u32>) -> Self {
        Self {
            object_type: object.object_type(),
            instance: object.instance(),
            property,
            array_index,
        }
    }
}

impl fmt::Display for PropertyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.object_type, self.instance, self.property)?;
        if let Some(index) = self.array_index {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}
