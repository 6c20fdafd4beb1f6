//! Registry records
//!
//! Points are usually supplied as rows of a registry file, one row per point, with
//! the column layout below. Rows can come from CSV or from a JSON array of objects
//! keyed by the same column names.
//!
//! | Column | Meaning |
//! |---|---|
//! | `Reference Point Name` | name used by the device / integrator |
//! | `Volttron Point Name` | point name (falls back to the reference name) |
//! | `Units`, `Unit Details` | engineering units and free-text range |
//! | `BACnet Object Type` | e.g. `analogInput` |
//! | `Property` | e.g. `presentValue` |
//! | `Writable` | `TRUE` / `FALSE` |
//! | `Index` | object instance number |
//! | `Write Priority` | 1-16, may be empty |
//! | `Notes` | free text |
//! | `Data Type` | optional, inferred from object/property when empty |
//! | `Array Index` | optional, required for array properties |
//! | `Scale`, `Offset` | optional linear transform |

use crate::register::RegisterModel;
use crate::scaling::LinearScale;
use bacnet_core::{
    BacnetError, BacnetResult, DataType, ObjectIdentifier, ObjectType, PropertyIdentifier,
};
use serde::{Deserialize, Serialize};
use std::io;

/// `Writable` cell: a JSON bool or a CSV string such as `TRUE`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        }
    }
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Bool(false)
    }
}

/// One registry row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryRecord {
    #[serde(rename = "Reference Point Name", default)]
    pub reference_point_name: String,
    #[serde(rename = "Volttron Point Name", alias = "Point Name", default)]
    pub point_name: Option<String>,
    #[serde(rename = "Units", default)]
    pub units: Option<String>,
    #[serde(rename = "Unit Details", default)]
    pub unit_details: Option<String>,
    #[serde(rename = "BACnet Object Type")]
    pub object_type: String,
    #[serde(rename = "Property")]
    pub property: String,
    #[serde(rename = "Writable", default)]
    pub writable: Flag,
    #[serde(rename = "Index")]
    pub index: u32,
    #[serde(rename = "Write Priority", default)]
    pub write_priority: Option<u8>,
    #[serde(rename = "Notes", default)]
    pub notes: Option<String>,
    #[serde(rename = "Data Type", default)]
    pub data_type: Option<String>,
    #[serde(rename = "Array Index", default)]
    pub array_index: Option<u32>,
    #[serde(rename = "Scale", default)]
    pub scale: Option<f64>,
    #[serde(rename = "Offset", default)]
    pub offset: Option<f64>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl RegistryRecord {
    /// Point name of this row
    pub fn name(&self) -> &str {
        non_empty(&self.point_name).unwrap_or_else(|| self.reference_point_name.trim())
    }

    /// Convert the row into a register
    ///
    /// # Errors
    /// Returns `BacnetError::Configuration` for unknown object types, properties
    /// or data types, and when no data type can be inferred
    pub fn to_register(&self) -> BacnetResult<RegisterModel> {
        let object_type: ObjectType = self.object_type.parse()?;
        let property: PropertyIdentifier = self.property.parse()?;
        let object = ObjectIdentifier::new(object_type, self.index)?;

        let data_type = match non_empty(&self.data_type) {
            Some(declared) => declared.parse()?,
            None => DataType::default_for(object_type, property).ok_or_else(|| {
                BacnetError::Configuration(format!(
                    "Point {}: no data type for {} {}",
                    self.name(),
                    object_type,
                    property
                ))
            })?,
        };

        let mut register = RegisterModel::new(self.name(), object, property, data_type);
        if self.writable.is_set() {
            register = register.writable(self.write_priority);
        }
        if let Some(index) = self.array_index {
            register = register.with_array_index(index);
        }
        if let Some(units) = non_empty(&self.units) {
            register = register.with_units(units);
        }
        if let Some(details) = non_empty(&self.unit_details) {
            register = register.with_unit_details(details);
        }
        if let Some(notes) = non_empty(&self.notes) {
            register = register.with_notes(notes);
        }
        if self.scale.is_some() || self.offset.is_some() {
            register = register.with_scale(LinearScale::new(
                self.scale.unwrap_or(1.0),
                self.offset.unwrap_or(0.0),
            ));
        }
        Ok(register)
    }
}

/// Read registry rows from CSV with a header line
///
/// Cells are trimmed; rows whose reference and point names are both empty are skipped.
pub fn from_csv_reader<R: io::Read>(reader: R) -> BacnetResult<Vec<RegistryRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line, row) in csv_reader.deserialize::<RegistryRecord>().enumerate() {
        let record = row.map_err(|e| {
            BacnetError::Configuration(format!("Registry row {}: {}", line + 1, e))
        })?;
        if record.name().is_empty() {
            log::debug!("Skipping registry row {} without a point name", line + 1);
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

/// Read registry rows from a JSON array of objects
pub fn from_json_str(json: &str) -> BacnetResult<Vec<RegistryRecord>> {
    serde_json::from_str(json)
        .map_err(|e| BacnetError::Configuration(format!("Invalid registry JSON: {}", e)))
}

/// Convert registry rows into registers, in row order
pub fn into_registers(records: &[RegistryRecord]) -> BacnetResult<Vec<RegisterModel>> {
    records.iter().map(RegistryRecord::to_register).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = "Reference Point Name,Volttron Point Name,Units,Unit Details,BACnet Object Type,Property,Writable,Index,Write Priority,Notes
        3820a/CHWR-T,CHWR-T,degreesFahrenheit,-50.00 to 250.00,analogInput,presentValue,FALSE,3000741,,Primary CHW Return Temp
        3820a/CHW-SP,,degreesFahrenheit,,analogValue,presentValue,TRUE,3000750,10,Setpoint";

    #[test]
    fn test_csv_records() {
        let records = from_csv_reader(REGISTRY.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "CHWR-T");
        assert_eq!(records[0].write_priority, None);
        assert!(!records[0].writable.is_set());
        // falls back to the reference name
        assert_eq!(records[1].name(), "3820a/CHW-SP");
        assert!(records[1].writable.is_set());
        assert_eq!(records[1].write_priority, Some(10));
    }

    #[test]
    fn test_csv_into_registers() {
        let records = from_csv_reader(REGISTRY.as_bytes()).unwrap();
        let registers = into_registers(&records).unwrap();
        assert_eq!(registers[0].data_type(), DataType::Float);
        assert_eq!(registers[0].instance(), 3000741);
        assert_eq!(registers[0].unit_details(), Some("-50.00 to 250.00"));
        assert!(!registers[0].is_writable());
        assert!(registers[1].is_writable());
        assert_eq!(registers[1].write_priority(), Some(10));
        assert_eq!(registers[1].notes(), "Setpoint");
    }

    #[test]
    fn test_json_records() {
        let json = r#"[
            {"Volttron Point Name": "Fan", "BACnet Object Type": "binaryOutput", "Property": "presentValue",
             "Writable": true, "Index": 4, "Write Priority": 12},
            {"Reference Point Name": "Flow", "BACnet Object Type": "analogInput", "Property": "presentValue",
             "Index": 9, "Data Type": "int", "Scale": 0.5}
        ]"#;
        let records = from_json_str(json).unwrap();
        let registers = into_registers(&records).unwrap();
        assert_eq!(registers[0].data_type(), DataType::Bool);
        assert_eq!(registers[0].write_priority(), Some(12));
        assert_eq!(registers[1].data_type(), DataType::Int);
        assert_eq!(registers[1].transform(), LinearScale::new(0.5, 0.0));
    }

    #[test]
    fn test_unknown_object_type() {
        let json = r#"[{"Volttron Point Name": "Log", "BACnet Object Type": "trendLog",
                        "Property": "presentValue", "Index": 1}]"#;
        let records = from_json_str(json).unwrap();
        let err = into_registers(&records).unwrap_err();
        assert!(err.is_configuration());
    }
}
