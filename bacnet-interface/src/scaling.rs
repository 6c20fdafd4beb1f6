//! Linear transform for register values
//!
//! Raw device values are mapped to engineering values with
//! `value = raw * scale + offset`. Writes go through the inverse before encoding.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bacnet_interface::LinearScale;
//!
//! // Device reports half degrees
//! let scale = LinearScale::new(0.5, 0.0);
//! assert_eq!(scale.apply(145.0), 72.5);
//! ```

use bacnet_core::{BacnetError, BacnetResult, DataType, PointValue};
use serde::{Deserialize, Serialize};

/// Linear transform (scale and offset)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    /// Multiplier applied to the raw value, never zero
    pub scale: f64,
    /// Added after scaling
    pub offset: f64,
}

impl LinearScale {
    /// Create a new transform
    ///
    /// # Arguments
    /// * `scale` - Multiplier (must be non-zero and finite to pass [`validate`](Self::validate))
    /// * `offset` - Offset added after scaling
    pub fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    /// Transform that leaves values unchanged
    pub fn identity() -> Self {
        Self { scale: 1.0, offset: 0.0 }
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset == 0.0
    }

    /// Check that the transform is invertible
    pub fn validate(&self) -> BacnetResult<()> {
        if self.scale == 0.0 || !self.scale.is_finite() || !self.offset.is_finite() {
            return Err(BacnetError::Configuration(format!(
                "Invalid linear transform (scale {}, offset {})",
                self.scale, self.offset
            )));
        }
        Ok(())
    }

    /// Raw value to engineering value
    pub fn apply(&self, raw: f64) -> f64 {
        raw * self.scale + self.offset
    }

    /// Engineering value back to raw value
    pub fn invert(&self, value: f64) -> f64 {
        (value - self.offset) / self.scale
    }

    /// Apply to a decoded point value
    ///
    /// Non-numeric values pass through. An int with a non-identity transform
    /// becomes a float, since the result is generally fractional.
    pub fn apply_point(&self, value: PointValue) -> PointValue {
        if self.is_identity() {
            return value;
        }
        match value {
            PointValue::Int(i) => PointValue::Float(self.apply(i as f64)),
            PointValue::Float(f) => PointValue::Float(self.apply(f)),
            other => other,
        }
    }

    /// Invert a caller-supplied value for a register of `data_type`
    ///
    /// # Errors
    /// Returns `BacnetError::TypeMismatch` if a numeric register receives a
    /// non-numeric value, or the inverse is not finite or overflows an int register
    pub fn invert_point(&self, value: &PointValue, data_type: DataType) -> BacnetResult<PointValue> {
        if self.is_identity() || !data_type.is_numeric() {
            return Ok(value.clone());
        }
        let engineering = match value {
            PointValue::Int(i) => *i as f64,
            PointValue::Float(f) => *f,
            other => {
                return Err(BacnetError::TypeMismatch(format!(
                    "{} value {} is not numeric",
                    other.data_type(),
                    other
                )))
            }
        };
        let raw = self.invert(engineering);
        if !raw.is_finite() {
            return Err(BacnetError::TypeMismatch(format!(
                "{} has no finite raw value (scale {}, offset {})",
                value, self.scale, self.offset
            )));
        }
        match data_type {
            DataType::Int => {
                let rounded = raw.round();
                // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
                if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
                    return Err(BacnetError::TypeMismatch(format!(
                        "{} inverts to {} which exceeds the int range",
                        value, raw
                    )));
                }
                Ok(PointValue::Int(rounded as i64))
            }
            _ => Ok(PointValue::Float(raw)),
        }
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::identity()
    }
}
