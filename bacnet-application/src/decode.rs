//! Result decoding
//!
//! Pairs a read reply with the group that produced it and turns each raw value
//! into a point value, or a [`PointFailure`] for that point alone.

use crate::service::read::ReadGroup;
use bacnet_core::{BacnetError, BacnetResult, PointValue, PropertyOutcome};
use bacnet_interface::RegisterModel;
use serde::Serialize;
use std::fmt;

/// Why a point has no value in a scrape result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum PointFailure {
    /// The request carrying the point did not complete in time
    Timeout,
    /// The request carrying the point failed at the transport level
    Transport { message: String },
    /// The device returned a value the point's data type cannot hold
    Decode { message: String },
    /// The device returned an error for this property
    Property { class: String, code: String },
    /// The configuration was replaced while the request was in flight
    Superseded,
}

impl PointFailure {
    /// Failure recorded for every point of a group that failed as a whole
    pub fn from_error(error: &BacnetError) -> Self {
        match error {
            BacnetError::Timeout(_) => PointFailure::Timeout,
            BacnetError::Decode(message) => PointFailure::Decode {
                message: message.clone(),
            },
            BacnetError::Property { class, code } => PointFailure::Property {
                class: class.clone(),
                code: code.clone(),
            },
            other => PointFailure::Transport {
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for PointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointFailure::Timeout => write!(f, "timeout"),
            PointFailure::Transport { message } => write!(f, "transport: {}", message),
            PointFailure::Decode { message } => write!(f, "decode: {}", message),
            PointFailure::Property { class, code } => write!(f, "property: {}/{}", class, code),
            PointFailure::Superseded => write!(f, "superseded"),
        }
    }
}

/// Outcome for one point
pub type PointResult = Result<PointValue, PointFailure>;

/// Decodes read replies
pub struct ResultDecoder;

impl ResultDecoder {
    /// Decode the reply for a group
    ///
    /// # Returns
    /// One `(name, result)` per register, in group order
    ///
    /// # Errors
    /// `BacnetError::Transport` if the reply does not carry exactly one outcome per register
    pub fn decode(group: &ReadGroup, outcomes: Vec<PropertyOutcome>) -> BacnetResult<Vec<(String, PointResult)>> {
        if outcomes.len() != group.len() {
            return Err(BacnetError::Transport(format!(
                "Reply carries {} values for {} requested properties",
                outcomes.len(),
                group.len()
            )));
        }

        Ok(group
            .registers()
            .iter()
            .zip(outcomes)
            .map(|(register, outcome)| {
                let result = Self::decode_point(register, outcome).map_err(|e| {
                    log::warn!("Point {} failed to decode: {}", register.name(), e);
                    PointFailure::from_error(&e)
                });
                (register.name().to_string(), result)
            })
            .collect())
    }

    /// Decode a single outcome for a register, applying its transform
    ///
    /// # Errors
    /// - `BacnetError::Property` if the device reported an error for the property
    /// - `BacnetError::Decode` if the value does not fit the register's data type
    pub fn decode_point(register: &RegisterModel, outcome: PropertyOutcome) -> BacnetResult<PointValue> {
        match outcome {
            PropertyOutcome::Value(raw) => {
                let value = register.data_type().decode(&raw)?;
                Ok(register.transform().apply_point(value))
            }
            PropertyOutcome::Error { class, code } => Err(BacnetError::Property { class, code }),
        }
    }

    /// Mark every point of a group with the same failure
    pub fn fail_group(group: &ReadGroup, failure: PointFailure) -> Vec<(String, PointResult)> {
        group
            .names()
            .map(|name| (name.to_string(), Err(failure.clone())))
            .collect()
    }
}
