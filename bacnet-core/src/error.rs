use std::time::Duration;
use thiserror::Error;

/// Main error type for BACnet driver operations
///
/// Variants follow the failure classes the scheduling layer has to tell apart:
/// configuration problems are fatal to a device, transport problems are isolated
/// to the points of one request, usage errors are fatal to one call.
#[derive(Error, Debug)]
pub enum BacnetError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Transport proxy busy: {0}")]
    Busy(String),

    #[error("Segmentation not supported by device: {0}")]
    SegmentationNotSupported(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Property error: {class}/{code}")]
    Property { class: String, code: String },

    #[error("Point not found: {0}")]
    PointNotFound(String),

    #[error("Point is not writable: {0}")]
    NotWritable(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BacnetError {
    /// Whether the transport proxy signalled a condition worth one more attempt
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BacnetError::Busy(_))
    }

    /// Whether the error stems from configuration or driver state
    pub fn is_configuration(&self) -> bool {
        matches!(self, BacnetError::Configuration(_))
    }

    /// Whether the error is a transport-level failure (timeout included)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BacnetError::Timeout(_)
                | BacnetError::Transport(_)
                | BacnetError::Busy(_)
                | BacnetError::Io(_)
        )
    }
}

/// Result type alias for BACnet driver operations
pub type BacnetResult<T> = Result<T, BacnetError>;
