use serde::Serialize;
use std::fmt;

/// Lifecycle state of a driver
///
/// `Unconfigured → Ready` on the first successful configure; `Ready → Ready` on
/// every reconfigure; any state `→ Stopped` on stop, which is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    Unconfigured,
    Ready,
    Stopped,
}

impl DriverState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DriverState::Ready)
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Unconfigured => "unconfigured",
            DriverState::Ready => "ready",
            DriverState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
