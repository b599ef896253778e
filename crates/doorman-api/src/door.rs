// Door state as reported by the MyQ `doorstate` attribute, and the two
// states a client may request.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Observed state of the garage door.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DoorState {
    Open,
    Closed,
    Opening,
    Closing,
    Unknown,
}

impl DoorState {
    /// Map a raw `doorstate` code. Anything unrecognized (or absent) is `Unknown`.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("1") => Self::Open,
            Some("2") => Self::Closed,
            Some("4") => Self::Opening,
            Some("5") => Self::Closing,
            _ => Self::Unknown,
        }
    }

    /// The state a toggle should drive the door towards.
    ///
    /// `Unknown` resolves to `Closed`.
    pub fn toggle_target(self) -> TargetState {
        match self {
            Self::Closed | Self::Closing => TargetState::Open,
            Self::Open | Self::Opening | Self::Unknown => TargetState::Closed,
        }
    }
}

/// A state that can be requested through `desireddoorstate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TargetState {
    Open,
    Closed,
}

impl TargetState {
    /// Numeric `AttributeValue` sent to the API: 1 opens, 0 closes.
    pub fn attribute_value(self) -> u8 {
        match self {
            Self::Open => 1,
            Self::Closed => 0,
        }
    }
}
