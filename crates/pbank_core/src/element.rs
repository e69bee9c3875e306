use std::fmt;

use serde::{Deserialize, Serialize};

/// Elemental typing as stored in `element`, `subElement` and `SpiritElement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    None,
    Earth,
    Fire,
    Water,
    Thunder,
    Wind,
    Frost,
    Solar,
    Lunar,
    Unknown(i32),
}

impl Element {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Earth,
            2 => Self::Fire,
            3 => Self::Water,
            4 => Self::Thunder,
            5 => Self::Wind,
            6 => Self::Frost,
            7 => Self::Solar,
            8 => Self::Lunar,
            other => Self::Unknown(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::None => "N/A",
            Self::Earth => "Earth",
            Self::Fire => "Fire",
            Self::Water => "Water",
            Self::Thunder => "Thunder",
            Self::Wind => "Wind",
            Self::Frost => "Frost",
            Self::Solar => "Solar",
            Self::Lunar => "Lunar",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}
