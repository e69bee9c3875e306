use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_is_male(is_male: bool) -> Self {
        if is_male { Self::Male } else { Self::Female }
    }

    pub fn is_male(&self) -> bool {
        matches!(self, Self::Male)
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "m" | "male" => Some(Self::Male),
            "f" | "female" => Some(Self::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
