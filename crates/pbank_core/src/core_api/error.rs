use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptySource,
    NoAvailableSlot,
    EmptyName,
    NoSuchSlot,
    NoSuchBankEntry,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    NotFound,
    Parse,
    Write,
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn rejected(rejection: Rejection, message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::Rejected(rejection), message)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self.code {
            CoreErrorCode::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            CoreErrorCode::Rejected(rejection) => write!(f, "{:?}: {}", rejection, self.message),
            code => write!(f, "{:?}: {}", code, self.message),
        }
    }
}

impl Error for CoreError {}
