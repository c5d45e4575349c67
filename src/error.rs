use std::fmt;

use crate::types::{Characteristic, CharacteristicValue};

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    NotConnected,
    Transport(String),
    InvalidValue {
        characteristic: Characteristic,
        value: CharacteristicValue,
    },
    ReadOnly(Characteristic),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::NotConnected => write!(f, "heat pump not connected"),
            Error::Transport(msg) => write!(f, "heat pump transport error: {msg}"),
            Error::InvalidValue {
                characteristic,
                value,
            } => write!(f, "invalid value {value} for {characteristic}"),
            Error::ReadOnly(c) => write!(f, "characteristic is read-only: {c}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
