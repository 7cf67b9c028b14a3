use thiserror::Error;

use crate::value::{ValueKey, ValueType};

#[derive(Error, Debug)]
pub enum ZwaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    /// Report command arrived without the bytes its payload requires.
    #[error("malformed report for command class 0x{command_class:02X}: {len} byte(s)")]
    MalformedReport { command_class: u8, len: usize },

    #[error("state code {code} out of range (table has {count} entries)")]
    StateOutOfRange { code: u8, count: usize },

    #[error("no value registered for {0}")]
    UnknownValue(ValueKey),

    #[error("value {key} is not of type {expected:?}")]
    TypeMismatch { key: ValueKey, expected: ValueType },

    #[error("already registered")]
    AlreadyRegistered,
}
