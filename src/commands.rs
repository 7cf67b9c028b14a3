use std::str::FromStr;

/// Command byte shared by the simple get/set/report command classes
/// (Protection, Basic, Switch Binary, ...).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum CommandCode {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

impl CommandCode {
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        *self as u8
    }

    #[must_use]
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::Set),
            0x02 => Some(Self::Get),
            0x03 => Some(Self::Report),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Get => "get",
            Self::Report => "report",
        }
    }

    /// Query role: asks the node for its current state.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, Self::Get)
    }

    /// Mutate role: carries a new state for the node.
    #[must_use]
    pub const fn is_mutate(&self) -> bool {
        matches!(self, Self::Set)
    }

    /// Notify role: sent by the node, either solicited or unsolicited.
    #[must_use]
    pub const fn is_notify(&self) -> bool {
        matches!(self, Self::Report)
    }
}

impl TryFrom<u8> for CommandCode {
    type Error = u8;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        Self::from_byte(b).ok_or(b)
    }
}

impl FromStr for CommandCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Self::Set),
            "get" => Ok(Self::Get),
            "report" => Ok(Self::Report),
            other => Err(format!("unknown command id: {other}")),
        }
    }
}
