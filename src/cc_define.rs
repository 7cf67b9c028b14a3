//! Serial API / command class 定義モジュール
//!
//! このモジュールは Z-Wave シリアル API の定数と、コマンドクラス層で共有する
//! 簡易型を提供します。
//! - 送信関数 ID（`FUNC_ID_*`）
//! - 送信オプション（ACK / 自動ルーティング等）
//! - コマンドクラス ID
//! - 状態要求フラグ（`RequestFlags`）
//!
//! NOTE: 外側のエンベロープ（SOF、長さ、チェックサム）はトランスポート側の責務です。

pub type NodeId = u8;
pub type InstanceId = u8;
pub type ValueIndex = u8;
pub type CommandClassId = u8;
pub type StateCode = u8;

/// Instance used when a node exposes a single occurrence of a command class.
pub const DEFAULT_INSTANCE: InstanceId = 1;

// Serial API function ids
pub const FUNC_ID_APPLICATION_COMMAND_HANDLER: u8 = 0x04;
pub const FUNC_ID_ZW_SEND_DATA: u8 = 0x13;

// Transmit options appended after the command payload
pub const TRANSMIT_OPTION_ACK: u8 = 0x01;
pub const TRANSMIT_OPTION_AUTO_ROUTE: u8 = 0x04;
pub const TRANSMIT_OPTIONS_DEFAULT: u8 = TRANSMIT_OPTION_ACK | TRANSMIT_OPTION_AUTO_ROUTE;

// Command class ids
pub const COMMAND_CLASS_BASIC: CommandClassId = 0x20;
pub const COMMAND_CLASS_SWITCH_BINARY: CommandClassId = 0x25;
pub const COMMAND_CLASS_PROTECTION: CommandClassId = 0x75;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Request,
    Response,
}

/// Which part of a node's state a caller wants refreshed.
///
/// Static data is requested once after inclusion, session data once per
/// application start, dynamic data whenever it may have changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct RequestFlags(u8);

impl RequestFlags {
    pub const STATIC: Self = Self(0x01);
    pub const SESSION: Self = Self(0x02);
    pub const DYNAMIC: Self = Self(0x04);

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for RequestFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}
