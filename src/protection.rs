//! COMMAND_CLASS_PROTECTION (0x75)
//!
//! 機器のローカル操作（ボタン等）を保護するモードを扱うコマンドクラスです。
//! - Get: 現在の保護状態を要求 `[0x75, 0x02]`
//! - Set: 保護状態を設定 `[0x75, 0x01, state]`
//! - Report: 機器からの状態通知 `[0x03, state]`（コマンドクラス ID は除去済み）
//!
//! 状態値は [`PROTECTION_STATE_LABELS`] の添字です。範囲外の値はプロトコル違反として
//! エラーを返し、値ストアは更新しません。

use crate::cc_define::{
    InstanceId, NodeId, RequestFlags, StateCode, ValueIndex, COMMAND_CLASS_PROTECTION,
};
use crate::command_class::{CommandClass, NodeContext};
use crate::commands::CommandCode;
use crate::error::ZwaveError;
use crate::frame::OutboundFrame;
use crate::state_table::StateTable;
use crate::value::{ListItem, ListValueSpec, Value, ValueData, ValueGenre, ValueKey};

pub const PROTECTION_STATE_COUNT: usize = 3;

pub const PROTECTION_STATE_LABELS: [&str; PROTECTION_STATE_COUNT] = [
    "Unprotected",
    "Protection by Sequence",
    "No Operation Possible",
];

/// Index of the protection list value within its instance.
pub const PROTECTION_VALUE_INDEX: ValueIndex = 0;

const VALUE_LABEL: &str = "Protection";

/// Result of looking at an inbound command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// Not a Report; another command or adapter may claim it.
    NotRecognized,
    /// A Report carrying a state code that indexes the table.
    State(StateCode),
}

#[derive(Debug, Clone)]
pub struct Protection {
    states: StateTable,
}

impl Default for Protection {
    fn default() -> Self {
        Self::new()
    }
}

impl Protection {
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: StateTable::from_static(&PROTECTION_STATE_LABELS),
        }
    }

    /// Adapter using a custom state table (e.g. a device-specific label set).
    #[must_use]
    pub const fn with_states(states: StateTable) -> Self {
        Self { states }
    }

    #[must_use]
    pub const fn states(&self) -> &StateTable {
        &self.states
    }

    #[must_use]
    pub const fn value_key(node_id: NodeId, instance: InstanceId) -> ValueKey {
        ValueKey::new(
            node_id,
            COMMAND_CLASS_PROTECTION,
            instance,
            PROTECTION_VALUE_INDEX,
        )
    }

    /// `[node, 2, 0x75, Get]` + tx options
    pub fn encode_get(&self, node_id: NodeId) -> Result<OutboundFrame, ZwaveError> {
        Ok(OutboundFrame::send_data("ProtectionCmd_Get", node_id)
            .try_with_payload([COMMAND_CLASS_PROTECTION, CommandCode::Get.as_byte()])?
            .expecting_report(COMMAND_CLASS_PROTECTION))
    }

    /// `[node, 3, 0x75, Set, code]` + tx options
    ///
    /// `code` is not range checked: it comes from a list value that was
    /// populated from this adapter's table.
    pub fn encode_set(&self, node_id: NodeId, code: StateCode) -> Result<OutboundFrame, ZwaveError> {
        OutboundFrame::send_data("Protection Set", node_id).try_with_payload([
            COMMAND_CLASS_PROTECTION,
            CommandCode::Set.as_byte(),
            code,
        ])
    }

    /// Decode the command bytes of an inbound Protection message.
    ///
    /// Only byte 0 is inspected until it is known to be a Report. An empty
    /// buffer, a Report shorter than two bytes or one carrying a code outside
    /// the table is an error.
    pub fn decode_report(&self, data: &[u8]) -> Result<Decoded, ZwaveError> {
        let Some(&command) = data.first() else {
            return Err(ZwaveError::MalformedReport {
                command_class: COMMAND_CLASS_PROTECTION,
                len: 0,
            });
        };
        if CommandCode::from_byte(command) != Some(CommandCode::Report) {
            return Ok(Decoded::NotRecognized);
        }
        let code = *data.get(1).ok_or(ZwaveError::MalformedReport {
            command_class: COMMAND_CLASS_PROTECTION,
            len: data.len(),
        })?;
        if !self.states.contains(code) {
            return Err(ZwaveError::StateOutOfRange {
                code,
                count: self.states.len(),
            });
        }
        Ok(Decoded::State(code))
    }

    fn list_spec(&self, node_id: NodeId, instance: InstanceId) -> ListValueSpec {
        ListValueSpec {
            key: Self::value_key(node_id, instance),
            genre: ValueGenre::System,
            label: VALUE_LABEL.to_string(),
            units: String::new(),
            read_only: false,
            items: self
                .states
                .iter()
                .map(|(value, label)| ListItem {
                    label: label.to_string(),
                    value,
                })
                .collect(),
            default_index: 0,
        }
    }
}

impl CommandClass for Protection {
    fn command_class_id(&self) -> u8 {
        COMMAND_CLASS_PROTECTION
    }

    fn name(&self) -> &'static str {
        "COMMAND_CLASS_PROTECTION"
    }

    fn request_state(&self, ctx: &NodeContext<'_>, flags: RequestFlags, instance: InstanceId) -> bool {
        if flags.contains(RequestFlags::SESSION) {
            self.request_value(ctx, instance);
            return true;
        }
        false
    }

    fn request_value(&self, ctx: &NodeContext<'_>, _instance: InstanceId) {
        match self.encode_get(ctx.node_id) {
            Ok(frame) => ctx.transport.send(frame),
            Err(e) => tracing::error!(node_id = ctx.node_id, "ProtectionCmd_Get: {e}"),
        }
    }

    fn handle_msg(
        &self,
        ctx: &NodeContext<'_>,
        data: &[u8],
        instance: InstanceId,
    ) -> Result<bool, ZwaveError> {
        let code = match self.decode_report(data) {
            Ok(Decoded::NotRecognized) => return Ok(false),
            Ok(Decoded::State(code)) => code,
            Err(e) => {
                tracing::warn!(
                    node_id = ctx.node_id,
                    instance,
                    "rejected Protection report: {e}"
                );
                return Err(e);
            }
        };
        let label = self.states.checked_label(code)?;
        tracing::info!(
            "Received a Protection report from node {}: {}",
            ctx.node_id,
            label
        );

        let key = Self::value_key(ctx.node_id, instance);
        if ctx.values.get(&key).is_none() {
            tracing::debug!("no Protection value for {key}; report ignored");
            return Ok(true);
        }
        ctx.values.push(&key, code)?;
        Ok(true)
    }

    fn set_value(&self, ctx: &NodeContext<'_>, value: &Value) -> Result<bool, ZwaveError> {
        let ValueData::List(list) = &value.data else {
            tracing::debug!("Protection::Set ignored for {:?}", value.id());
            return Ok(false);
        };
        let Some(item) = list.selected_item() else {
            return Ok(false);
        };
        tracing::info!(
            "Protection::Set - Setting protection state on node {} to '{}'",
            ctx.node_id,
            item.label
        );
        let frame = self.encode_set(ctx.node_id, item.value)?;
        ctx.transport.send(frame);
        Ok(true)
    }

    fn create_vars(&self, ctx: &NodeContext<'_>, instance: InstanceId) -> Result<(), ZwaveError> {
        ctx.values
            .create_list_value(self.list_spec(ctx.node_id, instance))
    }
}
