use crate::cc_define::{
    CommandClassId, MessageType, NodeId, FUNC_ID_APPLICATION_COMMAND_HANDLER,
    FUNC_ID_ZW_SEND_DATA,
};
use crate::config::config as global_config;
use crate::error::ZwaveError;

/// Format bytes as space separated upper-case hex ("07 02 75 02 05").
#[must_use]
pub fn hex_dump(b: &[u8]) -> String {
    b.iter()
        .map(|x| format!("{x:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reply a sender waits for before the transport considers a frame complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpectedReply {
    pub function_id: u8,
    pub command_class_id: Option<CommandClassId>,
}

/// One outbound command, ready to be handed to a transport.
///
/// Byte layout produced by [`OutboundFrame::to_bytes`]:
///
/// ```text
/// +---------+-------------+---------+---------+-----------+------------+
/// | node_id | payload_len | cc id   | command | params... | tx options |
/// +---------+-------------+---------+---------+-----------+------------+
/// ```
///
/// `payload_len` counts the bytes from `cc id` through the last param.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundFrame {
    label: String,
    node_id: NodeId,
    message_type: MessageType,
    function_id: u8,
    callback_required: bool,
    expected_reply: Option<ExpectedReply>,
    payload: Vec<u8>,
    transmit_options: u8,
}

impl OutboundFrame {
    /// Builder for a ZW_SEND_DATA request addressed to `node_id`.
    ///
    /// 例:
    /// ```
    /// use zwave_cc::frame::OutboundFrame;
    /// let frame = OutboundFrame::send_data("ProtectionCmd_Get", 7)
    ///     .try_with_payload([0x75u8, 0x02])
    ///     .unwrap()
    ///     .with_transmit_options(0x05);
    /// assert_eq!(frame.to_bytes(), vec![7, 2, 0x75, 0x02, 0x05]);
    /// ```
    #[must_use]
    pub fn send_data(label: impl Into<String>, node_id: NodeId) -> Self {
        Self {
            label: label.into(),
            node_id,
            message_type: MessageType::Request,
            function_id: FUNC_ID_ZW_SEND_DATA,
            callback_required: true,
            expected_reply: None,
            payload: Vec::new(),
            transmit_options: global_config().transmit_options,
        }
    }

    /// Fallible payload setter; the length field is a single byte.
    pub fn try_with_payload<P: AsRef<[u8]>>(mut self, payload: P) -> Result<Self, ZwaveError> {
        let slice = payload.as_ref();
        if slice.len() < 2 {
            return Err(ZwaveError::Protocol(format!(
                "command payload needs command class and command bytes, got {n}",
                n = slice.len()
            )));
        }
        if u8::try_from(slice.len()).is_err() {
            return Err(ZwaveError::Protocol(format!(
                "command payload too large to fit into u8: {n}",
                n = slice.len()
            )));
        }
        self.payload = slice.to_vec();
        Ok(self)
    }
    #[must_use]
    pub const fn with_transmit_options(mut self, options: u8) -> Self {
        self.transmit_options = options;
        self
    }
    /// Mark the frame as answered by an application command of `command_class_id`.
    #[must_use]
    pub const fn expecting_report(mut self, command_class_id: CommandClassId) -> Self {
        self.expected_reply = Some(ExpectedReply {
            function_id: FUNC_ID_APPLICATION_COMMAND_HANDLER,
            command_class_id: Some(command_class_id),
        });
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
    #[must_use]
    pub const fn node_id(&self) -> NodeId {
        self.node_id
    }
    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        self.message_type
    }
    #[must_use]
    pub const fn function_id(&self) -> u8 {
        self.function_id
    }
    #[must_use]
    pub const fn callback_required(&self) -> bool {
        self.callback_required
    }
    #[must_use]
    pub const fn reply_required(&self) -> bool {
        self.expected_reply.is_some()
    }
    #[must_use]
    pub const fn expected_reply(&self) -> Option<ExpectedReply> {
        self.expected_reply
    }
    #[must_use]
    pub const fn transmit_options(&self) -> u8 {
        self.transmit_options
    }

    /// Bytes from the command class id onwards, without transmit options.
    #[must_use]
    pub fn command_payload(&self) -> &[u8] {
        &self.payload
    }

    #[must_use]
    pub fn payload_len(&self) -> u8 {
        // bounded by try_with_payload
        u8::try_from(self.payload.len()).unwrap_or(u8::MAX)
    }

    #[must_use]
    pub fn command_class_id(&self) -> Option<CommandClassId> {
        self.payload.first().copied()
    }

    #[must_use]
    pub fn command(&self) -> Option<u8> {
        self.payload.get(1).copied()
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 3);
        out.push(self.node_id);
        out.push(self.payload_len());
        out.extend_from_slice(&self.payload);
        out.push(self.transmit_options);
        out
    }
}

/// Log a frame as hex when `ZWAVE_LOG_FRAMES=1`.
pub fn maybe_log_frame(direction: &str, frame: &OutboundFrame) {
    if global_config().log_frames {
        log::debug!(
            "[ZW {direction} {label}] {hex}",
            label = frame.label(),
            hex = hex_dump(&frame.to_bytes())
        );
    }
}

/// Split an inbound application command into its command class id and the
/// command bytes that follow it. Returns `None` for an empty buffer.
#[must_use]
pub fn split_command_class(payload: &[u8]) -> Option<(CommandClassId, &[u8])> {
    payload.split_first().map(|(cc, rest)| (*cc, rest))
}
