//! Simulated Z-Wave node for exercising `zwave_cc` adapters without hardware.
//!
//! [`MockNode`] consumes frames from a [`FrameQueue`], answers Protection Get
//! with a Report carrying its current state and applies Protection Set.
//! [`run_session`] wires a node, a registry and a value store together and
//! plays register -> Get -> Report -> (Set -> Get -> Report).

pub mod config;

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use tokio::sync::mpsc;

use zwave_cc::cc_define::{NodeId, RequestFlags, StateCode, COMMAND_CLASS_PROTECTION};
use zwave_cc::commands::CommandCode;
use zwave_cc::frame::{hex_dump, OutboundFrame};
use zwave_cc::protection::{Protection, PROTECTION_STATE_COUNT};
use zwave_cc::transport::{ChannelTransport, FrameQueue};
use zwave_cc::value::ValueData;
use zwave_cc::value_store::{MemoryValueStore, ValueStore};
use zwave_cc::{CommandClassRegistry, NodeContext};

pub use config::MockConfig;

/// Application command received from a node: `payload[0]` is the command class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub node_id: NodeId,
    pub payload: Vec<u8>,
}

#[derive(Debug)]
pub struct MockNode {
    node_id: NodeId,
    state: AtomicU8,
}

impl MockNode {
    #[must_use]
    pub fn new(node_id: NodeId, initial_state: StateCode) -> Self {
        Self {
            node_id,
            state: AtomicU8::new(initial_state),
        }
    }

    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    #[must_use]
    pub fn state(&self) -> StateCode {
        self.state.load(Ordering::SeqCst)
    }

    /// Apply `frame` and return the application command the device would send
    /// back, if any. Frames for other nodes or command classes are ignored.
    pub fn respond(&self, frame: &OutboundFrame) -> Option<Vec<u8>> {
        if frame.node_id() != self.node_id
            || frame.command_class_id() != Some(COMMAND_CLASS_PROTECTION)
        {
            return None;
        }
        match frame.command().and_then(CommandCode::from_byte)? {
            CommandCode::Get => Some(vec![
                COMMAND_CLASS_PROTECTION,
                CommandCode::Report.as_byte(),
                self.state(),
            ]),
            CommandCode::Set => {
                let code = *frame.command_payload().get(2)?;
                // devices ignore values they do not support
                if usize::from(code) < PROTECTION_STATE_COUNT {
                    self.state.store(code, Ordering::SeqCst);
                } else {
                    tracing::warn!(node_id = self.node_id, code, "ignoring unsupported state");
                }
                None
            }
            CommandCode::Report => None,
        }
    }

    /// Serve frames until the queue closes or the report receiver is dropped.
    pub async fn serve(
        self: Arc<Self>,
        mut queue: FrameQueue,
        reports: mpsc::UnboundedSender<InboundCommand>,
    ) {
        while let Some(frame) = queue.recv().await {
            tracing::debug!(
                node_id = self.node_id,
                "[mock recv {}] {}",
                frame.label(),
                hex_dump(&frame.to_bytes())
            );
            if let Some(payload) = self.respond(&frame) {
                let cmd = InboundCommand {
                    node_id: self.node_id,
                    payload,
                };
                if reports.send(cmd).is_err() {
                    break;
                }
            }
        }
    }
}

async fn next_report(
    rx: &mut mpsc::UnboundedReceiver<InboundCommand>,
    timeout: Duration,
) -> anyhow::Result<InboundCommand> {
    tokio::time::timeout(timeout, rx.recv())
        .await
        .context("timed out waiting for report")?
        .ok_or_else(|| anyhow!("mock node stopped"))
}

/// Play one scripted session against a fresh [`MockNode`] and return the
/// final value store contents as JSON.
pub async fn run_session(cfg: &MockConfig) -> anyhow::Result<serde_json::Value> {
    let (transport, queue) = ChannelTransport::new();
    let (report_tx, mut report_rx) = mpsc::unbounded_channel();
    let node = Arc::new(MockNode::new(cfg.node_id, cfg.initial_state));
    let server = tokio::spawn(Arc::clone(&node).serve(queue, report_tx));

    let store = MemoryValueStore::new();
    let registry = CommandClassRegistry::with_defaults();
    let timeout = Duration::from_millis(cfg.reply_timeout_ms);
    {
        let ctx = NodeContext::new(cfg.node_id, &transport, &store);
        registry.create_vars(&ctx, cfg.instance)?;
        let sent = registry.request_state(&ctx, RequestFlags::SESSION, cfg.instance);
        tracing::info!(node_id = cfg.node_id, "requested session state from {sent} command class(es)");
        for _ in 0..sent {
            let report = next_report(&mut report_rx, timeout).await?;
            registry.handle_application_command(&ctx, cfg.instance, &report.payload)?;
        }

        if let Some(target) = cfg.set.as_deref() {
            let key = Protection::value_key(cfg.node_id, cfg.instance);
            let mut value = store
                .get(&key)
                .ok_or_else(|| anyhow!("no Protection value registered for {key}"))?;
            let ValueData::List(list) = &mut value.data else {
                bail!("Protection value {key} is not a list");
            };
            let selected = match target.parse::<StateCode>() {
                Ok(code) => list.select_by_value(code),
                Err(_) => list.select_by_label(target),
            };
            if !selected {
                bail!("unknown protection state: {target}");
            }
            if !registry.set_value(&ctx, &value)? {
                bail!("set not applicable for {key}");
            }
            if let Some(cc) = registry.get(COMMAND_CLASS_PROTECTION) {
                cc.request_value(&ctx, cfg.instance);
                let report = next_report(&mut report_rx, timeout).await?;
                registry.handle_application_command(&ctx, cfg.instance, &report.payload)?;
            }
        }
    }
    drop(transport);
    server.await.context("mock node task")?;
    Ok(store.snapshot_json()?)
}
