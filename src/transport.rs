//! Transport collaborator.
//!
//! Adapters hand frames to a [`Transport`] and return immediately: queuing,
//! retries, acknowledgement and the serial envelope all belong to whatever
//! sits behind the trait. [`ChannelTransport`] forwards frames over a tokio
//! unbounded channel to a [`FrameQueue`] consumer (a driver task, a mock node
//! or a test).

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::frame::{maybe_log_frame, OutboundFrame};

pub trait Transport: Send + Sync {
    /// Fire-and-forget: ownership of `frame` passes to the transport.
    fn send(&self, frame: OutboundFrame);
}

#[derive(Clone, Debug)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<OutboundFrame>,
}

/// Receiving side of a [`ChannelTransport`].
#[derive(Debug)]
pub struct FrameQueue {
    rx: mpsc::UnboundedReceiver<OutboundFrame>,
}

impl ChannelTransport {
    #[allow(clippy::new_ret_no_self)]
    #[must_use]
    pub fn new() -> (Self, FrameQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, FrameQueue { rx })
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Transport for ChannelTransport {
    fn send(&self, frame: OutboundFrame) {
        maybe_log_frame("send", &frame);
        if let Err(e) = self.tx.send(frame) {
            tracing::warn!(
                node_id = e.0.node_id(),
                label = e.0.label(),
                "frame queue closed; dropping frame"
            );
        }
    }
}

impl FrameQueue {
    /// Wait for the next frame. `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<OutboundFrame> {
        self.rx.recv().await
    }

    #[must_use]
    pub fn try_recv(&mut self) -> Option<OutboundFrame> {
        self.rx.try_recv().ok()
    }

    /// Take every frame queued so far without waiting.
    pub fn drain(&mut self) -> Vec<OutboundFrame> {
        std::iter::from_fn(|| self.rx.try_recv().ok()).collect()
    }
}

/// Keeps every frame in memory. Handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundFrame>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> Vec<OutboundFrame> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn take(&self) -> Vec<OutboundFrame> {
        self.sent
            .lock()
            .map(|mut v| std::mem::take(&mut *v))
            .unwrap_or_default()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, frame: OutboundFrame) {
        maybe_log_frame("record", &frame);
        if let Ok(mut v) = self.sent.lock() {
            v.push(frame);
        }
    }
}
