use crate::cc_define::{CommandClassId, InstanceId, NodeId, RequestFlags};
use crate::error::ZwaveError;
use crate::transport::Transport;
use crate::value::Value;
use crate::value_store::ValueStore;

/// Collaborators an adapter may use during one call.
///
/// Adapters keep no per-node state; everything they need is passed in here.
#[derive(Clone, Copy)]
pub struct NodeContext<'a> {
    pub node_id: NodeId,
    pub transport: &'a dyn Transport,
    pub values: &'a dyn ValueStore,
}

impl<'a> NodeContext<'a> {
    #[must_use]
    pub fn new(node_id: NodeId, transport: &'a dyn Transport, values: &'a dyn ValueStore) -> Self {
        Self {
            node_id,
            transport,
            values,
        }
    }
}

/// Common interface of every command class adapter.
pub trait CommandClass: Send + Sync {
    fn command_class_id(&self) -> CommandClassId;

    fn name(&self) -> &'static str;

    /// Request the parts of the node state selected by `flags`.
    /// Returns true when at least one request was sent.
    fn request_state(&self, ctx: &NodeContext<'_>, flags: RequestFlags, instance: InstanceId)
        -> bool;

    /// Request the current value unconditionally.
    fn request_value(&self, ctx: &NodeContext<'_>, instance: InstanceId);

    /// Handle the command bytes of an application command addressed to this
    /// command class (command byte first).
    ///
    /// `Ok(false)` means the command is not one this adapter handles.
    fn handle_msg(
        &self,
        ctx: &NodeContext<'_>,
        data: &[u8],
        instance: InstanceId,
    ) -> Result<bool, ZwaveError>;

    /// Send `value` to the node. `Ok(false)` when the value kind does not apply.
    fn set_value(&self, ctx: &NodeContext<'_>, value: &Value) -> Result<bool, ZwaveError>;

    /// Declare the values this command class owns for `instance`.
    fn create_vars(&self, ctx: &NodeContext<'_>, instance: InstanceId) -> Result<(), ZwaveError>;
}
