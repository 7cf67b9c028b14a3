use std::collections::BTreeMap;

use crate::cc_catalog::display_name;
use crate::cc_define::{CommandClassId, InstanceId, RequestFlags};
use crate::command_class::{CommandClass, NodeContext};
use crate::error::ZwaveError;
use crate::frame::split_command_class;
use crate::protection::Protection;
use crate::value::Value;

/// Command class adapters keyed by id, shared by every node.
///
/// Adapters are stateless, so one registry serves all nodes; per-node state
/// arrives through the [`NodeContext`] of each call.
#[derive(Default)]
pub struct CommandClassRegistry {
    classes: BTreeMap<CommandClassId, Box<dyn CommandClass>>,
}

impl CommandClassRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every adapter this crate implements.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.classes
            .insert(crate::cc_define::COMMAND_CLASS_PROTECTION, Box::new(Protection::new()));
        reg
    }

    /// Add an adapter. Fails with `AlreadyRegistered` when its id is taken.
    pub fn register(&mut self, cc: Box<dyn CommandClass>) -> Result<(), ZwaveError> {
        let id = cc.command_class_id();
        if self.classes.contains_key(&id) {
            return Err(ZwaveError::AlreadyRegistered);
        }
        self.classes.insert(id, cc);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: CommandClassId) -> Option<&dyn CommandClass> {
        self.classes.get(&id).map(|cc| cc.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = CommandClassId> + '_ {
        self.classes.keys().copied()
    }

    /// Route an application command (`payload[0]` = command class id).
    ///
    /// `Ok(false)` when no adapter claims the command.
    pub fn handle_application_command(
        &self,
        ctx: &NodeContext<'_>,
        instance: InstanceId,
        payload: &[u8],
    ) -> Result<bool, ZwaveError> {
        let Some((cc_id, data)) = split_command_class(payload) else {
            tracing::debug!(node_id = ctx.node_id, "empty application command");
            return Ok(false);
        };
        let Some(cc) = self.get(cc_id) else {
            tracing::debug!(
                node_id = ctx.node_id,
                "no handler for {name}",
                name = display_name(cc_id)
            );
            return Ok(false);
        };
        let handled = cc.handle_msg(ctx, data, instance)?;
        if !handled {
            tracing::debug!(
                node_id = ctx.node_id,
                "{name} did not recognize command {data:02X?}",
                name = cc.name()
            );
        }
        Ok(handled)
    }

    /// Forward a user write to the adapter owning `value`.
    pub fn set_value(&self, ctx: &NodeContext<'_>, value: &Value) -> Result<bool, ZwaveError> {
        match self.get(value.key.command_class_id) {
            Some(cc) => cc.set_value(ctx, value),
            None => Ok(false),
        }
    }

    /// Let every adapter declare its values for `instance`.
    pub fn create_vars(&self, ctx: &NodeContext<'_>, instance: InstanceId) -> Result<(), ZwaveError> {
        for cc in self.classes.values() {
            cc.create_vars(ctx, instance)?;
        }
        Ok(())
    }

    /// Ask every adapter for the state selected by `flags`. Returns how many
    /// adapters sent a request.
    pub fn request_state(
        &self,
        ctx: &NodeContext<'_>,
        flags: RequestFlags,
        instance: InstanceId,
    ) -> usize {
        self.classes
            .values()
            .filter(|cc| cc.request_state(ctx, flags, instance))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;
    use crate::value_store::{MemoryValueStore, ValueStore};

    #[test]
    fn duplicate_registration_rejected() {
        let mut reg = CommandClassRegistry::with_defaults();
        assert!(matches!(
            reg.register(Box::new(Protection::new())),
            Err(ZwaveError::AlreadyRegistered)
        ));
        assert_eq!(reg.ids().collect::<Vec<_>>(), vec![0x75]);
    }

    #[test]
    fn unknown_command_class_not_handled() {
        let reg = CommandClassRegistry::with_defaults();
        let t = RecordingTransport::new();
        let store = MemoryValueStore::with_capacity(4);
        let ctx = NodeContext::new(7, &t, &store);
        assert!(!reg
            .handle_application_command(&ctx, 1, &[0x25, 0x03, 0xFF])
            .expect("dispatch"));
        assert!(!reg.handle_application_command(&ctx, 1, &[]).expect("dispatch"));
    }

    #[test]
    fn bare_command_class_byte_is_malformed() {
        let reg = CommandClassRegistry::with_defaults();
        let t = RecordingTransport::new();
        let store = MemoryValueStore::with_capacity(4);
        let ctx = NodeContext::new(7, &t, &store);
        reg.create_vars(&ctx, 1).expect("create vars");
        let res = reg.handle_application_command(&ctx, 1, &[0x75]);
        assert!(matches!(
            res,
            Err(ZwaveError::MalformedReport { command_class: 0x75, len: 0 })
        ));
        assert_eq!(store.selected_code(&Protection::value_key(7, 1)), Some(0));
    }
}
