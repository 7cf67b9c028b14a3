//! Value store collaborator.
//!
//! [`ValueStore`] is the boundary adapters talk to; they never own value
//! storage. [`MemoryValueStore`] is an in-process implementation that
//! serializes access with an `RwLock` and publishes every mutation on a
//! tokio broadcast channel.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;

use crate::cc_define::StateCode;
use crate::config::config as global_config;
use crate::error::ZwaveError;
use crate::value::{ListValueSpec, Value, ValueData, ValueKey, ValueList, ValueType};

pub trait ValueStore: Send + Sync {
    /// Snapshot of the value at `key`, if one has been created.
    fn get(&self, key: &ValueKey) -> Option<Value>;

    /// Declare a list value. Creating an existing key replaces its definition
    /// in place; the current selection is kept when still in range.
    fn create_list_value(&self, spec: ListValueSpec) -> Result<(), ZwaveError>;

    /// Record `code` as the current value of a list entry and notify observers.
    fn push(&self, key: &ValueKey, code: StateCode) -> Result<(), ZwaveError>;

    /// Underlying code of the selected item of a list entry.
    fn selected_code(&self, key: &ValueKey) -> Option<StateCode> {
        self.get(key)
            .and_then(|v| v.data.as_list().and_then(|l| l.selected_item()).map(|i| i.value))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Added,
    /// A push stored a different value.
    Changed,
    /// A push repeated the value already held.
    Refreshed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueNotification {
    pub key: ValueKey,
    pub kind: NotificationKind,
}

/// Upper bound for the notification buffer; broadcast slots are allocated up front.
pub const MAX_NOTIFY_CAPACITY: usize = 65_536;

pub struct MemoryValueStore {
    values: RwLock<BTreeMap<ValueKey, Value>>,
    notify: broadcast::Sender<ValueNotification>,
}

impl Default for MemoryValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(global_config().notify_capacity)
    }

    /// `capacity` bounds how many notifications a slow subscriber may lag behind.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (notify, _) = broadcast::channel(capacity.clamp(1, MAX_NOTIFY_CAPACITY));
        Self {
            values: RwLock::new(BTreeMap::new()),
            notify,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ValueNotification> {
        self.notify.subscribe()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All values belonging to `node_id`, ordered by key.
    #[must_use]
    pub fn values_for_node(&self, node_id: u8) -> Vec<Value> {
        self.read()
            .values()
            .filter(|v| v.key.node_id == node_id)
            .cloned()
            .collect()
    }

    /// JSON dump of every value, ordered by key.
    pub fn snapshot_json(&self) -> Result<serde_json::Value, ZwaveError> {
        let m = self.read();
        let all: Vec<&Value> = m.values().collect();
        serde_json::to_value(all)
            .map_err(|e| ZwaveError::Protocol(format!("serialize values: {e}")))
    }

    // mutations are single inserts or selection updates, so a poisoned map is still consistent
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<ValueKey, Value>> {
        self.values.read().unwrap_or_else(|e| {
            tracing::warn!("value store lock poisoned; recovering");
            PoisonError::into_inner(e)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<ValueKey, Value>> {
        self.values.write().unwrap_or_else(|e| {
            tracing::warn!("value store lock poisoned; recovering");
            PoisonError::into_inner(e)
        })
    }

    fn publish(&self, key: ValueKey, kind: NotificationKind) {
        // no subscribers is not an error
        let _ = self.notify.send(ValueNotification { key, kind });
    }
}

impl ValueStore for MemoryValueStore {
    fn get(&self, key: &ValueKey) -> Option<Value> {
        self.read().get(key).cloned()
    }

    fn create_list_value(&self, spec: ListValueSpec) -> Result<(), ZwaveError> {
        let mut w = self.write();
        let selected = w
            .get(&spec.key)
            .and_then(|v| v.data.as_list())
            .map_or(spec.default_index, ValueList::selected_index);
        let existed = w.contains_key(&spec.key);
        let key = spec.key;
        w.insert(
            key,
            Value {
                key,
                genre: spec.genre,
                label: spec.label,
                units: spec.units,
                read_only: spec.read_only,
                data: ValueData::List(ValueList::new(spec.items, selected)),
            },
        );
        drop(w);
        if !existed {
            self.publish(key, NotificationKind::Added);
        }
        Ok(())
    }

    fn push(&self, key: &ValueKey, code: StateCode) -> Result<(), ZwaveError> {
        let mut w = self.write();
        let value = w.get_mut(key).ok_or(ZwaveError::UnknownValue(*key))?;
        let list = value
            .data
            .as_list_mut()
            .ok_or(ZwaveError::TypeMismatch {
                key: *key,
                expected: ValueType::List,
            })?;
        let before = list.selected_index();
        if !list.select_by_value(code) {
            return Err(ZwaveError::StateOutOfRange {
                code,
                count: list.items().len(),
            });
        }
        let kind = if list.selected_index() == before {
            NotificationKind::Refreshed
        } else {
            NotificationKind::Changed
        };
        drop(w);
        self.publish(*key, kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ListItem, ValueGenre};

    fn spec(key: ValueKey) -> ListValueSpec {
        ListValueSpec {
            key,
            genre: ValueGenre::System,
            label: "Mode".into(),
            units: String::new(),
            read_only: false,
            items: vec![
                ListItem {
                    label: "Off".into(),
                    value: 0,
                },
                ListItem {
                    label: "On".into(),
                    value: 1,
                },
            ],
            default_index: 0,
        }
    }

    #[test]
    fn push_changed_then_refreshed() {
        let store = MemoryValueStore::with_capacity(8);
        let key = ValueKey::new(3, 0x25, 1, 0);
        let mut rx = store.subscribe();
        store.create_list_value(spec(key)).expect("create");
        store.push(&key, 1).expect("push");
        store.push(&key, 1).expect("push again");

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|n| n.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Added,
                NotificationKind::Changed,
                NotificationKind::Refreshed
            ]
        );
        assert_eq!(store.selected_code(&key), Some(1));
    }

    #[test]
    fn push_unknown_and_out_of_range() {
        let store = MemoryValueStore::with_capacity(8);
        let key = ValueKey::new(3, 0x25, 1, 0);
        assert!(matches!(
            store.push(&key, 0),
            Err(ZwaveError::UnknownValue(_))
        ));
        store.create_list_value(spec(key)).expect("create");
        assert!(matches!(
            store.push(&key, 2),
            Err(ZwaveError::StateOutOfRange { code: 2, count: 2 })
        ));
        assert_eq!(store.selected_code(&key), Some(0));
    }

    #[test]
    fn recreate_keeps_selection_and_single_entry() {
        let store = MemoryValueStore::with_capacity(8);
        let key = ValueKey::new(3, 0x25, 1, 0);
        store.create_list_value(spec(key)).expect("create");
        store.push(&key, 1).expect("push");
        store.create_list_value(spec(key)).expect("recreate");
        assert_eq!(store.len(), 1);
        assert_eq!(store.selected_code(&key), Some(1));
    }

    #[test]
    fn poisoned_lock_still_serves_values() {
        let store = std::sync::Arc::new(MemoryValueStore::with_capacity(8));
        let key = ValueKey::new(3, 0x25, 1, 0);
        store.create_list_value(spec(key)).expect("create");

        let s2 = std::sync::Arc::clone(&store);
        let res = std::thread::spawn(move || {
            let _guard = s2.values.write().expect("lock");
            panic!("writer died holding the lock");
        })
        .join();
        assert!(res.is_err());
        assert!(store.values.is_poisoned());

        assert!(store.get(&key).is_some());
        assert_eq!(store.len(), 1);
        store.push(&key, 1).expect("push after poison");
        assert_eq!(store.selected_code(&key), Some(1));
    }

    #[test]
    fn capacity_is_clamped() {
        let store = MemoryValueStore::with_capacity(usize::MAX);
        let mut rx = store.subscribe();
        let key = ValueKey::new(3, 0x25, 1, 0);
        store.create_list_value(spec(key)).expect("create");
        assert_eq!(rx.try_recv().map(|n| n.kind).ok(), Some(NotificationKind::Added));
    }
}
