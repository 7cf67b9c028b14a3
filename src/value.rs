//! Value model shared between command class adapters and value stores.
//!
//! Values are tagged variants ([`ValueData`]); adapters match on the variant
//! instead of trusting a type id.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cc_define::{CommandClassId, InstanceId, NodeId, StateCode, ValueIndex};

/// Store key: one value per (node, command class, instance, index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueKey {
    pub node_id: NodeId,
    pub command_class_id: CommandClassId,
    pub instance: InstanceId,
    pub index: ValueIndex,
}

impl ValueKey {
    #[must_use]
    pub const fn new(
        node_id: NodeId,
        command_class_id: CommandClassId,
        instance: InstanceId,
        index: ValueIndex,
    ) -> Self {
        Self {
            node_id,
            command_class_id,
            instance,
            index,
        }
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {} cc 0x{:02X} instance {} index {}",
            self.node_id, self.command_class_id, self.instance, self.index
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueGenre {
    /// Main value(s) a user interacts with.
    Basic,
    User,
    Config,
    /// Device-management values, usually hidden from end users.
    System,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    List,
    Bool,
    Byte,
    Int,
    String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueId {
    pub key: ValueKey,
    pub genre: ValueGenre,
    pub value_type: ValueType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub label: String,
    pub value: StateCode,
}

/// Ordered selectable items plus the current selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueList {
    items: Vec<ListItem>,
    selected: usize,
}

impl ValueList {
    /// `selected` falls back to 0 when it does not index an item.
    #[must_use]
    pub fn new(items: Vec<ListItem>, selected: usize) -> Self {
        let selected = if selected < items.len() { selected } else { 0 };
        Self { items, selected }
    }

    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_item(&self) -> Option<&ListItem> {
        self.items.get(self.selected)
    }

    /// Select the item carrying `value`. Returns false if no item has it.
    pub fn select_by_value(&mut self, value: StateCode) -> bool {
        match self.items.iter().position(|it| it.value == value) {
            Some(i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }

    /// Select the item labelled `label`. Returns false if no item has it.
    pub fn select_by_label(&mut self, label: &str) -> bool {
        match self.items.iter().position(|it| it.label == label) {
            Some(i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ValueData {
    List(ValueList),
    Bool(bool),
    Byte(u8),
    Int(i32),
    String(String),
}

impl ValueData {
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::List(_) => ValueType::List,
            Self::Bool(_) => ValueType::Bool,
            Self::Byte(_) => ValueType::Byte,
            Self::Int(_) => ValueType::Int,
            Self::String(_) => ValueType::String,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&ValueList> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ValueList> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

/// Snapshot of one store entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub key: ValueKey,
    pub genre: ValueGenre,
    pub label: String,
    pub units: String,
    pub read_only: bool,
    pub data: ValueData,
}

impl Value {
    #[must_use]
    pub fn id(&self) -> ValueId {
        ValueId {
            key: self.key,
            genre: self.genre,
            value_type: self.data.value_type(),
        }
    }
}

/// Everything needed to declare a list value in a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListValueSpec {
    pub key: ValueKey,
    pub genre: ValueGenre,
    pub label: String,
    pub units: String,
    pub read_only: bool,
    pub items: Vec<ListItem>,
    pub default_index: usize,
}
