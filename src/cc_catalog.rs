//! コマンドクラス ID と名称の一覧
//!
//! 組み込みの `command_classes.toml` を `CatalogRegistry::from_str(...).register_or_merge()`
//! で登録します。ログ出力やディスパッチ時の診断で名前解決に使用します。
//! 未登録の ID は `None` を返します。

use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use crate::cc_define::CommandClassId;
use crate::error::ZwaveError;

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(deserialize_with = "parse_hex_or_int")]
    id: CommandClassId,
    name: String,
    description: Option<String>,
}

// serde helper: integer or "0x.." string into a command class id
fn parse_hex_or_int<'de, D>(deserializer: D) -> Result<CommandClassId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct V;
    impl serde::de::Visitor<'_> for V {
        type Value = CommandClassId;
        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "hex string like 0xNN or integer")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u8::try_from(v).map_err(|_| E::custom(format!("value out of range: {v}")))
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u8::try_from(v).map_err(|_| E::custom(format!("value out of range: {v}")))
        }
        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            let s = s.trim();
            s.strip_prefix("0x").map_or_else(
                || s.parse::<u8>().map_err(|e| E::custom(format!("parse int: {e}"))),
                |h| u8::from_str_radix(h, 16).map_err(|e| E::custom(format!("parse hex: {e}"))),
            )
        }
    }
    deserializer.deserialize_any(V)
}

#[derive(Debug, Deserialize)]
struct CatalogToml {
    #[serde(rename = "command_class", default)]
    entries: Vec<CatalogEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandClassInfo {
    pub id: CommandClassId,
    pub name: String,
    pub description: Option<String>,
}

/// In-memory handle for a parsed catalog TOML.
pub struct CatalogRegistry {
    entries: Vec<CatalogEntry>,
}

static CATALOG: OnceCell<RwLock<HashMap<CommandClassId, CommandClassInfo>>> = OnceCell::new();

impl CatalogRegistry {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ZwaveError> {
        let parsed: CatalogToml = toml::from_str(s)
            .map_err(|e| ZwaveError::Protocol(format!("command_classes.toml parse error: {e}")))?;
        let mut seen = std::collections::HashSet::new();
        for e in &parsed.entries {
            if e.name.trim().is_empty() {
                return Err(ZwaveError::Protocol(format!(
                    "command class 0x{id:02X}: name is empty",
                    id = e.id
                )));
            }
            if !seen.insert(e.id) {
                return Err(ZwaveError::Protocol(format!(
                    "duplicate command class id: 0x{id:02X}",
                    id = e.id
                )));
            }
        }
        Ok(Self {
            entries: parsed.entries,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ZwaveError> {
        let s = fs::read_to_string(path)?;
        Self::from_str(&s)
    }

    /// The catalog compiled into the crate.
    pub fn embedded() -> Result<Self, ZwaveError> {
        Self::from_str(include_str!("command_classes.toml"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn owned(&self) -> impl Iterator<Item = CommandClassInfo> + '_ {
        self.entries.iter().map(|e| CommandClassInfo {
            id: e.id,
            name: e.name.clone(),
            description: e.description.clone(),
        })
    }

    /// Set the global catalog. Fails with `AlreadyRegistered` if it is set.
    pub fn register(&self) -> Result<(), ZwaveError> {
        let map: HashMap<_, _> = self.owned().map(|i| (i.id, i)).collect();
        CATALOG
            .set(RwLock::new(map))
            .map_err(|_| ZwaveError::AlreadyRegistered)
    }

    /// Set the global catalog, or merge into it when already set. Entries
    /// with the same id are replaced.
    pub fn register_or_merge(&self) -> Result<(), ZwaveError> {
        match self.register() {
            Ok(()) => Ok(()),
            Err(ZwaveError::AlreadyRegistered) => {
                let cell = CATALOG.get().ok_or_else(|| {
                    ZwaveError::Protocol("command class catalog inconsistent state".into())
                })?;
                let mut w = cell
                    .write()
                    .map_err(|_| ZwaveError::Protocol("command class catalog poisoned".into()))?;
                for info in self.owned() {
                    w.insert(info.id, info);
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl std::str::FromStr for CatalogRegistry {
    type Err = ZwaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatalogRegistry::from_str(s)
    }
}

#[must_use]
pub fn lookup(id: CommandClassId) -> Option<CommandClassInfo> {
    CATALOG
        .get()
        .and_then(|rw| rw.read().ok())
        .and_then(|m| m.get(&id).cloned())
}

/// Registered name, e.g. "COMMAND_CLASS_PROTECTION".
#[must_use]
pub fn command_class_name(id: CommandClassId) -> Option<String> {
    lookup(id).map(|i| i.name)
}

/// Registered name, or "0xNN" when the id is unknown.
#[must_use]
pub fn display_name(id: CommandClassId) -> String {
    command_class_name(id).unwrap_or_else(|| format!("0x{id:02X}"))
}
