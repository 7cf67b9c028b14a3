use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use zwave_cc::cc_define::DEFAULT_INSTANCE;

/// Scenario settings for a mock session. Every field may come from a TOML
/// file and be overridden on the command line.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MockConfig {
    pub node_id: u8,
    pub instance: u8,
    /// State the simulated device starts in.
    pub initial_state: u8,
    /// State to set after the first report: a label or a numeric code.
    pub set: Option<String>,
    pub reply_timeout_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            node_id: 7,
            instance: DEFAULT_INSTANCE,
            initial_state: 0,
            set: None,
            reply_timeout_ms: 1000,
        }
    }
}

impl MockConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("parse mock config")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read mock config {}", path.display()))?;
        Self::from_toml_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = MockConfig::from_toml_str("node_id = 12\nset = \"No Operation Possible\"\n")
            .expect("parse");
        assert_eq!(cfg.node_id, 12);
        assert_eq!(cfg.instance, DEFAULT_INSTANCE);
        assert_eq!(cfg.set.as_deref(), Some("No Operation Possible"));
    }

    #[test]
    fn unknown_types_rejected() {
        assert!(MockConfig::from_toml_str("node_id = \"seven\"").is_err());
    }
}
