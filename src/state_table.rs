//! Enumerated state tables: dense code -> label associations.
//!
//! A table is built once when an adapter is constructed and never mutated
//! afterwards. Built-in tables come from `const` label arrays; custom tables
//! (e.g. vendor specific list values) can be parsed from TOML:
//!
//! ```toml
//! [[state]]
//! code = 0
//! label = "Unprotected"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::cc_define::StateCode;
use crate::error::ZwaveError;

#[derive(Debug, Deserialize)]
struct StateFile {
    #[serde(rename = "state", default)]
    states: Vec<StateRaw>,
}

#[derive(Debug, Deserialize)]
struct StateRaw {
    code: u32,
    label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTable {
    labels: Vec<String>,
}

impl StateTable {
    /// Build a table from labels ordered by code (index == code).
    pub fn from_labels<I, S>(labels: I) -> Result<Self, ZwaveError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        Self::check_labels(&labels)?;
        Ok(Self { labels })
    }

    /// Table over compile-time labels that are known to be valid.
    pub(crate) fn from_static(labels: &[&'static str]) -> Self {
        Self {
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    /// Parse a state table TOML from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ZwaveError> {
        let sf: StateFile = toml::from_str(s).map_err(|e| {
            let s = e.to_string();
            if let Some((line, col)) = line_col(&s) {
                ZwaveError::Protocol(format!("state table parse error at {line}:{col}: {s}"))
            } else {
                ZwaveError::Protocol(format!("state table parse error: {s}"))
            }
        })?;
        let mut states = sf.states;
        states.sort_by_key(|st| st.code);
        for (expected, st) in states.iter().enumerate() {
            if st.code as usize != expected {
                return Err(ZwaveError::Protocol(format!(
                    "state codes must be dense from 0: expected {expected}, found {code}",
                    code = st.code
                )));
            }
        }
        Self::from_labels(states.into_iter().map(|st| st.label))
    }

    /// Load and parse a state table TOML from a filesystem path.
    pub fn from_path(path: &Path) -> Result<Self, ZwaveError> {
        let s = fs::read_to_string(path)?;
        s.parse::<Self>()
    }

    fn check_labels(labels: &[String]) -> Result<(), ZwaveError> {
        if labels.is_empty() {
            return Err(ZwaveError::Protocol("state table is empty".into()));
        }
        if labels.len() > usize::from(StateCode::MAX) + 1 {
            return Err(ZwaveError::Protocol(format!(
                "state table too large: {n} entries",
                n = labels.len()
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for l in labels {
            if l.trim().is_empty() {
                return Err(ZwaveError::Protocol("state label empty".into()));
            }
            if !seen.insert(l.as_str()) {
                return Err(ZwaveError::Protocol(format!("duplicate state label: {l}")));
            }
        }
        Ok(())
    }

    /// Number of states (N). Valid codes are `0..N`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn contains(&self, code: StateCode) -> bool {
        usize::from(code) < self.labels.len()
    }

    #[must_use]
    pub fn label(&self, code: StateCode) -> Option<&str> {
        self.labels.get(usize::from(code)).map(String::as_str)
    }

    /// Label for `code`, or `StateOutOfRange` when the code is not in the table.
    pub fn checked_label(&self, code: StateCode) -> Result<&str, ZwaveError> {
        self.label(code).ok_or(ZwaveError::StateOutOfRange {
            code,
            count: self.labels.len(),
        })
    }

    #[must_use]
    pub fn code_of(&self, label: &str) -> Option<StateCode> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| StateCode::try_from(i).ok())
    }

    /// Iterate `(code, label)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (StateCode, &str)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| StateCode::try_from(i).ok().map(|c| (c, l.as_str())))
    }
}

impl std::str::FromStr for StateTable {
    type Err = ZwaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

/// Pull "line N column M" out of a toml parser message.
fn line_col(msg: &str) -> Option<(usize, usize)> {
    fn leading_number(s: &str) -> Option<usize> {
        let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    }
    let after = &msg[msg.find("line ")? + 5..];
    let line = leading_number(after)?;
    let col = leading_number(&after[after.find("column ")? + 7..])?;
    Some((line, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_bounds() {
        let t = StateTable::from_labels(["Off", "On"]).expect("table");
        assert_eq!(t.len(), 2);
        assert_eq!(t.label(1), Some("On"));
        assert_eq!(t.label(2), None);
        assert!(matches!(
            t.checked_label(5),
            Err(ZwaveError::StateOutOfRange { code: 5, count: 2 })
        ));
        assert_eq!(t.code_of("Off"), Some(0));
        assert_eq!(t.iter().collect::<Vec<_>>(), vec![(0, "Off"), (1, "On")]);
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert!(StateTable::from_labels(Vec::<String>::new()).is_err());
        assert!(StateTable::from_labels(["A", "A"]).is_err());
        assert!(StateTable::from_labels(["A", " "]).is_err());
    }

    #[test]
    fn line_col_extraction() {
        assert_eq!(line_col("TOML parse error at line 3, column 7"), Some((3, 7)));
        assert_eq!(line_col("no position"), None);
    }
}
