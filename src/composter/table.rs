use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Item kind identifier, e.g. `rotten_flesh`.
///
/// Always stored lowercase without the `minecraft:` namespace, so two kinds
/// compare equal exactly when they name the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKind(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid item kind: {0:?}")]
pub struct InvalidItemKind(pub String);

impl ItemKind {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemKind {
    type Err = InvalidItemKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("minecraft:").unwrap_or(&lower);

        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if valid {
            Ok(Self(name.to_owned()))
        } else {
            Err(InvalidItemKind(s.to_owned()))
        }
    }
}

impl TryFrom<String> for ItemKind {
    type Error = InvalidItemKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.0
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable item kind → success chance mapping.
///
/// Built once per (re)load and never mutated afterwards; a reload produces a
/// brand new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompostTable {
    chances: HashMap<ItemKind, f64>,
}

impl CompostTable {
    pub fn new(chances: HashMap<ItemKind, f64>) -> Self {
        Self { chances }
    }

    /// Whether this kind takes part in composting at all.
    pub fn is_compostable(&self, kind: &ItemKind) -> bool {
        self.chances.contains_key(kind)
    }

    /// Configured chance for `kind`, `0.0` when it is not in the table.
    pub fn probability(&self, kind: &ItemKind) -> f64 {
        self.chances.get(kind).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.chances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chances.is_empty()
    }
}

impl FromIterator<(ItemKind, f64)> for CompostTable {
    fn from_iter<T: IntoIterator<Item = (ItemKind, f64)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
