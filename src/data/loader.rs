use std::fs;
use std::io;
use std::path::Path;

use bevy::prelude::*;
use thiserror::Error;

use super::schema::{ConfigFile, DEFAULT_CONFIG};
use crate::composter::{CompostTable, ItemKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] io::Error),
    #[error("Could not parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Writes the default config to `path` unless something is already there.
///
/// Returns whether a file was written.
pub fn save_default_config(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

pub fn load_compost_table(path: &Path) -> Result<CompostTable, ConfigError> {
    let text = fs::read_to_string(path)?;
    parse_compost_table(&text)
}

/// Builds a table from a config document, skipping (and logging) entries that
/// are not a known item name mapped to a chance in `0.0..=1.0`.
pub fn parse_compost_table(text: &str) -> Result<CompostTable, ConfigError> {
    let config: ConfigFile = toml::from_str(text)?;

    let mut entries = Vec::with_capacity(config.compostables.len());
    for (key, value) in config.compostables {
        let Ok(kind) = key.parse::<ItemKind>() else {
            warn!("Skipping compostable {key:?}: not an item name");
            continue;
        };

        let chance = match value {
            toml::Value::Float(f) => f,
            toml::Value::Integer(i) => i as f64,
            other => {
                warn!("Skipping compostable {key}: chance must be a number, got {}", other.type_str());
                continue;
            }
        };

        if !(0.0..=1.0).contains(&chance) {
            warn!("Skipping compostable {key}: chance {chance} is outside 0.0 - 1.0");
            continue;
        }

        entries.push((kind, chance));
    }

    Ok(entries.into_iter().collect())
}
