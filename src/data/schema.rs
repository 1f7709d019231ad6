use std::collections::BTreeMap;

use serde::Deserialize;

/// Written to disk when no config exists yet.
pub const DEFAULT_CONFIG: &str = r#"# Extra items that can be put into a composter.
#
# Each entry is <item name> = <chance>, the chance (0.0 - 1.0) that one item
# raises the composter level. Items listed here are always used up, even when
# the level does not go up.

[compostables]
rotten_flesh = 0.3
poisonous_potato = 0.65
spider_eye = 0.3
bone = 0.5
"#;

/// Raw config document. Values are kept untyped so that one bad entry only
/// skips that entry.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub compostables: BTreeMap<String, toml::Value>,
}
