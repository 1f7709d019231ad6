//! Settings for the server

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

pub const DEFAULT_CONFIG_PATH: &str = "config/composter.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Command line arguments for the server
pub struct Args {
    /// Compostables config file, created with defaults if missing
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Seed for composting rolls, random if not given
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks between two hopper pushes
    #[arg(long, default_value_t = 8)]
    hopper_cooldown: u32,
}

#[derive(Resource, Debug, Clone)]
/// Settings for the server from the command line
pub struct ServerSettings {
    pub config_path: PathBuf,
    pub seed: Option<u64>,
    /// Hoppers push once every this many ticks, 0 disables them
    pub hopper_cooldown: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            seed: None,
            hopper_cooldown: 8,
        }
    }
}

impl From<Args> for ServerSettings {
    fn from(args: Args) -> Self {
        Self {
            config_path: args.config,
            seed: args.seed,
            hopper_cooldown: args.hopper_cooldown,
        }
    }
}

/// Reads the server settings passed in from the command line
pub fn read_server_settings() -> ServerSettings {
    Args::parse().into()
}
