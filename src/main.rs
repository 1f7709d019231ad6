use std::time::Duration;

use anyhow::{anyhow, Context};
use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use bevy_composter::core::events::LogEvent;
use bevy_composter::core::settings::read_server_settings;
use bevy_composter::data::loader::save_default_config;
use bevy_composter::interface::debug_cli::DebugCliPlugin;
use bevy_composter::ComposterServerPlugins;

/// Game ticks per second
const TICK_RATE: f64 = 20.0;

fn main() -> anyhow::Result<()> {
    let settings = read_server_settings();
    save_default_config(&settings.config_path)
        .with_context(|| format!("Could not write default config to {}", settings.config_path.display()))?;

    let exit = App::new()
        .insert_resource(settings)
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / TICK_RATE))),
            LogPlugin::default(),
            StatesPlugin,
        ))
        .add_plugins(ComposterServerPlugins)
        .add_plugins(DebugCliPlugin)
        .add_systems(Update, forward_log_event)
        .add_systems(Last, on_exit)
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(anyhow!("server stopped with exit code {code}")),
    }
}

fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}

fn on_exit(mut ev_exit: EventReader<AppExit>) {
    if ev_exit.read().next().is_some() {
        info!("Disabled composter extension.");
    }
}
