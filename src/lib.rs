pub mod composter;
pub mod core;
pub mod data;
pub mod interface;
pub mod world;

use bevy::prelude::*;

/// Everything but the console: core, config, world and composting.
pub struct ComposterServerPlugins;

impl Plugin for ComposterServerPlugins {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            crate::core::CorePlugin,
            data::DataPlugin,
            world::WorldPlugin,
            composter::ComposterPlugin,
        ));
    }
}
