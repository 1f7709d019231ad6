use bevy::prelude::*;

/// Top level lifecycle of the server
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    /// Reading the compostables config
    Loading,
    Running,
}
