use bevy::prelude::*;

pub mod events;
pub mod settings;
pub mod states;

/// Core plugin: global state, events and settings
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        app.init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .init_resource::<settings::ServerSettings>()
            .add_systems(Startup, start_loading);
    }
}

fn start_loading(mut next: ResMut<NextState<states::AppState>>) {
    next.set(states::AppState::Loading);
}
