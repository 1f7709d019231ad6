//! The host side: blocks, inventories, players and default hopper transfers.

pub mod block;
pub mod events;
pub mod inventory;
pub mod player;
pub mod transfer;

use bevy::prelude::*;

use crate::core::events::LogEvent;
use crate::core::states::AppState;
use block::BlockWorld;
use events::*;
use transfer::*;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BlockWorld>()
            .init_resource::<PendingMoves>()
            .init_resource::<HopperClock>()
            .add_event::<PlaySoundEvent>()
            .add_event::<PlayerInteractEvent>()
            .configure_sets(
                Update,
                (TransferSet::Queue, TransferSet::Intercept, TransferSet::Apply)
                    .chain()
                    .run_if(in_state(AppState::Running).and(hopper_cycle)),
            )
            .add_systems(Startup, player::spawn_player)
            .add_systems(PreUpdate, tick_hopper_clock)
            .add_systems(
                Update,
                (
                    queue_hopper_moves.in_set(TransferSet::Queue),
                    apply_hopper_moves.in_set(TransferSet::Apply),
                ),
            )
            .add_systems(PostUpdate, announce_sounds);
    }
}

/// Sounds have no audience on a headless server, report them instead.
fn announce_sounds(mut ev_sound: EventReader<PlaySoundEvent>, mut log: EventWriter<LogEvent>) {
    for ev in ev_sound.read() {
        debug!("Playing {} at {}", ev.sound.name(), ev.at);
        log.write(LogEvent(format!("*{}* at {}", ev.sound.name(), ev.at)));
    }
}
