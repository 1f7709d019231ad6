//! Chance based composting for any configured item, for players and hoppers alike.

pub mod command;
pub mod direction;
pub mod hopper;
pub mod interact;
pub mod level;
pub mod table;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::settings::ServerSettings;
use crate::core::states::AppState;
use crate::world::transfer::TransferSet;

pub use direction::Direction;
pub use level::{AdvanceResult, Composting, FeedbackSink};
pub use table::{CompostTable, ItemKind};

/// Random source for composting rolls
#[derive(Resource)]
pub struct CompostRng(pub ChaCha8Rng);

impl CompostRng {
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl FromWorld for CompostRng {
    fn from_world(world: &mut World) -> Self {
        match world.get_resource::<ServerSettings>().and_then(|s| s.seed) {
            Some(seed) => Self::seeded(seed),
            None => Self(ChaCha8Rng::from_rng(&mut rand::rng())),
        }
    }
}

pub struct ComposterPlugin;

impl Plugin for ComposterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CompostRng>()
            .add_systems(
                Update,
                interact::handle_player_interact.run_if(in_state(AppState::Running)),
            )
            .add_systems(
                Update,
                hopper::intercept_hopper_moves.in_set(TransferSet::Intercept),
            );
    }
}
