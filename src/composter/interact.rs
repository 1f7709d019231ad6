use bevy::prelude::*;
use rand::Rng;

use super::level::{AdvanceResult, Composting, FeedbackSink};
use super::CompostRng;
use crate::data::Compostables;
use crate::world::block::{BlockKind, BlockWorld};
use crate::world::events::{PlayerInteractEvent, PlaySoundEvent};
use crate::world::inventory::{take_one, ItemStack};
use crate::world::player::HeldItem;

/// A player applies `held` to the block at `clicked`.
///
/// Returns `None` when the interaction is none of our business (not a
/// composter, empty hand, item not compostable). On `Advanced` one unit of
/// the held stack has been used up.
pub fn on_player_interact<R: Rng, S: FeedbackSink>(
    composting: &mut Composting<'_, R, S>,
    world: &mut BlockWorld,
    clicked: IVec3,
    held: &mut Option<ItemStack>,
) -> Option<AdvanceResult> {
    let block = world.get_mut(clicked)?;
    if block.kind != BlockKind::Composter {
        return None;
    }

    let kind = held.as_ref()?.kind.clone();
    if !composting.is_compostable(&kind) {
        return None;
    }

    let levelled = block.levelled_mut()?;
    let result = composting.try_advance(&kind, clicked, levelled, true);
    if result == AdvanceResult::Advanced {
        take_one(held);
    }

    Some(result)
}

pub(super) fn handle_player_interact(
    mut ev_interact: EventReader<PlayerInteractEvent>,
    mut world: ResMut<BlockWorld>,
    mut q_held: Query<&mut HeldItem>,
    compostables: Res<Compostables>,
    mut rng: ResMut<CompostRng>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let table = compostables.current();

    for ev in ev_interact.read() {
        let Ok(mut held) = q_held.get_mut(ev.player) else {
            continue;
        };

        let mut composting = Composting::new(&table, &mut rng.0, &mut sounds);
        if let Some(result) = on_player_interact(&mut composting, &mut world, ev.block, &mut held.0) {
            debug!("Composter at {} fed by player: {result:?}", ev.block);
        }
    }
}
