//! Default hopper behaviour: every few ticks each hopper pushes one item into
//! whatever it faces. Moves are queued first so other plugins get a chance to
//! cancel them before they are applied.

use bevy::prelude::*;

use super::block::{BlockKind, BlockWorld};
use super::inventory::ItemStack;
use crate::composter::Direction;
use crate::core::settings::ServerSettings;

/// Ordering of the transfer pipeline, run once per hopper cycle.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransferSet {
    /// Hoppers decide what they want to move
    Queue,
    /// Listeners may cancel moves
    Intercept,
    /// Surviving moves are carried out
    Apply,
}

/// One inventory to inventory transfer attempt
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryMoveItem {
    /// Position of the block whose inventory gives the item
    pub source: IVec3,
    /// Where the source would push to, if the host could tell
    pub destination: Option<IVec3>,
    /// One unit of what would move
    pub item: ItemStack,
    pub cancelled: bool,
}

/// Moves queued during the current tick
#[derive(Resource, Debug, Default)]
pub struct PendingMoves(pub Vec<InventoryMoveItem>);

/// Counts ticks between hopper cycles
#[derive(Resource, Debug, Default)]
pub struct HopperClock {
    ticks: u32,
}

pub(super) fn tick_hopper_clock(mut clock: ResMut<HopperClock>) {
    clock.ticks = clock.ticks.wrapping_add(1);
}

/// Run condition: true on the ticks hoppers are allowed to push.
pub fn hopper_cycle(clock: Res<HopperClock>, settings: Res<ServerSettings>) -> bool {
    settings.hopper_cooldown > 0 && clock.ticks % settings.hopper_cooldown == 0
}

/// Builds a move for the first non-empty slot of the hopper at `at`.
pub fn queue_move(world: &BlockWorld, at: IVec3) -> Option<InventoryMoveItem> {
    let block = world.get(at)?;
    let inventory = block.inventory.as_ref()?;
    let slot = inventory.first_non_empty()?;
    let stack = inventory.get(slot)?;

    let destination = block
        .facing()
        .and_then(|facing| facing.parse::<Direction>().ok())
        .and_then(|dir| dir.step_from(at));

    Some(InventoryMoveItem {
        source: at,
        destination,
        item: ItemStack::new(stack.kind.clone(), 1),
        cancelled: false,
    })
}

/// Carries out a move that nobody cancelled. Returns whether an item moved.
pub fn apply_move(world: &mut BlockWorld, mv: &InventoryMoveItem) -> bool {
    if mv.cancelled {
        return false;
    }
    let Some(destination) = mv.destination else {
        return false;
    };

    let has_room = world
        .get(destination)
        .and_then(|b| b.inventory.as_ref())
        .is_some_and(|inv| inv.has_room_for(&mv.item.kind));
    if !has_room {
        return false;
    }

    let Some(source) = world.get_mut(mv.source).and_then(|b| b.inventory.as_mut()) else {
        return false;
    };
    let Some(slot) = source.first_slot_of(&mv.item.kind) else {
        return false;
    };
    source.remove_one(slot);

    if let Some(target) = world.get_mut(destination).and_then(|b| b.inventory.as_mut()) {
        target.add(&mv.item.kind, 1);
    }
    true
}

pub fn queue_hopper_moves(world: Res<BlockWorld>, mut pending: ResMut<PendingMoves>) {
    pending.0 = world
        .positions_of(BlockKind::Hopper)
        .into_iter()
        .filter_map(|at| queue_move(&world, at))
        .collect();
}

pub fn apply_hopper_moves(mut world: ResMut<BlockWorld>, mut pending: ResMut<PendingMoves>) {
    for mv in pending.0.drain(..) {
        if apply_move(&mut world, &mv) {
            trace!("Moved {} from {} to {:?}", mv.item.kind, mv.source, mv.destination);
        }
    }
}
