//! Hoppers feeding composters.
//!
//! Every hopper move into a composter is cancelled and replaced by taking a
//! single unit out of the hopper and running it through the same roll a player
//! would get. This way one move is always one item and one roll.

use bevy::prelude::*;
use rand::Rng;

use super::direction::Direction;
use super::level::{is_full, AdvanceResult, Composting, FeedbackSink};
use super::CompostRng;
use crate::data::Compostables;
use crate::world::block::{BlockKind, BlockWorld};
use crate::world::events::PlaySoundEvent;
use crate::world::inventory::InventoryType;
use crate::world::transfer::{InventoryMoveItem, PendingMoves};

/// Block the hopper at `hopper` pushes into, based on its facing.
///
/// `None` for non-directional blocks, for hoppers facing off the edge of the
/// world and for facings that are not one of the six directions; the latter is
/// logged.
pub fn hopper_destination(world: &BlockWorld, hopper: IVec3) -> Option<IVec3> {
    let facing = world.get(hopper)?.facing()?;

    match facing.parse::<Direction>() {
        Ok(dir) => dir.step_from(hopper),
        Err(_) => {
            warn!("Unknown hopper facing direction: {facing}");
            None
        }
    }
}

/// Looks at a pending move and takes it over if it targets a composter.
///
/// Returns `None` when the move is left alone. Otherwise the move is cancelled
/// and the result says whether the composter had room; on `Advanced` exactly
/// one unit has left the hopper.
pub fn on_inventory_move<R: Rng, S: FeedbackSink>(
    composting: &mut Composting<'_, R, S>,
    world: &mut BlockWorld,
    mv: &mut InventoryMoveItem,
) -> Option<AdvanceResult> {
    let source = world.get(mv.source)?;
    let from_hopper = source.kind == BlockKind::Hopper
        && source
            .inventory
            .as_ref()
            .is_some_and(|inv| inv.kind == InventoryType::Hopper);
    if !from_hopper {
        return None;
    }

    let destination = hopper_destination(world, mv.source)?;
    if world.kind_at(destination) != Some(BlockKind::Composter) {
        return None;
    }

    let kind = mv.item.kind.clone();
    if !composting.is_compostable(&kind) {
        return None;
    }

    if world
        .get(destination)
        .and_then(|b| b.levelled())
        .is_none_or(is_full)
    {
        mv.cancelled = true;
        return Some(AdvanceResult::Full);
    }

    let inventory = world.get_mut(mv.source)?.inventory.as_mut()?;
    let slot = inventory.first_slot_of(&kind)?;
    mv.cancelled = true;
    inventory.remove_one(slot);

    let levelled = world.get_mut(destination)?.levelled_mut()?;
    Some(composting.try_advance(&kind, destination, levelled, false))
}

pub(super) fn intercept_hopper_moves(
    mut pending: ResMut<PendingMoves>,
    mut world: ResMut<BlockWorld>,
    compostables: Res<Compostables>,
    mut rng: ResMut<CompostRng>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let table = compostables.current();

    for mv in pending.0.iter_mut().filter(|mv| !mv.cancelled) {
        let mut composting = Composting::new(&table, &mut rng.0, &mut sounds);
        if let Some(result) = on_inventory_move(&mut composting, &mut world, mv) {
            debug!("Hopper at {} fed composter: {result:?}", mv.source);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::composter::interact::on_player_interact;
    use crate::composter::level::SoundPlayed;
    use crate::composter::table::{CompostTable, ItemKind};
    use crate::world::block::Block;
    use crate::world::inventory::ItemStack;
    use crate::world::transfer::{apply_move, queue_move};

    const HOPPER: IVec3 = IVec3::new(0, 0, 0);
    const ABOVE: IVec3 = IVec3::new(0, 1, 0);

    fn kind(s: &str) -> ItemKind {
        s.parse().unwrap()
    }

    fn table(p: f64) -> CompostTable {
        [(kind("rotten_flesh"), p)].into_iter().collect()
    }

    /// Hopper at the origin facing up into a composter.
    fn world_with(level: u8, count: u32) -> BlockWorld {
        let mut world = BlockWorld::default();
        let mut hopper = Block::hopper("up");
        if let Some(inv) = hopper.inventory.as_mut() {
            inv.slots[0] = Some(ItemStack::new(kind("stone"), 1));
            inv.slots[2] = Some(ItemStack::new(kind("rotten_flesh"), count));
        }
        world.set(HOPPER, hopper);
        world.set(ABOVE, Block::composter_at_level(level));
        world
    }

    fn move_of(item: &str) -> InventoryMoveItem {
        InventoryMoveItem {
            source: HOPPER,
            destination: Some(ABOVE),
            item: ItemStack::new(kind(item), 1),
            cancelled: false,
        }
    }

    fn hopper_count(world: &BlockWorld, item: &str) -> u32 {
        world
            .get(HOPPER)
            .and_then(|b| b.inventory.as_ref())
            .map_or(0, |i| i.count_of(&kind(item)))
    }

    fn composter_level(world: &BlockWorld) -> u8 {
        world.get(ABOVE).and_then(|b| b.levelled()).map(|l| l.level).unwrap()
    }

    #[test]
    fn destination_follows_facing() {
        let mut world = BlockWorld::default();
        world.set(HOPPER, Block::hopper("up"));
        assert_eq!(hopper_destination(&world, HOPPER), Some(ABOVE));

        world.set(HOPPER, Block::hopper("west"));
        assert_eq!(hopper_destination(&world, HOPPER), Some(IVec3::NEG_X));

        world.set(HOPPER, Block::hopper("diagonal"));
        assert_eq!(hopper_destination(&world, HOPPER), None);

        world.set(HOPPER, Block::new(BlockKind::Chest));
        assert_eq!(hopper_destination(&world, HOPPER), None);
    }

    #[test]
    fn hopper_at_the_world_edge_points_nowhere() {
        let top = IVec3::new(0, i32::MAX, 0);
        let mut world = BlockWorld::default();
        world.set(top, Block::hopper("up"));
        assert_eq!(hopper_destination(&world, top), None);

        world.set(top, Block::hopper("down"));
        assert_eq!(hopper_destination(&world, top), Some(IVec3::new(0, i32::MAX - 1, 0)));
    }

    #[test]
    fn unknown_facing_is_logged() {
        use std::io;
        use std::sync::{Arc, Mutex};

        use bevy::log::tracing;
        use bevy::log::tracing_subscriber::fmt;

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut world = BlockWorld::default();
        world.set(HOPPER, Block::hopper("sideways"));
        let destination = tracing::subscriber::with_default(subscriber, || hopper_destination(&world, HOPPER));

        assert_eq!(destination, None);
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("Unknown hopper facing direction: sideways"), "{logs}");
    }

    #[test]
    fn missing_item_leaves_the_move_alone() {
        let table = table(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sounds: Vec<SoundPlayed> = Vec::new();
        let mut world = world_with(2, 10);
        if let Some(inv) = world.get_mut(HOPPER).and_then(|b| b.inventory.as_mut()) {
            inv.slots[2] = None;
        }
        let mut mv = move_of("rotten_flesh");

        let mut composting = Composting::new(&table, &mut rng, &mut sounds);
        assert_eq!(on_inventory_move(&mut composting, &mut world, &mut mv), None);
        assert!(!mv.cancelled);
        assert_eq!(composter_level(&world), 2);
        assert_eq!(hopper_count(&world, "stone"), 1);
    }

    #[test]
    fn takes_exactly_one_from_a_full_stack() {
        let table = table(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sounds: Vec<SoundPlayed> = Vec::new();
        let mut world = world_with(3, 64);
        let mut mv = move_of("rotten_flesh");

        let mut composting = Composting::new(&table, &mut rng, &mut sounds);
        let result = on_inventory_move(&mut composting, &mut world, &mut mv);

        assert_eq!(result, Some(AdvanceResult::Advanced));
        assert!(mv.cancelled);
        assert_eq!(hopper_count(&world, "rotten_flesh"), 63);
        assert_eq!(hopper_count(&world, "stone"), 1);
        assert_eq!(composter_level(&world), 4);
        assert!(sounds.is_empty());
    }

    #[test]
    fn failed_roll_still_uses_the_item() {
        let table = table(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sounds: Vec<SoundPlayed> = Vec::new();
        let mut world = world_with(3, 1);
        let mut mv = move_of("rotten_flesh");

        let mut composting = Composting::new(&table, &mut rng, &mut sounds);
        let result = on_inventory_move(&mut composting, &mut world, &mut mv);

        assert_eq!(result, Some(AdvanceResult::Advanced));
        assert_eq!(hopper_count(&world, "rotten_flesh"), 0);
        assert_eq!(
            world.get(HOPPER).and_then(|b| b.inventory.as_ref()).and_then(|i| i.get(2)),
            None
        );
        assert_eq!(composter_level(&world), 3);
    }

    #[test]
    fn full_composter_blocks_the_move() {
        let table = table(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sounds: Vec<SoundPlayed> = Vec::new();
        let mut world = world_with(7, 10);
        let mut mv = move_of("rotten_flesh");

        let mut composting = Composting::new(&table, &mut rng, &mut sounds);
        let result = on_inventory_move(&mut composting, &mut world, &mut mv);

        assert_eq!(result, Some(AdvanceResult::Full));
        assert!(mv.cancelled);
        assert_eq!(hopper_count(&world, "rotten_flesh"), 10);
        assert_eq!(composter_level(&world), 7);
    }

    #[test]
    fn leaves_other_moves_alone() {
        let table = table(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sounds: Vec<SoundPlayed> = Vec::new();
        let mut composting = Composting::new(&table, &mut rng, &mut sounds);

        // not compostable
        let mut world = world_with(0, 10);
        let mut mv = move_of("stone");
        assert_eq!(on_inventory_move(&mut composting, &mut world, &mut mv), None);
        assert!(!mv.cancelled);

        // hopper facing somewhere unknown
        if let Some(hopper) = world.get_mut(HOPPER) {
            hopper.state = crate::world::block::BlockState::Directional {
                facing: "sideways".into(),
            };
        }
        let mut mv = move_of("rotten_flesh");
        assert_eq!(on_inventory_move(&mut composting, &mut world, &mut mv), None);
        assert!(!mv.cancelled);

        // hopper pointing at a chest
        let mut world = world_with(0, 10);
        world.set(ABOVE, Block::new(BlockKind::Chest));
        let mut mv = move_of("rotten_flesh");
        assert_eq!(on_inventory_move(&mut composting, &mut world, &mut mv), None);

        // source is a chest, not a hopper
        let mut world = world_with(0, 10);
        world.set(HOPPER, Block::new(BlockKind::Chest));
        let mut mv = move_of("rotten_flesh");
        assert_eq!(on_inventory_move(&mut composting, &mut world, &mut mv), None);
        assert_eq!(composter_level(&world), 0);
    }

    #[test]
    fn host_pipeline_never_transfers_into_composters() {
        let table = table(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sounds: Vec<SoundPlayed> = Vec::new();
        let mut world = world_with(0, 5);
        let mut composting = Composting::new(&table, &mut rng, &mut sounds);

        // first slot holds stone: not ours, the host keeps it since composters hold nothing
        let mut mv = queue_move(&world, HOPPER).unwrap();
        assert_eq!(on_inventory_move(&mut composting, &mut world, &mut mv), None);
        assert!(!apply_move(&mut world, &mv));

        if let Some(inv) = world.get_mut(HOPPER).and_then(|b| b.inventory.as_mut()) {
            inv.slots[0] = None;
        }
        for _ in 0..5 {
            let mut mv = queue_move(&world, HOPPER).unwrap();
            assert_eq!(
                on_inventory_move(&mut composting, &mut world, &mut mv),
                Some(AdvanceResult::Advanced)
            );
            assert!(!apply_move(&mut world, &mv));
        }

        assert_eq!(hopper_count(&world, "rotten_flesh"), 0);
        assert_eq!(composter_level(&world), 5);
    }

    proptest! {
        #[test]
        fn one_unit_per_interception(count in 1u32..=64, level in 0u8..7, seed: u64) {
            let table = table(0.5);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut sounds: Vec<SoundPlayed> = Vec::new();
            let mut world = world_with(level, count);
            let mut mv = move_of("rotten_flesh");

            let mut composting = Composting::new(&table, &mut rng, &mut sounds);
            let result = on_inventory_move(&mut composting, &mut world, &mut mv);

            prop_assert_eq!(result, Some(AdvanceResult::Advanced));
            prop_assert_eq!(hopper_count(&world, "rotten_flesh"), count - 1);
            let after = composter_level(&world);
            prop_assert!(after == level || after == level + 1);
        }

        #[test]
        fn ineligible_kinds_never_mutate(
            name in "[a-z0-9_]{1,24}",
            count in 1u32..=64,
            level in 0u8..8,
            seed: u64,
        ) {
            let other = kind(&name);
            prop_assume!(other != kind("rotten_flesh"));

            let table = table(1.0);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut sounds: Vec<SoundPlayed> = Vec::new();
            let mut world = world_with(level, 1);
            if let Some(inv) = world.get_mut(HOPPER).and_then(|b| b.inventory.as_mut()) {
                inv.slots[1] = Some(ItemStack::new(other.clone(), count));
            }
            let before = world.get(HOPPER).and_then(|b| b.inventory.clone());

            let mut composting = Composting::new(&table, &mut rng, &mut sounds);
            prop_assert!(!composting.is_compostable(&other));

            // a player holding it
            let mut held = Some(ItemStack::new(other.clone(), count));
            prop_assert_eq!(on_player_interact(&mut composting, &mut world, ABOVE, &mut held), None);
            prop_assert_eq!(held.map(|s| s.count), Some(count));

            // a hopper pushing it
            let mut mv = InventoryMoveItem {
                source: HOPPER,
                destination: Some(ABOVE),
                item: ItemStack::new(other, 1),
                cancelled: false,
            };
            prop_assert_eq!(on_inventory_move(&mut composting, &mut world, &mut mv), None);
            prop_assert!(!mv.cancelled);

            prop_assert_eq!(composter_level(&world), level);
            prop_assert_eq!(world.get(HOPPER).and_then(|b| b.inventory.clone()), before);
            prop_assert!(sounds.is_empty());
        }
    }
}
