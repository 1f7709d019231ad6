//! Feeding one item into a levelled block.

use bevy::prelude::*;
use rand::Rng;

use super::table::{CompostTable, ItemKind};
use crate::world::block::Levelled;
use crate::world::events::{PlaySoundEvent, Sound};

/// Outcome of one feeding attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceResult {
    /// There was room, the item is spent whether or not the level went up
    Advanced,
    /// Already at the highest level this crate may set, nothing happened
    Full,
}

/// Where feedback sounds go.
pub trait FeedbackSink {
    fn play(&mut self, at: IVec3, sound: Sound);
}

impl FeedbackSink for EventWriter<'_, PlaySoundEvent> {
    fn play(&mut self, at: IVec3, sound: Sound) {
        self.write(PlaySoundEvent {
            at,
            sound,
            volume: 1.0,
            pitch: 1.0,
        });
    }
}

/// A sound that was played, as recorded by `Vec<SoundPlayed>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundPlayed {
    pub at: IVec3,
    pub sound: Sound,
}

impl FeedbackSink for Vec<SoundPlayed> {
    fn play(&mut self, at: IVec3, sound: Sound) {
        self.push(SoundPlayed { at, sound });
    }
}

/// Highest level a feed may leave the block at. The top level is the
/// "ready" state and is never reached through feeding.
pub fn max_accept_level(levelled: &Levelled) -> u8 {
    levelled.maximum_level.saturating_sub(1)
}

pub fn is_full(levelled: &Levelled) -> bool {
    levelled.level >= max_accept_level(levelled)
}

/// Everything a feeding attempt reads from or writes to besides the block
/// itself: the table snapshot, the random source and the sound output.
pub struct Composting<'a, R, S> {
    pub table: &'a CompostTable,
    pub rng: &'a mut R,
    pub sounds: &'a mut S,
}

impl<'a, R: Rng, S: FeedbackSink> Composting<'a, R, S> {
    pub fn new(table: &'a CompostTable, rng: &'a mut R, sounds: &'a mut S) -> Self {
        Self { table, rng, sounds }
    }

    pub fn is_compostable(&self, kind: &ItemKind) -> bool {
        self.table.is_compostable(kind)
    }

    /// Feeds one unit of `kind` into the block at `at`.
    ///
    /// Eligibility is not checked here, a kind missing from the table simply
    /// never succeeds. Draws exactly one random number unless the block is
    /// full. Sounds are only played when there was room.
    pub fn try_advance(
        &mut self,
        kind: &ItemKind,
        at: IVec3,
        levelled: &mut Levelled,
        emit_feedback: bool,
    ) -> AdvanceResult {
        if is_full(levelled) {
            return AdvanceResult::Full;
        }

        let succeeded = self.rng.random::<f64>() < self.table.probability(kind);
        if succeeded {
            levelled.level += 1;
        }

        if emit_feedback {
            let sound = if succeeded {
                Sound::ComposterFillSuccess
            } else {
                Sound::ComposterFill
            };
            self.sounds.play(at, sound);
        }

        AdvanceResult::Advanced
    }
}
