use bevy::prelude::*;

/// Sounds the host knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    ComposterFill,
    ComposterFillSuccess,
}

impl Sound {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ComposterFill => "block.composter.fill",
            Self::ComposterFillSuccess => "block.composter.fill_success",
        }
    }
}

/// Play a sound at a block position
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlaySoundEvent {
    pub at: IVec3,
    pub sound: Sound,
    pub volume: f32,
    pub pitch: f32,
}

/// A player right-clicked `block` with whatever they are holding
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerInteractEvent {
    pub player: Entity,
    pub block: IVec3,
}
