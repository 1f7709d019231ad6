//! The six axis-aligned directions a block can face.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

/// Contains each direction once.
pub const ALL_DIRECTIONS: [Direction; 6] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
    Direction::Up,
    Direction::Down,
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown facing direction: {0}")]
pub struct UnknownFacing(pub String);

impl Direction {
    /// Unit offset of one block step in this direction.
    ///
    /// North is -Z, east is +X, up is +Y.
    pub const fn offset(&self) -> IVec3 {
        match *self {
            Self::North => IVec3::NEG_Z,
            Self::South => IVec3::Z,
            Self::East => IVec3::X,
            Self::West => IVec3::NEG_X,
            Self::Up => IVec3::Y,
            Self::Down => IVec3::NEG_Y,
        }
    }

    /// The block one step from `from` in this direction, `None` past the edge
    /// of the coordinate range.
    pub fn step_from(&self, from: IVec3) -> Option<IVec3> {
        let offset = self.offset();
        Some(IVec3::new(
            from.x.checked_add(offset.x)?,
            from.y.checked_add(offset.y)?,
            from.z.checked_add(offset.z)?,
        ))
    }

    pub const fn name(&self) -> &'static str {
        match *self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl FromStr for Direction {
    type Err = UnknownFacing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_DIRECTIONS
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFacing(s.to_owned()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
