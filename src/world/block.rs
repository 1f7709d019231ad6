use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use serde::Serialize;
use thiserror::Error;

use super::inventory::{Inventory, InventoryType};

/// Composter levels run 0..=8, 8 being "ready"
pub const COMPOSTER_MAX_LEVEL: u8 = 8;

/// Facing every freshly placed hopper gets
pub const DEFAULT_HOPPER_FACING: &str = "down";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Composter,
    Hopper,
    Chest,
    Stone,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown block kind: {0}")]
pub struct UnknownBlockKind(pub String);

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "composter" => Ok(Self::Composter),
            "hopper" => Ok(Self::Hopper),
            "chest" => Ok(Self::Chest),
            "stone" => Ok(Self::Stone),
            _ => Err(UnknownBlockKind(s.to_owned())),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Composter => "composter",
            Self::Hopper => "hopper",
            Self::Chest => "chest",
            Self::Stone => "stone",
        };
        f.write_str(name)
    }
}

/// Discrete fill level of a block, like a composter's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Levelled {
    pub level: u8,
    pub maximum_level: u8,
}

impl Levelled {
    pub fn composter() -> Self {
        Self {
            level: 0,
            maximum_level: COMPOSTER_MAX_LEVEL,
        }
    }
}

/// Per-block state values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockState {
    Plain,
    Levelled(Levelled),
    /// Raw facing name as stored on the block, not yet validated
    Directional { facing: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub state: BlockState,
    pub inventory: Option<Inventory>,
}

impl Block {
    /// Block with the default state of its kind.
    pub fn new(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Composter => Self {
                kind,
                state: BlockState::Levelled(Levelled::composter()),
                inventory: None,
            },
            BlockKind::Hopper => Self::hopper(DEFAULT_HOPPER_FACING),
            BlockKind::Chest => Self {
                kind,
                state: BlockState::Plain,
                inventory: Some(Inventory::new(InventoryType::Chest)),
            },
            BlockKind::Stone => Self {
                kind,
                state: BlockState::Plain,
                inventory: None,
            },
        }
    }

    pub fn hopper(facing: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Hopper,
            state: BlockState::Directional { facing: facing.into() },
            inventory: Some(Inventory::new(InventoryType::Hopper)),
        }
    }

    pub fn composter_at_level(level: u8) -> Self {
        Self {
            kind: BlockKind::Composter,
            state: BlockState::Levelled(Levelled {
                level,
                maximum_level: COMPOSTER_MAX_LEVEL,
            }),
            inventory: None,
        }
    }

    pub fn levelled(&self) -> Option<&Levelled> {
        match &self.state {
            BlockState::Levelled(levelled) => Some(levelled),
            _ => None,
        }
    }

    pub fn levelled_mut(&mut self) -> Option<&mut Levelled> {
        match &mut self.state {
            BlockState::Levelled(levelled) => Some(levelled),
            _ => None,
        }
    }

    pub fn facing(&self) -> Option<&str> {
        match &self.state {
            BlockState::Directional { facing } => Some(facing),
            _ => None,
        }
    }
}

/// Sparse block grid. Positions that are not stored are air.
#[derive(Resource, Debug, Default)]
pub struct BlockWorld {
    blocks: HashMap<IVec3, Block>,
}

impl BlockWorld {
    pub fn get(&self, at: IVec3) -> Option<&Block> {
        self.blocks.get(&at)
    }

    pub fn get_mut(&mut self, at: IVec3) -> Option<&mut Block> {
        self.blocks.get_mut(&at)
    }

    pub fn kind_at(&self, at: IVec3) -> Option<BlockKind> {
        self.get(at).map(|b| b.kind)
    }

    /// Places `block` at `at`, returning whatever was there before.
    pub fn set(&mut self, at: IVec3, block: Block) -> Option<Block> {
        self.blocks.insert(at, block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Positions of every block of `kind`, sorted so iteration order is stable.
    pub fn positions_of(&self, kind: BlockKind) -> Vec<IVec3> {
        let mut positions: Vec<IVec3> = self
            .blocks
            .iter()
            .filter(|(_, b)| b.kind == kind)
            .map(|(p, _)| *p)
            .collect();
        positions.sort_by_key(|p| (p.y, p.z, p.x));
        positions
    }
}
