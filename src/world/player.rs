use std::collections::HashSet;

use bevy::prelude::*;
use uuid::Uuid;

use super::inventory::ItemStack;

/// Player marker with identity
#[derive(Component, Debug, Clone)]
pub struct Player {
    pub name: String,
    pub uuid: Uuid,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            uuid: offline_uuid(&name),
            name,
        }
    }
}

/// What the player has in hand, `None` when empty-handed
#[derive(Component, Debug, Clone, Default)]
pub struct HeldItem(pub Option<ItemStack>);

/// Permission nodes granted to a player
#[derive(Component, Debug, Clone, Default)]
pub struct Permissions(pub HashSet<String>);

impl Permissions {
    pub fn has(&self, node: &str) -> bool {
        self.0.contains(node)
    }
}

/// Name of the player the debug console acts as
pub const DEBUG_PLAYER_NAME: &str = "Steve";

pub fn spawn_player(mut commands: Commands) {
    let player = Player::new(DEBUG_PLAYER_NAME);
    info!("Spawned player {} ({})", player.name, player.uuid);

    commands.spawn((player, HeldItem::default(), Permissions::default()));
}

/// Offline-mode style UUID: stable for a given name.
fn offline_uuid(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("OfflinePlayer:{name}").as_bytes())
}
