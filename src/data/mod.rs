pub mod loader;
pub mod schema;

use std::sync::Arc;

use bevy::prelude::*;

use crate::composter::CompostTable;
use crate::core::settings::ServerSettings;
use crate::core::states::AppState;

// --------------------------- Resources ---------------------------

/// Handle to the active compostables table.
///
/// Reloading swaps the whole `Arc`, so anyone holding the previous snapshot
/// keeps a complete table.
#[derive(Resource, Default)]
pub struct Compostables {
    table: Arc<CompostTable>,
}

impl Compostables {
    pub fn new(table: CompostTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn current(&self) -> Arc<CompostTable> {
        Arc::clone(&self.table)
    }

    pub fn replace(&mut self, table: CompostTable) {
        self.table = Arc::new(table);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Re-reads the config and swaps in the new table.
///
/// On failure the current table stays in place and the error is returned.
pub fn reload(settings: &ServerSettings, compostables: &mut Compostables) -> Result<usize, loader::ConfigError> {
    loader::save_default_config(&settings.config_path)?;
    let table = loader::load_compost_table(&settings.config_path)?;
    compostables.replace(table);

    info!("Loaded {} extra compostable items.", compostables.len());
    Ok(compostables.len())
}

// --------------------------- Plugin ---------------------------

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Compostables>()
            .add_systems(OnEnter(AppState::Loading), load_compostables);
    }
}

// --------------------------- Systems ---------------------------

fn load_compostables(
    settings: Res<ServerSettings>,
    mut compostables: ResMut<Compostables>,
    mut next: ResMut<NextState<AppState>>,
) {
    if let Err(e) = reload(&settings, &mut compostables) {
        error!("Failed to load {}: {e}", settings.config_path.display());
        compostables.replace(CompostTable::default());
    }

    info!("Enabled composter extension.");
    next.set(AppState::Running);
}
