//! Scene graph adapter for the planner.
//!
//! The history engine never touches the ECS directly: it goes through the
//! [`ObjectStore`] trait, implemented here for the Bevy [`World`].
//!
//! ## Module Structure
//!
//! - [`components`] - Folder, model and archive-state components
//! - [`store`] - The `ObjectStore` trait and `StoreError`
//! - [`world_store`] - `ObjectStore` implementation over `World`

mod components;
mod store;
mod world_store;


pub use components::{ModelFolder, ModelState, SurfaceModel, folder_bundle, model_bundle};
pub use store::{ObjectStore, StoreError};

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};

/// Spawn the folders and models listed in the config.
fn spawn_configured_cases(mut commands: Commands, config: Res<AppConfig>) {
    for case in &config.data.case_folders {
        let folder = commands.spawn(folder_bundle(case.name.clone())).id();

        for source in &case.models {
            let name = source
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.display().to_string());
            let model = SurfaceModel {
                source: Some(source.clone()),
                ..default()
            };
            commands.spawn(model_bundle(name, model, folder));
        }

        info!(
            "Loaded case folder '{}' with {} model(s)",
            case.name,
            case.models.len()
        );
    }
}

/// Keep display visibility in line with the archive state for models whose
/// state was changed outside the store.
fn sync_model_visibility(
    mut models: Query<(&ModelState, &mut Visibility), (With<SurfaceModel>, Changed<ModelState>)>,
) {
    for (state, mut visibility) in models.iter_mut() {
        let wanted = state.visibility();
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_configured_cases.after(ConfigLoaded))
            .add_systems(Update, sync_model_visibility);
    }
}
