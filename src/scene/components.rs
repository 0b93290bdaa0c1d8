use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MODEL_COLOR;

/// Marker for a folder entity whose direct model children form one plan.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ModelFolder;

/// A surface model loaded into the planner.
///
/// Geometry is referenced, not owned: cutting and bending are done by
/// external filters that spawn new models.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceModel {
    pub source: Option<PathBuf>,
    pub color: [f32; 4],
}

impl Default for SurfaceModel {
    fn default() -> Self {
        Self {
            source: None,
            color: DEFAULT_MODEL_COLOR,
        }
    }
}

/// Whether a model belongs to the live plan or to the undo history.
///
/// Entities without this component count as current.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelState {
    /// Visible and editable.
    #[default]
    Current,
    /// Hidden, non-editable, owned by the history.
    Archived,
}

impl ModelState {
    /// Display visibility that goes with this state.
    pub fn visibility(self) -> Visibility {
        match self {
            ModelState::Current => Visibility::Inherited,
            ModelState::Archived => Visibility::Hidden,
        }
    }
}

/// Components for a new current model parented to `folder`.
pub fn model_bundle(name: impl Into<String>, model: SurfaceModel, folder: Entity) -> impl Bundle {
    (
        Name::new(name.into()),
        model,
        Transform::default(),
        ModelState::Current,
        ModelState::Current.visibility(),
        ChildOf(folder),
    )
}

/// Components for a new model folder.
pub fn folder_bundle(name: impl Into<String>) -> impl Bundle {
    (Name::new(name.into()), ModelFolder)
}
