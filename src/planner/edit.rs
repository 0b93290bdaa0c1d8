//! Edit kinds, the in-flight edit, and planner errors.

use std::fmt;

use bevy::prelude::*;
use thiserror::Error;

use crate::scene::StoreError;

/// The reversible edits a clinician can make to a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Rigid move of one model
    Move,
    /// Replace one model with the pieces of a plane or curve cut
    Split,
    /// Remove one model
    Delete,
    /// Replace (or reshape) one model with a bent version
    Bend,
}

impl EditKind {
    pub fn all() -> &'static [EditKind] {
        &[EditKind::Move, EditKind::Split, EditKind::Delete, EditKind::Bend]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EditKind::Move => "Move",
            EditKind::Split => "Split",
            EditKind::Delete => "Delete",
            EditKind::Bend => "Bend",
        }
    }

    /// Whether the edit takes a staged transform to harden on confirm
    pub fn accepts_transform(&self) -> bool {
        matches!(self, EditKind::Move | EditKind::Bend)
    }

    /// Whether the edit takes externally produced result models
    pub fn accepts_previews(&self) -> bool {
        matches!(self, EditKind::Split | EditKind::Bend)
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What confirming an edit does to the live models
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EditChange {
    /// Bake the staged transform into the model's transform
    Harden(Transform),
    /// Delete the model
    Remove,
    /// Delete the model and adopt the previews into the folder
    Replace(Vec<Entity>),
}

/// The edit between begin and confirm/cancel
#[derive(Debug, Clone)]
pub struct ActiveEdit {
    pub kind: EditKind,
    /// Model the edit applies to
    pub model: Entity,
    /// Result models produced by an external filter, not yet in the folder
    pub previews: Vec<Entity>,
    pub staged_transform: Option<Transform>,
}

impl ActiveEdit {
    pub fn new(kind: EditKind, model: Entity) -> Self {
        Self {
            kind,
            model,
            previews: Vec::new(),
            staged_transform: None,
        }
    }

    /// Whether the edit still waits for its result models
    pub fn awaits_previews(&self) -> bool {
        self.kind.accepts_previews() && self.previews.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.change().is_ok()
    }

    pub(crate) fn change(&self) -> Result<EditChange, PlannerError> {
        match self.kind {
            EditKind::Delete => Ok(EditChange::Remove),
            EditKind::Move => self
                .staged_transform
                .map(EditChange::Harden)
                .ok_or(PlannerError::NothingToConfirm(self.kind)),
            EditKind::Split => {
                if self.previews.is_empty() {
                    Err(PlannerError::NothingToConfirm(self.kind))
                } else {
                    Ok(EditChange::Replace(self.previews.clone()))
                }
            }
            EditKind::Bend => match (self.previews.is_empty(), self.staged_transform) {
                (false, _) => Ok(EditChange::Replace(self.previews.clone())),
                (true, Some(transform)) => Ok(EditChange::Harden(transform)),
                (true, None) => Err(PlannerError::NothingToConfirm(self.kind)),
            },
        }
    }
}

/// A planner request that could not be carried out
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("a {0} edit is already in progress")]
    EditInProgress(EditKind),

    #[error("no edit is in progress")]
    NoEditInProgress,

    #[error("no model folder is selected")]
    NoFolderSelected,

    #[error("entity {0:?} is not a model folder")]
    NotAFolder(Entity),

    #[error("entity {0:?} is not a current model in the selected folder")]
    ModelNotInFolder(Entity),

    #[error("entity {0:?} is not a surface model")]
    NotAModel(Entity),

    #[error("entity {0:?} is not a new, unparented result model")]
    InvalidPreview(Entity),

    #[error("no model is selected")]
    NoActiveModel,

    #[error("{operation} is not supported by a {kind} edit")]
    Unsupported {
        kind: EditKind,
        operation: &'static str,
    },

    #[error("the {0} edit has nothing to confirm yet")]
    NothingToConfirm(EditKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}
