//! The edit lifecycle around the model history.

use bevy::prelude::*;

use super::edit::{ActiveEdit, EditChange, EditKind, PlannerError};
use super::messages::PlannerRequest;
use crate::constants::DEFAULT_MAXIMUM_SAVED_STATES;
use crate::history::{ModelHistory, RestoreOutcome};
use crate::scene::{ModelFolder, ObjectStore, StoreError, SurfaceModel};

/// Resource driving begin / confirm / cancel for one edit at a time.
///
/// Every edit snapshots the folder before it starts; confirming commits the
/// snapshot to the history, cancelling discards it. Requests that would
/// interleave two edits are rejected.
#[derive(Resource)]
pub struct ActionController {
    history: ModelHistory<Entity, Entity>,
    active_model: Option<Entity>,
    active_edit: Option<ActiveEdit>,
}

impl Default for ActionController {
    fn default() -> Self {
        Self::new(DEFAULT_MAXIMUM_SAVED_STATES)
    }
}

impl ActionController {
    pub fn new(maximum_saved_states: usize) -> Self {
        Self {
            history: ModelHistory::new(maximum_saved_states),
            active_model: None,
            active_edit: None,
        }
    }

    pub fn history(&self) -> &ModelHistory<Entity, Entity> {
        &self.history
    }

    pub fn selected_folder(&self) -> Option<Entity> {
        self.history.folder()
    }

    pub fn active_model(&self) -> Option<Entity> {
        self.active_model
    }

    pub fn active_edit(&self) -> Option<&ActiveEdit> {
        self.active_edit.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.active_edit.is_some()
    }

    pub fn can_begin_edit(&self) -> bool {
        !self.is_editing() && self.active_model.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.is_editing() && self.history.is_restore_previous_state_available()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_editing() && self.history.is_restore_next_state_available()
    }

    /// Dispatch one request.
    pub fn apply(&mut self, world: &mut World, request: PlannerRequest) -> Result<(), PlannerError> {
        match request {
            PlannerRequest::SelectFolder(folder) => self.select_folder(world, folder),
            PlannerRequest::SelectModel(model) => self.select_model(world, model),
            PlannerRequest::BeginEdit(kind) => self.begin_edit(world, kind),
            PlannerRequest::StageTransform(transform) => self.stage_transform(transform),
            PlannerRequest::AddPreview(preview) => self.add_preview(world, preview),
            PlannerRequest::ConfirmEdit => self.confirm_edit(world),
            PlannerRequest::CancelEdit => self.cancel_edit(world),
            PlannerRequest::Undo => self.undo(world).map(|_| ()),
            PlannerRequest::Redo => self.redo().map(|_| ()),
            PlannerRequest::FinishPlan => self.finish_plan(world),
        }
    }

    pub fn select_folder(&mut self, world: &mut World, folder: Entity) -> Result<(), PlannerError> {
        self.ensure_idle()?;
        if world.get::<ModelFolder>(folder).is_none() {
            return Err(PlannerError::NotAFolder(folder));
        }

        if self.history.folder() != Some(folder) {
            self.history.set_folder(folder, world)?;
            self.active_model = None;
            info!("Selected model folder {:?}", folder);
        }
        Ok(())
    }

    pub fn select_model(&mut self, world: &mut World, model: Entity) -> Result<(), PlannerError> {
        self.ensure_idle()?;
        let folder = self.history.folder().ok_or(PlannerError::NoFolderSelected)?;

        let in_folder = world
            .get::<ChildOf>(model)
            .is_some_and(|child_of| child_of.parent() == folder);
        if !in_folder || world.get::<SurfaceModel>(model).is_none() || !world.is_current(model) {
            return Err(PlannerError::ModelNotInFolder(model));
        }

        self.active_model = Some(model);
        Ok(())
    }

    /// Start an edit on the active model, snapshotting the folder first.
    pub fn begin_edit(&mut self, world: &mut World, kind: EditKind) -> Result<(), PlannerError> {
        self.ensure_idle()?;
        if self.history.folder().is_none() {
            return Err(PlannerError::NoFolderSelected);
        }
        let model = self.require_active_model(world)?;

        self.history.cache_state(world)?;
        self.active_edit = Some(ActiveEdit::new(kind, model));
        info!("Began {} edit on {:?}", kind, model);
        Ok(())
    }

    /// Record the transform a Move or Bend edit bakes in on confirm.
    pub fn stage_transform(&mut self, transform: Transform) -> Result<(), PlannerError> {
        let edit = self
            .active_edit
            .as_mut()
            .ok_or(PlannerError::NoEditInProgress)?;
        if !edit.kind.accepts_transform() {
            return Err(PlannerError::Unsupported {
                kind: edit.kind,
                operation: "staging a transform",
            });
        }

        edit.staged_transform = Some(transform);
        Ok(())
    }

    /// Register a result model produced by an external cut or bend filter.
    pub fn add_preview(&mut self, world: &mut World, preview: Entity) -> Result<(), PlannerError> {
        let edit = self
            .active_edit
            .as_mut()
            .ok_or(PlannerError::NoEditInProgress)?;
        if !edit.kind.accepts_previews() {
            return Err(PlannerError::Unsupported {
                kind: edit.kind,
                operation: "adding a preview",
            });
        }
        if world.get::<SurfaceModel>(preview).is_none() {
            return Err(PlannerError::NotAModel(preview));
        }
        // Folder models and history clones are never previews
        if preview == edit.model
            || !world.is_current(preview)
            || world.get::<ChildOf>(preview).is_some()
        {
            return Err(PlannerError::InvalidPreview(preview));
        }

        if !edit.previews.contains(&preview) {
            edit.previews.push(preview);
        }
        Ok(())
    }

    /// Apply the in-flight edit to the live models and commit it.
    pub fn confirm_edit(&mut self, world: &mut World) -> Result<(), PlannerError> {
        let folder = self.history.folder().ok_or(PlannerError::NoFolderSelected)?;
        let Some(edit) = self.active_edit.take() else {
            return Err(PlannerError::NoEditInProgress);
        };
        let change = match edit.change() {
            Ok(change) => change,
            Err(err) => {
                // Not ready yet; the edit stays open
                self.active_edit = Some(edit);
                return Err(err);
            }
        };

        match change {
            EditChange::Harden(staged) => harden_transform(world, edit.model, staged)?,
            EditChange::Remove => {
                world.delete_object(edit.model)?;
                self.active_model = None;
            }
            EditChange::Replace(previews) => {
                for preview in &previews {
                    adopt_preview(world, *preview, folder)?;
                }
                world.delete_object(edit.model)?;
                self.active_model = previews.last().copied();
            }
        }

        self.history.save_state(world)?;
        info!(
            "Confirmed {} edit ({} state(s) saved)",
            edit.kind,
            self.history.number_of_states()
        );
        Ok(())
    }

    /// Drop the in-flight edit, its previews and its snapshot.
    pub fn cancel_edit(&mut self, world: &mut World) -> Result<(), PlannerError> {
        let edit = self
            .active_edit
            .take()
            .ok_or(PlannerError::NoEditInProgress)?;

        for preview in edit.previews {
            if world.get_entity(preview).is_ok() {
                world.delete_object(preview)?;
            }
        }
        self.history.clear_cached_state(world)?;

        info!("Cancelled {} edit", edit.kind);
        Ok(())
    }

    pub fn undo(&mut self, world: &mut World) -> Result<RestoreOutcome, PlannerError> {
        self.ensure_idle()?;
        let outcome = self.history.restore_previous_state(world)?;
        if outcome == RestoreOutcome::Restored {
            // The active model may have been one of the deleted live models
            self.active_model = None;
        }
        Ok(outcome)
    }

    pub fn redo(&mut self) -> Result<RestoreOutcome, PlannerError> {
        self.ensure_idle()?;
        Ok(self.history.restore_next_state())
    }

    /// End the plan: drop any in-flight edit and release every saved state.
    /// Live models are kept.
    pub fn finish_plan(&mut self, world: &mut World) -> Result<(), PlannerError> {
        if self.is_editing() {
            self.cancel_edit(world)?;
        }
        self.history.clear_history(world)?;
        self.history.clear_cached_state(world)?;
        info!("Finished plan");
        Ok(())
    }

    pub fn set_maximum_saved_states(
        &mut self,
        world: &mut World,
        maximum_saved_states: usize,
    ) -> Result<(), PlannerError> {
        self.history
            .set_maximum_saved_states(maximum_saved_states, world)?;
        Ok(())
    }

    /// Release everything the history owns before the app goes away.
    pub fn shutdown(&mut self, world: &mut World) -> Result<(), PlannerError> {
        if self.is_editing() {
            self.cancel_edit(world)?;
        }
        self.history.clear_cached_state(world)?;

        let maximum_saved_states = self.history.maximum_saved_states();
        let history = std::mem::replace(
            &mut self.history,
            ModelHistory::new(maximum_saved_states),
        );
        history.close(world)?;
        self.active_model = None;
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), PlannerError> {
        match &self.active_edit {
            Some(edit) => Err(PlannerError::EditInProgress(edit.kind)),
            None => Ok(()),
        }
    }

    /// The active model, if it is still a live current model.
    fn require_active_model(&mut self, world: &World) -> Result<Entity, PlannerError> {
        let model = self.active_model.ok_or(PlannerError::NoActiveModel)?;
        if world.get::<SurfaceModel>(model).is_none() || !world.is_current(model) {
            self.active_model = None;
            return Err(PlannerError::NoActiveModel);
        }
        Ok(model)
    }
}

fn harden_transform(world: &mut World, model: Entity, staged: Transform) -> Result<(), StoreError> {
    let mut transform = world
        .get_mut::<Transform>(model)
        .ok_or_else(|| StoreError::missing(model))?;
    *transform = staged.mul_transform(*transform);
    Ok(())
}

fn adopt_preview(world: &mut World, preview: Entity, folder: Entity) -> Result<(), StoreError> {
    world
        .get_entity_mut(preview)
        .map_err(|_| StoreError::missing(preview))?
        .insert(ChildOf(folder));
    world.restore(preview)
}
