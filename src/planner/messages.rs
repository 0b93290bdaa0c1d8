//! Message types for planner requests.

use bevy::prelude::*;

use super::edit::EditKind;

/// A request to the action controller.
///
/// Requests are applied in order at the end of the frame they were sent in.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum PlannerRequest {
    /// Track a different model folder (discards the undo history)
    SelectFolder(Entity),
    /// Make a current model of the folder the target of the next edit
    SelectModel(Entity),
    /// Snapshot the folder and start an edit on the active model
    BeginEdit(EditKind),
    /// Transform a Move or Bend edit bakes in on confirm
    StageTransform(Transform),
    /// Result model of an external cut or bend filter
    AddPreview(Entity),
    ConfirmEdit,
    CancelEdit,
    Undo,
    /// Always reports that no next state is available
    Redo,
    /// Release all saved states and end the plan
    FinishPlan,
}
