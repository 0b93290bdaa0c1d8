//! Unit tests for the action controller.

use bevy::prelude::*;

use super::controller::ActionController;
use super::edit::{ActiveEdit, EditKind, PlannerError};
use super::messages::PlannerRequest;
use crate::history::RestoreOutcome;
use crate::scene::{ModelState, ObjectStore, SurfaceModel, folder_bundle, model_bundle};

struct Case {
    world: World,
    controller: ActionController,
    folder: Entity,
    maxilla: Entity,
    mandible: Entity,
}

fn setup() -> Case {
    let mut world = World::new();
    let folder = world.spawn(folder_bundle("Case 1")).id();
    let maxilla = world
        .spawn(model_bundle("maxilla", SurfaceModel::default(), folder))
        .id();
    let mandible = world
        .spawn(model_bundle("mandible", SurfaceModel::default(), folder))
        .id();

    let mut controller = ActionController::new(10);
    controller.select_folder(&mut world, folder).unwrap();
    controller.select_model(&mut world, mandible).unwrap();

    Case {
        world,
        controller,
        folder,
        maxilla,
        mandible,
    }
}

fn current_names(world: &World, folder: Entity) -> Vec<String> {
    world
        .enumerate_children(folder)
        .into_iter()
        .filter(|entity| world.is_current(*entity))
        .map(|entity| world.get::<Name>(entity).unwrap().as_str().to_string())
        .collect()
}

fn archived_count(world: &mut World) -> usize {
    let mut query = world.query::<&ModelState>();
    query
        .iter(world)
        .filter(|state| **state == ModelState::Archived)
        .count()
}

fn spawn_preview(world: &mut World, name: &str) -> Entity {
    world
        .spawn((Name::new(name.to_string()), SurfaceModel::default(), Transform::default()))
        .id()
}

#[test]
fn test_active_edit_readiness() {
    let model = Entity::PLACEHOLDER;
    assert!(ActiveEdit::new(EditKind::Delete, model).is_ready());
    assert!(!ActiveEdit::new(EditKind::Move, model).is_ready());
    assert!(!ActiveEdit::new(EditKind::Split, model).is_ready());

    let mut bend = ActiveEdit::new(EditKind::Bend, model);
    assert!(!bend.is_ready());
    bend.staged_transform = Some(Transform::from_xyz(0.0, 1.0, 0.0));
    assert!(bend.is_ready());
}

#[test]
fn test_edit_kind_capabilities() {
    assert!(EditKind::Move.accepts_transform());
    assert!(!EditKind::Move.accepts_previews());
    assert!(EditKind::Split.accepts_previews());
    assert!(!EditKind::Split.accepts_transform());
    assert!(EditKind::Bend.accepts_transform() && EditKind::Bend.accepts_previews());
    assert!(!EditKind::Delete.accepts_transform() && !EditKind::Delete.accepts_previews());
    assert_eq!(EditKind::all().len(), 4);
}

#[test]
fn test_select_folder_rejects_non_folder() {
    let mut case = setup();
    let result = case.controller.select_folder(&mut case.world, case.maxilla);
    assert!(matches!(result, Err(PlannerError::NotAFolder(_))));
    assert_eq!(case.controller.selected_folder(), Some(case.folder));
}

#[test]
fn test_select_model_outside_folder_is_rejected() {
    let mut case = setup();
    let other_folder = case.world.spawn(folder_bundle("Case 2")).id();
    let stray = case
        .world
        .spawn(model_bundle("stray", SurfaceModel::default(), other_folder))
        .id();

    let result = case.controller.select_model(&mut case.world, stray);

    assert!(matches!(result, Err(PlannerError::ModelNotInFolder(_))));
    assert_eq!(case.controller.active_model(), Some(case.mandible));
}

#[test]
fn test_begin_edit_requires_active_model() {
    let mut world = World::new();
    let folder = world.spawn(folder_bundle("Case 1")).id();
    let mut controller = ActionController::new(10);

    let result = controller.begin_edit(&mut world, EditKind::Move);
    assert!(matches!(result, Err(PlannerError::NoFolderSelected)));

    controller.select_folder(&mut world, folder).unwrap();
    let result = controller.begin_edit(&mut world, EditKind::Move);
    assert!(matches!(result, Err(PlannerError::NoActiveModel)));
    assert!(!controller.is_editing());
}

#[test]
fn test_begin_edit_caches_folder() {
    let mut case = setup();

    case.controller
        .begin_edit(&mut case.world, EditKind::Move)
        .unwrap();

    assert!(case.controller.is_editing());
    assert!(case.controller.history().has_cached_state());
    assert_eq!(archived_count(&mut case.world), 2);
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla", "mandible"]);
}

#[test]
fn test_second_begin_is_rejected() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Move)
        .unwrap();

    let result = case.controller.begin_edit(&mut case.world, EditKind::Split);

    assert!(matches!(
        result,
        Err(PlannerError::EditInProgress(EditKind::Move))
    ));
    assert_eq!(archived_count(&mut case.world), 2);
}

#[test]
fn test_move_edit_hardens_transform_and_undo_restores() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Move)
        .unwrap();
    case.controller
        .stage_transform(Transform::from_xyz(5.0, 0.0, 0.0))
        .unwrap();
    case.controller.confirm_edit(&mut case.world).unwrap();

    assert!(!case.controller.is_editing());
    assert_eq!(
        case.world.get::<Transform>(case.mandible).unwrap().translation,
        Vec3::new(5.0, 0.0, 0.0)
    );
    assert_eq!(case.controller.history().number_of_states(), 1);
    assert!(case.controller.can_undo());

    let outcome = case.controller.undo(&mut case.world).unwrap();

    assert_eq!(outcome, RestoreOutcome::Restored);
    assert!(case.world.get_entity(case.mandible).is_err());
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla", "mandible"]);
    let restored = case
        .world
        .enumerate_children(case.folder)
        .into_iter()
        .find(|e| case.world.get::<Name>(*e).unwrap().as_str() == "mandible")
        .unwrap();
    assert_eq!(
        case.world.get::<Transform>(restored).unwrap().translation,
        Vec3::ZERO
    );
    assert_eq!(case.controller.active_model(), None);
    assert_eq!(archived_count(&mut case.world), 0);
}

#[test]
fn test_confirm_move_without_transform_keeps_edit_open() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Move)
        .unwrap();

    let result = case.controller.confirm_edit(&mut case.world);

    assert!(matches!(
        result,
        Err(PlannerError::NothingToConfirm(EditKind::Move))
    ));
    assert!(case.controller.is_editing());
    assert!(!case.controller.history().has_history());
}

#[test]
fn test_split_edit_replaces_model_with_previews() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Split)
        .unwrap();
    let positive = spawn_preview(&mut case.world, "mandible positive");
    let negative = spawn_preview(&mut case.world, "mandible negative");
    case.controller
        .add_preview(&mut case.world, positive)
        .unwrap();
    case.controller
        .add_preview(&mut case.world, negative)
        .unwrap();

    case.controller.confirm_edit(&mut case.world).unwrap();

    assert!(case.world.get_entity(case.mandible).is_err());
    assert_eq!(
        current_names(&case.world, case.folder),
        vec!["maxilla", "mandible positive", "mandible negative"]
    );
    assert_eq!(case.controller.active_model(), Some(negative));
    assert_eq!(case.controller.history().number_of_states(), 1);

    case.controller.undo(&mut case.world).unwrap();

    assert!(case.world.get_entity(positive).is_err());
    assert!(case.world.get_entity(negative).is_err());
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla", "mandible"]);
}

#[test]
fn test_cancel_split_discards_previews_and_snapshot() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Split)
        .unwrap();
    let preview = spawn_preview(&mut case.world, "half");
    case.controller
        .add_preview(&mut case.world, preview)
        .unwrap();

    case.controller.cancel_edit(&mut case.world).unwrap();

    assert!(!case.controller.is_editing());
    assert!(case.world.get_entity(preview).is_err());
    assert!(!case.controller.history().has_cached_state());
    assert!(!case.controller.history().has_history());
    assert_eq!(archived_count(&mut case.world), 0);
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla", "mandible"]);
}

#[test]
fn test_split_without_previews_cannot_confirm() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Split)
        .unwrap();

    let result = case.controller.confirm_edit(&mut case.world);

    assert!(matches!(
        result,
        Err(PlannerError::NothingToConfirm(EditKind::Split))
    ));
    assert!(case.controller.is_editing());
}

#[test]
fn test_delete_edit_removes_model() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Delete)
        .unwrap();
    case.controller.confirm_edit(&mut case.world).unwrap();

    assert!(case.world.get_entity(case.mandible).is_err());
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla"]);
    assert_eq!(case.controller.active_model(), None);

    case.controller.undo(&mut case.world).unwrap();
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla", "mandible"]);
}

#[test]
fn test_bend_with_transform_only_hardens() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Bend)
        .unwrap();
    case.controller
        .stage_transform(Transform::from_xyz(0.0, 2.0, 0.0))
        .unwrap();
    case.controller.confirm_edit(&mut case.world).unwrap();

    assert_eq!(
        case.world.get::<Transform>(case.mandible).unwrap().translation,
        Vec3::new(0.0, 2.0, 0.0)
    );
}

#[test]
fn test_unsupported_edit_operations() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Delete)
        .unwrap();
    let result = case.controller.stage_transform(Transform::default());
    assert!(matches!(result, Err(PlannerError::Unsupported { .. })));
    case.controller.cancel_edit(&mut case.world).unwrap();

    case.controller
        .begin_edit(&mut case.world, EditKind::Move)
        .unwrap();
    let preview = spawn_preview(&mut case.world, "half");
    let result = case.controller.add_preview(&mut case.world, preview);
    assert!(matches!(result, Err(PlannerError::Unsupported { .. })));
}

#[test]
fn test_add_preview_rejects_non_model() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Split)
        .unwrap();
    let plane = case.world.spawn(Name::new("plane")).id();

    let result = case.controller.add_preview(&mut case.world, plane);
    assert!(matches!(result, Err(PlannerError::NotAModel(_))));
}

#[test]
fn test_undo_and_folder_switch_rejected_during_edit() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Delete)
        .unwrap();

    assert!(!case.controller.can_undo());
    assert!(matches!(
        case.controller.undo(&mut case.world),
        Err(PlannerError::EditInProgress(_))
    ));
    assert!(matches!(
        case.controller.select_folder(&mut case.world, case.folder),
        Err(PlannerError::EditInProgress(_))
    ));
}

#[test]
fn test_undo_with_no_history_reports_nothing() {
    let mut case = setup();
    let outcome = case.controller.undo(&mut case.world).unwrap();
    assert_eq!(outcome, RestoreOutcome::NothingToRestore);
    assert_eq!(case.controller.active_model(), Some(case.mandible));
}

#[test]
fn test_redo_never_restores() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Delete)
        .unwrap();
    case.controller.confirm_edit(&mut case.world).unwrap();
    case.controller.undo(&mut case.world).unwrap();

    assert!(!case.controller.can_redo());
    let outcome = case.controller.redo().unwrap();
    assert_eq!(outcome, RestoreOutcome::NothingToRestore);
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla", "mandible"]);
}

#[test]
fn test_switching_folder_clears_history() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Delete)
        .unwrap();
    case.controller.confirm_edit(&mut case.world).unwrap();
    let other_folder = case.world.spawn(folder_bundle("Case 2")).id();

    case.controller
        .select_folder(&mut case.world, other_folder)
        .unwrap();

    assert!(!case.controller.history().has_history());
    assert_eq!(case.controller.active_model(), None);
    assert_eq!(archived_count(&mut case.world), 0);
}

#[test]
fn test_finish_plan_releases_states_and_keeps_live_models() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Delete)
        .unwrap();
    case.controller.confirm_edit(&mut case.world).unwrap();
    case.controller
        .select_model(&mut case.world, case.maxilla)
        .unwrap();
    case.controller
        .begin_edit(&mut case.world, EditKind::Move)
        .unwrap();

    case.controller.finish_plan(&mut case.world).unwrap();

    assert!(!case.controller.is_editing());
    assert!(!case.controller.history().has_history());
    assert!(!case.controller.history().has_cached_state());
    assert_eq!(archived_count(&mut case.world), 0);
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla"]);
}

#[test]
fn test_shutdown_releases_everything() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Delete)
        .unwrap();
    case.controller.confirm_edit(&mut case.world).unwrap();

    case.controller.shutdown(&mut case.world).unwrap();

    assert!(!case.controller.history().has_history());
    assert_eq!(archived_count(&mut case.world), 0);
    assert_eq!(case.controller.history().maximum_saved_states(), 10);
}

#[test]
fn test_capacity_change_evicts_states() {
    let mut case = setup();
    for _ in 0..3 {
        case.controller
            .begin_edit(&mut case.world, EditKind::Move)
            .unwrap();
        case.controller
            .stage_transform(Transform::from_xyz(1.0, 0.0, 0.0))
            .unwrap();
        case.controller.confirm_edit(&mut case.world).unwrap();
    }
    assert_eq!(archived_count(&mut case.world), 6);

    case.controller
        .set_maximum_saved_states(&mut case.world, 1)
        .unwrap();

    assert_eq!(case.controller.history().number_of_states(), 1);
    assert_eq!(archived_count(&mut case.world), 2);
}

#[test]
fn test_apply_dispatches_requests() {
    let mut case = setup();

    case.controller
        .apply(&mut case.world, PlannerRequest::BeginEdit(EditKind::Delete))
        .unwrap();
    case.controller
        .apply(&mut case.world, PlannerRequest::ConfirmEdit)
        .unwrap();
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla"]);

    case.controller
        .apply(&mut case.world, PlannerRequest::Undo)
        .unwrap();
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla", "mandible"]);

    let result = case
        .controller
        .apply(&mut case.world, PlannerRequest::CancelEdit);
    assert!(matches!(result, Err(PlannerError::NoEditInProgress)));
}

#[test]
fn test_default_controller_uses_default_capacity() {
    let controller = ActionController::default();
    assert_eq!(
        controller.history().maximum_saved_states(),
        crate::constants::DEFAULT_MAXIMUM_SAVED_STATES
    );
    assert!(!controller.history().has_history());
}

#[test]
fn test_awaits_previews_until_first_result() {
    let mut split = ActiveEdit::new(EditKind::Split, Entity::PLACEHOLDER);
    assert!(split.awaits_previews());
    split.previews.push(Entity::PLACEHOLDER);
    assert!(!split.awaits_previews());

    assert!(!ActiveEdit::new(EditKind::Move, Entity::PLACEHOLDER).awaits_previews());
}

#[test]
fn test_add_preview_rejects_folder_models() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Split)
        .unwrap();

    let sibling = case.controller.add_preview(&mut case.world, case.maxilla);
    let edited = case.controller.add_preview(&mut case.world, case.mandible);

    assert!(matches!(sibling, Err(PlannerError::InvalidPreview(_))));
    assert!(matches!(edited, Err(PlannerError::InvalidPreview(_))));
    assert!(case.controller.active_edit().unwrap().previews.is_empty());
}

#[test]
fn test_cancel_keeps_existing_live_models() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Split)
        .unwrap();
    let _ = case.controller.add_preview(&mut case.world, case.maxilla);
    let preview = spawn_preview(&mut case.world, "half");
    case.controller
        .add_preview(&mut case.world, preview)
        .unwrap();

    case.controller.cancel_edit(&mut case.world).unwrap();

    assert!(case.world.get_entity(case.maxilla).is_ok());
    assert!(case.world.get_entity(case.mandible).is_ok());
    assert!(case.world.get_entity(preview).is_err());
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla", "mandible"]);
    assert_eq!(archived_count(&mut case.world), 0);
}

#[test]
fn test_history_clone_is_not_a_valid_preview() {
    let mut case = setup();
    case.controller
        .begin_edit(&mut case.world, EditKind::Delete)
        .unwrap();
    case.controller.confirm_edit(&mut case.world).unwrap();
    case.controller
        .select_model(&mut case.world, case.maxilla)
        .unwrap();
    case.controller
        .begin_edit(&mut case.world, EditKind::Split)
        .unwrap();
    let clone = case.controller.history().snapshots()[0][0];

    let result = case.controller.add_preview(&mut case.world, clone);

    assert!(matches!(result, Err(PlannerError::InvalidPreview(_))));
    case.controller.cancel_edit(&mut case.world).unwrap();
    assert!(case.world.get_entity(clone).is_ok());
    assert_eq!(
        case.world.get::<ModelState>(clone),
        Some(&ModelState::Archived)
    );

    // The saved state is intact and undo walks back cleanly
    let first = case.controller.undo(&mut case.world).unwrap();
    let second = case.controller.undo(&mut case.world).unwrap();
    assert_eq!(first, RestoreOutcome::Restored);
    assert_eq!(second, RestoreOutcome::NothingToRestore);
    assert_eq!(current_names(&case.world, case.folder), vec!["maxilla", "mandible"]);
}
