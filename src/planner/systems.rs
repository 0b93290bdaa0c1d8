//! Bevy systems feeding requests into the action controller.

use bevy::prelude::*;

use super::controller::ActionController;
use super::edit::PlannerError;
use super::messages::PlannerRequest;
use crate::config::{AppConfig, SetMaximumSavedStatesRequest};

/// Rejected requests are logged; store failures go to the error handler.
fn report(result: Result<(), PlannerError>) -> Result {
    match result {
        Ok(()) => Ok(()),
        Err(PlannerError::Store(err)) => Err(err.into()),
        Err(err) => {
            warn!("Planner request rejected: {}", err);
            Ok(())
        }
    }
}

/// Queue a world command running `f` against the controller.
fn queue_controller_command<F>(commands: &mut Commands, f: F)
where
    F: FnOnce(&mut ActionController, &mut World) -> Result<(), PlannerError> + Send + 'static,
{
    commands.queue(move |world: &mut World| -> Result {
        world.resource_scope(|world, mut controller: Mut<ActionController>| {
            report(f(&mut controller, world))
        })
    });
}

/// System applying planner requests with exclusive world access
pub fn apply_planner_requests(
    mut requests: MessageReader<PlannerRequest>,
    mut commands: Commands,
) {
    for request in requests.read() {
        let request = request.clone();
        debug!("Planner request: {:?}", request);
        queue_controller_command(&mut commands, move |controller, world| {
            controller.apply(world, request)
        });
    }
}

/// Startup system applying the configured undo capacity
pub fn configure_history(mut commands: Commands, config: Res<AppConfig>) {
    let maximum_saved_states = config.data.maximum_saved_states;
    queue_controller_command(&mut commands, move |controller, world| {
        controller.set_maximum_saved_states(world, maximum_saved_states)
    });
}

/// System applying capacity changes made from the UI
pub fn apply_capacity_changes(
    mut events: MessageReader<SetMaximumSavedStatesRequest>,
    mut commands: Commands,
) {
    for event in events.read() {
        let maximum_saved_states = event.value;
        queue_controller_command(&mut commands, move |controller, world| {
            controller.set_maximum_saved_states(world, maximum_saved_states)
        });
    }
}

/// System to handle planner keyboard shortcuts
///
/// - Ctrl+Z: undo
/// - Ctrl+Y or Ctrl+Shift+Z: redo
/// - Enter / Escape: confirm / cancel the edit in progress
pub fn handle_planner_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    controller: Res<ActionController>,
    mut requests: MessageWriter<PlannerRequest>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if ctrl && !shift && keyboard.just_pressed(KeyCode::KeyZ) {
        requests.write(PlannerRequest::Undo);
    }

    let redo_pressed = (ctrl && keyboard.just_pressed(KeyCode::KeyY))
        || (ctrl && shift && keyboard.just_pressed(KeyCode::KeyZ));
    if redo_pressed {
        requests.write(PlannerRequest::Redo);
    }

    if controller.is_editing() {
        if keyboard.just_pressed(KeyCode::Enter) {
            requests.write(PlannerRequest::ConfirmEdit);
        } else if keyboard.just_pressed(KeyCode::Escape) {
            requests.write(PlannerRequest::CancelEdit);
        }
    }
}

/// Release every archived clone the history still owns when the app exits
pub fn release_history_on_exit(mut exit_events: MessageReader<AppExit>, mut commands: Commands) {
    for _event in exit_events.read() {
        info!("Application exiting, releasing model history");
        queue_controller_command(&mut commands, |controller, world| controller.shutdown(world));
    }
}
