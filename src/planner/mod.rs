//! Edit lifecycle for the surgical plan.
//!
//! Every user edit runs as begin → (external tool mutates models) →
//! confirm or cancel. Beginning snapshots the folder, confirming commits the
//! snapshot to the undo history, cancelling throws it away.
//!
//! ## Module Structure
//!
//! - [`controller`] - `ActionController` resource enforcing one edit at a time
//! - [`edit`] - Edit kinds, the in-flight edit, and `PlannerError`
//! - [`messages`] - `PlannerRequest`, the message the UI and tools send
//! - [`systems`] - Request handling, shortcuts, and exit cleanup

mod controller;
mod edit;
mod messages;
mod systems;

#[cfg(test)]
mod tests;

// Re-exports
pub use controller::ActionController;
pub use edit::EditKind;
pub use messages::PlannerRequest;

use bevy::prelude::*;

use crate::config::ConfigLoaded;

pub struct PlannerPlugin;

impl Plugin for PlannerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionController>()
            .add_message::<PlannerRequest>()
            .add_systems(Startup, systems::configure_history.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    systems::handle_planner_shortcuts,
                    systems::apply_planner_requests.run_if(on_message::<PlannerRequest>),
                    systems::apply_capacity_changes,
                )
                    .chain(),
            )
            .add_systems(Last, systems::release_history_on_exit);
    }
}
