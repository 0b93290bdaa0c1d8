mod dialogs;
mod planner_panel;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<planner_panel::PlannerPanelState>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    planner_panel::planner_panel_ui,
                    // Dialogs draw over the panel
                    dialogs::config_reset_notification_ui,
                )
                    .chain(),
            );
    }
}
