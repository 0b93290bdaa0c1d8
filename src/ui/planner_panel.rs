//! Right-hand planner panel: folder and model selection, edit controls,
//! and undo.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::{AppConfig, SetMaximumSavedStatesRequest};
use crate::constants::PLANNER_PANEL_WIDTH;
use crate::planner::{ActionController, EditKind, PlannerRequest};
use crate::scene::{ModelFolder, ModelState, SurfaceModel};

/// Widget state that outlives a single frame
#[derive(Resource, Default)]
pub struct PlannerPanelState {
    /// Offset staged by the Move and Bend controls
    pub offset: Vec2,
    /// Capacity being edited in the settings section
    pub maximum_saved_states: usize,
    pub capacity_loaded: bool,
}

pub type FolderQuery<'w, 's> = Query<'w, 's, (Entity, &'static Name), With<ModelFolder>>;

pub type ModelQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Name,
        &'static ModelState,
        &'static ChildOf,
        &'static SurfaceModel,
        &'static Transform,
    ),
>;

/// Main planner panel UI system.
#[allow(clippy::too_many_arguments)]
pub fn planner_panel_ui(
    mut contexts: EguiContexts,
    mut commands: Commands,
    controller: Res<ActionController>,
    config: Res<AppConfig>,
    mut panel_state: ResMut<PlannerPanelState>,
    folders: FolderQuery,
    models: ModelQuery,
    mut requests: MessageWriter<PlannerRequest>,
    mut capacity_events: MessageWriter<SetMaximumSavedStatesRequest>,
) -> Result {
    if !panel_state.capacity_loaded {
        panel_state.maximum_saved_states = config.data.maximum_saved_states;
        panel_state.capacity_loaded = true;
    }

    egui::SidePanel::right("planner_panel")
        .default_width(PLANNER_PANEL_WIDTH)
        .show(contexts.ctx_mut()?, |ui| {
            render_folder_selection(ui, &controller, &folders, &mut requests);
            render_models(ui, &controller, &models, &mut requests);
            render_edit_controls(ui, &controller, &mut panel_state, &mut requests);
            if let Some(edit) = controller.active_edit()
                && edit.awaits_previews()
                && let Ok((_, name, _, _, model, transform)) = models.get(edit.model)
            {
                render_cut_tool(ui, &mut commands, edit.model, name, model, transform, &mut requests);
            }
            render_history(ui, &controller, &mut requests);
            render_capacity(ui, &mut panel_state, &mut capacity_events);
        });
    Ok(())
}

fn section_heading(ui: &mut egui::Ui, title: &str) {
    ui.add_space(6.0);
    ui.label(egui::RichText::new(title).heading().size(16.0));
    ui.separator();
}

fn render_folder_selection(
    ui: &mut egui::Ui,
    controller: &ActionController,
    folders: &FolderQuery,
    requests: &mut MessageWriter<PlannerRequest>,
) {
    section_heading(ui, "Case");

    let selected = controller.selected_folder();
    let selected_text = selected
        .and_then(|folder| folders.get(folder).ok())
        .map(|(_, name)| name.as_str().to_string())
        .unwrap_or_else(|| "Select a folder".to_string());

    ui.add_enabled_ui(!controller.is_editing(), |ui| {
        egui::ComboBox::from_id_salt("case_folder")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for (entity, name) in folders.iter() {
                    if ui
                        .selectable_label(selected == Some(entity), name.as_str())
                        .clicked()
                        && selected != Some(entity)
                    {
                        requests.write(PlannerRequest::SelectFolder(entity));
                    }
                }
            });
    });
}

fn render_models(
    ui: &mut egui::Ui,
    controller: &ActionController,
    models: &ModelQuery,
    requests: &mut MessageWriter<PlannerRequest>,
) {
    section_heading(ui, "Models");

    let Some(folder) = controller.selected_folder() else {
        ui.weak("No folder selected");
        return;
    };

    let mut any = false;
    ui.add_enabled_ui(!controller.is_editing(), |ui| {
        for (entity, name, state, child_of, model, _) in models.iter() {
            if child_of.parent() != folder || *state != ModelState::Current {
                continue;
            }
            any = true;
            let selected = controller.active_model() == Some(entity);
            let label = egui::RichText::new(name.as_str()).color(model_color(model));
            let mut response = ui.selectable_label(selected, label);
            if let Some(source) = &model.source {
                response = response.on_hover_text(source.display().to_string());
            }
            if response.clicked() && !selected {
                requests.write(PlannerRequest::SelectModel(entity));
            }
        }
    });

    if !any {
        ui.weak("Folder is empty");
    }
}

fn model_color(model: &SurfaceModel) -> egui::Color32 {
    let [r, g, b, a] = model.color;
    egui::Rgba::from_rgba_unmultiplied(r, g, b, a).into()
}

fn render_edit_controls(
    ui: &mut egui::Ui,
    controller: &ActionController,
    panel_state: &mut PlannerPanelState,
    requests: &mut MessageWriter<PlannerRequest>,
) {
    section_heading(ui, "Edit");

    ui.horizontal_wrapped(|ui| {
        for kind in EditKind::all() {
            if ui
                .add_enabled(controller.can_begin_edit(), egui::Button::new(kind.display_name()))
                .clicked()
            {
                requests.write(PlannerRequest::BeginEdit(*kind));
            }
        }
    });

    let Some(edit) = controller.active_edit() else {
        return;
    };

    ui.add_space(4.0);
    ui.label(format!("{} in progress", edit.kind));

    if edit.kind.accepts_transform() {
        ui.horizontal(|ui| {
            ui.label("Offset");
            ui.add(egui::DragValue::new(&mut panel_state.offset.x).speed(0.5).prefix("x "));
            ui.add(egui::DragValue::new(&mut panel_state.offset.y).speed(0.5).prefix("y "));
        });
        if ui.button("Stage").clicked() {
            let transform = Transform::from_translation(panel_state.offset.extend(0.0));
            requests.write(PlannerRequest::StageTransform(transform));
        }
    }

    if edit.kind.accepts_previews() && !edit.previews.is_empty() {
        ui.weak(format!("{} result model(s)", edit.previews.len()));
    }

    ui.horizontal(|ui| {
        if ui
            .add_enabled(edit.is_ready(), egui::Button::new("Confirm (Enter)"))
            .clicked()
        {
            requests.write(PlannerRequest::ConfirmEdit);
        }
        if ui.button("Cancel (Esc)").clicked() {
            requests.write(PlannerRequest::CancelEdit);
        }
    });
}

/// Stand-in for the external cut filter: splits the model into two halves.
/// Shown only until the edit has its result models.
fn render_cut_tool(
    ui: &mut egui::Ui,
    commands: &mut Commands,
    model_entity: Entity,
    name: &Name,
    model: &SurfaceModel,
    transform: &Transform,
    requests: &mut MessageWriter<PlannerRequest>,
) {
    if !ui.button("Cut in half").clicked() {
        return;
    }

    for (suffix, shift) in [("upper", 10.0), ("lower", -10.0)] {
        let preview = commands
            .spawn((
                Name::new(format!("{} {}", name.as_str(), suffix)),
                model.clone(),
                transform.with_translation(transform.translation + Vec3::Y * shift),
            ))
            .id();
        requests.write(PlannerRequest::AddPreview(preview));
    }
    debug!("Cut {:?} into two previews", model_entity);
}

fn render_history(
    ui: &mut egui::Ui,
    controller: &ActionController,
    requests: &mut MessageWriter<PlannerRequest>,
) {
    section_heading(ui, "History");

    let history = controller.history();
    ui.label(format!(
        "States {} / {}",
        history.number_of_states(),
        history.maximum_saved_states()
    ));

    ui.horizontal(|ui| {
        if ui
            .add_enabled(controller.can_undo(), egui::Button::new("Undo"))
            .on_hover_text("Ctrl+Z")
            .clicked()
        {
            requests.write(PlannerRequest::Undo);
        }
        if ui
            .add_enabled(controller.can_redo(), egui::Button::new("Redo"))
            .on_disabled_hover_text("Redo is not available")
            .clicked()
        {
            requests.write(PlannerRequest::Redo);
        }
    });

    if ui
        .add_enabled(
            controller.selected_folder().is_some(),
            egui::Button::new("Finish Plan"),
        )
        .on_hover_text("Release all saved states")
        .clicked()
    {
        requests.write(PlannerRequest::FinishPlan);
    }
}

fn render_capacity(
    ui: &mut egui::Ui,
    panel_state: &mut PlannerPanelState,
    capacity_events: &mut MessageWriter<SetMaximumSavedStatesRequest>,
) {
    section_heading(ui, "Settings");

    ui.horizontal(|ui| {
        ui.label("Undo states");
        let response = ui.add(
            egui::DragValue::new(&mut panel_state.maximum_saved_states).range(0..=100),
        );
        if response.changed() {
            capacity_events.write(SetMaximumSavedStatesRequest {
                value: panel_state.maximum_saved_states,
            });
        }
    });
}
