use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::annotations::AnnotationStore;
use crate::config::{AppConfig, SaveConfigRequest, ViewerSettings};
use crate::constants::{MAX_EDGE_THRESHOLD_DEG, MAX_LINE_THICKNESS};
use crate::edges::EdgeDisplayMode;
use crate::mesh::ModelType;
use crate::theme::{self, ThemeMode};

/// Replace the custom palette with a random but coherent one.
///
/// Picks a line hue, places the background roughly opposite on the wheel,
/// keeps the fill identical to the background (the line-art look), and
/// derives the shadow tint from the background hue.
fn randomize_palette(settings: &mut ViewerSettings) {
    let line_hue = rand::random_range(0.0..360.0);
    let background_hue = (line_hue + rand::random_range(120.0..240.0)) % 360.0;

    let background = Color::hsl(
        background_hue,
        rand::random_range(0.2..0.6),
        rand::random_range(0.08..0.2),
    );
    settings.background_color = background;
    settings.model_color = background;
    settings.line_color = Color::hsl(
        line_hue,
        rand::random_range(0.6..1.0),
        rand::random_range(0.5..0.7),
    );
    settings.shadow_color = Color::hsl(
        background_hue,
        rand::random_range(0.2..0.6),
        rand::random_range(0.25..0.35),
    );
    settings.theme = ThemeMode::Custom;
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Color) -> bool {
    let mut edited = theme::bevy_to_egui_opaque(*color);
    let mut changed = false;
    ui.horizontal(|ui| {
        if ui.color_edit_button_srgba(&mut edited).changed() {
            *color = theme::egui_to_bevy(edited);
            changed = true;
        }
        ui.label(label);
    });
    changed
}

/// Renders the right-hand controls panel.
pub fn controls_panel_ui(
    mut contexts: EguiContexts,
    mut config: ResMut<AppConfig>,
    mut store: ResMut<AnnotationStore>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let mut changed = false;

    egui::SidePanel::right("controls_panel")
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Model Inspector");
            ui.add_space(8.0);

            let settings = &mut config.data;

            egui::CollapsingHeader::new("Theme")
                .default_open(true)
                .show(ui, |ui| {
                    egui::ComboBox::from_label("Palette")
                        .selected_text(settings.theme.display_name())
                        .show_ui(ui, |ui| {
                            for mode in ThemeMode::all() {
                                if ui
                                    .selectable_value(
                                        &mut settings.theme,
                                        *mode,
                                        mode.display_name(),
                                    )
                                    .changed()
                                {
                                    changed = true;
                                }
                            }
                        });

                    if settings.theme == ThemeMode::Custom {
                        ui.add_space(4.0);
                        changed |= color_row(ui, "Background", &mut settings.background_color);
                        changed |= color_row(ui, "Model", &mut settings.model_color);
                        changed |= color_row(ui, "Lines", &mut settings.line_color);
                        changed |= color_row(ui, "Shadow", &mut settings.shadow_color);
                        ui.add_space(4.0);
                        if ui.button("Randomize colors").clicked() {
                            randomize_palette(settings);
                            changed = true;
                        }
                    }
                });

            egui::CollapsingHeader::new("Model")
                .default_open(true)
                .show(ui, |ui| {
                    egui::ComboBox::from_label("Shape")
                        .selected_text(settings.model.display_name())
                        .show_ui(ui, |ui| {
                            for model in ModelType::all() {
                                if ui
                                    .selectable_value(
                                        &mut settings.model,
                                        *model,
                                        model.display_name(),
                                    )
                                    .changed()
                                {
                                    changed = true;
                                }
                            }
                        });

                    changed |= ui
                        .add(egui::Slider::new(&mut settings.opacity, 0.0..=1.0).text("Opacity"))
                        .changed();
                    changed |= ui.checkbox(&mut settings.lit, "Lit with shadows").changed();
                });

            egui::CollapsingHeader::new("Edges")
                .default_open(true)
                .show(ui, |ui| {
                    changed |= ui
                        .add(
                            egui::Slider::new(
                                &mut settings.threshold_deg,
                                0.0..=MAX_EDGE_THRESHOLD_DEG,
                            )
                            .text("Threshold (deg)"),
                        )
                        .changed();

                    egui::ComboBox::from_label("Display")
                        .selected_text(settings.display_mode.display_name())
                        .show_ui(ui, |ui| {
                            for mode in EdgeDisplayMode::all() {
                                if ui
                                    .selectable_value(
                                        &mut settings.display_mode,
                                        *mode,
                                        mode.display_name(),
                                    )
                                    .changed()
                                {
                                    changed = true;
                                }
                            }
                        });

                    changed |= ui
                        .checkbox(&mut settings.show_conditional_edges, "Conditional edges")
                        .changed();
                    changed |= ui
                        .checkbox(&mut settings.use_thick_lines, "Thick lines")
                        .changed();
                    changed |= ui
                        .add_enabled(
                            settings.use_thick_lines,
                            egui::Slider::new(&mut settings.thickness, 0.0..=MAX_LINE_THICKNESS)
                                .text("Thickness (px)"),
                        )
                        .changed();
                });

            egui::CollapsingHeader::new("Helpers")
                .default_open(false)
                .show(ui, |ui| {
                    changed |= ui.checkbox(&mut settings.show_axes, "Axes").changed();
                    changed |= ui.checkbox(&mut settings.show_grid, "Grid").changed();
                });

            egui::CollapsingHeader::new("Annotations")
                .default_open(true)
                .show(ui, |ui| {
                    changed |= ui
                        .checkbox(&mut settings.show_annotations, "Show annotations")
                        .changed();
                    ui.label(format!("{} placed", store.len()));
                    ui.label(
                        egui::RichText::new(
                            "Left-click the model to add, right-click near one to remove.",
                        )
                        .weak()
                        .small(),
                    );
                    if ui
                        .add_enabled(!store.is_empty(), egui::Button::new("Clear all"))
                        .clicked()
                    {
                        store.clear();
                    }
                });
        });

    if changed {
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }

    Ok(())
}
