use egui::{vec2, Align, Layout, RichText, Ui};

use blackboard::{BoardState, ToolMode};

use crate::theme::{self, WidthClass};
use crate::ui_controls;

#[derive(Default)]
pub struct ActionBarOutput {
    pub undo: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub reset_view: bool,
}

pub fn zoom_label(scale: f32) -> String {
    format!("{:.0}%", scale * 100.0)
}

pub fn mode_hint(mode: ToolMode) -> &'static str {
    match mode {
        ToolMode::Move => "Drag to pan, pinch or Ctrl+scroll to zoom",
        ToolMode::Draw => "Drag to draw",
        ToolMode::PlaceNote => "Tap to place a note",
    }
}

pub fn show_action_bar(ui: &mut Ui, state: &BoardState, width_class: WidthClass) -> ActionBarOutput {
    let theme = theme::chalk_theme();
    let action_h = theme.controls.action_height;
    let button_gap = theme.layout.space_3;
    let view_controls = state.mode() == ToolMode::Move;

    let mut out = ActionBarOutput::default();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = vec2(button_gap, 0.0);

        let undo_button = ui.add_enabled_ui(state.can_undo(), |ui| {
            ui_controls::ghost_button(ui, &theme, "↩ Undo", vec2(98.0, action_h))
        });
        if undo_button.inner.on_hover_text("Ctrl+Z").clicked() {
            out.undo = true;
        }

        if width_class != WidthClass::Compact {
            ui.label(
                RichText::new(mode_hint(state.mode()))
                    .color(theme.text.muted)
                    .size(13.0),
            );
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.add_space(theme.layout.space_2);

            ui.add_enabled_ui(view_controls, |ui| {
                if ui_controls::ghost_button(ui, &theme, "Reset", vec2(64.0, action_h)).clicked() {
                    out.reset_view = true;
                }
                if ui_controls::ghost_button(ui, &theme, "+", vec2(32.0, action_h)).clicked() {
                    out.zoom_in = true;
                }
                ui.label(
                    RichText::new(zoom_label(state.viewport().scale))
                        .color(theme.text.secondary)
                        .size(13.0),
                );
                if ui_controls::ghost_button(ui, &theme, "−", vec2(32.0, action_h)).clicked() {
                    out.zoom_out = true;
                }
            });
            ui_controls::vertical_divider(ui, &theme, 16.0);
        });
    });

    out
}
