use egui::{vec2, Align, Color32, Layout, Pos2, Rect, RichText, Shape, Stroke, Ui};

use blackboard::{BoardState, ToolMode};

use crate::theme::{self, AppTheme, WidthClass};
use crate::ui_controls;

pub const PENCIL_PALETTE: [[u8; 4]; 8] = [
    [0xFF, 0xFF, 0xFF, 0xFF],
    [0xE5, 0x3E, 0x3E, 0xFF],
    [0xDD, 0x6B, 0x20, 0xFF],
    [0xD6, 0x9E, 0x2E, 0xFF],
    [0x38, 0xA1, 0x69, 0xFF],
    [0x31, 0x82, 0xCE, 0xFF],
    [0x80, 0x5A, 0xD5, 0xFF],
    [0x1A, 0x20, 0x2C, 0xFF],
];

pub const NOTE_PALETTE: [[u8; 4]; 5] = [
    [0xFF, 0xD6, 0x0A, 0xFF],
    [0xFF, 0x9F, 0xC6, 0xFF],
    [0x9B, 0xE5, 0x8C, 0xFF],
    [0x8E, 0xC9, 0xFF, 0xFF],
    [0xFF, 0xB3, 0x6B, 0xFF],
];

#[derive(Clone, Copy, Debug)]
pub struct ToolbarPlan {
    pub show_title: bool,
    pub visible_pencil_count: usize,
    pub visible_note_count: usize,
    pub show_overflow: bool,
}

pub fn plan_toolbar_items(width_class: WidthClass, state: &BoardState) -> ToolbarPlan {
    let (visible_pencil_count, visible_note_count) = match width_class {
        WidthClass::Compact => match state.mode() {
            ToolMode::PlaceNote => (1, 3),
            _ => (4, 1),
        },
        WidthClass::Regular => (6, 3),
        WidthClass::Wide => (PENCIL_PALETTE.len(), NOTE_PALETTE.len()),
    };

    ToolbarPlan {
        show_title: width_class != WidthClass::Compact,
        visible_pencil_count,
        visible_note_count,
        show_overflow: visible_pencil_count < PENCIL_PALETTE.len()
            || visible_note_count < NOTE_PALETTE.len(),
    }
}

pub fn show_toolbar(ui: &mut Ui, state: &mut BoardState, width_class: WidthClass) {
    let theme = theme::chalk_theme();
    let plan = plan_toolbar_items(width_class, state);

    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        ui.spacing_mut().interact_size.y = theme.layout.chip_h;
        ui.spacing_mut().item_spacing = vec2(theme.layout.control_gap, 0.0);

        if plan.show_title {
            ui.label(
                RichText::new("Blackboard")
                    .strong()
                    .size(17.0)
                    .color(theme.text.title),
            );
            group_separator(ui, &theme);
        }

        mode_button(ui, state, ToolMode::Move, "Move and zoom (M)");
        mode_button(ui, state, ToolMode::Draw, "Pencil (D)");
        render_pencil_palette(ui, state, &theme, plan.visible_pencil_count);

        group_separator(ui, &theme);
        mode_button(ui, state, ToolMode::PlaceNote, "Sticky note (N)");
        render_note_palette(ui, state, &theme, plan.visible_note_count);

        if plan.show_overflow {
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.menu_button("…", |ui| {
                    ui.spacing_mut().item_spacing =
                        vec2(theme.layout.control_gap, theme.layout.space_2);
                    if plan.visible_pencil_count < PENCIL_PALETTE.len() {
                        ui.label(RichText::new("Pencil").color(theme.text.muted).size(12.0));
                        ui.horizontal_wrapped(|ui| {
                            for color in PENCIL_PALETTE.iter().skip(plan.visible_pencil_count) {
                                if pencil_chip(ui, state, &theme, *color) {
                                    ui.close_menu();
                                }
                            }
                        });
                    }
                    if plan.visible_note_count < NOTE_PALETTE.len() {
                        ui.label(RichText::new("Notes").color(theme.text.muted).size(12.0));
                        ui.horizontal_wrapped(|ui| {
                            for color in NOTE_PALETTE.iter().skip(plan.visible_note_count) {
                                if note_chip(ui, state, &theme, *color) {
                                    ui.close_menu();
                                }
                            }
                        });
                    }
                });
            });
        }
    });
}

fn render_pencil_palette(ui: &mut Ui, state: &mut BoardState, theme: &AppTheme, count: usize) {
    for color in PENCIL_PALETTE.iter().take(count) {
        pencil_chip(ui, state, theme, *color);
    }
}

fn render_note_palette(ui: &mut Ui, state: &mut BoardState, theme: &AppTheme, count: usize) {
    for color in NOTE_PALETTE.iter().take(count) {
        note_chip(ui, state, theme, *color);
    }
}

fn pencil_chip(ui: &mut Ui, state: &mut BoardState, theme: &AppTheme, color: [u8; 4]) -> bool {
    let selected = state.pencil_color() == color;
    let clicked = ui_controls::color_chip(ui, theme, ui_controls::rgba_to_color32(color), selected)
        .on_hover_text("Pencil color")
        .clicked();
    if clicked {
        state.set_draw_color(color);
    }
    clicked
}

fn note_chip(ui: &mut Ui, state: &mut BoardState, theme: &AppTheme, color: [u8; 4]) -> bool {
    let selected = state.note_color() == color;
    let clicked = ui_controls::color_chip(ui, theme, ui_controls::rgba_to_color32(color), selected)
        .on_hover_text("Note color")
        .clicked();
    if clicked {
        state.set_note_color(color);
    }
    clicked
}

fn group_separator(ui: &mut Ui, theme: &AppTheme) {
    ui.separator();
    let extra = (theme.layout.group_gap - theme.layout.control_gap).max(0.0);
    if extra > 0.0 {
        ui.add_space(extra);
    }
}

fn mode_button(ui: &mut Ui, state: &mut BoardState, mode: ToolMode, hint: &str) {
    let theme = theme::chalk_theme();
    let selected = state.mode() == mode;
    let response = ui_controls::tool_chip(ui, &theme, "", selected).on_hover_text(hint);
    draw_mode_icon(ui, response.rect, mode, &theme);
    if response.clicked() {
        state.set_mode(mode);
    }
}

fn draw_mode_icon(ui: &Ui, rect: Rect, mode: ToolMode, theme: &AppTheme) {
    let color = theme.text.primary;
    let stroke = Stroke::new(1.65, color);
    let painter = ui.painter();
    let icon_rect = rect.shrink(9.0);
    let c = icon_rect.center();

    match mode {
        ToolMode::Move => {
            let half = icon_rect.width().min(icon_rect.height()) * 0.5;
            let tips = [
                (Pos2::new(c.x, c.y - half), vec2(0.0, 1.0)),
                (Pos2::new(c.x, c.y + half), vec2(0.0, -1.0)),
                (Pos2::new(c.x - half, c.y), vec2(1.0, 0.0)),
                (Pos2::new(c.x + half, c.y), vec2(-1.0, 0.0)),
            ];
            for (tip, inward) in tips {
                painter.line_segment([c, tip], stroke);
                let base = tip + inward * 4.0;
                let normal = vec2(-inward.y, inward.x) * 3.0;
                painter.add(Shape::convex_polygon(
                    vec![tip, base + normal, base - normal],
                    color,
                    Stroke::NONE,
                ));
            }
        }
        ToolMode::Draw => {
            let tip = Pos2::new(icon_rect.left() + 1.0, icon_rect.bottom() - 1.0);
            let end = Pos2::new(icon_rect.right() - 1.0, icon_rect.top() + 1.0);
            painter.line_segment([tip, end], Stroke::new(3.0, color));
            painter.circle_filled(tip, 1.6, color);
        }
        ToolMode::PlaceNote => {
            let note = icon_rect.shrink(1.0);
            painter.rect_stroke(note, 2.0, stroke);
            for row in 1..=2 {
                let y = note.top() + note.height() * row as f32 / 3.0;
                painter.line_segment(
                    [
                        Pos2::new(note.left() + 3.0, y),
                        Pos2::new(note.right() - 3.0, y),
                    ],
                    Stroke::new(1.0, Color32::from_gray(170)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{plan_toolbar_items, NOTE_PALETTE, PENCIL_PALETTE};
    use crate::theme::WidthClass;
    use blackboard::{BoardState, ToolMode};

    #[test]
    fn wide_toolbar_shows_every_color_inline() {
        let state = BoardState::default();
        let plan = plan_toolbar_items(WidthClass::Wide, &state);

        assert_eq!(plan.visible_pencil_count, PENCIL_PALETTE.len());
        assert_eq!(plan.visible_note_count, NOTE_PALETTE.len());
        assert!(!plan.show_overflow);
    }

    #[test]
    fn compact_toolbar_favours_palette_of_active_mode() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::PlaceNote);
        let plan = plan_toolbar_items(WidthClass::Compact, &state);

        assert!(plan.visible_note_count > plan.visible_pencil_count);
        assert!(plan.show_overflow);
        assert!(!plan.show_title);
    }
}
