use egui::{
    Area, Color32, Context, CursorIcon, FontId, Frame, Id, Margin, Order, Painter, Pos2, Rect,
    Response, Rounding, Sense, Shape, Stroke, TextEdit, Ui, Vec2,
};

use blackboard::{BoardState, Point, ToolMode, ViewportTransform};

use crate::theme::{self, AppTheme};
use crate::ui_controls::rgba_to_color32;

/// Smallest on-screen distance between grid dots before the grid thins out.
const MIN_DOT_PITCH: f32 = 8.0;

/// Host-side view state of the board canvas: grid visibility, the pinch in
/// progress and the last laid-out size. Board content lives in [`BoardState`].
pub struct CanvasView {
    pinch_scale: Option<f32>,
    size: Vec2,
    pub show_dot_grid: bool,
}

impl CanvasView {
    pub fn new(show_dot_grid: bool) -> Self {
        Self {
            pinch_scale: None,
            size: Vec2::ZERO,
            show_dot_grid,
        }
    }

    /// Centre of the canvas in canvas-widget coordinates, the anchor for
    /// button and keyboard zoom.
    pub fn center(&self) -> Pos2 {
        (self.size * 0.5).to_pos2()
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut BoardState) {
        let theme = theme::chalk_theme();
        let (canvas_rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.size = canvas_rect.size();
        let cursor = cursor_for(state.mode(), response.dragged());
        let response = response.on_hover_cursor(cursor);

        self.handle_pinch(ui.ctx(), state, &response);
        if self.pinch_scale.is_none() {
            handle_wheel(ui.ctx(), state, &response, canvas_rect);
            handle_drag(ui.ctx(), state, &response, canvas_rect);
        }

        let transform = state.viewport();
        let painter = ui.painter_at(canvas_rect);
        painter.rect_filled(canvas_rect, 0.0, theme.surfaces.canvas_bg);
        if self.show_dot_grid {
            draw_dot_grid(&painter, canvas_rect, transform, &theme);
        }
        draw_strokes(&painter, state, canvas_rect, transform, &theme);
        draw_notes(ui, state, canvas_rect, transform, &theme);
    }

    fn handle_pinch(&mut self, ctx: &Context, state: &mut BoardState, response: &Response) {
        let touch = ctx.input(|input| input.multi_touch());
        match (touch, self.pinch_scale) {
            (Some(touch), current) => {
                if current.is_none() {
                    if !response.hovered() && !response.dragged() {
                        return;
                    }
                    // A second finger ends whatever single-finger gesture was running.
                    state.cancel_gesture();
                }
                let cumulative = current.unwrap_or(1.0) * touch.zoom_delta;
                self.pinch_scale = Some(cumulative);
                state.on_magnify(cumulative);
            }
            (None, Some(_)) => {
                self.pinch_scale = None;
                state.on_magnify_end();
            }
            (None, None) => {}
        }
    }
}

fn cursor_for(mode: ToolMode, dragging: bool) -> CursorIcon {
    match mode {
        ToolMode::Move if dragging => CursorIcon::Grabbing,
        ToolMode::Move => CursorIcon::Grab,
        ToolMode::Draw => CursorIcon::Crosshair,
        ToolMode::PlaceNote => CursorIcon::Cell,
    }
}

/// Converts an absolute pointer position into canvas-widget coordinates.
fn to_local(pos: Pos2, canvas_rect: Rect) -> Pos2 {
    pos - canvas_rect.min.to_vec2()
}

fn to_absolute(pos: Pos2, canvas_rect: Rect) -> Pos2 {
    pos + canvas_rect.min.to_vec2()
}

fn handle_wheel(ctx: &Context, state: &mut BoardState, response: &Response, canvas_rect: Rect) {
    if !response.hovered() || state.mode() != ToolMode::Move {
        return;
    }
    let (zoom_delta, scroll_delta, hover) = ctx.input(|input| {
        (
            input.zoom_delta(),
            input.smooth_scroll_delta,
            input.pointer.hover_pos(),
        )
    });

    if (zoom_delta - 1.0).abs() > f32::EPSILON {
        let anchor = hover
            .map(|pos| to_local(pos, canvas_rect))
            .unwrap_or_else(|| to_local(canvas_rect.center(), canvas_rect));
        state.zoom_at(zoom_delta, anchor);
    } else if scroll_delta != Vec2::ZERO {
        state.pan(scroll_delta);
    }
}

fn handle_drag(ctx: &Context, state: &mut BoardState, response: &Response, canvas_rect: Rect) {
    let pointer = ctx.input(|input| input.pointer.clone());
    let current = pointer
        .interact_pos()
        .or_else(|| pointer.latest_pos())
        .map(|pos| to_local(pos, canvas_rect));

    if response.clicked() {
        if let Some(pos) = current {
            state.on_drag_start(pos);
            state.on_drag_end(pos);
        }
        return;
    }

    if response.drag_started() {
        // The drag is only recognised after some movement; start where the press began.
        let start = pointer
            .press_origin()
            .map(|pos| to_local(pos, canvas_rect))
            .or(current);
        if let Some(start) = start {
            state.on_drag_start(start);
        }
    }

    if response.dragged() {
        if let Some(pos) = current {
            state.on_drag_move(pos);
        }
    }

    if response.drag_stopped() {
        match current {
            Some(pos) => {
                state.on_drag_end(pos);
            }
            None => {
                state.cancel_gesture();
            }
        }
    }
}

fn draw_dot_grid(painter: &Painter, canvas_rect: Rect, transform: ViewportTransform, theme: &AppTheme) {
    let board = &theme.board;
    let mut step = board.dot_spacing;
    while transform.length_to_screen(step) < MIN_DOT_PITCH {
        step *= 2.0;
    }

    let top_left = transform.to_canvas(Pos2::ZERO);
    let bottom_right = transform.to_canvas(Pos2::ZERO + canvas_rect.size());
    let radius = transform.length_to_screen(board.dot_radius).max(0.5);

    let mut x = (top_left.x / step).floor() * step;
    while x <= bottom_right.x {
        let mut y = (top_left.y / step).floor() * step;
        while y <= bottom_right.y {
            let screen = to_absolute(transform.to_screen(Point::new(x, y)), canvas_rect);
            painter.circle_filled(screen, radius, board.dot_color);
            y += step;
        }
        x += step;
    }
}

fn draw_strokes(
    painter: &Painter,
    state: &BoardState,
    canvas_rect: Rect,
    transform: ViewportTransform,
    theme: &AppTheme,
) {
    let width = transform.length_to_screen(theme.board.stroke_width).max(1.0);
    let visible = Rect::from_two_pos(
        transform.to_canvas(Pos2::ZERO).to_pos2(),
        transform.to_canvas(Pos2::ZERO + canvas_rect.size()).to_pos2(),
    )
    .expand(theme.board.stroke_width);
    for stroke in state.strokes() {
        if !visible.intersects(stroke.bounds()) {
            continue;
        }
        draw_polyline(
            painter,
            stroke.points(),
            rgba_to_color32(stroke.color),
            width,
            canvas_rect,
            transform,
        );
    }
    draw_polyline(
        painter,
        state.in_progress_stroke(),
        rgba_to_color32(state.draw_color()),
        width,
        canvas_rect,
        transform,
    );
}

fn draw_polyline(
    painter: &Painter,
    points: &[Point],
    color: Color32,
    width: f32,
    canvas_rect: Rect,
    transform: ViewportTransform,
) {
    let screen: Vec<Pos2> = points
        .iter()
        .map(|point| to_absolute(transform.to_screen(*point), canvas_rect))
        .collect();
    match screen.len() {
        0 => {}
        1 => {
            painter.circle_filled(screen[0], width * 0.5, color);
        }
        _ => {
            painter.add(Shape::line(screen, Stroke::new(width, color)));
        }
    }
}

fn draw_notes(
    ui: &Ui,
    state: &mut BoardState,
    canvas_rect: Rect,
    transform: ViewportTransform,
    theme: &AppTheme,
) {
    let board = &theme.board;
    let focus = state.take_focus_request();
    let scale = transform.scale;
    let width = board.note_width * scale;
    let padding = board.note_padding * scale;
    let notes = state.notes().to_vec();

    for note in notes {
        let center = to_absolute(transform.to_screen(note.anchor), canvas_rect);
        let min_height = board.note_min_height * scale;
        let top_left = center - Vec2::new(width, min_height) * 0.5;
        let mut buffer = note.text.clone();

        Area::new(Id::new(("board_note", note.id)))
            .order(Order::Middle)
            .fixed_pos(top_left)
            .constrain(false)
            .show(ui.ctx(), |ui| {
                ui.set_clip_rect(canvas_rect);
                Frame::none()
                    .fill(rgba_to_color32(note.color))
                    .rounding(Rounding::same(board.note_rounding * scale))
                    .inner_margin(Margin::same(padding))
                    .show(ui, |ui| {
                        ui.set_width(width - padding * 2.0);
                        let response = ui.add(
                            TextEdit::multiline(&mut buffer)
                                .font(FontId::proportional(board.note_font_size * scale))
                                .text_color(board.note_text)
                                .hint_text("Note")
                                .desired_rows(2)
                                .desired_width(f32::INFINITY)
                                .frame(false),
                        );
                        if focus == Some(note.id) {
                            response.request_focus();
                        }
                    });
            });

        if buffer != note.text {
            state.update_note_text(note.id, &buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use egui::{pos2, Rect};

    use super::{to_absolute, to_local, CanvasView};

    #[test]
    fn local_and_absolute_positions_are_inverse() {
        let canvas_rect = Rect::from_min_size(pos2(12.0, 56.0), egui::vec2(800.0, 600.0));
        let pointer = pos2(300.0, 200.0);

        let local = to_local(pointer, canvas_rect);
        assert_eq!(local, pos2(288.0, 144.0));
        assert_eq!(to_absolute(local, canvas_rect), pointer);
    }

    #[test]
    fn center_before_first_layout_is_the_origin() {
        assert_eq!(CanvasView::new(true).center(), pos2(0.0, 0.0));
    }
}
