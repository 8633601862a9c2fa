use egui::{Pos2, Vec2};
use log::debug;

use crate::annotation::{AnnotationId, Point, StickyNote, Stroke, ToolMode};
use crate::capture::StrokeCapture;
use crate::document::CanvasDocument;
use crate::history::HistoryEntry;
use crate::settings::UserSettings;
use crate::viewport::{ViewportController, ViewportTransform};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gesture {
    Pan,
    Stroke,
    Note,
}

/// State holder of one Blackboard screen.
///
/// The host forwards toolbar actions and single-pointer drag callbacks in
/// canvas-widget screen coordinates. Each drag is routed by the mode active
/// when it started: Move pans, Draw captures a stroke, PlaceNote drops a note
/// on release. Magnification is only live in Move mode.
#[derive(Clone, Debug)]
pub struct BoardState {
    mode: ToolMode,
    pencil_color: [u8; 4],
    draw_color: [u8; 4],
    note_color: [u8; 4],
    viewport: ViewportController,
    capture: StrokeCapture,
    document: CanvasDocument,
    gesture: Option<Gesture>,
    focus_request: Option<AnnotationId>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(&UserSettings::default())
    }
}

impl BoardState {
    pub fn new(settings: &UserSettings) -> Self {
        Self {
            mode: ToolMode::Move,
            pencil_color: settings.pencil_color,
            draw_color: settings.pencil_color,
            note_color: settings.note_color,
            viewport: ViewportController::default(),
            capture: StrokeCapture::default(),
            document: CanvasDocument::default(),
            gesture: None,
            focus_request: None,
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Color used for the stroke being drawn and the next committed one.
    pub fn draw_color(&self) -> [u8; 4] {
        self.draw_color
    }

    pub fn pencil_color(&self) -> [u8; 4] {
        self.pencil_color
    }

    pub fn note_color(&self) -> [u8; 4] {
        self.note_color
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        if self.gesture.is_some() || self.viewport.is_magnifying() {
            self.cancel_gesture();
        }
        if self.mode != mode {
            debug!("tool mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        if mode == ToolMode::Draw {
            self.draw_color = self.pencil_color;
        }
    }

    pub fn set_draw_color(&mut self, rgba: [u8; 4]) {
        self.pencil_color = rgba;
        if self.mode == ToolMode::Draw {
            self.draw_color = rgba;
        }
    }

    pub fn set_note_color(&mut self, rgba: [u8; 4]) {
        self.note_color = rgba;
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.document.strokes()
    }

    pub fn notes(&self) -> &[StickyNote] {
        self.document.notes()
    }

    pub fn note(&self, id: AnnotationId) -> Option<&StickyNote> {
        self.document.note(id)
    }

    pub fn in_progress_stroke(&self) -> &[Point] {
        self.capture.points()
    }

    pub fn history_len(&self) -> usize {
        self.document.history().len()
    }

    pub fn can_undo(&self) -> bool {
        self.document.history().can_undo()
    }

    /// Transform to render with, including any pan or pinch in flight.
    pub fn viewport(&self) -> ViewportTransform {
        self.viewport.transform()
    }

    /// Transform used to map pointer input to canvas points.
    pub fn persistent_viewport(&self) -> ViewportTransform {
        self.viewport.persistent()
    }

    pub fn on_drag_start(&mut self, screen: Pos2) {
        if self.gesture.is_some() {
            self.cancel_gesture();
        }
        self.gesture = Some(match self.mode {
            ToolMode::Move => {
                self.viewport.begin_pan(screen);
                Gesture::Pan
            }
            ToolMode::Draw => {
                self.capture.begin(self.viewport.to_canvas(screen));
                Gesture::Stroke
            }
            ToolMode::PlaceNote => Gesture::Note,
        });
    }

    pub fn on_drag_move(&mut self, screen: Pos2) {
        match self.gesture {
            Some(Gesture::Pan) => self.viewport.update_pan(screen),
            Some(Gesture::Stroke) => {
                self.capture.extend(self.viewport.to_canvas(screen));
            }
            Some(Gesture::Note) | None => {}
        }
    }

    /// Finishes the drag. A release with no gesture in flight, because it was
    /// never started or was already interrupted, does nothing.
    pub fn on_drag_end(&mut self, screen: Pos2) -> Option<HistoryEntry> {
        match self.gesture.take()? {
            Gesture::Pan => {
                self.viewport.end_pan(screen);
                None
            }
            Gesture::Stroke => {
                self.capture.extend(self.viewport.to_canvas(screen));
                self.commit_capture()
            }
            Gesture::Note => {
                let anchor = self.viewport.to_canvas(screen);
                let id = self.document.place_note(anchor, self.note_color);
                self.focus_request = Some(id);
                Some(HistoryEntry::Note(id))
            }
        }
    }

    /// `factor` is the cumulative pinch scale since the pinch began.
    pub fn on_magnify(&mut self, factor: f32) {
        if self.mode != ToolMode::Move {
            return;
        }
        self.viewport.magnify(factor);
    }

    pub fn on_magnify_end(&mut self) {
        self.viewport.end_magnify();
    }

    /// Ends an interrupted gesture the same way a release would, except that
    /// a note is only placed by a real release.
    pub fn cancel_gesture(&mut self) -> Option<HistoryEntry> {
        self.viewport.finish_gestures();
        match self.gesture.take()? {
            Gesture::Stroke => self.commit_capture(),
            Gesture::Pan | Gesture::Note => None,
        }
    }

    fn commit_capture(&mut self) -> Option<HistoryEntry> {
        let points = self.capture.finish()?;
        let id = self.document.commit_stroke(points, self.draw_color)?;
        Some(HistoryEntry::Stroke(id))
    }

    pub fn pan(&mut self, delta: Vec2) -> bool {
        if self.mode != ToolMode::Move {
            return false;
        }
        self.viewport.pan(delta);
        true
    }

    pub fn zoom(&mut self, factor: f32) -> bool {
        self.mode == ToolMode::Move && self.viewport.zoom(factor)
    }

    pub fn zoom_at(&mut self, factor: f32, anchor: Pos2) -> bool {
        self.mode == ToolMode::Move && self.viewport.zoom_at(factor, anchor)
    }

    pub fn zoom_in(&mut self, anchor: Pos2) -> bool {
        if self.mode != ToolMode::Move {
            return false;
        }
        self.viewport.zoom_in(anchor);
        true
    }

    pub fn zoom_out(&mut self, anchor: Pos2) -> bool {
        if self.mode != ToolMode::Move {
            return false;
        }
        self.viewport.zoom_out(anchor);
        true
    }

    pub fn reset_view(&mut self) -> bool {
        if self.mode != ToolMode::Move {
            return false;
        }
        self.viewport.reset();
        true
    }

    pub fn undo_last(&mut self) -> Option<HistoryEntry> {
        let entry = self.document.undo_last()?;
        if self.focus_request == Some(entry.id()) {
            self.focus_request = None;
        }
        Some(entry)
    }

    pub fn update_note_text(&mut self, id: AnnotationId, text: &str) -> bool {
        self.document.update_note_text(id, text)
    }

    /// Returns the note that should receive keyboard focus, once.
    pub fn take_focus_request(&mut self) -> Option<AnnotationId> {
        self.focus_request.take()
    }

    pub fn clear(&mut self) {
        self.gesture = None;
        self.capture.finish();
        self.viewport.finish_gestures();
        self.document.clear();
        self.focus_request = None;
    }
}

#[cfg(test)]
mod tests {
    use egui::{pos2, vec2};

    use super::BoardState;
    use crate::annotation::{Point, ToolMode, WHITE, YELLOW};
    use crate::history::HistoryEntry;

    const RED: [u8; 4] = [0xE5, 0x3E, 0x3E, 0xFF];
    const BLUE: [u8; 4] = [0x31, 0x82, 0xCE, 0xFF];

    #[test]
    fn selecting_draw_adopts_pencil_color() {
        let mut state = BoardState::default();
        state.set_draw_color(RED);
        assert_eq!(state.draw_color(), WHITE);

        state.set_mode(ToolMode::Draw);
        assert_eq!(state.draw_color(), RED);

        state.set_draw_color(BLUE);
        assert_eq!(state.draw_color(), BLUE);
    }

    #[test]
    fn drag_in_move_mode_pans_without_drawing() {
        let mut state = BoardState::default();
        state.on_drag_start(pos2(0.0, 0.0));
        state.on_drag_move(pos2(15.0, 5.0));
        assert_eq!(state.viewport().offset, vec2(15.0, 5.0));
        assert_eq!(state.persistent_viewport().offset, vec2(0.0, 0.0));

        assert_eq!(state.on_drag_end(pos2(20.0, 10.0)), None);
        assert_eq!(state.persistent_viewport().offset, vec2(20.0, 10.0));
        assert!(state.strokes().is_empty());
        assert_eq!(state.history_len(), 0);
    }

    #[test]
    fn draw_mode_ignores_pan_and_zoom() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::Draw);

        assert!(!state.pan(vec2(10.0, 10.0)));
        assert!(!state.zoom(2.0));
        state.on_magnify(3.0);
        state.on_magnify_end();

        assert_eq!(state.viewport().scale, 1.0);
        assert_eq!(state.viewport().offset, vec2(0.0, 0.0));
    }

    #[test]
    fn stroke_points_are_mapped_through_the_viewport() {
        let mut state = BoardState::default();
        state.zoom(2.0);
        state.pan(vec2(10.0, 0.0));
        state.set_mode(ToolMode::Draw);

        state.on_drag_start(pos2(10.0, 0.0));
        state.on_drag_move(pos2(30.0, 20.0));
        let entry = state.on_drag_end(pos2(30.0, 20.0));

        assert!(matches!(entry, Some(HistoryEntry::Stroke(_))));
        assert_eq!(
            state.strokes()[0].points(),
            &[Point::new(0.0, 0.0), Point::new(10.0, 10.0)]
        );
    }

    #[test]
    fn tap_in_draw_mode_records_single_point_stroke() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::Draw);
        state.on_drag_start(pos2(4.0, 4.0));
        state.on_drag_end(pos2(4.0, 4.0));

        assert_eq!(state.strokes().len(), 1);
        assert!(state.strokes()[0].is_single_point());
    }

    #[test]
    fn release_without_start_is_ignored() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::PlaceNote);
        assert_eq!(state.on_drag_end(pos2(8.0, 9.0)), None);

        state.set_mode(ToolMode::Draw);
        assert_eq!(state.on_drag_end(pos2(8.0, 9.0)), None);
        assert!(state.notes().is_empty());
        assert!(state.strokes().is_empty());
        assert!(!state.can_undo());
    }

    #[test]
    fn note_is_placed_on_release_with_focus_request() {
        let mut state = BoardState::default();
        state.set_note_color(BLUE);
        state.set_mode(ToolMode::PlaceNote);

        state.on_drag_start(pos2(1.0, 1.0));
        assert!(state.notes().is_empty());
        state.on_drag_move(pos2(5.0, 5.0));
        let entry = state.on_drag_end(pos2(40.0, 30.0));

        let note = &state.notes()[0];
        assert_eq!(entry, Some(HistoryEntry::Note(note.id)));
        assert_eq!(note.anchor, Point::new(40.0, 30.0));
        assert_eq!(note.color, BLUE);
        assert!(note.text.is_empty());

        let id = note.id;
        assert_eq!(state.take_focus_request(), Some(id));
        assert_eq!(state.take_focus_request(), None);
    }

    #[test]
    fn interrupted_stroke_commits_captured_points() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::Draw);
        state.on_drag_start(pos2(0.0, 0.0));
        state.on_drag_move(pos2(5.0, 0.0));

        let entry = state.cancel_gesture();
        assert!(matches!(entry, Some(HistoryEntry::Stroke(_))));
        assert_eq!(state.strokes()[0].points().len(), 2);
        assert!(state.in_progress_stroke().is_empty());

        // The release of the interrupted drag arrives late and creates nothing.
        assert_eq!(state.on_drag_end(pos2(9.0, 9.0)), None);
        assert_eq!(state.strokes().len(), 1);
        assert_eq!(state.history_len(), 1);
    }

    #[test]
    fn interrupted_note_gesture_places_nothing() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::PlaceNote);
        state.on_drag_start(pos2(3.0, 3.0));
        assert_eq!(state.cancel_gesture(), None);
        assert!(state.notes().is_empty());
    }

    #[test]
    fn second_drag_start_commits_the_first_stroke() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::Draw);
        state.on_drag_start(pos2(0.0, 0.0));
        state.on_drag_move(pos2(1.0, 1.0));
        state.on_drag_start(pos2(50.0, 50.0));
        state.on_drag_end(pos2(60.0, 50.0));

        assert_eq!(state.strokes().len(), 2);
        assert_eq!(state.history_len(), 2);
    }

    #[test]
    fn switching_mode_mid_stroke_commits_it() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::Draw);
        state.on_drag_start(pos2(0.0, 0.0));
        state.on_drag_move(pos2(3.0, 4.0));
        state.set_mode(ToolMode::Move);

        assert_eq!(state.strokes().len(), 1);
        state.on_drag_move(pos2(100.0, 100.0));
        assert_eq!(state.strokes()[0].points().len(), 2);
    }

    #[test]
    fn release_after_mode_switch_mid_drag_adds_nothing() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::Draw);
        state.on_drag_start(pos2(0.0, 0.0));
        state.on_drag_move(pos2(10.0, 10.0));
        state.set_mode(ToolMode::PlaceNote);

        assert_eq!(state.on_drag_end(pos2(30.0, 30.0)), None);
        assert_eq!(state.strokes().len(), 1);
        assert!(state.notes().is_empty());
        assert_eq!(state.history_len(), 1);
        assert_eq!(state.take_focus_request(), None);

        state.set_mode(ToolMode::Draw);
        state.on_drag_start(pos2(0.0, 0.0));
        state.set_mode(ToolMode::Move);
        assert_eq!(state.on_drag_end(pos2(40.0, 40.0)), None);
        assert_eq!(state.persistent_viewport().offset, vec2(0.0, 0.0));
        assert_eq!(state.history_len(), 2);
    }

    #[test]
    fn discrete_zoom_keeps_the_anchor_in_place() {
        let mut state = BoardState::default();
        let center = pos2(400.0, 300.0);
        assert!(state.zoom_in(center));
        assert_eq!(state.viewport().scale, 1.5);
        assert_eq!(state.viewport().to_canvas(center), Point::new(400.0, 300.0));

        state.set_mode(ToolMode::Draw);
        assert!(!state.zoom_out(center));
        assert_eq!(state.viewport().scale, 1.5);
    }

    #[test]
    fn pinch_is_composed_live_and_folded_on_end() {
        let mut state = BoardState::default();
        state.on_magnify(1.5);
        assert_eq!(state.viewport().scale, 1.5);
        assert_eq!(state.persistent_viewport().scale, 1.0);

        state.on_magnify_end();
        assert_eq!(state.persistent_viewport().scale, 1.5);
    }

    #[test]
    fn undoing_a_note_drops_its_pending_focus() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::PlaceNote);
        state.on_drag_start(pos2(0.0, 0.0));
        state.on_drag_end(pos2(0.0, 0.0));
        state.undo_last();

        assert_eq!(state.take_focus_request(), None);
        assert_eq!(state.undo_last(), None);
    }

    #[test]
    fn clear_discards_everything() {
        let mut state = BoardState::default();
        state.set_mode(ToolMode::Draw);
        state.on_drag_start(pos2(1.0, 1.0));
        state.on_drag_end(pos2(1.0, 1.0));
        state.set_mode(ToolMode::PlaceNote);
        state.on_drag_start(pos2(2.0, 2.0));
        state.on_drag_end(pos2(2.0, 2.0));
        assert_eq!(state.notes()[0].color, YELLOW);

        state.clear();
        assert!(state.strokes().is_empty());
        assert!(state.notes().is_empty());
        assert!(!state.can_undo());
    }
}
