use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

pub type AnnotationId = u64;

pub const WHITE: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
pub const YELLOW: [u8; 4] = [0xFF, 0xD6, 0x0A, 0xFF];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ToolMode {
    #[default]
    Move,
    Draw,
    PlaceNote,
}

/// A position in canvas space, independent of the current zoom and pan.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }
}

/// A committed free-hand polyline. Never mutated after capture ends.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub id: AnnotationId,
    points: Vec<Point>,
    pub color: [u8; 4],
}

impl Stroke {
    /// Returns `None` for an empty point list; a stroke always has at least one point.
    pub fn new(id: AnnotationId, points: Vec<Point>, color: [u8; 4]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self { id, points, color })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_single_point(&self) -> bool {
        self.points.len() == 1
    }

    pub fn bounds(&self) -> Rect {
        let mut rect = Rect::NOTHING;
        for point in &self.points {
            rect.extend_with(point.to_pos2());
        }
        rect
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StickyNote {
    pub id: AnnotationId,
    pub anchor: Point,
    pub color: [u8; 4],
    pub text: String,
}

impl StickyNote {
    pub fn new(id: AnnotationId, anchor: Point, color: [u8; 4]) -> Self {
        Self {
            id,
            anchor,
            color,
            text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, StickyNote, Stroke, ToolMode, WHITE, YELLOW};

    #[test]
    fn stroke_requires_at_least_one_point() {
        assert!(Stroke::new(1, Vec::new(), WHITE).is_none());

        let tap = Stroke::new(2, vec![Point::new(3.0, 4.0)], WHITE).expect("single point stroke");
        assert!(tap.is_single_point());
        assert_eq!(tap.points(), &[Point::new(3.0, 4.0)]);
    }

    #[test]
    fn stroke_bounds_cover_every_point() {
        let stroke = Stroke::new(
            1,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(20.0, 5.0),
            ],
            WHITE,
        )
        .expect("stroke");

        let bounds = stroke.bounds();
        assert_eq!(bounds.min, egui::pos2(0.0, 0.0));
        assert_eq!(bounds.max, egui::pos2(20.0, 10.0));
    }

    #[test]
    fn new_note_starts_empty() {
        let note = StickyNote::new(7, Point::new(50.0, 50.0), YELLOW);
        assert!(note.text.is_empty());
        assert_eq!(note.color, YELLOW);
    }

    #[test]
    fn default_mode_is_move() {
        assert_eq!(ToolMode::default(), ToolMode::Move);
    }
}
