use crate::annotation::Point;

/// Point buffer of the stroke currently being drawn.
#[derive(Clone, Debug, Default)]
pub struct StrokeCapture {
    points: Vec<Point>,
    active: bool,
}

impl StrokeCapture {
    pub fn begin(&mut self, at: Point) {
        self.points.clear();
        self.points.push(at);
        self.active = true;
    }

    /// Appends `at` unless it repeats the last captured point.
    pub fn extend(&mut self, at: Point) -> bool {
        if !self.active {
            return false;
        }
        if self.points.last() == Some(&at) {
            return false;
        }
        self.points.push(at);
        true
    }

    /// Ends the capture and hands back the collected points, leaving the buffer empty.
    pub fn finish(&mut self) -> Option<Vec<Point>> {
        if !self.active {
            return None;
        }
        self.active = false;
        let points = std::mem::take(&mut self.points);
        if points.is_empty() {
            None
        } else {
            Some(points)
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
