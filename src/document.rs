use log::debug;

use crate::annotation::{AnnotationId, Point, StickyNote, Stroke};
use crate::history::{HistoryEntry, UndoHistory};

/// Everything drawn on the board: strokes and notes in creation order, plus
/// the creation history that undo walks back.
#[derive(Clone, Debug)]
pub struct CanvasDocument {
    strokes: Vec<Stroke>,
    notes: Vec<StickyNote>,
    history: UndoHistory,
    next_id: AnnotationId,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self {
            strokes: Vec::new(),
            notes: Vec::new(),
            history: UndoHistory::default(),
            next_id: 1,
        }
    }
}

impl CanvasDocument {
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn notes(&self) -> &[StickyNote] {
        &self.notes
    }

    pub fn note(&self, id: AnnotationId) -> Option<&StickyNote> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.notes.is_empty()
    }

    fn next_annotation_id(&mut self) -> AnnotationId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub fn commit_stroke(&mut self, points: Vec<Point>, color: [u8; 4]) -> Option<AnnotationId> {
        if points.is_empty() {
            return None;
        }
        let id = self.next_annotation_id();
        let stroke = Stroke::new(id, points, color)?;
        debug!("committed stroke {id} with {} points", stroke.points().len());
        self.strokes.push(stroke);
        self.history.push(HistoryEntry::Stroke(id));
        Some(id)
    }

    pub fn place_note(&mut self, anchor: Point, color: [u8; 4]) -> AnnotationId {
        let id = self.next_annotation_id();
        self.notes.push(StickyNote::new(id, anchor, color));
        self.history.push(HistoryEntry::Note(id));
        debug!("placed note {id} at ({:.1}, {:.1})", anchor.x, anchor.y);
        id
    }

    /// Edits are not recorded in the history. Unknown ids are ignored, since
    /// an edit can arrive for a note that was just undone.
    pub fn update_note_text(&mut self, id: AnnotationId, text: &str) -> bool {
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            debug!("text edit for missing note {id} dropped");
            return false;
        };
        if note.text != text {
            note.text.clear();
            note.text.push_str(text);
        }
        true
    }

    pub fn undo_last(&mut self) -> Option<HistoryEntry> {
        let entry = self.history.pop()?;
        match entry {
            HistoryEntry::Stroke(id) => self.strokes.retain(|stroke| stroke.id != id),
            HistoryEntry::Note(id) => self.notes.retain(|note| note.id != id),
        }
        debug!("undid {entry:?}");
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.notes.clear();
        self.history.clear();
    }
}
