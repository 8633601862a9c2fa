use crate::annotation::AnnotationId;

/// Which object a creation step produced. Refers to the object by id only;
/// the document owns the object itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryEntry {
    Stroke(AnnotationId),
    Note(AnnotationId),
}

impl HistoryEntry {
    pub fn id(self) -> AnnotationId {
        match self {
            Self::Stroke(id) | Self::Note(id) => id,
        }
    }
}

/// Append-only creation log, unwound from the end. No redo, no capacity limit.
#[derive(Clone, Debug, Default)]
pub struct UndoHistory {
    entries: Vec<HistoryEntry>,
}

impl UndoHistory {
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
