//! Annotation core of the Blackboard screen: pan/zoom, free-hand strokes,
//! sticky notes and a single creation-order undo stack.
//!
//! [`state::BoardState`] is the entry point a host UI drives.

pub mod annotation;
pub mod capture;
pub mod document;
pub mod history;
pub mod settings;
pub mod state;
pub mod viewport;

pub use annotation::{AnnotationId, Point, StickyNote, Stroke, ToolMode};
pub use history::HistoryEntry;
pub use settings::UserSettings;
pub use state::BoardState;
pub use viewport::ViewportTransform;
