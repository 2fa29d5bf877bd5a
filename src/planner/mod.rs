//! Planner interactions layered over the repository: drag resolution, batch
//! moves, backups and map markers.

pub mod backup;
pub mod drag;
pub mod markers;
pub mod selection;

pub use backup::{ImportMode, ImportSummary};
pub use drag::{DragEndEvent, DragOutcome};
pub use markers::Marker;
pub use selection::{MultiMoveReport, Selection};
