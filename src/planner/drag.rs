//! Drag-and-drop intent resolution.
//!
//! A drag gesture starts on a place or a day block and ends over a drop
//! target (or nothing). The session turns that gesture into one repository
//! call, or into nothing at all. It never touches trip state itself.

use serde::{Deserialize, Serialize};

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::ContainerRef;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    /// A place item, with the container it was picked up from.
    Place {
        place_id: String,
        container: ContainerRef,
    },
    /// A whole day block.
    DayBlock { container: ContainerRef },
}

/// What the pointer was released over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// The place list of a day or of the unassigned bucket.
    Container(ContainerRef),
    /// Another place item; places dropped here go to that item's container.
    Place(ContainerRef),
    /// The header of a day block.
    DayBlock(ContainerRef),
}

/// The repository call a finished drag asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DragIntent {
    MovePlace {
        place_id: String,
        source: ContainerRef,
        target: ContainerRef,
    },
    ReorderDays {
        source_day_id: String,
        target_day_id: String,
    },
    NoOp,
}

/// How a drag gesture ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DragOutcome {
    Dropped { intent: DragIntent },
    NoTarget,
    Cancelled,
}

impl DragOutcome {
    pub fn intent(&self) -> Option<&DragIntent> {
        match self {
            DragOutcome::Dropped { intent } => Some(intent),
            DragOutcome::NoTarget | DragOutcome::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragPayload),
}

/// One pointer interaction at a time: idle, dragging, then back to idle.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the dragged entity. A drag already in progress is replaced.
    pub fn start(&mut self, payload: DragPayload) {
        self.state = DragState::Dragging(payload);
    }

    /// Release the pointer over `over` and return to idle.
    pub fn end(&mut self, over: Option<DropTarget>) -> DragOutcome {
        let DragState::Dragging(payload) = std::mem::take(&mut self.state) else {
            return DragOutcome::Cancelled;
        };
        match over {
            Some(target) => DragOutcome::Dropped {
                intent: resolve(&payload, &target),
            },
            None => DragOutcome::NoTarget,
        }
    }

    /// Abort the gesture without any repository call.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Turn a dragged entity and its drop target into an intent.
///
/// Places only move between containers; dropping inside the source container
/// does not reorder. Day blocks reorder among themselves and the unassigned
/// bucket never takes part.
pub fn resolve(payload: &DragPayload, target: &DropTarget) -> DragIntent {
    match (payload, target) {
        (
            DragPayload::Place {
                place_id,
                container,
            },
            DropTarget::Container(over) | DropTarget::Place(over),
        ) if container != over => DragIntent::MovePlace {
            place_id: place_id.clone(),
            source: container.clone(),
            target: over.clone(),
        },
        (
            DragPayload::DayBlock {
                container: ContainerRef::Day(source),
            },
            DropTarget::DayBlock(ContainerRef::Day(target)),
        ) if source != target => DragIntent::ReorderDays {
            source_day_id: source.clone(),
            target_day_id: target.clone(),
        },
        _ => DragIntent::NoOp,
    }
}

/// Perform the repository call for an intent.
///
/// Returns whether the repository changed anything.
pub async fn dispatch(
    repo: &Repository,
    trip_id: &str,
    intent: &DragIntent,
) -> Result<bool, AppError> {
    match intent {
        DragIntent::MovePlace {
            place_id,
            source,
            target,
        } => Ok(repo
            .move_place(trip_id, place_id, source, target)
            .await?
            .is_some()),
        DragIntent::ReorderDays {
            source_day_id,
            target_day_id,
        } => Ok(repo
            .reorder_days(trip_id, source_day_id, target_day_id)
            .await?
            .is_some()),
        DragIntent::NoOp => Ok(false),
    }
}

/// Data attached to a draggable or droppable element by the frontend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragData {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub day_id: Option<String>,
    /// The place object itself, as attached to draggable place items.
    #[serde(default)]
    pub place: Option<DraggedPlace>,
}

/// The part of an attached place object needed to identify it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraggedPlace {
    #[serde(default)]
    pub id: Option<String>,
}

impl DragData {
    fn place_id(&self) -> Option<String> {
        self.id
            .clone()
            .or_else(|| self.place.as_ref()?.id.clone())
            .filter(|id| !id.is_empty())
    }

    /// Interpret as the dragged entity. Incomplete data yields `None`.
    pub fn payload(&self) -> Option<DragPayload> {
        let container = ContainerRef::from(self.day_id.clone()?);
        match self.kind.as_deref()? {
            "place" => Some(DragPayload::Place {
                place_id: self.place_id()?,
                container,
            }),
            "day-block" => Some(DragPayload::DayBlock { container }),
            _ => None,
        }
    }

    /// Interpret as a drop target. Incomplete data yields `None`.
    pub fn target(&self) -> Option<DropTarget> {
        let container = ContainerRef::from(self.day_id.clone()?);
        match self.kind.as_deref()? {
            "day" => Some(DropTarget::Container(container)),
            "place" => Some(DropTarget::Place(container)),
            "day-block" => Some(DropTarget::DayBlock(container)),
            _ => None,
        }
    }
}

/// A drag-end event as reported by the frontend.
#[derive(Debug, Clone, Deserialize)]
pub struct DragEndEvent {
    #[serde(default)]
    pub active: Option<DragData>,
    #[serde(default)]
    pub over: Option<DragData>,
}

impl DragEndEvent {
    /// Replay the event through a fresh session.
    ///
    /// An unreadable active element cancels the gesture. An unreadable drop
    /// target counts as no target.
    pub fn resolve(&self) -> DragOutcome {
        let mut session = DragSession::new();
        let Some(payload) = self.active.as_ref().and_then(DragData::payload) else {
            session.cancel();
            return DragOutcome::Cancelled;
        };
        session.start(payload);
        session.end(self.over.as_ref().and_then(DragData::target))
    }
}
