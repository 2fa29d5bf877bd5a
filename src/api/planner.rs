//! Planner interaction endpoints: drag-and-drop, batch moves and markers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error, respond, success, ApiResult};
use crate::errors::AppError;
use crate::models::{ContainerRef, MoveBatchRequest, Trip};
use crate::planner::{drag, markers, DragEndEvent, DragOutcome, Marker, MultiMoveReport, Selection};
use crate::AppState;

/// Result of a drag-end event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResult {
    pub outcome: DragOutcome,
    /// Whether the resolved intent changed the trip.
    pub changed: bool,
    pub trip: Option<Trip>,
}

#[derive(Debug, Deserialize)]
pub struct MarkersQuery {
    #[serde(default)]
    pub container: Option<String>,
}

/// POST /api/trips/:id/drag - Resolve a drag-end event and apply it.
pub async fn drag_end(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(event): Json<DragEndEvent>,
) -> ApiResult<DragResult> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let outcome = event.resolve();
    let changed = match outcome.intent() {
        Some(intent) => match drag::dispatch(&state.repo, &trip_id, intent).await {
            Ok(changed) => changed,
            Err(e) => return error(e, revision_id),
        },
        None => false,
    };

    let result = state.repo.get_trip(&trip_id).await.map(|trip| DragResult {
        outcome,
        changed,
        trip,
    });
    respond(&state, revision_id, result).await
}

/// POST /api/trips/:id/places/move-batch - Move the selected places into one container.
pub async fn move_batch(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(request): Json<MoveBatchRequest>,
) -> ApiResult<MultiMoveReport> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let mut selection = Selection::with_places(request.place_ids, request.target_day_id);
    if selection.is_empty() {
        return error(
            AppError::Validation("At least one place must be selected".to_string()),
            revision_id,
        );
    }

    let result = selection.confirm(&state.repo, &trip_id).await;
    respond(&state, revision_id, result).await
}

/// GET /api/trips/:id/markers?container= - Map markers, optionally for one container.
pub async fn get_markers(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Query(query): Query<MarkersQuery>,
) -> ApiResult<Vec<Marker>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let filter = query
        .container
        .filter(|c| !c.is_empty())
        .map(ContainerRef::from);

    match state.repo.get_trip(&trip_id).await {
        Ok(Some(trip)) => success(markers::markers(&trip, filter.as_ref()), revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Trip {} not found", trip_id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}
