//! Place API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{error, respond, ApiResult};
use crate::errors::AppError;
use crate::models::{ContainerRef, CreatePlaceRequest, MovePlaceRequest, Place};
use crate::AppState;

/// Query parameters naming the container a place lives in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceContainerQuery {
    #[serde(default)]
    pub day_id: Option<ContainerRef>,
}

/// POST /api/trips/:id/places - Add a place to a day or the unassigned list.
pub async fn add_place(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(request): Json<CreatePlaceRequest>,
) -> ApiResult<Option<Place>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.place.name.trim().is_empty() {
        return error(
            AppError::Validation("Place name is required".to_string()),
            revision_id,
        );
    }
    if !request.place.lat.is_finite() || !request.place.lng.is_finite() {
        return error(
            AppError::Validation("Place coordinates must be finite numbers".to_string()),
            revision_id,
        );
    }

    let container = request.container();
    let result = state
        .repo
        .add_place(&trip_id, request.place, &container)
        .await;
    respond(&state, revision_id, result).await
}

/// DELETE /api/trips/:id/places/:place_id?dayId= - Remove a place from its container.
///
/// Without `dayId` the place is looked up in the unassigned list.
pub async fn delete_place(
    State(state): State<AppState>,
    Path((trip_id, place_id)): Path<(String, String)>,
    Query(query): Query<PlaceContainerQuery>,
) -> ApiResult<bool> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let container = query.day_id.unwrap_or_default();
    let result = state
        .repo
        .delete_place(&trip_id, &place_id, &container)
        .await;
    respond(&state, revision_id, result).await
}

/// POST /api/trips/:id/places/:place_id/move - Move a place between containers.
pub async fn move_place(
    State(state): State<AppState>,
    Path((trip_id, place_id)): Path<(String, String)>,
    Json(request): Json<MovePlaceRequest>,
) -> ApiResult<Option<Place>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = state
        .repo
        .move_place(
            &trip_id,
            &place_id,
            &request.source_day_id,
            &request.target_day_id,
        )
        .await;
    respond(&state, revision_id, result).await
}
