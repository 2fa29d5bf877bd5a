//! Day API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{respond, ApiResult};
use crate::models::{CreateDayRequest, Day, ReorderDaysRequest, Trip, UpdateDayRequest};
use crate::AppState;

/// POST /api/trips/:id/days - Append a day.
pub async fn add_day(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(request): Json<CreateDayRequest>,
) -> ApiResult<Option<Day>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = state.repo.add_day(&trip_id, &request).await;
    respond(&state, revision_id, result).await
}

/// PUT /api/trips/:id/days/:day_id - Update a day's title, date or color.
pub async fn update_day(
    State(state): State<AppState>,
    Path((trip_id, day_id)): Path<(String, String)>,
    Json(request): Json<UpdateDayRequest>,
) -> ApiResult<Option<Day>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = state.repo.update_day(&trip_id, &day_id, &request).await;
    respond(&state, revision_id, result).await
}

/// DELETE /api/trips/:id/days/:day_id - Delete a day, keeping its places as unassigned.
pub async fn delete_day(
    State(state): State<AppState>,
    Path((trip_id, day_id)): Path<(String, String)>,
) -> ApiResult<bool> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = state.repo.delete_day(&trip_id, &day_id).await;
    respond(&state, revision_id, result).await
}

/// POST /api/trips/:id/days/reorder - Move a day block onto another day's slot.
pub async fn reorder_days(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(request): Json<ReorderDaysRequest>,
) -> ApiResult<Option<Trip>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = state
        .repo
        .reorder_days(&trip_id, &request.source_day_id, &request.target_day_id)
        .await;
    respond(&state, revision_id, result).await
}
