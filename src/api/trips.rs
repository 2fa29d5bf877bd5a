//! Trip API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, respond, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateTripRequest, Trip, UpdateTripRequest};
use crate::AppState;

/// GET /api/trips - List all trips.
pub async fn list_trips(State(state): State<AppState>) -> ApiResult<Vec<Trip>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_trips().await {
        Ok(trips) => success(trips, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/trips/:id - Get a single trip.
pub async fn get_trip(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Trip> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_trip(&id).await {
        Ok(Some(trip)) => success(trip, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Trip {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/trips - Create a new trip.
pub async fn create_trip(
    State(state): State<AppState>,
    Json(request): Json<CreateTripRequest>,
) -> ApiResult<Trip> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let name = request.name.trim();
    if name.is_empty() {
        return error(
            AppError::Validation("Trip name is required".to_string()),
            revision_id,
        );
    }

    let result = state.repo.create_trip(name).await;
    respond(&state, revision_id, result).await
}

/// PUT /api/trips/:id - Update a trip. Unknown ids yield `data: null`.
pub async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTripRequest>,
) -> ApiResult<Option<Trip>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if matches!(&request.name, Some(name) if name.trim().is_empty()) {
        return error(
            AppError::Validation("Trip name cannot be empty".to_string()),
            revision_id,
        );
    }

    let result = state.repo.update_trip(&id, &request).await;
    respond(&state, revision_id, result).await
}

/// DELETE /api/trips/:id - Delete a trip with everything in it.
pub async fn delete_trip(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<bool> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let result = state.repo.delete_trip(&id).await;
    respond(&state, revision_id, result).await
}
