//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod backup;
mod datastore;
mod days;
mod places;
mod planner;
mod trips;

pub use backup::*;
pub use datastore::*;
pub use days::*;
pub use places::*;
pub use planner::*;
pub use trips::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: crate::errors::AppError, revision_id: i64) -> ApiResult<T> {
    Err(crate::errors::AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// Current revision for the envelope, falling back when storage cannot say.
async fn revision_or(state: &AppState, fallback: i64) -> i64 {
    state.repo.get_revision_id().await.unwrap_or(fallback)
}

/// Finish a mutation: report the post-write revision on success.
async fn respond<T: Serialize>(
    state: &AppState,
    revision_id: i64,
    result: Result<T, crate::errors::AppError>,
) -> ApiResult<T> {
    match result {
        Ok(data) => success(data, revision_or(state, revision_id).await),
        Err(e) => error(e, revision_id),
    }
}
