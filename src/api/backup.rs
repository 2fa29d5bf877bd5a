//! Backup export and import endpoints.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use super::{error, respond, ApiResult};
use crate::errors::{AppError, AppErrorWithRevision};
use crate::planner::{backup, ImportMode, ImportSummary};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub mode: Option<String>,
}

/// GET /api/export - Download every trip as a JSON backup file.
///
/// The file name carries the current UTC date.
pub async fn export_backup(State(state): State<AppState>) -> Result<Response, AppErrorWithRevision> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    let with_revision = |error| AppErrorWithRevision { error, revision_id };

    let trips = state.repo.list_trips().await.map_err(with_revision)?;
    let file = backup::export(&trips, Utc::now().date_naive()).map_err(with_revision)?;

    tracing::info!("Exported {} trips as {}", trips.len(), file.filename);

    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.contents,
    )
        .into_response())
}

/// POST /api/import?mode=merge|replace - Import a backup file.
///
/// The body is the raw file contents. The mode has no default: the caller
/// must choose between merging and replacing.
pub async fn import_backup(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    body: String,
) -> ApiResult<ImportSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let mode = match query.mode.as_deref() {
        Some("merge") => ImportMode::Merge,
        Some("replace") => ImportMode::Replace,
        _ => {
            return error(
                AppError::Validation("Import mode must be 'merge' or 'replace'".to_string()),
                revision_id,
            )
        }
    };

    if body.trim().is_empty() {
        return error(
            AppError::BadRequest("Import file is empty".to_string()),
            revision_id,
        );
    }

    let result = backup::import(&state.repo, &body, mode).await;
    respond(&state, revision_id, result).await
}
