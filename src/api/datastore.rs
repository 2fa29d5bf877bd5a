//! Datastore API endpoints.

use axum::extract::State;

use super::{error, success, ApiResult};
use crate::models::RevisionInfo;
use crate::AppState;

/// GET /api/datastore/revision - Current revision of the trip collection.
///
/// Clients poll this to notice writes made from another tab or device.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    match state.repo.get_revision_info().await {
        Ok(info) => {
            let revision_id = info.revision_id;
            success(info, revision_id)
        }
        Err(e) => error(e, 0),
    }
}
