//! Revision information for change detection.

use serde::{Deserialize, Serialize};

/// Counter bumped on every write of the trip collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
