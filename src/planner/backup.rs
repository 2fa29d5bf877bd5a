//! Backup export and import of the trip collection.
//!
//! Exports are the pretty-printed collection. Imports are validated as a
//! whole before anything is written, so a bad file never leaves a partial
//! collection behind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db::{ReassignedId, Repository};
use crate::errors::AppError;
use crate::models::Trip;

/// Prefix of exported backup file names.
pub const EXPORT_FILE_PREFIX: &str = "trip-planner-backup-";

/// How imported trips combine with the stored ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Append imported trips to the existing collection.
    Merge,
    /// Discard the existing collection.
    Replace,
}

/// A backup ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

/// Result of a successful import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub mode: ImportMode,
    pub count: usize,
    pub reassigned_ids: Vec<ReassignedId>,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Error reading the file. Make sure it is a valid JSON file. ({0})")]
    InvalidJson(#[source] serde_json::Error),
    #[error("The file does not have the correct format: expected a list of trips")]
    NotAnArray,
    #[error("The file does not have the correct format: trip #{index} is missing `{field}`")]
    InvalidTrip { index: usize, field: &'static str },
    #[error("The file does not have the correct format: trip #{index} could not be read ({source})")]
    Schema {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        tracing::warn!("Rejected import: {}", err);
        AppError::Validation(err.to_string())
    }
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("{}{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Serialize the collection as an indented JSON backup.
pub fn export(trips: &[Trip], today: NaiveDate) -> Result<ExportFile, AppError> {
    let contents = serde_json::to_string_pretty(trips)
        .map_err(|e| AppError::Internal(format!("Failed to encode backup: {}", e)))?;
    Ok(ExportFile {
        filename: export_filename(today),
        contents,
    })
}

/// Fields every imported trip must carry with a non-empty value.
const REQUIRED_FIELDS: [&str; 4] = ["id", "name", "days", "unassignedPlaces"];

/// Parse and validate a backup file. Any bad element rejects the whole file.
pub fn parse_import(text: &str) -> Result<Vec<Trip>, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::InvalidJson)?;
    let Value::Array(elements) = value else {
        return Err(ImportError::NotAnArray);
    };

    for (index, element) in elements.iter().enumerate() {
        if let Some(field) = REQUIRED_FIELDS
            .iter()
            .copied()
            .find(|field| !is_present(element.get(*field)))
        {
            return Err(ImportError::InvalidTrip { index, field });
        }
    }

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value(element).map_err(|source| ImportError::Schema { index, source })
        })
        .collect()
}

/// Missing, `null`, `false`, `0` and `""` all count as absent.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

/// Validate `text` and store its trips according to `mode`.
pub async fn import(
    repo: &Repository,
    text: &str,
    mode: ImportMode,
) -> Result<ImportSummary, AppError> {
    let trips = parse_import(text)?;
    let count = trips.len();

    let reassigned_ids = match mode {
        ImportMode::Replace => {
            repo.replace_trips(trips).await?;
            Vec::new()
        }
        ImportMode::Merge => repo.merge_trips(trips).await?,
    };

    tracing::info!(
        "Imported {} trips ({:?}, {} ids reassigned)",
        count,
        mode,
        reassigned_ids.len()
    );

    Ok(ImportSummary {
        mode,
        count,
        reassigned_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryTripStore;
    use crate::models::{ContainerRef, CreateDayRequest, NewPlace};
    use serde_json::json;
    use std::sync::Arc;

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryTripStore::new()))
    }

    async fn seeded() -> Repository {
        let repo = repo();
        let trip = repo.create_trip("Porto").await.unwrap();
        let day = repo
            .add_day(
                &trip.id,
                &CreateDayRequest {
                    title: "Ribeira".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 9, 14),
                    color: Some("#3366ff".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        for (name, container) in [
            ("Livraria Lello", ContainerRef::day(&day.id)),
            ("Serralves", ContainerRef::Unassigned),
        ] {
            repo.add_place(
                &trip.id,
                NewPlace {
                    name: name.to_string(),
                    lat: 41.14,
                    lng: -8.61,
                    address: Some("Porto".to_string()),
                    place_id: None,
                },
                &container,
            )
            .await
            .unwrap()
            .unwrap();
        }
        repo.create_trip("Madeira").await.unwrap();
        repo
    }

    #[test]
    fn test_export_filename_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename(date), "trip-planner-backup-2024-03-09.json");
    }

    #[tokio::test]
    async fn test_export_then_replace_reproduces_collection() {
        let source = seeded().await;
        let original = source.list_trips().await.unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let file = export(&original, today).unwrap();
        assert!(file.contents.contains("\n  "));

        let target = repo();
        let summary = import(&target, &file.contents, ImportMode::Replace)
            .await
            .unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mode, ImportMode::Replace);

        let restored = target.list_trips().await.unwrap();
        assert_eq!(restored, original);
        assert_eq!(
            serde_json::to_value(&restored).unwrap(),
            serde_json::from_str::<Value>(&file.contents).unwrap()
        );
    }

    #[tokio::test]
    async fn test_import_missing_field_rejects_everything() {
        let repo = seeded().await;
        let before = repo.list_trips().await.unwrap();

        let text = json!([
            { "id": "1", "name": "Ok", "days": [], "unassignedPlaces": [] },
            { "id": "2", "name": "Broken", "days": [] }
        ])
        .to_string();

        let err = import(&repo, &text, ImportMode::Replace).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.message().contains("unassignedPlaces"));
        assert_eq!(repo.list_trips().await.unwrap(), before);
    }

    #[test]
    fn test_parse_import_rejections() {
        assert!(matches!(
            parse_import("{not json"),
            Err(ImportError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_import(r#"{"id": "1"}"#),
            Err(ImportError::NotAnArray)
        ));
        assert!(matches!(
            parse_import(r#"[{"id": "", "name": "x", "days": [], "unassignedPlaces": []}]"#),
            Err(ImportError::InvalidTrip { index: 0, field: "id" })
        ));
        assert!(matches!(
            parse_import(r#"[{"id": "1", "name": "x", "days": [{"title": "no id"}], "unassignedPlaces": []}]"#),
            Err(ImportError::Schema { index: 0, .. })
        ));
        assert!(parse_import("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_merge_appends_and_reassigns_duplicates() {
        let repo = seeded().await;
        let existing = repo.list_trips().await.unwrap();
        let text = serde_json::to_string(&existing[..1]).unwrap();

        let summary = import(&repo, &text, ImportMode::Merge).await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mode, ImportMode::Merge);
        assert_eq!(summary.reassigned_ids.len(), 1);
        assert_eq!(summary.reassigned_ids[0].from, existing[0].id);

        let trips = repo.list_trips().await.unwrap();
        assert_eq!(trips.len(), 3);
        assert_eq!(trips[2].id, summary.reassigned_ids[0].to);
        assert_eq!(trips[2].days, existing[0].days);
    }

    #[test]
    fn test_import_mode_wire_names() {
        let mode: ImportMode = serde_json::from_str(r#""merge""#).unwrap();
        assert_eq!(mode, ImportMode::Merge);
        assert_eq!(serde_json::to_string(&ImportMode::Replace).unwrap(), r#""replace""#);
    }
}
