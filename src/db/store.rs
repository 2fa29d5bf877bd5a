//! Storage port for the trip collection.
//!
//! The repository only ever reads or replaces the whole collection, so the
//! port is two calls plus revision info for the response envelope.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{RevisionInfo, Trip};

/// Key holding the JSON-encoded array of all trips.
pub const STORAGE_KEY: &str = "trip-planner-data";

/// Whole-collection storage for trips.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Read every trip. A store that has never been written returns an empty list.
    async fn read(&self) -> Result<Vec<Trip>, AppError>;

    /// Replace the stored collection in a single write.
    async fn write(&self, trips: &[Trip]) -> Result<(), AppError>;

    /// Current revision of the stored collection.
    async fn revision(&self) -> Result<RevisionInfo, AppError>;
}

/// SQLite-backed key-value store.
#[derive(Clone)]
pub struct SqliteTripStore {
    pool: SqlitePool,
}

impl SqliteTripStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn read(&self) -> Result<Vec<Trip>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(STORAGE_KEY)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };

        let value: String = row.get("value");
        serde_json::from_str(&value).map_err(|e| {
            tracing::error!("Stored trip data is unreadable: {:?}", e);
            AppError::Database(format!("Stored trip data is unreadable: {}", e))
        })
    }

    async fn write(&self, trips: &[Trip]) -> Result<(), AppError> {
        let value = serde_json::to_string(trips)
            .map_err(|e| AppError::Internal(format!("Failed to encode trips: {}", e)))?;
        let now = Utc::now().to_rfc3339();

        // Value and revision move together
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(STORAGE_KEY)
        .bind(&value)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Persisted {} trips ({} bytes)", trips.len(), value.len());
        Ok(())
    }

    async fn revision(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }
}

#[cfg(test)]
pub use memory::MemoryTripStore;

#[cfg(test)]
mod memory {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::RwLock;

    use super::TripStore;
    use crate::errors::AppError;
    use crate::models::{RevisionInfo, Trip};

    /// In-memory stand-in used by unit tests.
    pub struct MemoryTripStore {
        state: RwLock<(Vec<Trip>, RevisionInfo)>,
        unavailable: AtomicBool,
    }

    impl MemoryTripStore {
        pub fn new() -> Self {
            let revision = RevisionInfo {
                revision_id: 0,
                generated_at: Utc::now().to_rfc3339(),
            };
            Self {
                state: RwLock::new((Vec::new(), revision)),
                unavailable: AtomicBool::new(false),
            }
        }

        /// Make every following read and write fail like a broken backend.
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), AppError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(AppError::Database("storage unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TripStore for MemoryTripStore {
        async fn read(&self) -> Result<Vec<Trip>, AppError> {
            self.check()?;
            Ok(self.state.read().await.0.clone())
        }

        async fn write(&self, trips: &[Trip]) -> Result<(), AppError> {
            self.check()?;
            let mut state = self.state.write().await;
            state.0 = trips.to_vec();
            state.1.revision_id += 1;
            state.1.generated_at = Utc::now().to_rfc3339();
            Ok(())
        }

        async fn revision(&self) -> Result<RevisionInfo, AppError> {
            Ok(self.state.read().await.1.clone())
        }
    }
}
