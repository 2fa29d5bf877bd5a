//! Trip repository for CRUD operations.
//!
//! Every mutation is one read-modify-write of the whole collection, serialized
//! by a repository-wide lock. An id that cannot be resolved makes the call a
//! no-op: nothing is written and `None`/`false` is returned.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::{IdGenerator, TripStore};
use crate::errors::AppError;
use crate::models::{
    ContainerRef, CreateDayRequest, Day, NewPlace, Place, RevisionInfo, Trip, UpdateDayRequest,
    UpdateTripRequest, DEFAULT_DAY_COLOR,
};

/// A trip id that was replaced while merging imported trips.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReassignedId {
    pub from: String,
    pub to: String,
}

/// Repository for all trip, day and place operations.
pub struct Repository {
    store: Arc<dyn TripStore>,
    write_lock: Mutex<()>,
    ids: IdGenerator,
}

impl Repository {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            ids: IdGenerator::new(),
        }
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        self.store.revision().await
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        Ok(self.store.revision().await?.revision_id)
    }

    /// Run `f` over the stored collection and persist it if `f` reports a change.
    async fn mutate<T, F>(&self, f: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut Vec<Trip>) -> Option<T> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut trips = self.store.read().await?;
        let outcome = f(&mut trips);
        if outcome.is_some() {
            self.store.write(&trips).await?;
        }
        Ok(outcome)
    }

    async fn mutate_trip<T, F>(&self, trip_id: &str, f: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut Trip) -> Option<T> + Send,
        T: Send,
    {
        self.mutate(|trips| {
            let trip = trips.iter_mut().find(|t| t.id == trip_id)?;
            f(trip)
        })
        .await
    }

    // ==================== TRIP OPERATIONS ====================

    /// List all trips.
    pub async fn list_trips(&self) -> Result<Vec<Trip>, AppError> {
        self.store.read().await
    }

    /// Get a trip by ID.
    pub async fn get_trip(&self, id: &str) -> Result<Option<Trip>, AppError> {
        let trips = self.store.read().await?;
        Ok(trips.into_iter().find(|t| t.id == id))
    }

    /// Create a new, empty trip.
    pub async fn create_trip(&self, name: &str) -> Result<Trip, AppError> {
        let trip = Trip::new(self.ids.next_id(), name);
        let created = trip.clone();

        self.mutate(move |trips| {
            trips.push(trip);
            Some(())
        })
        .await?;

        tracing::debug!("Created trip {}", created.id);
        Ok(created)
    }

    /// Merge the provided fields into a trip.
    pub async fn update_trip(
        &self,
        id: &str,
        request: &UpdateTripRequest,
    ) -> Result<Option<Trip>, AppError> {
        self.mutate_trip(id, |trip| {
            if let Some(name) = &request.name {
                trip.name = name.clone();
            }
            Some(trip.clone())
        })
        .await
    }

    /// Delete a trip with all of its days and places.
    pub async fn delete_trip(&self, id: &str) -> Result<bool, AppError> {
        let removed = self
            .mutate(|trips| {
                let index = trips.iter().position(|t| t.id == id)?;
                Some(trips.remove(index))
            })
            .await?;

        if let Some(trip) = &removed {
            tracing::debug!("Deleted trip {} with {} places", trip.id, trip.place_count());
        }
        Ok(removed.is_some())
    }

    // ==================== DAY OPERATIONS ====================

    /// Append a new day to a trip.
    pub async fn add_day(
        &self,
        trip_id: &str,
        request: &CreateDayRequest,
    ) -> Result<Option<Day>, AppError> {
        let day = Day {
            id: self.ids.next_id(),
            title: request.title.clone(),
            date: request.date,
            color: request
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_DAY_COLOR.to_string()),
            places: Vec::new(),
        };

        self.mutate_trip(trip_id, move |trip| {
            trip.days.push(day.clone());
            Some(day)
        })
        .await
    }

    /// Merge the provided fields into a day.
    pub async fn update_day(
        &self,
        trip_id: &str,
        day_id: &str,
        request: &UpdateDayRequest,
    ) -> Result<Option<Day>, AppError> {
        self.mutate_trip(trip_id, |trip| {
            let day = trip.day_mut(day_id)?;
            if let Some(title) = &request.title {
                day.title = title.clone();
            }
            if let Some(date) = request.date {
                day.date = date;
            }
            if let Some(color) = &request.color {
                day.color = color.clone();
            }
            Some(day.clone())
        })
        .await
    }

    /// Delete a day. Its places move to the end of the unassigned bucket.
    pub async fn delete_day(&self, trip_id: &str, day_id: &str) -> Result<bool, AppError> {
        let removed = self
            .mutate_trip(trip_id, |trip| {
                let index = trip.day_position(day_id)?;
                let mut day = trip.days.remove(index);
                trip.unassigned_places.append(&mut day.places);
                Some(())
            })
            .await?;
        Ok(removed.is_some())
    }

    /// Move a day block to the index the target day currently occupies.
    ///
    /// The source is removed first and then inserted at the target's original
    /// index, so moving forward lands the day right after the target.
    pub async fn reorder_days(
        &self,
        trip_id: &str,
        source_day_id: &str,
        target_day_id: &str,
    ) -> Result<Option<Trip>, AppError> {
        self.mutate_trip(trip_id, |trip| {
            let source_index = trip.day_position(source_day_id)?;
            let target_index = trip.day_position(target_day_id)?;
            let day = trip.days.remove(source_index);
            trip.days.insert(target_index, day);
            Some(trip.clone())
        })
        .await
    }

    // ==================== PLACE OPERATIONS ====================

    /// Add a place to a container. An unknown day makes this a no-op.
    pub async fn add_place(
        &self,
        trip_id: &str,
        place: NewPlace,
        container: &ContainerRef,
    ) -> Result<Option<Place>, AppError> {
        let place = place.into_place(self.ids.next_id());

        self.mutate_trip(trip_id, move |trip| {
            trip.container_mut(container)?.push(place.clone());
            Some(place)
        })
        .await
    }

    /// Move a place from `source` to the end of `target`.
    ///
    /// Returns `None` without writing when the place is not in `source` or the
    /// target day does not exist.
    pub async fn move_place(
        &self,
        trip_id: &str,
        place_id: &str,
        source: &ContainerRef,
        target: &ContainerRef,
    ) -> Result<Option<Place>, AppError> {
        let moved = self
            .mutate_trip(trip_id, |trip| {
                trip.container(target)?;
                let place = trip.take_place(place_id, source)?;
                trip.container_mut(target)?.push(place.clone());
                Some(place)
            })
            .await?;

        if moved.is_some() {
            tracing::debug!("Moved place {} from {} to {}", place_id, source, target);
        }
        Ok(moved)
    }

    /// Delete a place from the named container.
    pub async fn delete_place(
        &self,
        trip_id: &str,
        place_id: &str,
        container: &ContainerRef,
    ) -> Result<bool, AppError> {
        let removed = self
            .mutate_trip(trip_id, |trip| trip.take_place(place_id, container))
            .await?;
        Ok(removed.is_some())
    }

    // ==================== COLLECTION OPERATIONS ====================

    /// Replace the whole collection.
    pub async fn replace_trips(&self, trips: Vec<Trip>) -> Result<(), AppError> {
        self.mutate(move |stored| {
            *stored = trips;
            Some(())
        })
        .await?;
        Ok(())
    }

    /// Append trips to the collection, giving a fresh id to any trip whose id
    /// is already taken.
    pub async fn merge_trips(&self, imported: Vec<Trip>) -> Result<Vec<ReassignedId>, AppError> {
        let reassigned = self
            .mutate(move |stored| {
                let mut taken: HashSet<String> = stored.iter().map(|t| t.id.clone()).collect();
                let mut reassigned = Vec::new();

                for mut trip in imported {
                    if taken.contains(&trip.id) {
                        let fresh = self.fresh_id(&taken);
                        reassigned.push(ReassignedId {
                            from: std::mem::replace(&mut trip.id, fresh.clone()),
                            to: fresh,
                        });
                    }
                    taken.insert(trip.id.clone());
                    stored.push(trip);
                }
                Some(reassigned)
            })
            .await?;

        Ok(reassigned.unwrap_or_default())
    }

    fn fresh_id(&self, taken: &HashSet<String>) -> String {
        loop {
            let id = self.ids.next_id();
            if !taken.contains(&id) {
                return id;
            }
        }
    }
}
