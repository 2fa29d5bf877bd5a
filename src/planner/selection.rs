//! Multi-place selection and the batch move it confirms into.

use serde::Serialize;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{ContainerRef, Trip};

/// Places picked for a batch move plus the container they should land in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    place_ids: Vec<String>,
    target: Option<ContainerRef>,
}

/// Outcome of confirming a selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiMoveReport {
    /// Places that changed container, in selection order.
    pub moved: Vec<String>,
    /// Places that were not found or already sat in the target.
    pub skipped: Vec<String>,
    /// The trip after all moves, if it still exists.
    pub trip: Option<Trip>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection in one go, dropping duplicate ids.
    pub fn with_places<I, S>(place_ids: I, target: ContainerRef) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for id in place_ids {
            let id = id.into();
            if !selection.is_selected(&id) {
                selection.toggle(&id);
            }
        }
        selection.set_target(target);
        selection
    }

    /// Add the place if absent, remove it otherwise.
    pub fn toggle(&mut self, place_id: &str) {
        match self.place_ids.iter().position(|id| id == place_id) {
            Some(index) => {
                self.place_ids.remove(index);
            }
            None => self.place_ids.push(place_id.to_string()),
        }
    }

    pub fn set_target(&mut self, target: ContainerRef) {
        self.target = Some(target);
    }

    pub fn clear(&mut self) {
        self.place_ids.clear();
        self.target = None;
    }

    pub fn is_selected(&self, place_id: &str) -> bool {
        self.place_ids.iter().any(|id| id == place_id)
    }

    pub fn place_ids(&self) -> &[String] {
        &self.place_ids
    }

    pub fn target(&self) -> Option<&ContainerRef> {
        self.target.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.place_ids.is_empty()
    }

    /// Move every selected place into the target, one repository call each.
    ///
    /// Without a target nothing happens and the selection is kept. Otherwise
    /// the selection is cleared once all moves have run.
    pub async fn confirm(
        &mut self,
        repo: &Repository,
        trip_id: &str,
    ) -> Result<MultiMoveReport, AppError> {
        let Some(target) = self.target().cloned() else {
            return Ok(MultiMoveReport {
                moved: Vec::new(),
                skipped: Vec::new(),
                trip: repo.get_trip(trip_id).await?,
            });
        };

        let mut moved = Vec::new();
        let mut skipped = Vec::new();

        for place_id in self.place_ids() {
            let source = repo
                .get_trip(trip_id)
                .await?
                .and_then(|trip| trip.locate_place(place_id));

            let changed = match source {
                Some(source) if source != target => repo
                    .move_place(trip_id, place_id, &source, &target)
                    .await?
                    .is_some(),
                _ => false,
            };

            if changed {
                moved.push(place_id.clone());
            } else {
                skipped.push(place_id.clone());
            }
        }

        tracing::debug!(
            "Batch move into {}: {} moved, {} skipped",
            target,
            moved.len(),
            skipped.len()
        );

        self.clear();
        Ok(MultiMoveReport {
            moved,
            skipped,
            trip: repo.get_trip(trip_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryTripStore;
    use crate::models::{CreateDayRequest, NewPlace};
    use std::sync::Arc;

    fn place(name: &str) -> NewPlace {
        NewPlace {
            name: name.to_string(),
            lat: 48.85,
            lng: 2.35,
            address: None,
            place_id: None,
        }
    }

    async fn add_day(repo: &Repository, trip_id: &str, title: &str) -> String {
        repo.add_day(
            trip_id,
            &CreateDayRequest {
                title: title.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap()
        .id
    }

    async fn add_place(repo: &Repository, trip_id: &str, name: &str, to: ContainerRef) -> String {
        repo.add_place(trip_id, place(name), &to)
            .await
            .unwrap()
            .unwrap()
            .id
    }

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let mut selection = Selection::new();
        selection.toggle("b");
        selection.toggle("a");
        selection.toggle("c");
        selection.toggle("a");
        assert_eq!(selection.place_ids(), ["b", "c"]);
        assert!(!selection.is_selected("a"));

        selection.set_target(ContainerRef::Unassigned);
        selection.clear();
        assert!(selection.is_empty());
        assert!(selection.target().is_none());
    }

    #[test]
    fn test_with_places_drops_duplicates() {
        let selection = Selection::with_places(["x", "y", "x"], ContainerRef::day("d1"));
        assert_eq!(selection.place_ids(), ["x", "y"]);
        assert_eq!(selection.target(), Some(&ContainerRef::day("d1")));
    }

    #[tokio::test]
    async fn test_confirm_moves_places_from_several_days() {
        let repo = Repository::new(Arc::new(MemoryTripStore::new()));
        let trip = repo.create_trip("Paris").await.unwrap();
        let d1 = add_day(&repo, &trip.id, "Day 1").await;
        let d2 = add_day(&repo, &trip.id, "Day 2").await;
        let d3 = add_day(&repo, &trip.id, "Day 3").await;

        let louvre = add_place(&repo, &trip.id, "Louvre", ContainerRef::day(&d1)).await;
        let orsay = add_place(&repo, &trip.id, "Orsay", ContainerRef::day(&d1)).await;
        let eiffel = add_place(&repo, &trip.id, "Eiffel", ContainerRef::day(&d2)).await;
        let stay = add_place(&repo, &trip.id, "Montmartre", ContainerRef::day(&d2)).await;

        let mut selection = Selection::new();
        selection.toggle(&eiffel);
        selection.toggle(&louvre);
        selection.toggle(&orsay);
        selection.set_target(ContainerRef::day(&d3));

        let report = selection.confirm(&repo, &trip.id).await.unwrap();
        assert_eq!(report.moved, vec![eiffel.clone(), louvre.clone(), orsay.clone()]);
        assert!(report.skipped.is_empty());
        assert!(selection.is_empty());

        let trip = report.trip.unwrap();
        let ids = |day: &str| -> Vec<String> {
            trip.day(day).unwrap().places.iter().map(|p| p.id.clone()).collect()
        };
        assert_eq!(ids(&d3), vec![eiffel, louvre, orsay]);
        assert!(ids(&d1).is_empty());
        assert_eq!(ids(&d2), vec![stay]);
    }

    #[tokio::test]
    async fn test_confirm_skips_unknown_and_already_placed() {
        let repo = Repository::new(Arc::new(MemoryTripStore::new()));
        let trip = repo.create_trip("Lisbon").await.unwrap();
        let kept = add_place(&repo, &trip.id, "Belem", ContainerRef::Unassigned).await;

        let mut selection =
            Selection::with_places([kept.as_str(), "ghost"], ContainerRef::Unassigned);
        let revision = repo.get_revision_id().await.unwrap();
        let report = selection.confirm(&repo, &trip.id).await.unwrap();

        assert!(report.moved.is_empty());
        assert_eq!(report.skipped, vec![kept, "ghost".to_string()]);
        assert_eq!(repo.get_revision_id().await.unwrap(), revision);
    }

    #[tokio::test]
    async fn test_confirm_without_target_keeps_selection() {
        let repo = Repository::new(Arc::new(MemoryTripStore::new()));
        let trip = repo.create_trip("Rome").await.unwrap();

        let mut selection = Selection::new();
        selection.toggle("p1");
        let report = selection.confirm(&repo, &trip.id).await.unwrap();

        assert!(report.moved.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(selection.place_ids(), ["p1"]);
    }
}
