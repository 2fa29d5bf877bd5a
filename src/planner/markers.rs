//! Map markers for a trip's places.

use serde::Serialize;

use crate::models::{ContainerRef, Place, Trip};

/// Color of markers for places not yet planned into a day.
pub const UNASSIGNED_MARKER_COLOR: &str = "#999999";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub color: String,
}

impl Marker {
    fn new(place: &Place, color: &str) -> Self {
        Self {
            id: place.id.clone(),
            lat: place.lat,
            lng: place.lng,
            name: place.name.clone(),
            color: color.to_string(),
        }
    }
}

/// Markers for every place in `trip`, or only those in `filter`.
///
/// Day places come first in day order, colored like their day, followed by
/// the unassigned places.
pub fn markers(trip: &Trip, filter: Option<&ContainerRef>) -> Vec<Marker> {
    match filter {
        None => trip
            .days
            .iter()
            .flat_map(|day| day.places.iter().map(|p| Marker::new(p, &day.color)))
            .chain(unassigned(trip))
            .collect(),
        Some(ContainerRef::Unassigned) => unassigned(trip).collect(),
        Some(ContainerRef::Day(day_id)) => trip
            .day(day_id)
            .map(|day| {
                day.places
                    .iter()
                    .map(|p| Marker::new(p, &day.color))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn unassigned(trip: &Trip) -> impl Iterator<Item = Marker> + '_ {
    trip.unassigned_places
        .iter()
        .map(|p| Marker::new(p, UNASSIGNED_MARKER_COLOR))
}
