//! Trip, day and place models matching the frontend storage format.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::ContainerRef;

/// Color given to a day block when none is chosen.
pub const DEFAULT_DAY_COLOR: &str = "#676767";

/// A geographic place on the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,
    /// External reference from the map provider.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub place_id: Option<String>,
}

/// A day-labeled group of places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date: Option<NaiveDate>,
    #[serde(default = "default_day_color")]
    pub color: String,
    #[serde(default)]
    pub places: Vec<Place>,
}

/// A trip with its ordered days and the unassigned bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    pub days: Vec<Day>,
    pub unassigned_places: Vec<Place>,
}

impl Trip {
    pub fn new(id: String, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            days: Vec::new(),
            unassigned_places: Vec::new(),
        }
    }

    pub fn day(&self, day_id: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.id == day_id)
    }

    pub fn day_position(&self, day_id: &str) -> Option<usize> {
        self.days.iter().position(|d| d.id == day_id)
    }

    pub fn day_mut(&mut self, day_id: &str) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| d.id == day_id)
    }

    /// Places held by a container, or `None` if the day does not exist.
    pub fn container(&self, container: &ContainerRef) -> Option<&[Place]> {
        match container {
            ContainerRef::Unassigned => Some(&self.unassigned_places),
            ContainerRef::Day(id) => self.day(id).map(|d| d.places.as_slice()),
        }
    }

    pub fn container_mut(&mut self, container: &ContainerRef) -> Option<&mut Vec<Place>> {
        match container {
            ContainerRef::Unassigned => Some(&mut self.unassigned_places),
            ContainerRef::Day(id) => self.day_mut(id).map(|d| &mut d.places),
        }
    }

    /// Container currently holding a place: unassigned first, then days in order.
    pub fn locate_place(&self, place_id: &str) -> Option<ContainerRef> {
        if self.unassigned_places.iter().any(|p| p.id == place_id) {
            return Some(ContainerRef::Unassigned);
        }
        self.days
            .iter()
            .find(|d| d.places.iter().any(|p| p.id == place_id))
            .map(|d| ContainerRef::day(d.id.clone()))
    }

    /// Remove a place from the given container only.
    pub fn take_place(&mut self, place_id: &str, from: &ContainerRef) -> Option<Place> {
        let places = self.container_mut(from)?;
        let index = places.iter().position(|p| p.id == place_id)?;
        Some(places.remove(index))
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.days
            .iter()
            .flat_map(|d| d.places.iter())
            .chain(self.unassigned_places.iter())
    }

    pub fn place_count(&self) -> usize {
        self.places().count()
    }
}

fn default_day_color() -> String {
    DEFAULT_DAY_COLOR.to_string()
}

/// Reads `null`, a missing field and `""` as `None`.
///
/// The browser app stored empty strings for unset dates and addresses.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Like `empty_as_none`, but keeps "field present" apart from "field absent"
/// so partial updates can clear a value.
fn present_empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    empty_as_none(deserializer).map(Some)
}

/// Request body for creating a new trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub name: String,
}

/// Request body for updating a trip. Only provided fields are merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for adding a day to a trip.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDayRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub color: Option<String>,
}

/// Request body for updating a day. Only provided fields are merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDayRequest {
    #[serde(default)]
    pub title: Option<String>,
    /// `null` or `""` clears the date; an absent field leaves it unchanged.
    #[serde(default, deserialize_with = "present_empty_as_none")]
    pub date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub color: Option<String>,
}

/// Place data as emitted by the map widget.
///
/// Extra metadata the widget attaches is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlace {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub place_id: Option<String>,
}

impl NewPlace {
    pub fn into_place(self, id: String) -> Place {
        Place {
            id,
            name: self.name,
            lat: self.lat,
            lng: self.lng,
            address: self.address,
            place_id: self.place_id,
        }
    }
}

/// Request body for adding a place, optionally straight into a day.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaceRequest {
    #[serde(flatten)]
    pub place: NewPlace,
    #[serde(default)]
    pub day_id: Option<ContainerRef>,
}

impl CreatePlaceRequest {
    pub fn container(&self) -> ContainerRef {
        self.day_id.clone().unwrap_or_default()
    }
}

/// Request body for moving a place between containers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePlaceRequest {
    pub source_day_id: ContainerRef,
    pub target_day_id: ContainerRef,
}

/// Request body for moving several places into one container.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBatchRequest {
    pub place_ids: Vec<String>,
    pub target_day_id: ContainerRef,
}

/// Request body for reordering day blocks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderDaysRequest {
    pub source_day_id: String,
    pub target_day_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_reads_browser_storage_format() {
        let raw = json!({
            "id": "1700000000000",
            "name": "Lisbon",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "days": [{
                "id": "1700000000001",
                "title": "Alfama",
                "date": "",
                "color": "#ff0000",
                "places": [{
                    "id": "1700000000002",
                    "name": "Castelo",
                    "lat": 38.71,
                    "lng": -9.13,
                    "address": "",
                    "placeId": null
                }]
            }],
            "unassignedPlaces": []
        });

        let trip: Trip = serde_json::from_value(raw).unwrap();
        assert_eq!(trip.days[0].date, None);
        assert_eq!(trip.days[0].places[0].address, None);
        assert_eq!(trip.days[0].places[0].place_id, None);
    }

    #[test]
    fn test_day_defaults_color() {
        let day: Day = serde_json::from_value(json!({ "id": "1", "title": "x" })).unwrap();
        assert_eq!(day.color, DEFAULT_DAY_COLOR);
        assert!(day.places.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut trip = Trip::new("1".to_string(), "Rome");
        trip.unassigned_places.push(Place {
            id: "2".to_string(),
            name: "Colosseum".to_string(),
            lat: 41.89,
            lng: 12.49,
            address: None,
            place_id: Some("ChIJ".to_string()),
        });

        let value = serde_json::to_value(&trip).unwrap();
        assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));
        assert_eq!(value["unassignedPlaces"][0]["placeId"], "ChIJ");
        assert_eq!(value["unassignedPlaces"][0]["address"], Value::Null);
    }

    #[test]
    fn test_browser_data_keeps_optional_keys() {
        let raw = json!({
            "id": "1",
            "title": "Day",
            "date": "",
            "color": "#676767",
            "places": [{
                "id": "3",
                "name": "p",
                "lat": 1.0,
                "lng": 2.0,
                "address": "",
                "placeId": null
            }]
        });

        let day: Day = serde_json::from_value(raw).unwrap();
        let value = serde_json::to_value(&day).unwrap();
        assert_eq!(value["date"], Value::Null);
        assert_eq!(value["places"][0]["address"], Value::Null);
        assert_eq!(value["places"][0]["placeId"], Value::Null);
        assert!(value.as_object().unwrap().contains_key("date"));
        assert!(value["places"][0].as_object().unwrap().contains_key("address"));
    }

    #[test]
    fn test_update_day_date_distinguishes_clear_from_absent() {
        let absent: UpdateDayRequest = serde_json::from_value(json!({ "title": "t" })).unwrap();
        assert_eq!(absent.date, None);

        let cleared: UpdateDayRequest = serde_json::from_value(json!({ "date": "" })).unwrap();
        assert_eq!(cleared.date, Some(None));

        let set: UpdateDayRequest = serde_json::from_value(json!({ "date": "2024-06-01" })).unwrap();
        assert_eq!(set.date, Some(NaiveDate::from_ymd_opt(2024, 6, 1)));
    }

    #[test]
    fn test_locate_place_prefers_unassigned_then_day_order() {
        let mut trip = Trip::new("1".to_string(), "t");
        let place = Place {
            id: "p".to_string(),
            name: "p".to_string(),
            lat: 0.0,
            lng: 0.0,
            address: None,
            place_id: None,
        };
        trip.days.push(Day {
            id: "d1".to_string(),
            title: String::new(),
            date: None,
            color: default_day_color(),
            places: vec![place.clone()],
        });
        assert_eq!(trip.locate_place("p"), Some(ContainerRef::day("d1")));

        trip.unassigned_places.push(place);
        assert_eq!(trip.locate_place("p"), Some(ContainerRef::Unassigned));
        assert_eq!(trip.locate_place("missing"), None);
    }

    #[test]
    fn test_create_place_request_defaults_to_unassigned() {
        let req: CreatePlaceRequest = serde_json::from_value(json!({
            "name": "Pier",
            "lat": 1.0,
            "lng": 2.0,
            "types": ["point_of_interest"]
        }))
        .unwrap();
        assert_eq!(req.container(), ContainerRef::Unassigned);
        assert_eq!(req.place.name, "Pier");
    }
}
