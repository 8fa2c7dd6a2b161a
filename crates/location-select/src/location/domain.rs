use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for areas loaded into the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AreaId(pub i64);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for cities grouping areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityId(pub i64);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Latitude/longitude pair. The default (0, 0) doubles as the "no pin" map focus.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Accessor pair exposed by map widgets; values may be computed on demand.
pub trait LatLng {
    fn lat(&self) -> f64;
    fn lng(&self) -> f64;
}

impl<T: LatLng + ?Sized> LatLng for &T {
    fn lat(&self) -> f64 {
        (**self).lat()
    }

    fn lng(&self) -> f64 {
        (**self).lng()
    }
}

impl LatLng for GeoPoint {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lng(&self) -> f64 {
        self.lng
    }
}

/// Named sub-region of a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    /// Label used in the option list, formatted as `"<City>, <Area>"`.
    pub display_name: String,
    pub name: String,
    pub city_id: CityId,
    pub point: GeoPoint,
}

impl Area {
    pub fn display_name_for(city: &str, area: &str) -> String {
        format!("{city}, {area}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

/// Resolved area, city, and point triple handed to change listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub area: Area,
    pub city: City,
    pub point: GeoPoint,
}

/// Normalized selection kept by the state container; resolved through the directory on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoredLocation {
    pub area_id: AreaId,
    pub city_id: CityId,
    pub point: GeoPoint,
}

/// Entry of the searchable area list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: AreaId,
}

/// Target of a select command: an area plus an optional override point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationRequest {
    #[serde(rename = "areaID")]
    pub area_id: AreaId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<GeoPoint>,
}

/// Instruction sent to the selection sink.
///
/// Serializes as `{"showOnMap": false}` for a clear and
/// `{"location": {"areaID": 7, "point": {..}}, "showOnMap": true}` for a select.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<LocationRequest>,
    show_on_map: bool,
}

impl SelectionCommand {
    /// Drop the current selection without moving the map.
    pub const fn clear() -> Self {
        Self {
            location: None,
            show_on_map: false,
        }
    }

    pub const fn select(area_id: AreaId, point: Option<GeoPoint>, show_on_map: bool) -> Self {
        Self {
            location: Some(LocationRequest { area_id, point }),
            show_on_map,
        }
    }

    pub const fn location(&self) -> Option<&LocationRequest> {
        self.location.as_ref()
    }

    pub const fn show_on_map(&self) -> bool {
        self.show_on_map
    }
}

/// Raw option value as reported by a select widget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(i64),
    Float(f64),
    Text(String),
}

/// Option handed back by the list widget; fields may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PickedOption {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<OptionValue>,
}

impl PickedOption {
    pub fn with_value(value: i64) -> Self {
        Self {
            label: None,
            value: Some(OptionValue::Number(value)),
        }
    }
}

/// What the list widget reported: nothing, one option, or several.
///
/// Deserializes from JSON `null`, an object, or an array respectively. Array
/// elements are not inspected; only their number is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum ListPick {
    Cleared,
    Single(PickedOption),
    Multiple(usize),
}

struct ListPickVisitor;

impl<'de> Visitor<'de> for ListPickVisitor {
    type Value = ListPick;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("null, an option object, or an array of options")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ListPick, E> {
        Ok(ListPick::Cleared)
    }

    fn visit_none<E: de::Error>(self) -> Result<ListPick, E> {
        Ok(ListPick::Cleared)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<ListPick, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<ListPick, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut count = 0;
        while seq.next_element::<IgnoredAny>()?.is_some() {
            count += 1;
        }
        Ok(ListPick::Multiple(count))
    }

    fn visit_map<A>(self, map: A) -> Result<ListPick, A::Error>
    where
        A: MapAccess<'de>,
    {
        PickedOption::deserialize(de::value::MapAccessDeserializer::new(map)).map(ListPick::Single)
    }
}

impl<'de> Deserialize<'de> for ListPick {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ListPickVisitor)
    }
}

/// Place reported by the map widget after a user click or search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapCandidate<P = GeoPoint> {
    pub locality: String,
    pub area: String,
    pub point: Option<P>,
}

impl<P> MapCandidate<P> {
    /// Label the candidate must match exactly in the option list.
    pub fn area_label(&self) -> String {
        Area::display_name_for(&self.locality, &self.area)
    }
}
