use serde::Serialize;

use super::directory::DirectorySnapshot;
use super::domain::{Area, AreaId, City, GeoPoint, Location, SelectOption};

/// Map widget input derived from the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MapFocus {
    pub point: GeoPoint,
    /// `false` when `point` is the neutral default rather than a selected area.
    pub pinned: bool,
    pub show_new_point: bool,
}

/// Everything a picker front end needs to render the current state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LocationView {
    pub options: Vec<SelectOption>,
    pub selected_area: Option<Area>,
    pub selected_city: Option<City>,
    pub select_value: Option<AreaId>,
    pub area_name: String,
    pub city_name: String,
    pub map: MapFocus,
}

pub fn build_options(snapshot: &DirectorySnapshot) -> Vec<SelectOption> {
    snapshot
        .areas()
        .map(|area| SelectOption {
            label: area.display_name.clone(),
            value: area.id,
        })
        .collect()
}

pub fn derive_view(
    snapshot: &DirectorySnapshot,
    location: Option<&Location>,
    show_on_map: bool,
) -> LocationView {
    let selected_area = location.map(|location| location.area.clone());
    let selected_city = location.map(|location| location.city.clone());

    let map = match &selected_area {
        Some(area) => MapFocus {
            point: area.point,
            pinned: true,
            show_new_point: show_on_map,
        },
        None => MapFocus {
            point: GeoPoint::default(),
            pinned: false,
            show_new_point: show_on_map,
        },
    };

    LocationView {
        options: build_options(snapshot),
        select_value: selected_area.as_ref().map(|area| area.id),
        area_name: selected_area
            .as_ref()
            .map(|area| area.name.clone())
            .unwrap_or_default(),
        city_name: selected_city
            .as_ref()
            .map(|city| city.name.clone())
            .unwrap_or_default(),
        selected_area,
        selected_city,
        map,
    }
}
