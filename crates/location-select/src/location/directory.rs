use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{Area, AreaId, City, CityId, Location, SelectionCommand, StoredLocation};
use super::source::SourceError;

/// Normalized area and city records as delivered by an area source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryData {
    cities: BTreeMap<CityId, City>,
    areas: BTreeMap<AreaId, Area>,
}

impl DirectoryData {
    /// Register a city. Re-registering the same id with the same name is a no-op.
    pub fn add_city(&mut self, city: City) -> Result<(), SourceError> {
        match self.cities.get(&city.id) {
            Some(existing) if existing.name != city.name => Err(SourceError::ConflictingCity {
                id: city.id,
                existing: existing.name.clone(),
                incoming: city.name,
            }),
            Some(_) => Ok(()),
            None => {
                self.cities.insert(city.id, city);
                Ok(())
            }
        }
    }

    /// Register an area whose city has already been added.
    pub fn add_area(&mut self, area: Area) -> Result<(), SourceError> {
        if !self.cities.contains_key(&area.city_id) {
            return Err(SourceError::UnknownCity {
                area: area.id,
                city: area.city_id,
            });
        }
        if self.areas.contains_key(&area.id) {
            return Err(SourceError::DuplicateArea { id: area.id });
        }
        self.areas.insert(area.id, area);
        Ok(())
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }
}

/// Immutable view of the directory at one point in time.
///
/// A new snapshot is allocated on every load, so `Arc` identity tells
/// consumers whether the directory changed since they last looked.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    data: DirectoryData,
    loaded_at: Option<DateTime<Utc>>,
}

impl DirectorySnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn loaded(data: DirectoryData, loaded_at: DateTime<Utc>) -> Self {
        Self {
            data,
            loaded_at: Some(loaded_at),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.data.areas.get(&id)
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.data.cities.get(&id)
    }

    /// Areas in ascending id order.
    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.data.areas.values()
    }

    /// Resolve a stored selection into a full location, if both records are present.
    pub fn resolve(&self, stored: &StoredLocation) -> Option<Location> {
        let area = self.area(stored.area_id)?;
        let city = self.city(stored.city_id)?;
        Some(Location {
            area: area.clone(),
            city: city.clone(),
            point: stored.point,
        })
    }
}

/// Read side of the normalized area store.
pub trait AreaDirectory: Send + Sync {
    /// Start loading areas and cities. Completion is observed through [`AreaDirectory::snapshot`].
    fn load_cities(&self);
    fn snapshot(&self) -> Arc<DirectorySnapshot>;
}

/// Current selection as held by the state container.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub location: Option<Arc<StoredLocation>>,
    pub show_on_map: bool,
}

/// Write side for selections; the sink computes the canonical stored location.
pub trait SelectionSink: Send + Sync {
    fn select_location(&self, command: SelectionCommand);
    fn selection(&self) -> SelectionState;
}
