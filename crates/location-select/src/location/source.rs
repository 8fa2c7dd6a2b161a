use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;

use super::directory::DirectoryData;
use super::domain::{Area, AreaId, City, CityId, GeoPoint};

/// Backend that delivers the normalized area/city records.
pub trait AreaSource: Send + Sync {
    fn fetch(&self) -> Result<DirectoryData, SourceError>;
}

/// Error enumeration for area loading failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read area export {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid area CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("area {id} appears more than once")]
    DuplicateArea { id: AreaId },
    #[error("area {area} references unknown city {city}")]
    UnknownCity { area: AreaId, city: CityId },
    #[error("city {id} is named both '{existing}' and '{incoming}'")]
    ConflictingCity {
        id: CityId,
        existing: String,
        incoming: String,
    },
    #[error("area source unavailable: {0}")]
    Unavailable(String),
}

/// Fixed record set, handy for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAreaSource {
    data: DirectoryData,
}

impl StaticAreaSource {
    pub fn new(data: DirectoryData) -> Self {
        Self { data }
    }
}

impl AreaSource for StaticAreaSource {
    fn fetch(&self) -> Result<DirectoryData, SourceError> {
        Ok(self.data.clone())
    }
}

/// Reads `area_id,area_name,city_id,city_name,lat,lng` rows from a CSV export.
#[derive(Debug, Clone)]
pub struct CsvAreaSource {
    path: PathBuf,
}

impl CsvAreaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AreaSource for CsvAreaSource {
    fn fetch(&self) -> Result<DirectoryData, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_areas(file)
    }
}

#[derive(Debug, Deserialize)]
struct AreaRow {
    area_id: i64,
    area_name: String,
    city_id: i64,
    city_name: String,
    lat: f64,
    lng: f64,
}

pub fn parse_areas<R: Read>(reader: R) -> Result<DirectoryData, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut data = DirectoryData::default();

    for record in csv_reader.deserialize::<AreaRow>() {
        let row = record?;
        let city_id = CityId(row.city_id);

        data.add_city(City {
            id: city_id,
            name: row.city_name.clone(),
        })?;
        data.add_area(Area {
            id: AreaId(row.area_id),
            display_name: Area::display_name_for(&row.city_name, &row.area_name),
            name: row.area_name,
            city_id,
            point: GeoPoint::new(row.lat, row.lng),
        })?;
    }

    Ok(data)
}
