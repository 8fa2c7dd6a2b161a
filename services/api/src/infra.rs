use location_select::config::DirectoryConfig;
use location_select::location::{
    Area, AreaId, AreaSource, City, CityId, CsvAreaSource, DirectoryData, GeoPoint, SourceError,
    StaticAreaSource,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Area source picked from configuration: a CSV export or the bundled sample set.
pub(crate) enum ConfiguredSource {
    Csv(CsvAreaSource),
    Sample(StaticAreaSource),
}

impl AreaSource for ConfiguredSource {
    fn fetch(&self) -> Result<DirectoryData, SourceError> {
        match self {
            ConfiguredSource::Csv(source) => source.fetch(),
            ConfiguredSource::Sample(source) => source.fetch(),
        }
    }
}

pub(crate) fn area_source(config: &DirectoryConfig) -> Result<ConfiguredSource, SourceError> {
    Ok(match &config.areas_csv {
        Some(path) => ConfiguredSource::Csv(CsvAreaSource::new(path.clone())),
        None => ConfiguredSource::Sample(StaticAreaSource::new(sample_directory()?)),
    })
}

const SAMPLE_AREAS: &[(i64, &str, i64, &str, f64, f64)] = &[
    (7, "Mitte", 1, "Berlin", 52.5200, 13.4050),
    (8, "Kreuzberg", 1, "Berlin", 52.4986, 13.4033),
    (9, "Prenzlauer Berg", 1, "Berlin", 52.5389, 13.4242),
    (12, "Le Marais", 2, "Paris", 48.8575, 2.3592),
    (13, "Montmartre", 2, "Paris", 48.8867, 2.3431),
    (21, "Gràcia", 3, "Barcelona", 41.4036, 2.1568),
];

pub(crate) fn sample_directory() -> Result<DirectoryData, SourceError> {
    let mut data = DirectoryData::default();
    for &(id, name, city_id, city, lat, lng) in SAMPLE_AREAS {
        data.add_city(City {
            id: CityId(city_id),
            name: city.to_string(),
        })?;
        data.add_area(Area {
            id: AreaId(id),
            display_name: Area::display_name_for(city, name),
            name: name.to_string(),
            city_id: CityId(city_id),
            point: GeoPoint::new(lat, lng),
        })?;
    }
    Ok(data)
}
