//! Area picker reconciliation.
//!
//! A [`LocationResolver`] receives list picks and map picks, turns them into
//! [`SelectionCommand`]s for a [`SelectionSink`], and re-derives a
//! [`LocationView`] from the [`AreaDirectory`] and the sink's stored selection.
//! [`LocationStore`] is the in-memory container implementing both seams.

pub mod directory;
pub mod domain;
pub mod resolver;
pub mod router;
pub mod service;
pub mod source;
pub mod store;
pub mod view;

#[cfg(test)]
mod tests;

pub use directory::{
    AreaDirectory, DirectoryData, DirectorySnapshot, SelectionSink, SelectionState,
};
pub use domain::{
    Area, AreaId, City, CityId, GeoPoint, LatLng, ListPick, Location, LocationRequest,
    MapCandidate, OptionValue, PickedOption, SelectOption, SelectionCommand, StoredLocation,
};
pub use resolver::{
    coerce_area_id, ChangeListener, LocationResolver, ResolutionPolicy, ResolveError,
};
pub use router::location_router;
pub use service::{LocationService, SelectionOutcome};
pub use source::{parse_areas, AreaSource, CsvAreaSource, SourceError, StaticAreaSource};
pub use store::LocationStore;
pub use view::{build_options, derive_view, LocationView, MapFocus};
