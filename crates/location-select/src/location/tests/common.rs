use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::location::directory::{
    AreaDirectory, DirectoryData, DirectorySnapshot, SelectionSink, SelectionState,
};
use crate::location::domain::{
    Area, AreaId, City, CityId, GeoPoint, LatLng, Location, SelectionCommand,
};
use crate::location::source::{AreaSource, SourceError, StaticAreaSource};
use crate::location::store::LocationStore;
use crate::location::LocationResolver;

pub(super) fn area(id: i64, name: &str, city: &City, point: GeoPoint) -> Area {
    Area {
        id: AreaId(id),
        display_name: Area::display_name_for(&city.name, name),
        name: name.to_string(),
        city_id: city.id,
        point,
    }
}

pub(super) fn berlin() -> City {
    City {
        id: CityId(1),
        name: "Berlin".to_string(),
    }
}

pub(super) fn paris() -> City {
    City {
        id: CityId(2),
        name: "Paris".to_string(),
    }
}

pub(super) fn mitte_point() -> GeoPoint {
    GeoPoint::new(52.52, 13.405)
}

pub(super) fn directory_data() -> DirectoryData {
    let berlin = berlin();
    let paris = paris();
    let mut data = DirectoryData::default();
    data.add_city(berlin.clone()).expect("berlin registers");
    data.add_city(paris.clone()).expect("paris registers");
    data.add_area(area(7, "Mitte", &berlin, mitte_point()))
        .expect("mitte registers");
    data.add_area(area(8, "Kreuzberg", &berlin, GeoPoint::new(52.4986, 13.4033)))
        .expect("kreuzberg registers");
    data.add_area(area(12, "Marais", &paris, GeoPoint::new(48.8575, 2.3592)))
        .expect("marais registers");
    data
}

pub(super) type MemoryStore = LocationStore<StaticAreaSource>;

pub(super) fn store() -> Arc<MemoryStore> {
    Arc::new(LocationStore::new(Arc::new(StaticAreaSource::new(
        directory_data(),
    ))))
}

pub(super) fn activated_resolver(
    store: &Arc<MemoryStore>,
) -> (LocationResolver<MemoryStore, MemoryStore>, ChangeLog) {
    let log = ChangeLog::default();
    let mut resolver =
        LocationResolver::new(store.clone(), store.clone()).on_change(log.listener());
    resolver.activate();
    (resolver, log)
}

/// Records every location handed to the change listener.
#[derive(Default, Clone)]
pub(super) struct ChangeLog {
    events: Arc<Mutex<Vec<Option<Location>>>>,
}

impl ChangeLog {
    pub(super) fn listener(&self) -> impl FnMut(Option<&Location>) + Send + 'static {
        let events = self.events.clone();
        move |location: Option<&Location>| {
            events
                .lock()
                .expect("change log poisoned")
                .push(location.cloned());
        }
    }

    pub(super) fn events(&self) -> Vec<Option<Location>> {
        self.events.lock().expect("change log poisoned").clone()
    }
}

/// Sink that records commands and delegates to a store.
pub(super) struct RecordingSink {
    inner: Arc<MemoryStore>,
    commands: Mutex<Vec<SelectionCommand>>,
}

impl RecordingSink {
    pub(super) fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            commands: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn commands(&self) -> Vec<SelectionCommand> {
        self.commands.lock().expect("sink poisoned").clone()
    }
}

impl SelectionSink for RecordingSink {
    fn select_location(&self, command: SelectionCommand) {
        self.commands.lock().expect("sink poisoned").push(command);
        self.inner.select_location(command);
    }

    fn selection(&self) -> SelectionState {
        self.inner.selection()
    }
}

/// Directory whose snapshot can be swapped by the test, simulating a reload.
#[derive(Default)]
pub(super) struct SwappableDirectory {
    snapshot: Mutex<Arc<DirectorySnapshot>>,
    loads: AtomicUsize,
}

impl SwappableDirectory {
    pub(super) fn install(&self, snapshot: DirectorySnapshot) {
        *self.snapshot.lock().expect("directory poisoned") = Arc::new(snapshot);
    }

    pub(super) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl AreaDirectory for SwappableDirectory {
    fn load_cities(&self) {
        self.loads.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> Arc<DirectorySnapshot> {
        self.snapshot.lock().expect("directory poisoned").clone()
    }
}

/// Sink whose stored selection is set directly by the test.
#[derive(Default)]
pub(super) struct FixedSink {
    state: Mutex<SelectionState>,
}

impl FixedSink {
    pub(super) fn set(&self, state: SelectionState) {
        *self.state.lock().expect("sink poisoned") = state;
    }
}

impl SelectionSink for FixedSink {
    fn select_location(&self, _command: SelectionCommand) {}

    fn selection(&self) -> SelectionState {
        self.state.lock().expect("sink poisoned").clone()
    }
}

pub(super) struct UnavailableSource;

impl AreaSource for UnavailableSource {
    fn fetch(&self) -> Result<DirectoryData, SourceError> {
        Err(SourceError::Unavailable("directory offline".to_string()))
    }
}

/// Map point whose accessors count how often they are evaluated.
#[derive(Default)]
pub(super) struct CountingPoint {
    pub(super) lat: f64,
    pub(super) lng: f64,
    pub(super) reads: AtomicUsize,
}

impl LatLng for CountingPoint {
    fn lat(&self) -> f64 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.lat
    }

    fn lng(&self) -> f64 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.lng
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
