use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::directory::{AreaDirectory, DirectorySnapshot, SelectionSink, SelectionState};
use super::domain::{SelectionCommand, StoredLocation};
use super::source::AreaSource;

/// In-memory state container holding the area directory and the current selection.
pub struct LocationStore<S> {
    source: Arc<S>,
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    snapshot: Arc<DirectorySnapshot>,
    selection: SelectionState,
}

impl<S> LocationStore<S>
where
    S: AreaSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            state: Mutex::new(StoreState::default()),
        }
    }
}

impl<S> AreaDirectory for LocationStore<S>
where
    S: AreaSource + 'static,
{
    fn load_cities(&self) {
        match self.source.fetch() {
            Ok(data) => {
                info!(
                    areas = data.area_count(),
                    cities = data.city_count(),
                    "area directory loaded"
                );
                let snapshot = Arc::new(DirectorySnapshot::loaded(data, Utc::now()));
                self.state.lock().expect("store mutex poisoned").snapshot = snapshot;
            }
            Err(err) => {
                warn!(error = %err, "area directory load failed; keeping previous snapshot");
            }
        }
    }

    fn snapshot(&self) -> Arc<DirectorySnapshot> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .snapshot
            .clone()
    }
}

impl<S> SelectionSink for LocationStore<S>
where
    S: AreaSource + 'static,
{
    fn select_location(&self, command: SelectionCommand) {
        let mut state = self.state.lock().expect("store mutex poisoned");

        let stored = command.location().and_then(|request| {
            match state.snapshot.area(request.area_id) {
                Some(area) => Some(Arc::new(StoredLocation {
                    area_id: area.id,
                    city_id: area.city_id,
                    point: request.point.unwrap_or(area.point),
                })),
                None => {
                    warn!(
                        area_id = %request.area_id,
                        "selected area missing from directory; clearing selection"
                    );
                    None
                }
            }
        });

        debug!(
            area_id = stored.as_ref().map(|location| location.area_id.0),
            show_on_map = command.show_on_map(),
            "selection applied"
        );
        state.selection = SelectionState {
            location: stored,
            show_on_map: command.show_on_map(),
        };
    }

    fn selection(&self) -> SelectionState {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .selection
            .clone()
    }
}
