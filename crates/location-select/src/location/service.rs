use std::sync::Mutex;

use serde::Serialize;

use super::directory::{AreaDirectory, SelectionSink};
use super::domain::{ListPick, MapCandidate, SelectOption, SelectionCommand};
use super::resolver::{LocationResolver, ResolveError};
use super::view::LocationView;

/// Thread-safe front for a resolver; events are applied one at a time.
pub struct LocationService<D, S> {
    resolver: Mutex<LocationResolver<D, S>>,
}

/// Command forwarded to the sink together with the view it produced.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    pub command: SelectionCommand,
    pub view: LocationView,
}

impl<D, S> LocationService<D, S>
where
    D: AreaDirectory + 'static,
    S: SelectionSink + 'static,
{
    /// Wrap and activate the resolver, which loads the directory on first use.
    pub fn new(mut resolver: LocationResolver<D, S>) -> Self {
        resolver.activate();
        Self {
            resolver: Mutex::new(resolver),
        }
    }

    pub fn view(&self) -> LocationView {
        let mut resolver = self.resolver.lock().expect("resolver mutex poisoned");
        resolver.sync();
        resolver.view().clone()
    }

    pub fn options(&self) -> Vec<SelectOption> {
        self.view().options
    }

    pub fn select_option(&self, pick: ListPick) -> Result<SelectionOutcome, ResolveError> {
        let mut resolver = self.resolver.lock().expect("resolver mutex poisoned");
        let command = resolver.select_option(pick)?;
        Ok(SelectionOutcome {
            command,
            view: resolver.view().clone(),
        })
    }

    pub fn select_map_location(
        &self,
        candidate: MapCandidate,
    ) -> Result<SelectionOutcome, ResolveError> {
        let mut resolver = self.resolver.lock().expect("resolver mutex poisoned");
        let command = resolver.select_map_location(candidate)?;
        Ok(SelectionOutcome {
            command,
            view: resolver.view().clone(),
        })
    }
}
