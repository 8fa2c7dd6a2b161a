use std::sync::Arc;

use tracing::debug;

use super::directory::{AreaDirectory, DirectorySnapshot, SelectionSink};
use super::domain::{
    AreaId, GeoPoint, LatLng, ListPick, Location, MapCandidate, OptionValue, SelectionCommand,
    StoredLocation,
};
use super::view::{derive_view, LocationView};

/// How malformed list picks and unknown map places are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Degrade to a clear command (or area 0 for unusable option values).
    #[default]
    Lenient,
    /// Reject the event and leave the current selection untouched.
    Strict,
}

/// Reasons an event could not be turned into a selection under [`ResolutionPolicy::Strict`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("list pick carried {count} options; expected exactly one")]
    MultipleOptions { count: usize },
    #[error("picked option has no value")]
    MissingValue,
    #[error("option value '{value}' is not an integer area id")]
    InvalidValue { value: String },
    #[error("no area is labelled '{label}'")]
    UnknownPlace { label: String },
}

pub type ChangeListener = Box<dyn FnMut(Option<&Location>) + Send>;

/// Last state the resolver derived its view from.
#[derive(Default)]
struct Observed {
    snapshot: Option<Arc<DirectorySnapshot>>,
    stored: Option<Arc<StoredLocation>>,
    location: Option<Arc<Location>>,
}

/// Turns list and map picks into selection commands and keeps the derived view current.
pub struct LocationResolver<D, S> {
    directory: Arc<D>,
    sink: Arc<S>,
    policy: ResolutionPolicy,
    on_change: Option<ChangeListener>,
    activated: bool,
    observed: Observed,
    view: LocationView,
}

impl<D, S> LocationResolver<D, S>
where
    D: AreaDirectory + 'static,
    S: SelectionSink + 'static,
{
    pub fn new(directory: Arc<D>, sink: Arc<S>) -> Self {
        Self {
            directory,
            sink,
            policy: ResolutionPolicy::default(),
            on_change: None,
            activated: false,
            observed: Observed::default(),
            view: LocationView::default(),
        }
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Register the listener invoked whenever the resolved location changes.
    pub fn on_change<F>(mut self, listener: F) -> Self
    where
        F: FnMut(Option<&Location>) + Send + 'static,
    {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn view(&self) -> &LocationView {
        &self.view
    }

    pub fn location(&self) -> Option<&Location> {
        self.observed.location.as_deref()
    }

    /// First activation triggers the one-time directory load; every call re-syncs.
    pub fn activate(&mut self) {
        if !self.activated {
            self.activated = true;
            self.directory.load_cities();
        }
        self.sync();
    }

    /// Handle a pick from the option list and forward the resulting command.
    pub fn select_option(&mut self, pick: ListPick) -> Result<SelectionCommand, ResolveError> {
        let command = self.command_for_pick(pick)?;
        self.dispatch(command);
        Ok(command)
    }

    /// Handle a place reported by the map and forward the resulting command.
    pub fn select_map_location<P: LatLng>(
        &mut self,
        candidate: MapCandidate<P>,
    ) -> Result<SelectionCommand, ResolveError> {
        self.sync();
        let command = self.command_for_place(&candidate)?;
        self.dispatch(command);
        Ok(command)
    }

    pub fn command_for_pick(&self, pick: ListPick) -> Result<SelectionCommand, ResolveError> {
        match pick {
            ListPick::Cleared => Ok(SelectionCommand::clear()),
            ListPick::Multiple(count) => self.degrade(ResolveError::MultipleOptions { count }),
            ListPick::Single(option) => {
                let area_id = match coerce_area_id(option.value.as_ref()) {
                    Ok(area_id) => area_id,
                    Err(err) if self.policy == ResolutionPolicy::Strict => return Err(err),
                    Err(err) => {
                        debug!(reason = %err, "option value unusable; defaulting to area 0");
                        AreaId(0)
                    }
                };
                Ok(SelectionCommand::select(area_id, None, true))
            }
        }
    }

    /// Match `"<locality>, <area>"` exactly against the current option labels.
    pub fn command_for_place<P: LatLng>(
        &self,
        candidate: &MapCandidate<P>,
    ) -> Result<SelectionCommand, ResolveError> {
        let label = candidate.area_label();
        match self.view.options.iter().find(|option| option.label == label) {
            Some(option) => {
                let point = candidate
                    .point
                    .as_ref()
                    .map(|point| GeoPoint::new(point.lat(), point.lng()));
                debug!(area_id = option.value.0, %label, "map place matched area");
                // The event came from the map, so the map is not refocused.
                Ok(SelectionCommand::select(option.value, point, false))
            }
            None => self.degrade(ResolveError::UnknownPlace { label }),
        }
    }

    /// Re-derive the view from the directory and sink, notifying on location identity change.
    pub fn sync(&mut self) {
        let snapshot = self.directory.snapshot();
        let selection = self.sink.selection();

        let snapshot_unchanged = self
            .observed
            .snapshot
            .as_ref()
            .is_some_and(|previous| Arc::ptr_eq(previous, &snapshot));
        let stored_unchanged = same_arc(&self.observed.stored, &selection.location);

        let location = if snapshot_unchanged && stored_unchanged {
            self.observed.location.clone()
        } else {
            selection
                .location
                .as_deref()
                .and_then(|stored| snapshot.resolve(stored))
                .map(Arc::new)
        };
        let changed = !same_arc(&self.observed.location, &location);

        self.view = derive_view(&snapshot, location.as_deref(), selection.show_on_map);
        self.observed = Observed {
            snapshot: Some(snapshot),
            stored: selection.location,
            location,
        };

        if changed {
            if let Some(listener) = self.on_change.as_mut() {
                listener(self.observed.location.as_deref());
            }
        }
    }

    fn dispatch(&mut self, command: SelectionCommand) {
        self.sink.select_location(command);
        self.sync();
    }

    fn degrade(&self, err: ResolveError) -> Result<SelectionCommand, ResolveError> {
        match self.policy {
            ResolutionPolicy::Strict => Err(err),
            ResolutionPolicy::Lenient => {
                debug!(reason = %err, "clearing selection");
                Ok(SelectionCommand::clear())
            }
        }
    }
}

fn same_arc<T>(previous: &Option<Arc<T>>, current: &Option<Arc<T>>) -> bool {
    match (previous, current) {
        (Some(previous), Some(current)) => Arc::ptr_eq(previous, current),
        (None, None) => true,
        _ => false,
    }
}

/// Read an area id out of a raw option value.
///
/// Falsy values (absent, `false`, `0.0`, `NaN`, blank text) yield
/// [`ResolveError::MissingValue`]; lenient callers substitute area 0. Integral
/// floats and decimal text are accepted, anything else is
/// [`ResolveError::InvalidValue`].
pub fn coerce_area_id(value: Option<&OptionValue>) -> Result<AreaId, ResolveError> {
    match value {
        None | Some(OptionValue::Bool(false)) => Err(ResolveError::MissingValue),
        Some(OptionValue::Number(number)) => Ok(AreaId(*number)),
        Some(OptionValue::Float(number)) if *number == 0.0 || number.is_nan() => {
            Err(ResolveError::MissingValue)
        }
        Some(OptionValue::Float(number))
            if number.fract() == 0.0
                && *number >= i64::MIN as f64
                && *number < i64::MAX as f64 =>
        {
            Ok(AreaId(*number as i64))
        }
        Some(OptionValue::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ResolveError::MissingValue);
            }
            trimmed
                .parse::<i64>()
                .map(AreaId)
                .map_err(|_| ResolveError::InvalidValue {
                    value: text.clone(),
                })
        }
        Some(other) => Err(ResolveError::InvalidValue {
            value: describe_value(other),
        }),
    }
}

fn describe_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(flag) => flag.to_string(),
        OptionValue::Number(number) => number.to_string(),
        OptionValue::Float(number) => number.to_string(),
        OptionValue::Text(text) => text.clone(),
    }
}
