use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use super::directory::{AreaDirectory, SelectionSink};
use super::domain::{ListPick, MapCandidate, SelectOption};
use super::service::{LocationService, SelectionOutcome};
use super::view::LocationView;
use crate::error::AppError;

/// Router builder exposing the picker state and both selection paths.
pub fn location_router<D, S>(service: Arc<LocationService<D, S>>) -> Router
where
    D: AreaDirectory + 'static,
    S: SelectionSink + 'static,
{
    Router::new()
        .route("/api/v1/location", get(view_handler::<D, S>))
        .route("/api/v1/location/options", get(options_handler::<D, S>))
        .route("/api/v1/location/select", post(select_handler::<D, S>))
        .route("/api/v1/location/map", post(map_handler::<D, S>))
        .with_state(service)
}

pub(crate) async fn view_handler<D, S>(
    State(service): State<Arc<LocationService<D, S>>>,
) -> Json<LocationView>
where
    D: AreaDirectory + 'static,
    S: SelectionSink + 'static,
{
    Json(service.view())
}

pub(crate) async fn options_handler<D, S>(
    State(service): State<Arc<LocationService<D, S>>>,
) -> Json<Vec<SelectOption>>
where
    D: AreaDirectory + 'static,
    S: SelectionSink + 'static,
{
    Json(service.options())
}

pub(crate) async fn select_handler<D, S>(
    State(service): State<Arc<LocationService<D, S>>>,
    Json(pick): Json<ListPick>,
) -> Result<Json<SelectionOutcome>, AppError>
where
    D: AreaDirectory + 'static,
    S: SelectionSink + 'static,
{
    let outcome = service.select_option(pick)?;
    Ok(Json(outcome))
}

pub(crate) async fn map_handler<D, S>(
    State(service): State<Arc<LocationService<D, S>>>,
    Json(candidate): Json<MapCandidate>,
) -> Result<Json<SelectionOutcome>, AppError>
where
    D: AreaDirectory + 'static,
    S: SelectionSink + 'static,
{
    let outcome = service.select_map_location(candidate)?;
    Ok(Json(outcome))
}
