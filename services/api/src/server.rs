use crate::cli::ServeArgs;
use crate::infra::{area_source, AppState};
use crate::routes::with_location_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use location_select::config::AppConfig;
use location_select::error::AppError;
use location_select::location::{Location, LocationResolver, LocationService, LocationStore};
use location_select::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.areas_csv.take() {
        config.directory.areas_csv = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = area_source(&config.directory)?;
    let store = Arc::new(LocationStore::new(Arc::new(source)));
    let resolver = LocationResolver::new(store.clone(), store)
        .with_policy(config.resolution)
        .on_change(log_location_change);
    let location_service = Arc::new(LocationService::new(resolver));

    let app = with_location_routes(location_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, ?config.resolution, %addr, "location select service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn log_location_change(location: Option<&Location>) {
    match location {
        Some(location) => info!(
            area_id = location.area.id.0,
            area = %location.area.display_name,
            lat = location.point.lat,
            lng = location.point.lng,
            "selected location changed"
        ),
        None => info!("selected location cleared"),
    }
}
