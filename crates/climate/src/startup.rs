use crate::{
    db,
    routes::{self, api_root_handler, index_handler},
    service, ClimateAccess, ClimateData, ClimateService, Database,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate: ClimateService,
}

impl AppState {
    pub fn new(data: Arc<dyn ClimateData>) -> Self {
        Self {
            climate: ClimateService::new(data),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::measurements::precipitation,
        routes::climate::measurements::temperature_observations,
        routes::climate::measurements::stats_from_start,
        routes::climate::measurements::stats_from_range,
        routes::climate::stations::get_stations,
    ),
    components(
        schemas(
                db::Precipitation,
                db::Station,
                db::DailyTemperature,
                db::TemperatureStats,
                service::ErrorResponse,
            )
    ),
    tags(
        (name = "hawaii climate api", description = "a read-only RESTful api over historical Hawaii precipitation and temperature observations")
    )
)]
struct ApiDoc;

/// Opens the dataset and wires the query service on top of it.
///
/// Returns the [`Database`] alongside the state so the caller can close the
/// pool on shutdown.
pub async fn build_app_state(
    database_path: String,
    max_connections: u32,
) -> Result<(AppState, Database), anyhow::Error> {
    let database = Database::new(&database_path, max_connections)
        .await
        .map_err(|e| anyhow!("error opening climate dataset: {:#}", e))?;

    database
        .health_check()
        .await
        .map_err(|e| anyhow!("climate dataset failed health check: {:#}", e))?;

    let climate_data = Arc::new(ClimateAccess::new(database.pool().clone()));

    Ok((AppState::new(climate_data), database))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0", get(api_root_handler))
        .route("/api/v1.0/precipitation", get(routes::precipitation))
        .route("/api/v1.0/stations", get(routes::get_stations))
        .route("/api/v1.0/tobs", get(routes::temperature_observations))
        .route("/api/v1.0/{start}", get(routes::stats_from_start))
        .route("/api/v1.0/{start}/{end}", get(routes::stats_from_range))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, path: {}, time: {}", response.status().as_str(), path, response_time);

    response
}
