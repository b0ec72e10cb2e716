use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    service::Error, AppState, DailyTemperature, ErrorResponse, Precipitation, TemperatureStats,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Average precipitation per day, newest first", content_type = "application/json", body = Vec<Precipitation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read precipitation", body = ErrorResponse)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Precipitation>>, Error> {
    state.climate.precipitation().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Average temperature per day for the year ending at the latest observation", content_type = "application/json", body = Vec<DailyTemperature>),
        (status = SERVICE_UNAVAILABLE, description = "Dataset has no observations", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read temperatures", body = ErrorResponse)
    ))]
pub async fn temperature_observations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DailyTemperature>>, Error> {
    state.climate.recent_temperatures().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First day of the range, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min/avg/max temperature from start through the latest observation", content_type = "application/json", body = Vec<TemperatureStats>),
        (status = BAD_REQUEST, description = "Start is not a YYYY-MM-DD date", body = ErrorResponse),
        (status = SERVICE_UNAVAILABLE, description = "Dataset has no observations", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to compute stats", body = ErrorResponse)
    ))]
pub async fn stats_from_start(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureStats>>, Error> {
    state.climate.stats_from_start(&start).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First day of the range, YYYY-MM-DD"),
         ("end" = String, Path, description = "Last day of the range, YYYY-MM-DD; clamped to the latest observation"),
    ),
    responses(
        (status = OK, description = "Min/avg/max temperature over the range, swapped if reversed", content_type = "application/json", body = Vec<TemperatureStats>),
        (status = BAD_REQUEST, description = "Start or end is not a YYYY-MM-DD date", body = ErrorResponse),
        (status = SERVICE_UNAVAILABLE, description = "Dataset has no observations", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to compute stats", body = ErrorResponse)
    ))]
pub async fn stats_from_range(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureStats>>, Error> {
    state.climate.stats_from_range(&start, &end).await.map(Json)
}
