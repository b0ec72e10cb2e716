use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{service::Error, AppState, ErrorResponse, Station};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every weather station in the dataset", content_type = "application/json", body = Vec<Station>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read stations", body = ErrorResponse)
    ))]
pub async fn get_stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Station>>, Error> {
    state.climate.stations().await.map(Json)
}
