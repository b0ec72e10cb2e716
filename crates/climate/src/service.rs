use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Date;
use utoipa::ToSchema;

use crate::{
    dates::{format_iso_date, parse_iso_date},
    db::climate_data,
    ClimateData, DailyTemperature, Precipitation, Station, TemperatureStats,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid date `{value}`, expected YYYY-MM-DD: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: time::error::Parse,
    },
    #[error(transparent)]
    Data(#[from] climate_data::Error),
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            Error::Data(climate_data::Error::EmptyDataset) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("error handling climate request: {}", self);
        } else {
            warn!("rejected climate request: {}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn parse_date(value: &str) -> Result<Date, Error> {
    parse_iso_date(value).map_err(|source| Error::InvalidDate {
        value: value.to_owned(),
        source,
    })
}

/// Request-facing queries over the climate dataset.
#[derive(Clone)]
pub struct ClimateService {
    data: Arc<dyn ClimateData>,
}

impl ClimateService {
    pub fn new(data: Arc<dyn ClimateData>) -> Self {
        Self { data }
    }

    pub async fn precipitation(&self) -> Result<Vec<Precipitation>, Error> {
        Ok(self.data.precipitation_by_date().await?)
    }

    pub async fn stations(&self) -> Result<Vec<Station>, Error> {
        Ok(self.data.all_stations().await?)
    }

    pub async fn recent_temperatures(&self) -> Result<Vec<DailyTemperature>, Error> {
        Ok(self.data.temperature_for_last_year().await?)
    }

    /// Stats from `start` through the last date in the dataset.
    pub async fn stats_from_start(&self, start: &str) -> Result<Vec<TemperatureStats>, Error> {
        let start = parse_date(start)?;
        let end = self.data.latest_date().await?;
        self.normalize_and_query(start, end).await
    }

    pub async fn stats_from_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<TemperatureStats>, Error> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        self.normalize_and_query(start, end).await
    }

    /// Reversed ranges are swapped, then `end` is clamped to the latest
    /// date in the dataset. The result always holds exactly one entry.
    pub async fn normalize_and_query(
        &self,
        start: Date,
        end: Date,
    ) -> Result<Vec<TemperatureStats>, Error> {
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        let latest = self.data.latest_date().await?;
        let end = end.min(latest);

        debug!(
            "temperature stats for [{}, {}]",
            format_iso_date(start),
            format_iso_date(end)
        );
        let stats = self.data.temperature_stats(start, end).await?;
        if stats.is_empty() {
            debug!("no observations in range, returning empty stats");
        }

        Ok(vec![stats])
    }
}
