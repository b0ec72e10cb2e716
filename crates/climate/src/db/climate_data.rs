use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use time::Date;
use utoipa::ToSchema;

use crate::dates::{format_iso_date, parse_iso_date, serde_iso_date, trailing_year_anchor};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query dataset: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to parse stored date: {0}")]
    DateParse(#[from] time::error::Parse),
    #[error("Dataset contains no observations")]
    EmptyDataset,
}

/// Aggregate reads over the `measurement` and `station` tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Most recent observation date in the dataset.
    async fn latest_date(&self) -> Result<Date, Error>;
    /// Average precipitation per date, newest first. Dates where every
    /// reading is null are left out.
    async fn precipitation_by_date(&self) -> Result<Vec<Precipitation>, Error>;
    async fn all_stations(&self) -> Result<Vec<Station>, Error>;
    /// Average temperature per date for the year ending at [`latest_date`],
    /// newest first. The anchor day itself is excluded.
    ///
    /// [`latest_date`]: ClimateData::latest_date
    async fn temperature_for_last_year(&self) -> Result<Vec<DailyTemperature>, Error>;
    /// Min/avg/max temperature for `start..=end`. No matching rows yields
    /// all-null fields rather than an error.
    async fn temperature_stats(&self, start: Date, end: Date) -> Result<TemperatureStats, Error>;
}

pub struct ClimateAccess {
    pool: SqlitePool,
}

impl ClimateAccess {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn latest_date(&self) -> Result<Date, Error> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        match latest {
            Some(date) => Ok(parse_iso_date(&date)?),
            None => Err(Error::EmptyDataset),
        }
    }

    async fn precipitation_by_date(&self) -> Result<Vec<Precipitation>, Error> {
        let rows: Vec<(String, f64)> = sqlx::query_as(
            "SELECT date, CAST(AVG(prcp) AS REAL) AS prcp
             FROM measurement
             GROUP BY date
             HAVING COUNT(prcp) > 0
             ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(date, prcp)| {
                Ok(Precipitation {
                    date: parse_iso_date(&date)?,
                    prcp,
                })
            })
            .collect()
    }

    async fn all_stations(&self) -> Result<Vec<Station>, Error> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT station, COALESCE(MAX(name), '') AS name
             FROM station
             GROUP BY station
             ORDER BY station",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Station { id, name })
            .collect())
    }

    async fn temperature_for_last_year(&self) -> Result<Vec<DailyTemperature>, Error> {
        let latest = self.latest_date().await?;
        let anchor = trailing_year_anchor(latest);
        debug!(
            "trailing year window: ({}, {}]",
            format_iso_date(anchor),
            format_iso_date(latest)
        );

        let rows: Vec<(String, f64)> = sqlx::query_as(
            "SELECT date, CAST(AVG(tobs) AS REAL) AS temp
             FROM measurement
             WHERE date > ? AND date <= ?
             GROUP BY date
             HAVING COUNT(tobs) > 0
             ORDER BY date DESC",
        )
        .bind(format_iso_date(anchor))
        .bind(format_iso_date(latest))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(date, temp)| {
                Ok(DailyTemperature {
                    date: parse_iso_date(&date)?,
                    temp,
                })
            })
            .collect()
    }

    async fn temperature_stats(&self, start: Date, end: Date) -> Result<TemperatureStats, Error> {
        let (min_temp, avg_temp, max_temp): (Option<f64>, Option<f64>, Option<f64>) =
            sqlx::query_as(
                "SELECT CAST(MIN(tobs) AS REAL), CAST(AVG(tobs) AS REAL), CAST(MAX(tobs) AS REAL)
                 FROM measurement
                 WHERE date >= ? AND date <= ?",
            )
            .bind(format_iso_date(start))
            .bind(format_iso_date(end))
            .fetch_one(&self.pool)
            .await?;

        Ok(TemperatureStats {
            min_temp,
            avg_temp,
            max_temp,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Precipitation {
    #[serde(with = "serde_iso_date")]
    #[schema(value_type = String, format = Date, example = "2017-08-23")]
    pub date: Date,
    /// Average precipitation across all stations reporting that day
    pub prcp: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Station {
    #[schema(example = "USC00519397")]
    pub id: String,
    #[schema(example = "WAIKIKI 717.2, HI US")]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DailyTemperature {
    #[serde(with = "serde_iso_date")]
    #[schema(value_type = String, format = Date, example = "2017-08-23")]
    pub date: Date,
    /// Average observed temperature across all stations reporting that day
    pub temp: f64,
}

/// Temperature summary over a date range. All fields are null when the
/// range holds no observations.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema)]
pub struct TemperatureStats {
    pub min_temp: Option<f64>,
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

impl TemperatureStats {
    pub fn is_empty(&self) -> bool {
        self.min_temp.is_none() && self.avg_temp.is_none() && self.max_temp.is_none()
    }
}
