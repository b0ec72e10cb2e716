//! Read-only REST API over the Hawaii historical climate dataset.

pub mod dates;
pub mod db;
pub mod routes;
pub mod service;
mod startup;
mod utils;

pub use db::{
    climate_data::Error as DataError, ClimateAccess, ClimateData, DailyTemperature, Database,
    Precipitation, SchemaError, Station, TemperatureStats, SCHEMA_VERSION,
};
pub use service::{ClimateService, Error, ErrorResponse};
pub use startup::{app, build_app_state, AppState};
pub use utils::{get_config_info, get_log_level, setup_logger, Cli};
