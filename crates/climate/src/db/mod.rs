pub mod climate_data;
pub mod schema;
pub mod sqlite;

pub use climate_data::{
    ClimateAccess, ClimateData, DailyTemperature, Precipitation, Station, TemperatureStats,
};
pub use schema::{SchemaError, SCHEMA_VERSION};
pub use sqlite::Database;
