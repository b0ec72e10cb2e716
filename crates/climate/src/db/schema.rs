//! Expected layout of the pre-populated dataset.
//!
//! The store is never migrated by this service. At startup the live tables
//! are compared against [`TABLES`] and the server refuses to start if a
//! required table or column is absent.

use log::debug;
use sqlx::SqlitePool;

/// Bumped whenever [`TABLES`] changes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Columns the queries depend on. Extra columns (ids, coordinates,
/// elevation) are allowed.
pub const TABLES: &[TableSchema] = &[
    TableSchema {
        name: "measurement",
        columns: &["station", "date", "prcp", "tobs"],
    },
    TableSchema {
        name: "station",
        columns: &["station", "name"],
    },
];

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("Failed to inspect dataset schema: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Dataset is missing table `{0}` (schema v{})", SCHEMA_VERSION)]
    MissingTable(String),
    #[error(
        "Dataset table `{table}` is missing column `{column}` (schema v{})",
        SCHEMA_VERSION
    )]
    MissingColumn { table: String, column: String },
}

pub async fn verify(pool: &SqlitePool) -> Result<(), SchemaError> {
    for table in TABLES {
        let found: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
            .bind(table.name)
            .fetch_all(pool)
            .await?;

        if found.is_empty() {
            return Err(SchemaError::MissingTable(table.name.to_string()));
        }

        for column in table.columns {
            if !found.iter().any(|name| name.eq_ignore_ascii_case(column)) {
                return Err(SchemaError::MissingColumn {
                    table: table.name.to_string(),
                    column: column.to_string(),
                });
            }
        }
        debug!("table {} matches schema v{}", table.name, SCHEMA_VERSION);
    }
    Ok(())
}
